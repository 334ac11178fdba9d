//! crates/bugvault_core/src/enrichment.rs
//!
//! Builds the enrichment prompt for a bug entry and parses the free-text
//! reply back into its two labeled sections. The parsing is deliberately
//! forgiving: a missing marker leaves that field empty instead of failing
//! the surrounding entry creation.

use regex::Regex;

use crate::domain::Entry;

/// The two sections extracted from the model's reply.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnrichmentText {
    pub explanation: String,
    pub interview_question: String,
}

/// Builds the fixed prompt template embedding the bug's fields.
pub fn build_prompt(entry: &Entry) -> String {
    format!(
        "\nHere is a software bug:\n\nTitle: {}\n\nError Message:\n{}\n\nContext:\n{}\n\nRoot Cause:\n{}\n\nSolution:\n{}\n\n1. Explain this bug clearly in simple terms.\n2. Generate one interview-style question based on this bug.\n\nReturn in this format:\n\nExplanation:\n...\n\nInterview Question:\n...\n",
        entry.title,
        entry.error_message.as_deref().unwrap_or(""),
        entry.context,
        entry.root_cause.as_deref().unwrap_or(""),
        entry.solution,
    )
}

/// Locates the literal "Explanation:" and "Interview Question:" markers and
/// returns whatever sits between/after them, trimmed.
pub fn parse_reply(text: &str) -> EnrichmentText {
    // The explanation is anchored between the two markers; the question runs
    // to the end of the reply.
    let explanation_re = Regex::new(r"(?s)Explanation:\s*(.*?)Interview Question:").unwrap();
    let question_re = Regex::new(r"(?s)Interview Question:\s*(.*)").unwrap();

    let explanation = explanation_re
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    let interview_question = question_re
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default();

    EnrichmentText {
        explanation,
        interview_question,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EntryType;
    use chrono::Utc;
    use uuid::Uuid;

    fn bug_entry() -> Entry {
        Entry {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            entry_type: EntryType::Bug,
            title: "NPE on login".to_string(),
            error_message: Some("NullPointerException".to_string()),
            context: "Happens when the session cookie is stale".to_string(),
            root_cause: None,
            solution: "Guard the lookup".to_string(),
            screenshot_url: None,
            ai_explanation: String::new(),
            ai_interview_question: String::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn prompt_embeds_all_fields() {
        let prompt = build_prompt(&bug_entry());
        assert!(prompt.contains("Title: NPE on login"));
        assert!(prompt.contains("NullPointerException"));
        assert!(prompt.contains("Return in this format:"));
        // Absent optional fields render as empty, not as "None".
        assert!(!prompt.contains("None"));
    }

    #[test]
    fn parses_both_sections() {
        let reply = "Explanation:\nfoo\n\nInterview Question:\nbar";
        let parsed = parse_reply(reply);
        assert_eq!(parsed.explanation, "foo");
        assert_eq!(parsed.interview_question, "bar");
    }

    #[test]
    fn parses_multiline_sections() {
        let reply = "Explanation:\nline one\nline two\n\nInterview Question:\nWhat would you check first?\nAnd why?";
        let parsed = parse_reply(reply);
        assert_eq!(parsed.explanation, "line one\nline two");
        assert_eq!(
            parsed.interview_question,
            "What would you check first?\nAnd why?"
        );
    }

    #[test]
    fn missing_explanation_marker_leaves_field_empty() {
        let reply = "Interview Question:\nbar";
        let parsed = parse_reply(reply);
        assert_eq!(parsed.explanation, "");
        assert_eq!(parsed.interview_question, "bar");
    }

    #[test]
    fn missing_question_marker_leaves_both_empty() {
        // Without the second marker the explanation regex has no anchor
        // either, so nothing is extracted.
        let reply = "Explanation:\nfoo only";
        let parsed = parse_reply(reply);
        assert_eq!(parsed.explanation, "");
        assert_eq!(parsed.interview_question, "");
    }

    #[test]
    fn garbage_reply_parses_to_empty() {
        let parsed = parse_reply("the model rambled about something else entirely");
        assert_eq!(parsed, EnrichmentText::default());
    }
}
