//! services/api/src/adapters/enrichment_llm.rs
//!
//! This module contains the adapter for the enrichment LLM. It implements the
//! `EnrichmentService` port from the `core` crate against Groq's
//! OpenAI-compatible chat completion API.

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use bugvault_core::ports::{EnrichmentService, PortError, PortResult};

/// Groq serves the OpenAI wire protocol from this base.
pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

const SYSTEM_INSTRUCTIONS: &str = "You are a senior software engineer.";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `EnrichmentService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct GroqEnrichmentAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl GroqEnrichmentAdapter {
    /// Creates a new `GroqEnrichmentAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `EnrichmentService` Trait Implementation
//=========================================================================================

#[async_trait]
impl EnrichmentService for GroqEnrichmentAdapter {
    /// Sends the already-templated prompt and returns the raw completion text.
    async fn generate(&self, prompt: &str) -> PortResult<String> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_INSTRUCTIONS)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(0.7)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        // Extract the text content from the first choice in the response.
        if let Some(choice) = response.choices.into_iter().next() {
            if let Some(content) = choice.message.content {
                Ok(content)
            } else {
                Err(PortError::Unexpected(
                    "Enrichment LLM response contained no text content.".to_string(),
                ))
            }
        } else {
            Err(PortError::Unexpected(
                "Enrichment LLM returned no choices in its response.".to_string(),
            ))
        }
    }
}
