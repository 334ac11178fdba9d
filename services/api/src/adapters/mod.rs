pub mod db;
pub mod enrichment_llm;
pub mod upload;

pub use db::DbAdapter;
pub use enrichment_llm::GroqEnrichmentAdapter;
pub use upload::CloudinaryAdapter;
