// The asione-memory crate provides the agent's long-term knowledge log.
// It handles storing, retrieving, and searching knowledge entries persisted
// as a single JSON file.

pub mod config;
mod entry;
pub mod errors;
pub mod integrator;
pub mod keywords;
mod store;

pub use config::KnowledgeConfig;
pub use entry::KnowledgeEntry;
pub use errors::{KnowledgeError, KnowledgeResult};
pub use integrator::{format_knowledge_response, KnowledgeIntegrator, NOTHING_FOUND};
pub use keywords::extract_keywords;
pub use store::{KnowledgeBase, KnowledgeStats, RetentionPolicy};
