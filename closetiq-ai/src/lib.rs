pub mod client;
pub mod models;
pub mod prompts;
pub mod provider;
pub mod reconciler;

// Re-export public APIs
pub use client::AiClient;
pub use models::GeminiConfig;
pub use provider::GeminiProvider;
pub use reconciler::{parse, parse_classification, reconcile, strip_code_fences};
