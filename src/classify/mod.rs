//! Text-classification capability consumed by the conventional strategy.
//!
//! The classifier is an injected capability object, never a global, so tests
//! can substitute deterministic fakes.

pub mod json;

use async_trait::async_trait;

use crate::error::ClassificationError;

pub use json::extract_json;

/// External LLM-backed text classification.
///
/// `classify` takes a fully built prompt and returns the raw model response
/// text; callers extract structure from it themselves.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, prompt: &str) -> Result<String, ClassificationError>;
}
