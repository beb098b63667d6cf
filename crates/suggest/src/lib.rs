//! Category suggestions for transaction descriptions.
//!
//! The pipeline treats the suggester as a black-box oracle: one description in,
//! one category plus a confidence score out. Everything network-shaped lives
//! behind [`SuggestionClient`] so the import pipeline stays deterministic and
//! testable without credentials.

pub mod openai;
pub mod stub;

use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

pub use openai::OpenAiClient;
pub use stub::StubClient;

/// Suggestions at or below this confidence are discarded by default.
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.80;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub category: String,
    /// In [0, 1]; the caller applies the acceptance threshold.
    pub confidence: f64,
    /// Optional merchant-name hints for seeding a newly created category.
    #[serde(default)]
    pub keywords: Vec<String>,
}

#[derive(Debug, Error)]
pub enum SuggestError {
    /// Transport failure, including expiry of the per-call timeout.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {0}")]
    Api(u16),

    #[error("unusable response: {0}")]
    Malformed(String),
}

pub trait SuggestionClient: Send + Sync {
    fn suggest(
        &self,
        description: &str,
    ) -> impl Future<Output = Result<Suggestion, SuggestError>> + Send;
}
