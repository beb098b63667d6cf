use std::collections::HashMap;

use crate::{SuggestError, Suggestion, SuggestionClient};

/// Deterministic in-memory suggester for tests and offline runs. Descriptions
/// without a canned answer behave like an unavailable service.
#[derive(Debug, Default, Clone)]
pub struct StubClient {
    canned: HashMap<String, Suggestion>,
}

impl StubClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        description: impl Into<String>,
        category: impl Into<String>,
        confidence: f64,
    ) -> Self {
        self.canned.insert(
            description.into(),
            Suggestion {
                category: category.into(),
                confidence,
                keywords: Vec::new(),
            },
        );
        self
    }

    pub fn with_suggestion(mut self, description: impl Into<String>, suggestion: Suggestion) -> Self {
        self.canned.insert(description.into(), suggestion);
        self
    }
}

impl SuggestionClient for StubClient {
    async fn suggest(&self, description: &str) -> Result<Suggestion, SuggestError> {
        self.canned
            .get(description)
            .cloned()
            .ok_or_else(|| SuggestError::Malformed(format!("no canned suggestion: '{description}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_canned_suggestion() {
        let stub = StubClient::new().with("MERCADONA", "Groceries", 0.95);
        let s = stub.suggest("MERCADONA").await.unwrap();
        assert_eq!(s.category, "Groceries");
        assert_eq!(s.confidence, 0.95);
    }

    #[tokio::test]
    async fn unknown_description_fails() {
        let stub = StubClient::new();
        assert!(stub.suggest("ANYTHING").await.is_err());
    }
}
