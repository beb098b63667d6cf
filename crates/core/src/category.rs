use serde::{Deserialize, Serialize};

/// Label applied to transactions no keyword or suggestion has claimed yet.
pub const UNCATEGORIZED: &str = "uncategorized";

/// A category definition: a unique name plus the ordered, case-insensitive
/// substrings that assign it during import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Option<i64>,
    pub name: String,
    pub keywords: Vec<String>,
}

impl Category {
    pub fn new(name: impl Into<String>, keywords: Vec<String>) -> Self {
        Category {
            id: None,
            name: name.into(),
            keywords,
        }
    }

    /// Append a keyword unless the list already carries it (case-insensitive).
    /// Returns whether the list changed.
    pub fn add_keyword(&mut self, keyword: &str) -> bool {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return false;
        }
        let exists = self
            .keywords
            .iter()
            .any(|k| k.trim().eq_ignore_ascii_case(keyword));
        if exists {
            return false;
        }
        self.keywords.push(keyword.to_string());
        true
    }
}
