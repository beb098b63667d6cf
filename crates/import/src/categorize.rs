use centimo_core::{Category, UNCATEGORIZED};

/// First-match-wins keyword categorizer.
///
/// Categories are tried in definition order and keywords match as
/// case-insensitive substrings of the description, so overlapping keywords
/// across categories resolve deterministically to the earliest definition.
pub struct KeywordEngine {
    categories: Vec<CompiledCategory>,
}

struct CompiledCategory {
    name: String,
    /// Lowercased, trimmed, blanks removed.
    keywords: Vec<String>,
}

impl KeywordEngine {
    pub fn new(categories: &[Category]) -> Self {
        let compiled = categories
            .iter()
            .filter(|c| c.name != UNCATEGORIZED)
            .map(|c| CompiledCategory {
                name: c.name.clone(),
                keywords: c
                    .keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect(),
            })
            .filter(|c| !c.keywords.is_empty())
            .collect();
        Self {
            categories: compiled,
        }
    }

    /// Category name for a description, or `UNCATEGORIZED` when nothing matches.
    pub fn categorize(&self, description: &str) -> &str {
        let text = description.trim().to_lowercase();
        self.categories
            .iter()
            .find(|c| c.keywords.iter().any(|k| text.contains(k.as_str())))
            .map(|c| c.name.as_str())
            .unwrap_or(UNCATEGORIZED)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
