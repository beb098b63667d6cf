use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A transaction with the same content hash is already stored.
    #[error("duplicate fingerprint: {0}")]
    DuplicateFingerprint(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// The stored keyword list for a category is not a valid JSON array.
    #[error("corrupt keyword list for category '{0}'")]
    CorruptKeywords(String),

    /// A stored row holds a value the domain types reject.
    #[error("corrupt row {id}: {reason}")]
    CorruptRow { id: i64, reason: String },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::DuplicateFingerprint(_))
    }
}
