//! Assertion failures

/// Result of an assertion
pub type Result<T = ()> = std::result::Result<T, AssertionFailure>;

/// A failed expectation, carrying the diagnostic to show the test author.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssertionFailure {
    /// An expected resource was not found
    #[error("{0}")]
    Missing(String),

    /// A resource was found that should not exist
    #[error("{0}")]
    Unexpected(String),
}

impl AssertionFailure {
    pub fn message(&self) -> &str {
        match self {
            Self::Missing(message) | Self::Unexpected(message) => message,
        }
    }
}
