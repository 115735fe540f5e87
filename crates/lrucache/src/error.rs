//! Error types for lrucache

/// Result type alias for lrucache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache construction
///
/// Lookups never fail: a missing key is reported as `None`, not as an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Capacity or shard layout is unusable (capacity <= 0, zero shards,
    /// more shards than capacity)
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidConfiguration(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = Error::invalid("capacity must be greater than 0, got 0");
        assert_eq!(
            err.to_string(),
            "Invalid configuration: capacity must be greater than 0, got 0"
        );
    }
}
