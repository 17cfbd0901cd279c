use super::error::CollectorError;

/// Result type used by everything under `collectors`.
pub type CollectorResult<T> = std::result::Result<T, CollectorError>;
