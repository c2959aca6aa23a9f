use thiserror::Error;

/// Errors returned by [`Vector`](crate::Vector) operations.
///
/// Both variants are recoverable; nothing in the crate panics on a bad index
/// or a length mismatch.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorError {
    #[error("missing element with index {index} (len {len})")]
    InvalidIndex { index: usize, len: usize },
    #[error("non equal vectors: {left} elements vs {right}")]
    SizeMismatch { left: usize, right: usize },
}

pub type Result<T> = std::result::Result<T, VectorError>;

/// Errors raised while loading a [`VectorConfig`](crate::VectorConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse vector config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Errors raised while restoring a [`Vector`](crate::Vector) from a
/// [`VectorSnapshot`](crate::VectorSnapshot).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("snapshot capacity {capacity} exceeds the maximum of {max}")]
    CapacityTooLarge { capacity: usize, max: usize },
}
