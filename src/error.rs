//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
///
/// Per-key operations never report absence through this type: `get` returns
/// `Option`, `delete` and `refresh` return booleans. Errors are reserved for
/// structural misuse, which surfaces at construction time.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Construction parameters that cannot be satisfied
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
