//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `RmError` as one variant
//! where configuration problems can surface.

use thiserror::Error;

/// The base error type for `rm-core`.
#[derive(Debug, Error)]
pub enum RmError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `rm-core`.
pub type RmResult<T> = Result<T, RmError>;
