//! Error types for Planetoid.

use thiserror::Error;

/// Common error type for Planetoid.
#[derive(Error, Debug)]
pub enum PlanetoidError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error (feed list or settings).
    ///
    /// Always fatal: the run aborts before any output is written.
    #[error("configuration error: {0}")]
    Config(String),

    /// Feed fetch or parse error.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// An item of a feed has no usable publication timestamp.
    #[error("timestamp error: {0}")]
    Timestamp(String),

    /// OPML import error.
    #[error("OPML error: {0}")]
    Opml(String),
}

/// Result type alias for Planetoid operations.
pub type Result<T> = std::result::Result<T, PlanetoidError>;
