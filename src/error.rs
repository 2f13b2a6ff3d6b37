//! Error types for mockbridge

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for mockbridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Main error type for mockbridge operations.
///
/// Query parsing never fails, so nothing here comes from the parser.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Fixture not found: {}", path.display())]
    FixtureNotFound { path: PathBuf },

    #[error("Fixture path escapes the fixtures directory: {0}")]
    FixtureOutsideRoot(String),

    #[error("Invalid fixture {name}: {message}")]
    InvalidFixture { name: String, message: String },

    #[error("Config error in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
