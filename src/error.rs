//! Error types for unscan library.

use std::io;
use thiserror::Error;

/// Result type alias for unscan operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during page conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A block of the wrong kind was handed to a builder.
    #[error("Invalid block: {0}")]
    InvalidBlock(String),

    /// Page rotation is not a right angle.
    #[error("Unsupported page rotation: {0} degrees")]
    InvalidRotation(i32),

    /// Page index is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(usize, usize),

    /// The object store rejected an upload or could not resolve a key.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The recognition engine failed.
    #[error("Recognition error: {0}")]
    Recognition(String),

    /// A spelling dictionary could not be loaded.
    #[error("Dictionary error for language '{language}': {message}")]
    Dictionary {
        /// Requested language code
        language: String,
        /// Underlying failure
        message: String,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A converter was built without a required collaborator.
    #[error("Converter is not ready: missing {0}")]
    NotReady(&'static str),

    /// Error during rendering (text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}
