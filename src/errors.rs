/*!
 * Error types for the subcraft library.
 *
 * Only failures of external collaborators (transcript source, translation
 * table, video probe) and of file output are surfaced as errors. Malformed
 * style input and per-segment translation failures are absorbed where they
 * happen and never reach these types.
 */

use thiserror::Error;

/// Errors raised by transcription, translation and probing collaborators
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The collaborator could not be reached or its input could not be read
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// The collaborator answered with something we could not parse
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// No translation is known for the given text
    #[error("No translation available for: {0}")]
    MissingTranslation(String),

    /// The collaborator did not answer in time
    #[error("Timed out after {0} seconds")]
    Timeout(u64),
}

/// Errors that can occur while producing captions for a job
#[derive(Error, Debug)]
pub enum CaptionError {
    /// Writing an exported document failed
    #[error("Failed to write {path}: {message}")]
    Export {
        /// Target path of the export
        path: String,
        /// Underlying I/O error message
        message: String,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from an external collaborator
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from caption generation or export
    #[error("Caption error: {0}")]
    Caption(#[from] CaptionError),

    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
