/*!
 * Error types for the chunkscribe application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to a transcription service
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The service answered but returned no timed segments
    #[error("Transcript for {0} contains no timed segments")]
    EmptyTranscript(String),
}

impl ProviderError {
    /// Whether retrying the same request could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RequestFailed(_) | Self::ConnectionError(_) | Self::RateLimitExceeded(_) => true,
            Self::ApiError { status_code, .. } => *status_code >= 500,
            Self::ParseError(_) | Self::AuthenticationError(_) | Self::EmptyTranscript(_) => false,
        }
    }
}

/// Errors that can occur during subtitle processing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubtitleError {
    /// A block did not have the index / timing / text shape
    #[error("Malformed subtitle block at line {line}: {reason}")]
    MalformedBlock {
        /// 1-based line number where the block starts
        line: usize,
        /// What was wrong with it
        reason: String,
    },

    /// An entry whose start is not strictly before its end
    #[error("Invalid time range: start {start_ms}ms >= end {end_ms}ms")]
    InvalidInterval {
        start_ms: u64,
        end_ms: u64,
    },

    /// A timestamp that is not in HH:MM:SS,mmm form
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Nothing survived the pipeline
    #[error("No usable subtitle entries were produced")]
    NoUsableEntries,
}

/// Errors raised by the external download and segmentation tools
#[derive(Error, Debug)]
pub enum MediaToolError {
    /// The executable is not installed or not on PATH
    #[error("'{0}' command not found. Make sure it's installed and in your system's PATH")]
    ToolNotFound(String),

    /// The tool ran but exited unsuccessfully
    #[error("{tool} failed: {message}")]
    ToolFailed {
        tool: String,
        message: String,
    },

    /// The tool did not finish in time
    #[error("{tool} timed out after {secs} seconds")]
    Timeout {
        tool: String,
        secs: u64,
    },

    /// Segmentation succeeded but left no chunk files behind
    #[error("No audio segments were created")]
    NoSegmentsProduced,

    /// Local input path does not exist
    #[error("Input file not found: {0}")]
    InputNotFound(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from an external media tool
    #[error("Media tool error: {0}")]
    MediaTool(#[from] MediaToolError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
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
