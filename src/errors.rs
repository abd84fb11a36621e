/*!
 * Error types for the napiprojekt provider.
 *
 * This module contains custom error types for the different stages of a lookup
 * (hash derivation, transport, transcoding), using the thiserror crate for
 * ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised while deriving a subhash from a malformed content hash
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HashError {
    /// A position required by the derivation lies outside the hash
    #[error("hash too short: position {position} is out of range for a hash of {length} characters")]
    TooShort {
        /// Zero-based position that was read
        position: usize,
        /// Length of the supplied hash
        length: usize,
    },

    /// A character that must be read as hexadecimal is not a hex digit
    #[error("invalid hex digit {character:?} at position {position}")]
    InvalidDigit {
        /// Zero-based position of the offending character
        position: usize,
        /// The offending character
        character: char,
    },
}

/// Errors that can occur while turning a raw payload into SRT text
#[derive(Error, Debug)]
pub enum ConversionError {
    /// Temporary file or directory handling failed
    #[error("Temporary file error: {0}")]
    TempFile(String),

    /// The converter process could not be started
    #[error("Failed to launch converter: {0}")]
    Launch(String),

    /// The converter ran but reported a failure
    #[error("Converter failed: {0}")]
    Failed(String),

    /// The converter did not finish in time
    #[error("Converter timed out after {0} seconds")]
    Timeout(u64),

    /// The converter produced output that could not be read back
    #[error("Converted output is unreadable: {0}")]
    UnreadableOutput(String),
}

/// Errors that can occur when talking to the subtitle service
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The content hash cannot be used to derive a subhash
    #[error("Malformed hash: {0}")]
    MalformedHash(#[from] HashError),

    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The request did not complete within the configured timeout
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Payload could not be transcoded
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// The provider session was never initialized or is already terminated
    #[error("Provider session is not initialized")]
    NotInitialized,

    /// The requested language code is not a valid ISO 639 code
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// The video does not expose the hash this provider needs
    #[error("Video {0:?} has no napiprojekt hash")]
    MissingHash(String),
}

impl ProviderError {
    /// Whether the error comes from the network layer rather than from local processing
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::RequestFailed(_) | Self::ApiError { .. } | Self::ConnectionError(_) | Self::Timeout(_)
        )
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error.to_string())
        } else if error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else if let Some(status) = error.status() {
            Self::ApiError {
                status_code: status.as_u16(),
                message: status.canonical_reason().unwrap_or("unknown status").to_string(),
            }
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

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

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::Config(error.to_string())
    }
}
