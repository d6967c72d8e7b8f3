//! Error types for gps-dump

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// gps-dump error types
///
/// The accumulate path itself is infallible; these cover construction,
/// configuration and dump file I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration could not be written
    #[error("Config write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    /// Record (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Dump file is malformed
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl From<postcard::Error> for Error {
    fn from(e: postcard::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
