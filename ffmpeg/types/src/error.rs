/*!
    Error types for the ffmpeg crate ecosystem.
*/

use std::fmt;

/**
    Error type for the shared vocabulary types.

    Returned when a textual description of a rational, format or layout
    cannot be interpreted.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid data (malformed input)
    InvalidData { message: String },
    /// Unsupported format (well-formed, but names nothing we know)
    UnsupportedFormat { message: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidData { message } => write!(f, "invalid data: {message}"),
            Self::UnsupportedFormat { message } => write!(f, "unsupported format: {message}"),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /**
        Create an invalid data error with the given message.
    */
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /**
        Create an unsupported format error with the given message.
    */
    pub fn unsupported_format(message: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            message: message.into(),
        }
    }
}

/**
    Result type alias for the ffmpeg crate ecosystem.
*/
pub type Result<T> = std::result::Result<T, Error>;
