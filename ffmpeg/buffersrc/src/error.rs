/*!
    Error type for the buffer source stage.
*/

use thiserror::Error;

/**
    Errors returned by the buffer source.

    [`Error::Again`] and [`Error::Eof`] are control flow rather than
    failures: a pull that returns them leaves the stage fully usable.
*/
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("out of memory")]
    OutOfMemory,

    #[error("no frame available yet, try again")]
    Again,

    #[error("end of stream")]
    Eof,

    #[error("downstream error: {0}")]
    Downstream(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /**
        Create an invalid argument error with the given message.
    */
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /**
        Wrap a foreign error raised by a downstream consumer.
    */
    pub fn downstream(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Downstream(Box::new(error))
    }

    /**
        Returns true if this is the "try again later" signal.
    */
    pub fn is_again(&self) -> bool {
        matches!(self, Self::Again)
    }

    /**
        Returns true if this is the end-of-stream signal.
    */
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }
}

impl From<ffmpeg_types::Error> for Error {
    fn from(e: ffmpeg_types::Error) -> Self {
        Self::InvalidArgument(e.to_string())
    }
}

/**
    Result type alias for the buffer source.
*/
pub type Result<T> = std::result::Result<T, Error>;
