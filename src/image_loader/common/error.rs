use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to open source image: {0}")]
    SourceUnavailable(String),

    #[error("Not a PNG stream: {0}")]
    InvalidFormat(String),

    #[error("Failed to decode PNG image: {0}")]
    DecodeError(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Expected 3 channels after normalization, got {0}")]
    UnexpectedChannelCount(u8),

    #[error("Out of memory: {0}")]
    OutOfMemory(String),
}

pub type Result<T> = std::result::Result<T, LoadError>;
