use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("The file is violating the expected format, because: {reason}")]
    FormatError { reason: &'static str },

    /// Represents an empty source, e.g. a zero byte export.
    #[error("Source contains no data")]
    EmptySource,

    /// Represents all other cases of `std::io::Error`.
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
}

pub mod audio;
pub mod common;
pub mod entity;
pub mod mat;
pub mod props;
