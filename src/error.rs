use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while decoding or dumping an Identify data buffer.
#[derive(Debug, Error)]
pub enum IdentifyError {
    /// A table entry cannot be applied to the buffer currently held.
    #[error("invalid field definition for {field}: {reason}")]
    InvalidFieldDefinition { field: String, reason: String },

    /// The dump destination could not be created or reopened for append.
    #[error("failed to open file: {}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, IdentifyError>;
