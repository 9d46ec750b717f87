use promptbox_store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why an import file was rejected. The display strings are shown to the
/// user verbatim; the `Read` payload is kept for logs.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Failed to read file")]
    Read(String),

    #[error("Invalid file format")]
    InvalidFormat,
}
