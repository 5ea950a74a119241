//! Error types for reproducible salted hashing

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SaltError {
    #[error("Invalid hex encoding: {0}")]
    InvalidEncoding(#[from] hex::FromHexError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Secret seed has been cleared with destroy()")]
    SeedCleared,

    #[error("Cleartext has been cleared with destroy()")]
    CleartextCleared,

    #[error("Unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Invalid length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SaltError>;

impl SaltError {
    /// Material was used after an explicit `destroy()`.
    pub fn is_use_after_destroy(&self) -> bool {
        matches!(self, Self::SeedCleared | Self::CleartextCleared)
    }

    /// The caller can retry with corrected input.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidEncoding(_) | Self::InvalidLength { .. } | Self::Config(_)
        )
    }
}
