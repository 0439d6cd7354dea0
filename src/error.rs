//! Error taxonomy for seeding and verifying secrets.

use thiserror::Error;

/// Every failure the seeding flow can produce.
///
/// All variants are fatal to the run except the read-side ones
/// (`Read`, `NotFound`, `MalformedResponse`, `KeyNotFound`) when raised
/// inside the read-back loop, where they are logged and skipped.
#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Usage: {program} key1=value1 key2=value2 ...")]
    Usage { program: String },

    #[error("Invalid key/value pair: {0}")]
    MalformedArgument(String),

    #[error("Failed to create Vault client for {address}: {message}")]
    ConnectionConfig { address: String, message: String },

    #[error("Failed to authenticate to Vault: {0}")]
    Authentication(String),

    #[error("Failed to write data to {path}: {message}")]
    Write { path: String, message: String },

    #[error("failed to read data from {path}: {message}")]
    Read { path: String, message: String },

    #[error("no data found at {path}")]
    NotFound { path: String },

    #[error("data format error at {path}")]
    MalformedResponse { path: String },

    #[error("key {key} not found at {path}")]
    KeyNotFound { key: String, path: String },

    #[error("config error: {0}")]
    Config(String),
}

impl SeedError {
    /// Whether this error belongs to the read side of the flow.
    pub fn is_read_failure(&self) -> bool {
        matches!(
            self,
            SeedError::Read { .. }
                | SeedError::NotFound { .. }
                | SeedError::MalformedResponse { .. }
                | SeedError::KeyNotFound { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SeedError>;
