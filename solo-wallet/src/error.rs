//! Error types for the solo-wallet libraries

use thiserror::Error;

/// Custom error type for wallet operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed private key hex, mnemonic phrase or mismatched key halves
    #[error("Invalid key material: {0}")]
    InvalidKeyMaterial(String),

    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Detected locally before anything is submitted
    #[error("insufficient funds")]
    InsufficientFunds,
}

/// Result type for wallet operations
pub type Result<T> = std::result::Result<T, Error>;
