//! Solo Wallet Core
//!
//! Chain-agnostic building blocks for single-keypair wallets: mnemonic and
//! password based key material, seed derivation schemes, wallet configuration,
//! node endpoint selection, amount conversion and the result values reported
//! by network operations.

pub mod error;
pub mod crypto;
pub mod config;
pub mod endpoint;
pub mod transaction;

// Re-export commonly used types for convenience
pub use error::{Error, Result};
pub use config::{Endpoint, KeySource, NetworkEntry, TokenAllowlist, WalletConfig};
pub use transaction::OperationResult;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
