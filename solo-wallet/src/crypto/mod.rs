//! Cryptographic primitives and operations
//!
//! This module provides mnemonic handling, the password-to-entropy scheme and
//! the ways a signing seed is obtained from a BIP-39 seed.

pub mod mnemonic;
pub mod password;
pub mod derivation;

pub use mnemonic::*;
pub use password::*;
pub use derivation::*;
