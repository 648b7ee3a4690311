//! Solana implementation for Solo Wallet Core
//!
//! This crate provides a single-keypair Solana [`Wallet`]: key derivation from
//! a password, a mnemonic or a raw private key, SOL and SPL token balances,
//! fee estimation and transfer submission. Node access goes through the
//! [`LedgerClient`] capability so the wallet can run against any node client.

pub mod instructions;
pub mod keys;
pub mod ledger;
pub mod rpc;
pub mod wallet;


pub use ledger::{FeeBasis, LedgerClient, LedgerConnector, SubmitOptions, TokenAccountBalance};
pub use rpc::{RpcConnector, RpcLedgerClient};
pub use wallet::{Wallet, DEFAULT_RPC_URL, NATIVE_DECIMALS, NETWORK};

pub use solo_wallet::{Endpoint, Error, NetworkEntry, OperationResult, Result, TokenAllowlist, WalletConfig};
