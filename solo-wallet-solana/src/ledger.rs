//! Ledger client capability
//!
//! The wallet never talks to a node directly. It asks a [`LedgerConnector`]
//! for a client bound to the endpoint chosen for the current operation and
//! performs every network step through the [`LedgerClient`] it gets back.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use solana_sdk::{hash::Hash, pubkey::Pubkey, signature::Signature, transaction::Transaction};

use solo_wallet::config::Endpoint;
use solo_wallet::error::Result;

/// One token-holding account as reported by the node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenAccountBalance {
    /// Token account address
    pub address: Pubkey,
    /// Decimal precision of the mint
    pub decimals: u8,
    /// Balance in the token's smallest unit
    pub raw_amount: u64,
}

/// Recent blockhash together with the fee rate that applies to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeBasis {
    pub blockhash: Hash,
    pub lamports_per_signature: u64,
    /// Last block height at which `blockhash` is accepted
    pub last_valid_block_height: u64,
}

/// Options for [`LedgerClient::submit_transaction`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitOptions {
    pub skip_preflight: bool,
}

/// Remote node operations the wallet depends on
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Balance in lamports; zero for unknown accounts
    async fn get_balance(&self, address: &Pubkey) -> Result<u64>;

    /// Token accounts of `owner` for `mint`, in the order the node lists them
    async fn get_parsed_token_accounts(&self, owner: &Pubkey, mint: &Pubkey) -> Result<Vec<TokenAccountBalance>>;

    async fn get_recent_fee_basis(&self) -> Result<FeeBasis>;

    async fn get_block_height(&self) -> Result<u64>;

    async fn account_exists(&self, address: &Pubkey) -> Result<bool>;

    /// Submit a signed transaction and return its signature
    async fn submit_transaction(&self, transaction: &Transaction, options: SubmitOptions) -> Result<Signature>;
}

/// Creates clients bound to a single endpoint
pub trait LedgerConnector: Send + Sync {
    fn connect(&self, endpoint: &Endpoint) -> Result<Arc<dyn LedgerClient>>;
}
