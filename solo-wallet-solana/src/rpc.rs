//! JSON-RPC ledger client

use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use solana_account_decoder::UiAccountData;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_client::rpc_request::TokenAccountsFilter;
use solana_client::rpc_response::RpcKeyedAccount;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    message::Message,
    pubkey::Pubkey,
    signature::Signature,
    transaction::Transaction,
};
use tracing::debug;

use solo_wallet::config::{Endpoint, DEFAULT_TIMEOUT_SECS};
use solo_wallet::error::{Error, Result};

use crate::ledger::{FeeBasis, LedgerClient, LedgerConnector, SubmitOptions, TokenAccountBalance};

fn network_error(e: impl Display) -> Error {
    Error::Network(e.to_string())
}

/// Ledger client backed by a Solana RPC node at `confirmed` commitment
pub struct RpcLedgerClient {
    client: RpcClient,
}

impl RpcLedgerClient {
    pub fn new(endpoint: &Endpoint, timeout: Duration) -> Self {
        let client = RpcClient::new_with_timeout_and_commitment(
            endpoint.url.clone(),
            timeout,
            CommitmentConfig::confirmed(),
        );

        Self { client }
    }

    pub fn url(&self) -> String {
        self.client.url()
    }
}

#[async_trait]
impl LedgerClient for RpcLedgerClient {
    async fn get_balance(&self, address: &Pubkey) -> Result<u64> {
        self.client.get_balance(address).await.map_err(network_error)
    }

    async fn get_parsed_token_accounts(&self, owner: &Pubkey, mint: &Pubkey) -> Result<Vec<TokenAccountBalance>> {
        let accounts = self.client
            .get_token_accounts_by_owner(owner, TokenAccountsFilter::Mint(*mint))
            .await
            .map_err(network_error)?;

        debug!(%owner, %mint, count = accounts.len(), "fetched token accounts");
        accounts.iter().map(parse_keyed_token_account).collect()
    }

    async fn get_recent_fee_basis(&self) -> Result<FeeBasis> {
        let (blockhash, last_valid_block_height) = self.client
            .get_latest_blockhash_with_commitment(self.client.commitment())
            .await
            .map_err(network_error)?;

        // A message with a single signer costs exactly one signature fee
        let message = Message::new_with_blockhash(&[], Some(&Pubkey::default()), &blockhash);
        let lamports_per_signature = self.client
            .get_fee_for_message(&message)
            .await
            .map_err(network_error)?;

        Ok(FeeBasis {
            blockhash,
            lamports_per_signature,
            last_valid_block_height,
        })
    }

    async fn get_block_height(&self) -> Result<u64> {
        self.client.get_block_height().await.map_err(network_error)
    }

    async fn account_exists(&self, address: &Pubkey) -> Result<bool> {
        let response = self.client
            .get_account_with_commitment(address, self.client.commitment())
            .await
            .map_err(network_error)?;

        Ok(response.value.is_some())
    }

    async fn submit_transaction(&self, transaction: &Transaction, options: SubmitOptions) -> Result<Signature> {
        let config = RpcSendTransactionConfig {
            skip_preflight: options.skip_preflight,
            preflight_commitment: Some(self.client.commitment().commitment),
            ..RpcSendTransactionConfig::default()
        };

        self.client
            .send_transaction_with_config(transaction, config)
            .await
            .map_err(|e| Error::Transaction(e.to_string()))
    }
}

fn parse_keyed_token_account(keyed: &RpcKeyedAccount) -> Result<TokenAccountBalance> {
    let address = Pubkey::from_str(&keyed.pubkey)
        .map_err(|e| Error::Serialization(format!("Invalid token account pubkey: {}", e)))?;

    match &keyed.account.data {
        UiAccountData::Json(account) => parse_token_amount(address, &account.parsed),
        _ => Err(Error::Serialization(format!("Token account {} is not jsonParsed", address))),
    }
}

/// Read `info.tokenAmount` from a jsonParsed token account
pub(crate) fn parse_token_amount(address: Pubkey, parsed: &serde_json::Value) -> Result<TokenAccountBalance> {
    let token_amount = &parsed["info"]["tokenAmount"];

    let decimals = token_amount["decimals"]
        .as_u64()
        .and_then(|decimals| u8::try_from(decimals).ok())
        .ok_or_else(|| Error::Serialization(format!("Missing token decimals for {}", address)))?;

    let raw_amount = token_amount["amount"]
        .as_str()
        .and_then(|amount| amount.parse::<u64>().ok())
        .ok_or_else(|| Error::Serialization(format!("Missing token amount for {}", address)))?;

    Ok(TokenAccountBalance {
        address,
        decimals,
        raw_amount,
    })
}

/// Connects to endpoints over JSON-RPC
#[derive(Debug, Clone)]
pub struct RpcConnector {
    timeout: Duration,
}

impl RpcConnector {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for RpcConnector {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

impl LedgerConnector for RpcConnector {
    fn connect(&self, endpoint: &Endpoint) -> Result<Arc<dyn LedgerClient>> {
        Ok(Arc::new(RpcLedgerClient::new(endpoint, self.timeout)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_token_amount() {
        let address = Pubkey::new_unique();
        let parsed = json!({
            "type": "account",
            "info": {
                "isNative": false,
                "mint": "DezXAZ8z7PnrnRJjz3wXBoRgixCa6xjnB7YaB1pPB263",
                "owner": "DehxSQMZoTSKUXg9utFFemvuY7N37kkMh9FnJCGrtDHs",
                "state": "initialized",
                "tokenAmount": {
                    "amount": "1234500000",
                    "decimals": 5,
                    "uiAmount": 12345.0,
                    "uiAmountString": "12345"
                }
            }
        });

        let balance = parse_token_amount(address, &parsed).unwrap();
        assert_eq!(balance, TokenAccountBalance { address, decimals: 5, raw_amount: 1_234_500_000 });
    }

    #[test]
    fn test_parse_token_amount_rejects_malformed_data() {
        let address = Pubkey::new_unique();

        let missing = json!({ "info": {} });
        assert!(matches!(parse_token_amount(address, &missing), Err(Error::Serialization(_))));

        let numeric_amount = json!({ "info": { "tokenAmount": { "amount": 5, "decimals": 2 } } });
        assert!(parse_token_amount(address, &numeric_amount).is_err());

        let huge_decimals = json!({ "info": { "tokenAmount": { "amount": "5", "decimals": 300 } } });
        assert!(parse_token_amount(address, &huge_decimals).is_err());
    }

    #[tokio::test]
    async fn test_connector_binds_endpoint() {
        let endpoint = Endpoint::new("http://127.0.0.1:8899");
        let client = RpcLedgerClient::new(&endpoint, Duration::from_secs(1));

        assert_eq!(client.url(), "http://127.0.0.1:8899");
        assert!(RpcConnector::default().connect(&endpoint).is_ok());
    }
}
