//! Single-keypair Solana wallet

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use solana_sdk::{
    instruction::Instruction,
    native_token::lamports_to_sol,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};
use spl_associated_token_account::get_associated_token_address;
use tracing::{debug, info, warn};

use solo_wallet::config::{Endpoint, TokenAllowlist, WalletConfig};
use solo_wallet::endpoint::select_endpoint;
use solo_wallet::error::{Error, Result};
use solo_wallet::transaction::{from_base_units, to_base_units, validate_amount, OperationResult};

use crate::instructions::{native_transfer, token_transfer};
use crate::keys::{derive_key, DerivedKey};
use crate::ledger::{LedgerClient, LedgerConnector, SubmitOptions, TokenAccountBalance};
use crate::rpc::RpcConnector;

/// Network identifier used to look up the token allowlist
pub const NETWORK: &str = "solana";

/// Public node used when the allowlist offers nothing
pub const DEFAULT_RPC_URL: &str = "https://solana-rpc.publicnode.com";

/// Lamports per SOL expressed as decimal places
pub const NATIVE_DECIMALS: u8 = 9;

const ESTIMATION_FAILED: &str = "Getting estimation failed";
const SEND_COIN_FAILED: &str = "Sending SOL failed";
const SEND_TOKEN_FAILED: &str = "Sending token failed";

/// A wallet holding exactly one keypair.
///
/// All state is fixed at construction. Network operations pick a fresh
/// endpoint on every call and make a single attempt. Balance checks done
/// before a transfer are advisory: nothing is reserved between an estimate
/// and a send, and concurrent sends on one wallet race on the same balance.
pub struct Wallet {
    keypair: Keypair,
    mnemonic: Option<String>,
    token_allowlist: Option<TokenAllowlist>,
    node_override: Option<Endpoint>,
    connector: Arc<dyn LedgerConnector>,
}

impl Wallet {
    /// Create a wallet that talks to nodes over JSON-RPC
    pub fn new(config: WalletConfig) -> Result<Self> {
        let connector = Arc::new(RpcConnector::new(config.timeout()));
        Self::with_connector(config, connector)
    }

    /// Create a wallet with a custom ledger connector
    pub fn with_connector(config: WalletConfig, connector: Arc<dyn LedgerConnector>) -> Result<Self> {
        config.validate()?;
        let derivation = config.seed_derivation()?;

        let DerivedKey { keypair, mnemonic } = derive_key(config.key_source(), &config.template_secret, &derivation)?;
        info!(address = %keypair.pubkey(), has_mnemonic = mnemonic.is_some(), "wallet ready");

        Ok(Self {
            keypair,
            mnemonic,
            token_allowlist: config.token_allowlist,
            node_override: config.node_override,
            connector,
        })
    }

    /// Base58 address
    pub fn address(&self) -> String {
        self.keypair.pubkey().to_string()
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    /// Hex encoded 64-byte secret key
    pub fn private_key(&self) -> String {
        hex::encode(self.keypair.to_bytes())
    }

    /// The phrase this wallet was derived from; `None` for private-key wallets
    pub fn mnemonic(&self) -> Option<&str> {
        self.mnemonic.as_deref()
    }

    pub fn network(&self) -> &'static str {
        NETWORK
    }

    /// Endpoint for the next request
    pub fn endpoint(&self) -> Endpoint {
        select_endpoint(
            self.token_allowlist.as_ref(),
            self.node_override.as_ref(),
            NETWORK,
            &Endpoint::new(DEFAULT_RPC_URL),
            &mut rand::thread_rng(),
        )
    }

    /// Ledger client bound to a freshly selected endpoint
    pub fn select_endpoint(&self) -> Result<Arc<dyn LedgerClient>> {
        self.connector.connect(&self.endpoint())
    }

    /// SOL balance of this wallet or of `address`
    pub async fn get_coin_balance(&self, address: Option<&str>) -> Result<f64> {
        let owner = self.resolve_owner(address)?;
        let client = self.select_endpoint()?;

        let lamports = client.get_balance(&owner).await?;
        Ok(lamports_to_sol(lamports))
    }

    /// Balance of token `token_address` held by this wallet or by `address`
    pub async fn get_token_balance(&self, token_address: &str, address: Option<&str>) -> Result<f64> {
        let mint = parse_pubkey("token", token_address)?;
        let owner = self.resolve_owner(address)?;
        let client = self.select_endpoint()?;

        let accounts = client.get_parsed_token_accounts(&owner, &mint).await?;
        Ok(token_balance(&accounts))
    }

    /// Sign `transaction` against a recent blockhash and price its serialized size
    pub async fn estimate_cost_of_tx(&self, transaction: Transaction) -> OperationResult {
        let result: Result<String> = async {
            let client = self.select_endpoint()?;
            self.estimate_with(client.as_ref(), transaction).await
        }.await;

        report(result, ESTIMATION_FAILED)
    }

    pub async fn estimate_cost_send_coin_to(&self, receiver_address: &str, amount: f64) -> OperationResult {
        let result: Result<String> = async {
            let client = self.select_endpoint()?;
            let instruction = self.prepare_coin_transfer(client.as_ref(), receiver_address, amount).await?;
            let transaction = Transaction::new_with_payer(&[instruction], Some(&self.pubkey()));

            self.estimate_with(client.as_ref(), transaction).await
        }.await;

        report(result, ESTIMATION_FAILED)
    }

    pub async fn estimate_cost_send_token_to(
        &self,
        token_address: &str,
        receiver_address: &str,
        amount: f64,
    ) -> OperationResult {
        let result: Result<String> = async {
            let client = self.select_endpoint()?;
            let instructions = self
                .prepare_token_transfer(client.as_ref(), token_address, receiver_address, amount)
                .await?;
            let transaction = Transaction::new_with_payer(&instructions, Some(&self.pubkey()));

            self.estimate_with(client.as_ref(), transaction).await
        }.await;

        report(result, ESTIMATION_FAILED)
    }

    /// Transfer `amount` SOL; the description is the transaction signature
    pub async fn send_coin_to(&self, receiver_address: &str, amount: f64) -> OperationResult {
        let result: Result<String> = async {
            let client = self.select_endpoint()?;
            let instruction = self.prepare_coin_transfer(client.as_ref(), receiver_address, amount).await?;

            self.sign_and_submit(client.as_ref(), &[instruction], SubmitOptions::default())
                .await
                .map(|signature| signature.to_string())
        }.await;

        report(result, SEND_COIN_FAILED)
    }

    /// Transfer `amount` tokens, creating the receiver's token account if needed.
    ///
    /// Tokens always leave from this wallet's associated token account for the
    /// mint. The funds check reads whatever token accounts the node lists for
    /// the mint, so tokens held only in a non-associated account pass the check
    /// and then fail on submission.
    pub async fn send_token_to(&self, token_address: &str, receiver_address: &str, amount: f64) -> OperationResult {
        let result: Result<String> = async {
            let client = self.select_endpoint()?;
            let instructions = self
                .prepare_token_transfer(client.as_ref(), token_address, receiver_address, amount)
                .await?;

            self.sign_and_submit(client.as_ref(), &instructions, SubmitOptions { skip_preflight: true })
                .await
                .map(|signature| signature.to_string())
        }.await;

        report(result, SEND_TOKEN_FAILED)
    }

    fn resolve_owner(&self, address: Option<&str>) -> Result<Pubkey> {
        match address {
            Some(address) => parse_pubkey("wallet", address),
            None => Ok(self.pubkey()),
        }
    }

    async fn prepare_coin_transfer(
        &self,
        client: &dyn LedgerClient,
        receiver_address: &str,
        amount: f64,
    ) -> Result<Instruction> {
        let receiver = parse_pubkey("receiver", receiver_address)?;
        let lamports = to_base_units(amount, NATIVE_DECIMALS)?;

        let balance = client.get_balance(&self.pubkey()).await?;
        if balance < lamports {
            debug!(balance, lamports, "coin balance too low");
            return Err(Error::InsufficientFunds);
        }

        Ok(native_transfer(&self.pubkey(), &receiver, lamports))
    }

    async fn prepare_token_transfer(
        &self,
        client: &dyn LedgerClient,
        token_address: &str,
        receiver_address: &str,
        amount: f64,
    ) -> Result<Vec<Instruction>> {
        let mint = parse_pubkey("token", token_address)?;
        let receiver = parse_pubkey("receiver", receiver_address)?;
        validate_amount(amount)?;

        let owner = self.pubkey();
        let accounts = client.get_parsed_token_accounts(&owner, &mint).await?;
        let balance = token_balance(&accounts);
        if balance < amount {
            debug!(balance, amount, %mint, "token balance too low");
            return Err(Error::InsufficientFunds);
        }

        let decimals = accounts
            .first()
            .map(|account| account.decimals)
            .ok_or_else(|| Error::Transaction(format!("No token account for mint {}", mint)))?;
        let units = to_base_units(amount, decimals)?;

        let destination = get_associated_token_address(&receiver, &mint);
        let create_destination = !client.account_exists(&destination).await?;
        if create_destination {
            debug!(%destination, "receiver token account missing, creating it");
        }

        token_transfer(&owner, &mint, &receiver, units, decimals, create_destination)
    }

    async fn estimate_with(&self, client: &dyn LedgerClient, mut transaction: Transaction) -> Result<String> {
        let fee_basis = client.get_recent_fee_basis().await?;

        transaction
            .try_sign(&[&self.keypair], fee_basis.blockhash)
            .map_err(|e| Error::Signing(e.to_string()))?;

        let serialized = bincode::serialize(&transaction)
            .map_err(|e| Error::Serialization(format!("Failed to serialize transaction: {}", e)))?;

        let cost = (serialized.len() as u64)
            .checked_mul(fee_basis.lamports_per_signature)
            .ok_or_else(|| Error::Transaction("Estimated cost overflows".to_string()))?;
        debug!(size = serialized.len(), fee_rate = fee_basis.lamports_per_signature, cost, "estimated transaction cost");

        Ok(lamports_to_sol(cost).to_string())
    }

    async fn sign_and_submit(
        &self,
        client: &dyn LedgerClient,
        instructions: &[Instruction],
        options: SubmitOptions,
    ) -> Result<Signature> {
        let fee_basis = client.get_recent_fee_basis().await?;
        let block_height = client.get_block_height().await?;
        if block_height > fee_basis.last_valid_block_height {
            return Err(Error::Transaction(format!(
                "Blockhash {} expired at block height {}",
                fee_basis.blockhash, fee_basis.last_valid_block_height
            )));
        }

        let mut transaction = Transaction::new_with_payer(instructions, Some(&self.pubkey()));
        transaction
            .try_sign(&[&self.keypair], fee_basis.blockhash)
            .map_err(|e| Error::Signing(e.to_string()))?;

        let signature = client.submit_transaction(&transaction, options).await?;
        info!(%signature, from = %self.pubkey(), "transaction submitted");

        Ok(signature)
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address())
            .field("has_mnemonic", &self.mnemonic.is_some())
            .field("token_allowlist", &self.token_allowlist.is_some())
            .field("node_override", &self.node_override)
            .finish()
    }
}

/// Balance of the last listed account; multiple accounts are not summed
fn token_balance(accounts: &[TokenAccountBalance]) -> f64 {
    accounts
        .last()
        .map(|account| from_base_units(account.raw_amount, account.decimals))
        .unwrap_or(0.0)
}

fn parse_pubkey(kind: &str, address: &str) -> Result<Pubkey> {
    Pubkey::from_str(address).map_err(|e| Error::InvalidInput(format!("Invalid {} address {}: {}", kind, address, e)))
}

fn report(result: Result<String>, context: &str) -> OperationResult {
    match result {
        Ok(description) => OperationResult::succeeded(description),
        Err(e) => {
            warn!(error = %e, "{}", context);
            OperationResult::from_error(context, &e)
        }
    }
}
