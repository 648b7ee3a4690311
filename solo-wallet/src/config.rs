//! Wallet configuration
//!
//! Everything a wallet can be constructed from. Field names follow the camelCase
//! JSON layout callers already hand over, so a configuration can be built with
//! the builder methods below or deserialized directly.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::crypto::{DerivationPath, SeedDerivation, TemplateSecret};
use crate::error::{Error, Result};

/// Default timeout for node requests in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A node endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Endpoint URL
    pub url: String,
    /// Chain identifier (e.g. `mainnet-beta`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<String>,
}

impl Endpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), chain_id: None }
    }

    pub fn with_chain_id(mut self, chain_id: impl Into<String>) -> Self {
        self.chain_id = Some(chain_id.into());
        self
    }

    /// An override is only honoured with a non-empty URL and a chain id
    pub fn is_usable_override(&self) -> bool {
        !self.url.is_empty() && self.chain_id.is_some()
    }
}

/// Allowlist entry for one network: coin metadata and node endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkEntry {
    /// Endpoints to pick from. `None` when the list was absent or malformed.
    #[serde(
        default,
        rename = "rpcs",
        alias = "endpoints",
        deserialize_with = "lenient_endpoints",
        skip_serializing_if = "Option::is_none"
    )]
    pub endpoints: Option<Vec<Endpoint>>,
    /// Remaining coin metadata, kept as given
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl NetworkEntry {
    pub fn with_endpoints(endpoints: Vec<Endpoint>) -> Self {
        Self { endpoints: Some(endpoints), metadata: serde_json::Map::new() }
    }

    /// Usable endpoints, empty when the list is absent or empty
    pub fn endpoints(&self) -> &[Endpoint] {
        self.endpoints.as_deref().unwrap_or(&[])
    }
}

/// A non-list or a list with malformed entries is treated as absent
fn lenient_endpoints<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<Endpoint>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Array(_) => serde_json::from_value(value).ok(),
        _ => None,
    })
}

/// Caller supplied mapping of network identifier to allowlist entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenAllowlist(HashMap<String, NetworkEntry>);

impl TokenAllowlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, network: impl Into<String>, entry: NetworkEntry) {
        self.0.insert(network.into(), entry);
    }

    pub fn network(&self, network: &str) -> Option<&NetworkEntry> {
        self.0.get(network)
    }
}

impl FromIterator<(String, NetworkEntry)> for TokenAllowlist {
    fn from_iter<I: IntoIterator<Item = (String, NetworkEntry)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Where a wallet's keypair comes from, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource<'a> {
    Password(&'a str),
    Mnemonic(&'a str),
    PrivateKey(&'a str),
    Generate,
}

/// Wallet construction configuration
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WalletConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mnemonic: Option<String>,
    /// Hex encoded 64-byte secret key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_allowlist: Option<TokenAllowlist>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_override: Option<Endpoint>,
    pub template_secret: TemplateSecret,
    /// SLIP-0010 path; the seed prefix is used when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub derivation_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl WalletConfig {
    pub fn from_password(password: impl Into<String>) -> Self {
        Self { password: Some(password.into()), ..Self::default() }
    }

    pub fn from_mnemonic(mnemonic: impl Into<String>) -> Self {
        Self { mnemonic: Some(mnemonic.into()), ..Self::default() }
    }

    pub fn from_private_key(private_key: impl Into<String>) -> Self {
        Self { private_key: Some(private_key.into()), ..Self::default() }
    }

    /// Parse a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn with_token_allowlist(mut self, allowlist: TokenAllowlist) -> Self {
        self.token_allowlist = Some(allowlist);
        self
    }

    pub fn with_node_override(mut self, endpoint: Endpoint) -> Self {
        self.node_override = Some(endpoint);
        self
    }

    pub fn with_template_secret(mut self, template: TemplateSecret) -> Self {
        self.template_secret = template;
        self
    }

    pub fn with_derivation_path(mut self, path: impl Into<String>) -> Self {
        self.derivation_path = Some(path.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// The key source that wins: password > mnemonic > private key > generate
    pub fn key_source(&self) -> KeySource<'_> {
        let supplied = [&self.password, &self.mnemonic, &self.private_key]
            .iter()
            .filter(|source| source.is_some())
            .count();
        if supplied > 1 {
            warn!(supplied, "more than one key source configured, using the highest priority one");
        }

        if let Some(password) = &self.password {
            KeySource::Password(password)
        } else if let Some(mnemonic) = &self.mnemonic {
            KeySource::Mnemonic(mnemonic)
        } else if let Some(private_key) = &self.private_key {
            KeySource::PrivateKey(private_key)
        } else {
            KeySource::Generate
        }
    }

    /// Parsed seed derivation scheme
    pub fn seed_derivation(&self) -> Result<SeedDerivation> {
        match &self.derivation_path {
            None => Ok(SeedDerivation::SeedPrefix),
            Some(path) => path.parse::<DerivationPath>().map(SeedDerivation::Path),
        }
    }

    /// Usable node override, if any
    pub fn usable_node_override(&self) -> Option<&Endpoint> {
        self.node_override.as_ref().filter(|endpoint| endpoint.is_usable_override())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Check everything that can be checked before keys are derived
    pub fn validate(&self) -> Result<()> {
        self.seed_derivation()?;

        if self.template_secret.as_str().is_empty() {
            return Err(Error::Config("template secret must not be empty".to_string()));
        }
        if self.timeout_secs == Some(0) {
            return Err(Error::Config("timeout must be at least one second".to_string()));
        }
        if let Some(endpoint) = &self.node_override {
            if !endpoint.is_usable_override() {
                warn!(url = %endpoint.url, "node override ignored, it needs a url and a chain id");
            }
        }

        Ok(())
    }
}

fn redact<T>(value: &Option<T>) -> &'static str {
    if value.is_some() { "<redacted>" } else { "None" }
}

impl fmt::Debug for WalletConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletConfig")
            .field("password", &redact(&self.password))
            .field("mnemonic", &redact(&self.mnemonic))
            .field("private_key", &redact(&self.private_key))
            .field("token_allowlist", &self.token_allowlist)
            .field("node_override", &self.node_override)
            .field("template_secret", &self.template_secret)
            .field("derivation_path", &self.derivation_path)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_source_priority() {
        let config = WalletConfig {
            password: Some("toor".to_string()),
            mnemonic: Some("words".to_string()),
            private_key: Some("00".to_string()),
            ..WalletConfig::default()
        };
        assert_eq!(config.key_source(), KeySource::Password("toor"));

        let config = WalletConfig { password: None, ..config };
        assert_eq!(config.key_source(), KeySource::Mnemonic("words"));

        let config = WalletConfig { mnemonic: None, ..config };
        assert_eq!(config.key_source(), KeySource::PrivateKey("00"));

        assert_eq!(WalletConfig::default().key_source(), KeySource::Generate);
    }

    #[test]
    fn test_from_json() {
        let config = WalletConfig::from_json(r#"{
            "password": "toor",
            "nodeOverride": { "url": "https://node.example", "chainId": "mainnet-beta" },
            "tokenAllowlist": {
                "solana": {
                    "name": "Solana",
                    "ticker": "SOL",
                    "rpcs": [{ "url": "https://a.example" }, { "url": "https://b.example", "chainId": "mainnet-beta" }]
                }
            },
            "timeoutSecs": 10
        }"#).unwrap();

        assert_eq!(config.key_source(), KeySource::Password("toor"));
        assert!(config.template_secret.is_default());
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.usable_node_override().unwrap().url, "https://node.example");

        let entry = config.token_allowlist.as_ref().unwrap().network("solana").unwrap();
        assert_eq!(entry.endpoints().len(), 2);
        assert_eq!(entry.metadata.get("ticker").and_then(|v| v.as_str()), Some("SOL"));
    }

    #[test]
    fn test_malformed_endpoint_lists_are_absent() {
        for rpcs in [r#""https://a.example""#, "42", "[1, 2]", "null"] {
            let json = format!(r#"{{ "solana": {{ "rpcs": {} }} }}"#, rpcs);
            let allowlist: TokenAllowlist = serde_json::from_str(&json).unwrap();

            assert!(allowlist.network("solana").unwrap().endpoints().is_empty(), "rpcs = {}", rpcs);
        }

        let allowlist: TokenAllowlist = serde_json::from_str(r#"{ "solana": { "name": "Solana" } }"#).unwrap();
        assert!(allowlist.network("solana").unwrap().endpoints.is_none());
    }

    #[test]
    fn test_endpoints_alias() {
        let allowlist: TokenAllowlist =
            serde_json::from_str(r#"{ "solana": { "endpoints": [{ "url": "https://a.example" }] } }"#).unwrap();
        assert_eq!(allowlist.network("solana").unwrap().endpoints()[0].url, "https://a.example");
    }

    #[test]
    fn test_override_usability() {
        assert!(!Endpoint::new("https://node.example").is_usable_override());
        assert!(!Endpoint::new("").with_chain_id("mainnet-beta").is_usable_override());
        assert!(Endpoint::new("https://node.example").with_chain_id("mainnet-beta").is_usable_override());
    }

    #[test]
    fn test_validate() {
        assert!(WalletConfig::default().validate().is_ok());
        assert!(WalletConfig::default().with_derivation_path("m/44'/501'/0'/0'").validate().is_ok());
        assert!(WalletConfig::default().with_derivation_path("44/501").validate().is_err());
        assert!(WalletConfig::default().with_timeout_secs(0).validate().is_err());
        assert!(WalletConfig::default()
            .with_template_secret(TemplateSecret::new(""))
            .validate()
            .is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = WalletConfig::from_password("hunter2");
        let debug = format!("{:?}", config);

        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<redacted>"));
    }
}
