//! Tests for endpoint selection from wallet configuration

use rand::rngs::StdRng;
use rand::SeedableRng;

use solo_wallet::endpoint::select_endpoint;
use solo_wallet::{Endpoint, Error, OperationResult, WalletConfig};

const CONFIG: &str = r#"{
    "mnemonic": "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about",
    "tokenAllowlist": {
        "solana": {
            "name": "Solana",
            "rpcs": [{ "url": "https://one.example" }, { "url": "https://two.example" }]
        },
        "ethereum": {
            "rpcs": [{ "url": "https://eth.example" }]
        }
    }
}"#;

fn default_endpoint() -> Endpoint {
    Endpoint::new("https://default.example")
}

#[test]
fn test_allowlisted_endpoints_from_config() {
    let config = WalletConfig::from_json(CONFIG).unwrap();
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..20 {
        let endpoint = select_endpoint(
            config.token_allowlist.as_ref(),
            config.usable_node_override(),
            "solana",
            &default_endpoint(),
            &mut rng,
        );
        assert!(endpoint.url == "https://one.example" || endpoint.url == "https://two.example");
    }
}

#[test]
fn test_unknown_network_uses_default() {
    let config = WalletConfig::from_json(CONFIG).unwrap();
    let mut rng = StdRng::seed_from_u64(7);

    let endpoint = select_endpoint(config.token_allowlist.as_ref(), None, "bitcoin", &default_endpoint(), &mut rng);
    assert_eq!(endpoint, default_endpoint());
}

#[test]
fn test_incomplete_override_is_ignored() {
    let config = WalletConfig::from_json(CONFIG).unwrap().with_node_override(Endpoint::new("https://node.example"));
    let mut rng = StdRng::seed_from_u64(7);

    assert!(config.usable_node_override().is_none());
    let endpoint = select_endpoint(
        config.token_allowlist.as_ref(),
        config.usable_node_override(),
        "solana",
        &default_endpoint(),
        &mut rng,
    );
    assert_ne!(endpoint.url, "https://node.example");
}

#[test]
fn test_operation_results() {
    let failed = OperationResult::from_error("Sending SOL failed", &Error::Network("timeout".to_string()));
    assert!(!failed.is_success());
    assert_eq!(failed.description, "Sending SOL failed: Network error: timeout");

    let funds = OperationResult::from_error("Sending SOL failed", &Error::InsufficientFunds);
    assert_eq!(funds.description, "insufficient funds");

    let json = serde_json::to_value(OperationResult::succeeded("0.000005")).unwrap();
    assert_eq!(json, serde_json::json!({ "success": true, "description": "0.000005" }));
}
