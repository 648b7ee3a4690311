//! Balance and fee estimate example for solo-wallet-solana
//!
//! Derives the wallet for a password, prints its SOL balance and the cost of
//! sending a small amount to itself.
//!
//! ```text
//! RUST_LOG=debug cargo run --example balance -- <password>
//! ```

use solo_wallet_solana::{Wallet, WalletConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let password = std::env::args().nth(1).unwrap_or_else(|| "toor".to_string());
    let wallet = Wallet::new(WalletConfig::from_password(password))?;

    println!("Address: {}", wallet.address());
    println!("Endpoint: {}", wallet.endpoint().url);

    let balance = wallet.get_coin_balance(None).await?;
    println!("Balance: {} SOL", balance);

    let estimate = wallet.estimate_cost_send_coin_to(&wallet.address(), 0.001).await;
    if estimate.success {
        println!("Sending 0.001 SOL would cost {} SOL", estimate.description);
    } else {
        println!("Estimate unavailable: {}", estimate.description);
    }

    Ok(())
}
