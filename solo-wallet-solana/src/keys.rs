//! Solana keypair derivation
//!
//! Every construction path ends in an ed25519 [`Keypair`]. Password and
//! mnemonic wallets keep their phrase; private-key wallets cannot recover it.

use solana_sdk::signature::{keypair_from_seed, Keypair, Signer};
use tracing::debug;

use solo_wallet::config::KeySource;
use solo_wallet::crypto::{
    entropy_to_mnemonic, generate_mnemonic, mnemonic_to_seed, password_entropy, MnemonicStrength, SeedDerivation,
    TemplateSecret,
};
use solo_wallet::error::{Error, Result};

/// Derivation path used by most Solana wallets when a path is requested
pub const SOLANA_DERIVATION_PATH: &str = "m/44'/501'/0'/0'";

/// Length of an encoded secret key: seed followed by public key
pub const SECRET_KEY_LENGTH: usize = 64;

/// Keypair plus the phrase it was derived from, when there is one
pub struct DerivedKey {
    pub keypair: Keypair,
    pub mnemonic: Option<String>,
}

/// Derive the wallet key for `source`
pub fn derive_key(source: KeySource<'_>, template: &TemplateSecret, derivation: &SeedDerivation) -> Result<DerivedKey> {
    match source {
        KeySource::Password(password) => {
            debug!("deriving keypair from password");
            let (keypair, mnemonic) = keypair_from_password(template, password, derivation)?;
            Ok(DerivedKey { keypair, mnemonic: Some(mnemonic) })
        }
        KeySource::Mnemonic(phrase) => {
            debug!("deriving keypair from mnemonic");
            let keypair = keypair_from_mnemonic(phrase, derivation)?;
            Ok(DerivedKey { keypair, mnemonic: Some(phrase.to_string()) })
        }
        KeySource::PrivateKey(private_key) => {
            debug!("restoring keypair from private key");
            let keypair = keypair_from_private_key(private_key)?;
            Ok(DerivedKey { keypair, mnemonic: None })
        }
        KeySource::Generate => {
            debug!("generating random wallet");
            let (keypair, mnemonic) = generate_keypair()?;
            Ok(DerivedKey { keypair, mnemonic: Some(mnemonic) })
        }
    }
}

/// Password -> 32 bytes of entropy -> 24-word phrase -> keypair
pub fn keypair_from_password(
    template: &TemplateSecret,
    password: &str,
    derivation: &SeedDerivation,
) -> Result<(Keypair, String)> {
    let entropy = password_entropy(template, password);
    let mnemonic = entropy_to_mnemonic(&entropy)?;
    let keypair = keypair_from_mnemonic(&mnemonic, derivation)?;

    Ok((keypair, mnemonic))
}

/// BIP-39 seed with an empty passphrase -> signing seed -> keypair
pub fn keypair_from_mnemonic(phrase: &str, derivation: &SeedDerivation) -> Result<Keypair> {
    let seed = mnemonic_to_seed(phrase, None)?;
    let secret = derivation.signing_seed(&seed)?;

    keypair_from_seed(&secret).map_err(|e| Error::KeyDerivation(e.to_string()))
}

/// Restore a keypair from its hex encoded 64-byte secret key
pub fn keypair_from_private_key(private_key: &str) -> Result<Keypair> {
    let bytes = hex::decode(private_key.trim())
        .map_err(|e| Error::InvalidKeyMaterial(format!("Invalid private key hex: {}", e)))?;

    if bytes.len() != SECRET_KEY_LENGTH {
        return Err(Error::InvalidKeyMaterial(format!(
            "Invalid private key length: expected {} bytes, got {}",
            SECRET_KEY_LENGTH,
            bytes.len()
        )));
    }

    // Rebuild from the seed half so a mismatched public half is caught
    let keypair = keypair_from_seed(&bytes[..32])
        .map_err(|e| Error::InvalidKeyMaterial(format!("Invalid private key: {}", e)))?;

    if keypair.pubkey().to_bytes()[..] != bytes[32..] {
        return Err(Error::InvalidKeyMaterial(
            "Private key does not match its public key".to_string(),
        ));
    }

    Ok(keypair)
}

/// A random 24-word phrase and a random keypair.
///
/// The keypair is not derived from the phrase, so restoring from the returned
/// mnemonic yields a different wallet.
pub fn generate_keypair() -> Result<(Keypair, String)> {
    let mnemonic = generate_mnemonic(MnemonicStrength::Words24)?;
    Ok((Keypair::new(), mnemonic))
}
