//! Signing seed derivation
//!
//! Turns a 64-byte BIP-39 seed into the 32-byte ed25519 seed a keypair is
//! built from. The default takes the seed prefix directly; the path scheme
//! follows SLIP-0010 for ed25519, which only defines hardened children.

use std::fmt;
use std::str::FromStr;

use hmac::{Hmac, Mac};
use sha2::Sha512;

use crate::error::{Error, Result};

type HmacSha512 = Hmac<Sha512>;

/// First hardened child index
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// A parsed BIP-32 style derivation path such as `m/44'/501'/0'/0'`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationPath {
    indexes: Vec<u32>,
}

impl DerivationPath {
    pub fn indexes(&self) -> &[u32] {
        &self.indexes
    }

    pub fn is_fully_hardened(&self) -> bool {
        self.indexes.iter().all(|index| *index >= HARDENED_OFFSET)
    }
}

impl FromStr for DerivationPath {
    type Err = Error;

    fn from_str(path: &str) -> Result<Self> {
        let rest = match path.strip_prefix('m') {
            Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
            _ => return Err(Error::KeyDerivation(format!("Invalid derivation path: {}", path))),
        };

        let mut indexes = Vec::new();
        for component in rest.split('/').skip(1) {
            if component.is_empty() {
                continue;
            }

            let (digits, hardened) = match component.strip_suffix('\'').or_else(|| component.strip_suffix('h')) {
                Some(digits) => (digits, true),
                None => (component, false),
            };

            let index = digits.parse::<u32>()
                .ok()
                .filter(|index| *index < HARDENED_OFFSET)
                .ok_or_else(|| Error::KeyDerivation(format!("Invalid derivation path component: {}", component)))?;

            indexes.push(if hardened { index + HARDENED_OFFSET } else { index });
        }

        Ok(Self { indexes })
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for index in &self.indexes {
            if *index >= HARDENED_OFFSET {
                write!(f, "/{}'", index - HARDENED_OFFSET)?;
            } else {
                write!(f, "/{}", index)?;
            }
        }
        Ok(())
    }
}

/// How the 32-byte signing seed is taken from a BIP-39 seed
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SeedDerivation {
    /// First 32 bytes of the BIP-39 seed
    #[default]
    SeedPrefix,
    /// SLIP-0010 ed25519 derivation along a fully hardened path
    Path(DerivationPath),
}

impl SeedDerivation {
    /// Derive the signing seed from a BIP-39 seed
    pub fn signing_seed(&self, seed: &[u8]) -> Result<[u8; 32]> {
        match self {
            Self::SeedPrefix => {
                let prefix = seed.get(..32)
                    .ok_or_else(|| Error::KeyDerivation(format!("Seed too short: {} bytes", seed.len())))?;
                let mut secret = [0u8; 32];
                secret.copy_from_slice(prefix);
                Ok(secret)
            }
            Self::Path(path) => derive_ed25519_seed(seed, path),
        }
    }
}

/// SLIP-0010 ed25519 private key for `path`
pub fn derive_ed25519_seed(seed: &[u8], path: &DerivationPath) -> Result<[u8; 32]> {
    if !path.is_fully_hardened() {
        return Err(Error::KeyDerivation(format!(
            "ed25519 derivation only supports hardened components: {}",
            path
        )));
    }

    let (mut secret_key, mut chain_code) = hmac_split(b"ed25519 seed", &[seed])?;

    for index in path.indexes() {
        (secret_key, chain_code) = hmac_split(&chain_code, &[&[0u8], &secret_key, &index.to_be_bytes()])?;
    }

    Ok(secret_key)
}

/// HMAC-SHA512 split into (key, chain code)
fn hmac_split(key: &[u8], parts: &[&[u8]]) -> Result<([u8; 32], [u8; 32])> {
    let mut hmac = HmacSha512::new_from_slice(key)
        .map_err(|_| Error::KeyDerivation("HMAC error".to_string()))?;

    for part in parts {
        hmac.update(part);
    }
    let result = hmac.finalize().into_bytes();

    let mut secret_key = [0u8; 32];
    let mut chain_code = [0u8; 32];
    secret_key.copy_from_slice(&result[0..32]);
    chain_code.copy_from_slice(&result[32..64]);

    Ok((secret_key, chain_code))
}
