//! Password based key material
//!
//! A password is turned into 32 bytes of BIP-39 entropy by hashing it together
//! with a template secret. The template is not a secret in the security sense:
//! it is a domain-separation constant shared by every wallet derived with this
//! scheme. Changing it changes every derived wallet.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Template secret shipped with the first version of the password scheme.
pub const DEFAULT_TEMPLATE_SECRET: &str =
    "0x2050939757b6d498bb0407e001f0cb6db05c991b3c6f7d8e362f9d27c70128b9";

/// Domain-separation constant mixed into every password derivation
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateSecret(String);

impl TemplateSecret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_TEMPLATE_SECRET
    }
}

impl Default for TemplateSecret {
    fn default() -> Self {
        Self(DEFAULT_TEMPLATE_SECRET.to_string())
    }
}

impl fmt::Debug for TemplateSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_default() {
            f.write_str("TemplateSecret(default)")
        } else {
            f.write_str("TemplateSecret(custom)")
        }
    }
}

/// `SHA-256(template ‖ password)` over the UTF-8 text of both
pub fn password_entropy(template: &TemplateSecret, password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(template.as_str().as_bytes());
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}
