//! Common transaction types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Outcome of an estimate or submit operation.
///
/// On success `description` carries the payload (an estimated cost or a
/// transaction identifier); on failure it carries a human readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationResult {
    pub success: bool,
    pub description: String,
}

impl OperationResult {
    pub fn succeeded(description: impl Into<String>) -> Self {
        Self { success: true, description: description.into() }
    }

    pub fn failed(description: impl Into<String>) -> Self {
        Self { success: false, description: description.into() }
    }

    /// Failure for `error`, prefixed with `context` unless it is a funds check
    pub fn from_error(context: &str, error: &Error) -> Self {
        match error {
            Error::InsufficientFunds => Self::failed(error.to_string()),
            _ => Self::failed(format!("{}: {}", context, error)),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

impl fmt::Display for OperationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.success { "ok" } else { "failed" };
        write!(f, "{}: {}", status, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_error() {
        let result = OperationResult::from_error("Sending SOL failed", &Error::Network("timed out".to_string()));
        assert!(!result.is_success());
        assert_eq!(result.description, "Sending SOL failed: Network error: timed out");

        let result = OperationResult::from_error("Sending SOL failed", &Error::InsufficientFunds);
        assert_eq!(result, OperationResult::failed("insufficient funds"));
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let json = serde_json::to_value(OperationResult::succeeded("0.000005")).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "description": "0.000005" }));
    }
}
