//! Decimal amount conversion

use crate::error::{Error, Result};

fn scale(decimals: u8) -> f64 {
    10f64.powi(i32::from(decimals))
}

/// Amounts must be finite and non-negative
pub fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidInput(format!("Invalid amount: {}", amount)));
    }
    Ok(())
}

/// Convert a decimal amount into smallest units, rounded to the nearest unit
pub fn to_base_units(amount: f64, decimals: u8) -> Result<u64> {
    validate_amount(amount)?;

    let units = (amount * scale(decimals)).round();
    if units >= u64::MAX as f64 {
        return Err(Error::InvalidInput(format!("Amount too large: {}", amount)));
    }

    Ok(units as u64)
}

/// Convert smallest units into a decimal amount rounded to `decimals` places
pub fn from_base_units(units: u64, decimals: u8) -> f64 {
    let scale = scale(decimals);
    let amount = units as f64 / scale;
    (amount * scale).round() / scale
}
