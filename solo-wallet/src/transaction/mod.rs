//! Transaction functionality
//!
//! Result values reported by estimate and submit operations, and conversion
//! between decimal amounts and integer smallest units.

pub mod types;
pub mod amount;

pub use types::*;
pub use amount::*;
