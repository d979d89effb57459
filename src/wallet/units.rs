//! Conversion between native-unit floats and wei

use alloy::primitives::utils::{format_ether, parse_ether};
use alloy::primitives::U256;

use crate::error::TxError;

const ETHER_DECIMALS: u32 = 18;

/// Wei to a native-unit float (lossy above ~15 significant digits)
pub fn wei_to_ether(wei: U256) -> f64 {
    format_ether(wei).parse().unwrap_or(f64::MAX)
}

/// Native-unit amount to wei
///
/// Uses the shortest decimal representation of the float, so `0.1` becomes
/// exactly 10^17 wei. Digits beyond 18 decimals are truncated.
pub fn ether_to_wei(amount: f64) -> Result<U256, TxError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(TxError::InvalidAmount(amount));
    }

    let repr = amount.to_string();
    let repr = match repr.split_once('.') {
        Some((whole, frac)) if frac.len() > ETHER_DECIMALS as usize => {
            format!("{}.{}", whole, &frac[..ETHER_DECIMALS as usize])
        }
        _ => repr,
    };

    parse_ether(&repr).map_err(|_| TxError::InvalidAmount(amount))
}

/// Amounts for buy/sell must be strictly positive and finite
pub fn validate_amount(amount: f64) -> Result<U256, TxError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(TxError::InvalidAmount(amount));
    }
    let wei = ether_to_wei(amount)?;
    if wei.is_zero() {
        return Err(TxError::InvalidAmount(amount));
    }
    Ok(wei)
}
