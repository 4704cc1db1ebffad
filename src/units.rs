//! Ether amount parsing and formatting

use crate::{Result, WalletError};
use alloy::primitives::utils::parse_ether;
use alloy::primitives::U256;

/// Decimals of the native currency
pub const ETHER_DECIMALS: u32 = 18;

/// Parse a decimal ether amount ("0.01") into wei
///
/// Rejects empty strings, signs, and more than 18 fractional digits.
pub fn parse_amount(amount: &str) -> Result<U256> {
    let amount = amount.trim();

    if amount.is_empty() {
        return Err(WalletError::InvalidAmount("amount is empty".to_string()));
    }
    if amount.starts_with('-') || amount.starts_with('+') {
        return Err(WalletError::InvalidAmount(format!(
            "amount must be an unsigned decimal: {}",
            amount
        )));
    }
    if !amount.chars().all(|c| c.is_ascii_digit() || c == '.') || amount == "." {
        return Err(WalletError::InvalidAmount(format!(
            "not a decimal number: {}",
            amount
        )));
    }
    if let Some((_, fraction)) = amount.split_once('.') {
        if fraction.len() > ETHER_DECIMALS as usize {
            return Err(WalletError::InvalidAmount(format!(
                "more than {} decimal places: {}",
                ETHER_DECIMALS, amount
            )));
        }
    }

    parse_ether(amount).map_err(|e| WalletError::InvalidAmount(format!("{}: {}", amount, e)))
}

/// Format a U256 value with decimals
pub fn format_units(value: U256, decimals: u32) -> String {
    if value.is_zero() {
        return "0".to_string();
    }

    let divisor = U256::from(10).pow(U256::from(decimals));
    let whole = value / divisor;
    let remainder = value % divisor;

    if remainder.is_zero() {
        whole.to_string()
    } else {
        let remainder_str = format!("{:0>width$}", remainder, width = decimals as usize);
        let trimmed = remainder_str.trim_end_matches('0');
        format!("{}.{}", whole, trimmed)
    }
}

/// Format wei as ether
pub fn format_ether(wei: U256) -> String {
    format_units(wei, ETHER_DECIMALS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_units() {
        let one_eth = U256::from(1_000_000_000_000_000_000u128);
        assert_eq!(format_units(one_eth, 18), "1");

        let one_point_five = U256::from(1_500_000_000_000_000_000u128);
        assert_eq!(format_units(one_point_five, 18), "1.5");

        let one_wei = U256::from(1u64);
        assert_eq!(format_ether(one_wei), "0.000000000000000001");

        assert_eq!(format_units(U256::ZERO, 18), "0");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(
            parse_amount("0.01").unwrap(),
            U256::from(10_000_000_000_000_000u128)
        );
        assert_eq!(
            parse_amount(" 2 ").unwrap(),
            U256::from(2_000_000_000_000_000_000u128)
        );
        assert_eq!(parse_amount("0").unwrap(), U256::ZERO);
    }

    #[test]
    fn test_parse_amount_rejects_invalid() {
        for bad in ["", "-1", "+1", "abc", "1e18", ".", "0.0000000000000000001"] {
            let err = parse_amount(bad).unwrap_err();
            assert!(
                matches!(err, WalletError::InvalidAmount(_)),
                "{bad:?} gave {err:?}"
            );
        }
    }
}
