use std::str::FromStr;

use alloy::primitives::utils::format_units;
use alloy::primitives::U256;
use rust_decimal::Decimal;

use super::ProviderError;

pub const WEI_DECIMALS: u8 = 18;

/// Parse a hex quantity (`0x1a`) or a 32-byte padded word. Empty digits mean zero.
pub fn parse_hex_u256(hex: &str) -> Result<U256, ProviderError> {
    let digits = hex.trim().trim_start_matches("0x");
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 16)
        .map_err(|e| ProviderError::Unexpected(format!("bad hex quantity {hex}: {e}")))
}

/// Parse a base-10 integer string as returned by explorer APIs.
pub fn parse_dec_u256(s: &str) -> Result<U256, ProviderError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(s, 10).map_err(|e| ProviderError::Unexpected(format!("bad integer {s}: {e}")))
}

/// Scale raw integer units down by `decimals`.
///
/// Every uint256 decodes; amounts past `Decimal`'s 96-bit range are reported
/// as an error so callers can drop that single entry.
pub fn units_to_decimal(raw: U256, decimals: u8) -> Result<Decimal, ProviderError> {
    let formatted = format_units(raw, decimals)
        .map_err(|e| ProviderError::Unexpected(format!("cannot format {raw} with {decimals} decimals: {e}")))?;
    let trimmed = if formatted.contains('.') {
        formatted.trim_end_matches('0').trim_end_matches('.')
    } else {
        formatted.as_str()
    };

    Decimal::from_str(trimmed)
        .map(|d| d.normalize())
        .map_err(|e| ProviderError::Unexpected(format!("amount {trimmed} out of range: {e}")))
}

/// `parse_hex_u256` followed by `units_to_decimal`.
pub fn hex_to_decimal(hex: &str, decimals: u8) -> Result<Decimal, ProviderError> {
    units_to_decimal(parse_hex_u256(hex)?, decimals)
}
