//! Unit conversions at the collaborator boundary.
//!
//! Protocol parameters arrive in several encodings (basis points, percent,
//! ray, wad) and token amounts arrive as human-readable magnitudes. The
//! calculators want plain decimal ratios and, for sizing, on-chain integer
//! magnitudes. Every conversion here is a power-of-ten shift and therefore
//! exact.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::decimal::DecimalEngine;

/// Basis points in one whole (100%).
pub const BPS_PER_UNIT: u32 = 10_000;

/// Fractional digits of a ray (27-decimal fixed point).
pub const RAY_DECIMALS: u32 = 27;

/// Fractional digits of a wad (18-decimal fixed point).
pub const WAD_DECIMALS: u32 = 18;

/// Largest token decimal count accepted by [`TokenScale`](crate::TokenScale).
pub const MAX_TOKEN_DECIMALS: u32 = 30;

/// `value * 10^-decimals`, exact.
fn shift_down(value: &BigDecimal, decimals: u32) -> BigDecimal {
    value * &BigDecimal::new(BigInt::from(1), i64::from(decimals))
}

/// `10 ^ decimals`: the integer magnitude of one whole token.
#[must_use]
pub fn scale_factor(decimals: u32) -> BigDecimal {
    DecimalEngine::pow10(decimals)
}

/// Basis points to a plain ratio (`9` becomes `0.0009`).
#[must_use]
pub fn bps_to_ratio(bps: u32) -> BigDecimal {
    BigDecimal::new(BigInt::from(bps), 4)
}

/// Percent to a plain ratio (`80` becomes `0.80`).
#[must_use]
pub fn percent_to_ratio(percent: &BigDecimal) -> BigDecimal {
    shift_down(percent, 2)
}

/// Ray-scaled integer to a plain ratio.
#[must_use]
pub fn ray_to_ratio(ray: &BigDecimal) -> BigDecimal {
    shift_down(ray, RAY_DECIMALS)
}

/// Wad-scaled integer to a plain ratio.
#[must_use]
pub fn wad_to_ratio(wad: &BigDecimal) -> BigDecimal {
    shift_down(wad, WAD_DECIMALS)
}

/// Human-readable amount to its on-chain integer magnitude.
#[must_use]
pub fn to_base_units(amount: &BigDecimal, decimals: u32) -> BigDecimal {
    amount * &scale_factor(decimals)
}

/// On-chain integer magnitude back to a human-readable amount.
#[must_use]
pub fn from_base_units(amount: &BigDecimal, decimals: u32) -> BigDecimal {
    shift_down(amount, decimals)
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    fn d(text: &str) -> BigDecimal {
        DecimalEngine::parse("test", text).expect("should parse test decimal")
    }

    #[test]
    fn test_ratio_encodings() {
        assert_eq!(bps_to_ratio(9), d("0.0009"));
        assert_eq!(bps_to_ratio(BPS_PER_UNIT), d("1"));
        assert_eq!(percent_to_ratio(&d("80")), d("0.8"));
        assert_eq!(ray_to_ratio(&d("1000000000000000000000000000")), d("1"));
        assert_eq!(wad_to_ratio(&d("850000000000000000")), d("0.85"));
    }

    #[test]
    fn test_base_units() {
        assert_eq!(to_base_units(&d("100.5"), 6), d("100500000"));
        assert_eq!(from_base_units(&d("100500000"), 6), d("100.5"));
        assert_eq!(to_base_units(&d("1"), 0), d("1"));
        assert_eq!(
            from_base_units(&to_base_units(&d("0.123456789012345678"), 18), 18),
            d("0.123456789012345678")
        );
    }
}
