//! Arbitrary-precision decimal arithmetic for the leverage calculators.
//!
//! Every intermediate step of the loop algebra goes through a
//! [`DecimalEngine`]. The engine carries its working precision explicitly,
//! so two engines with different precisions can coexist in one process and
//! nothing depends on global state.
//!
//! # Example
//!
//! ```rust,ignore
//! use leverage_engine::DecimalEngine;
//!
//! let engine = DecimalEngine::new(40)?;
//! let third = engine.div(&1.into(), &3.into()).unwrap_or_default();
//! assert_eq!(DecimalEngine::to_fixed(&third, 6), "0.333333");
//! ```

use std::cmp::Ordering;
use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::error::LeverageError;

/// Default number of significant digits kept after every operation.
pub const DEFAULT_PRECISION: u64 = 40;

/// Smallest precision that keeps 18-decimal amounts times 18-decimal ratios exact enough.
pub const MIN_PRECISION: u64 = 40;

/// Largest precision; quotients are produced with at most this many digits.
pub const MAX_PRECISION: u64 = 100;

/// Fractional digits used for display amounts.
pub const DISPLAY_SCALE: u32 = 6;

/// Largest decimal exponent, in either direction, accepted by
/// [`DecimalEngine::parse`]. Far above any token or ratio scale in use.
pub const MAX_PARSE_SCALE: i64 = 256;

/// `rust_decimal` cannot represent more fractional digits than this.
const RUST_DECIMAL_MAX_SCALE: u32 = 28;

/// Decimal arithmetic with a fixed working precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalEngine {
    precision: u64,
}

impl Default for DecimalEngine {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
        }
    }
}

impl DecimalEngine {
    /// Create an engine keeping `precision` significant digits.
    ///
    /// # Errors
    ///
    /// Returns [`LeverageError::InvalidPrecision`] outside
    /// `[MIN_PRECISION, MAX_PRECISION]`.
    pub const fn new(precision: u64) -> Result<Self, LeverageError> {
        if precision < MIN_PRECISION || precision > MAX_PRECISION {
            return Err(LeverageError::InvalidPrecision {
                precision,
                min: MIN_PRECISION,
                max: MAX_PRECISION,
            });
        }
        Ok(Self { precision })
    }

    /// Working precision in significant digits.
    #[must_use]
    pub const fn precision(&self) -> u64 {
        self.precision
    }

    fn fit(&self, value: &BigDecimal) -> BigDecimal {
        value.with_prec(self.precision)
    }

    /// `lhs + rhs`
    #[must_use]
    pub fn add(&self, lhs: &BigDecimal, rhs: &BigDecimal) -> BigDecimal {
        self.fit(&(lhs + rhs))
    }

    /// `lhs - rhs`
    #[must_use]
    pub fn sub(&self, lhs: &BigDecimal, rhs: &BigDecimal) -> BigDecimal {
        self.fit(&(lhs - rhs))
    }

    /// `lhs * rhs`
    #[must_use]
    pub fn mul(&self, lhs: &BigDecimal, rhs: &BigDecimal) -> BigDecimal {
        self.fit(&(lhs * rhs))
    }

    /// Multiply a chain of factors left to right, rounding after each step.
    #[must_use]
    pub fn product(&self, factors: &[&BigDecimal]) -> BigDecimal {
        factors
            .iter()
            .fold(BigDecimal::from(1), |acc, factor| self.mul(&acc, factor))
    }

    /// `lhs / rhs`, or `None` when `rhs` is zero.
    ///
    /// `None` is the non-finite sentinel: callers decide which conservative
    /// default it maps to.
    #[must_use]
    pub fn div(&self, lhs: &BigDecimal, rhs: &BigDecimal) -> Option<BigDecimal> {
        if rhs.is_zero() {
            return None;
        }
        Some(self.fit(&(lhs / rhs)))
    }

    /// `value * value`
    #[must_use]
    pub fn square(&self, value: &BigDecimal) -> BigDecimal {
        self.mul(value, value)
    }

    /// `base ^ exponent` by repeated squaring.
    #[must_use]
    pub fn pow(&self, base: &BigDecimal, exponent: u32) -> BigDecimal {
        let mut result = BigDecimal::from(1);
        let mut factor = base.clone();
        let mut remaining = exponent;
        while remaining > 0 {
            if remaining & 1 == 1 {
                result = self.mul(&result, &factor);
            }
            remaining >>= 1;
            if remaining > 0 {
                factor = self.square(&factor);
            }
        }
        result
    }

    /// Exact `10 ^ exponent`.
    #[must_use]
    pub fn pow10(exponent: u32) -> BigDecimal {
        BigDecimal::new(BigInt::from(1), -i64::from(exponent))
    }

    /// The smaller of two values.
    #[must_use]
    pub fn min(lhs: BigDecimal, rhs: BigDecimal) -> BigDecimal {
        match lhs.cmp(&rhs) {
            Ordering::Greater => rhs,
            _ => lhs,
        }
    }

    /// The larger of two values.
    #[must_use]
    pub fn max(lhs: BigDecimal, rhs: BigDecimal) -> BigDecimal {
        match lhs.cmp(&rhs) {
            Ordering::Less => rhs,
            _ => lhs,
        }
    }

    /// Round half-up to `scale` fractional digits.
    #[must_use]
    pub fn round_dp(value: &BigDecimal, scale: u32) -> BigDecimal {
        value.with_scale_round(i64::from(scale), RoundingMode::HalfUp)
    }

    /// Format with exactly `scale` fractional digits, never in exponent form.
    #[must_use]
    pub fn to_fixed(value: &BigDecimal, scale: u32) -> String {
        let (digits, exponent) = Self::round_dp(value, scale).as_bigint_and_exponent();
        let negative = digits.is_negative();
        let mut text = digits.abs().to_string();

        let mut exponent = exponent;
        if exponent < 0 {
            text.push_str(&"0".repeat(exponent.unsigned_abs() as usize));
            exponent = 0;
        }
        let fraction_len = exponent as usize;
        if text.len() <= fraction_len {
            text = format!("{}{text}", "0".repeat(fraction_len + 1 - text.len()));
        }

        let (integer, fraction) = text.split_at(text.len() - fraction_len);
        let mut fraction = fraction.to_string();
        while fraction.len() < scale as usize {
            fraction.push('0');
        }
        fraction.truncate(scale as usize);

        let sign = if negative { "-" } else { "" };
        if fraction.is_empty() {
            format!("{sign}{integer}")
        } else {
            format!("{sign}{integer}.{fraction}")
        }
    }

    /// Parse a decimal string supplied for `field`.
    ///
    /// # Errors
    ///
    /// Returns [`LeverageError::InvalidDecimal`] if `text` is not a decimal
    /// or its scale exceeds [`MAX_PARSE_SCALE`] in magnitude.
    pub fn parse(field: &'static str, text: &str) -> Result<BigDecimal, LeverageError> {
        let invalid = || LeverageError::InvalidDecimal {
            field,
            value: text.to_string(),
        };
        let value = BigDecimal::from_str(text.trim()).map_err(|_| invalid())?;
        let (_, scale) = value.as_bigint_and_exponent();
        if scale.abs() > MAX_PARSE_SCALE {
            return Err(invalid());
        }
        Ok(value)
    }

    /// Lossy conversion for display surfaces only.
    #[must_use]
    pub fn to_f64(value: &BigDecimal) -> Option<f64> {
        value.to_f64()
    }

    /// Lift a `rust_decimal` value without loss.
    #[must_use]
    pub fn from_rust_decimal(value: rust_decimal::Decimal) -> BigDecimal {
        BigDecimal::new(BigInt::from(value.mantissa()), i64::from(value.scale()))
    }

    /// Lower to `rust_decimal`, rounding half-up to `scale` fractional digits
    /// (at most 28). Returns `None` when the value does not fit in 96 bits.
    #[must_use]
    pub fn to_rust_decimal(value: &BigDecimal, scale: u32) -> Option<rust_decimal::Decimal> {
        let scale = scale.min(RUST_DECIMAL_MAX_SCALE);
        let (digits, exponent) = Self::round_dp(value, scale).as_bigint_and_exponent();
        let exponent = u32::try_from(exponent).ok()?;
        rust_decimal::Decimal::try_from_i128_with_scale(digits.to_i128()?, exponent).ok()
    }
}
