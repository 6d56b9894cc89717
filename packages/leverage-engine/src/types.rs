//! Value types exchanged with the leverage calculators.

use std::fmt;

use bigdecimal::BigDecimal;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

use crate::decimal::{DISPLAY_SCALE, DecimalEngine};
use crate::error::LeverageError;
use crate::units::MAX_TOKEN_DECIMALS;

/// Hard ceiling on any leverage multiplier, independent of the math.
pub const LEVERAGE_CEILING: u32 = 25;

/// Token decimal counts used to express amounts as on-chain integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenScale {
    /// Fractional digits of the collateral token.
    pub collateral_decimals: u32,
    /// Fractional digits of the debt token.
    pub debt_decimals: u32,
}

impl TokenScale {
    /// Create a token scale, checking both counts are within `0..=30`.
    ///
    /// # Errors
    ///
    /// Returns [`LeverageError::TokenDecimalsOutOfRange`] for either count
    /// above [`MAX_TOKEN_DECIMALS`].
    pub const fn new(collateral_decimals: u32, debt_decimals: u32) -> Result<Self, LeverageError> {
        if collateral_decimals > MAX_TOKEN_DECIMALS {
            return Err(LeverageError::TokenDecimalsOutOfRange {
                field: "collateral_decimals",
                value: collateral_decimals,
                max: MAX_TOKEN_DECIMALS,
            });
        }
        if debt_decimals > MAX_TOKEN_DECIMALS {
            return Err(LeverageError::TokenDecimalsOutOfRange {
                field: "debt_decimals",
                value: debt_decimals,
                max: MAX_TOKEN_DECIMALS,
            });
        }
        Ok(Self {
            collateral_decimals,
            debt_decimals,
        })
    }
}

/// Market and protocol parameters, all as plain decimal ratios.
///
/// Prices share one quote currency. `flashloan_premium` of `0.0009` is nine
/// basis points; `max_ltv` of `0.80` is 80%.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketParams {
    /// Quote price of one collateral token.
    pub price_of_collateral: BigDecimal,
    /// Quote price of one debt token.
    pub price_of_debt: BigDecimal,
    /// Flashloan fee as a ratio.
    pub flashloan_premium: BigDecimal,
    /// Protocol LTV ceiling as a ratio in `[0, 1)`.
    pub max_ltv: BigDecimal,
}

impl MarketParams {
    /// Check that every field is non-negative and `max_ltv < 1`.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), LeverageError> {
        non_negative("price_of_collateral", &self.price_of_collateral)?;
        non_negative("price_of_debt", &self.price_of_debt)?;
        non_negative("flashloan_premium", &self.flashloan_premium)?;
        if self.max_ltv < BigDecimal::zero() || self.max_ltv >= BigDecimal::one() {
            return Err(LeverageError::LtvOutOfRange {
                value: self.max_ltv.to_string(),
            });
        }
        Ok(())
    }
}

/// Human-readable token amounts describing the position before the loop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionState {
    /// Collateral already supplied.
    pub initial_collateral_amount: BigDecimal,
    /// Debt already borrowed.
    pub initial_debt_amount: BigDecimal,
    /// Fresh collateral the user adds now.
    pub additional_collateral_amount: BigDecimal,
}

impl PositionState {
    /// Check that every amount is non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`LeverageError::NegativeValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), LeverageError> {
        non_negative("initial_collateral_amount", &self.initial_collateral_amount)?;
        non_negative("initial_debt_amount", &self.initial_debt_amount)?;
        non_negative(
            "additional_collateral_amount",
            &self.additional_collateral_amount,
        )
    }

    /// Initial plus additional collateral.
    #[must_use]
    pub fn total_collateral(&self) -> BigDecimal {
        &self.initial_collateral_amount + &self.additional_collateral_amount
    }
}

fn non_negative(field: &'static str, value: &BigDecimal) -> Result<(), LeverageError> {
    if *value < BigDecimal::zero() {
        return Err(LeverageError::NegativeValue {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Result of sizing a leveraged position.
///
/// `collateral_amount` and `debt_amount` are the final long and short legs,
/// rounded to [`DISPLAY_SCALE`] digits. `flashloan_amount` and `ltv` keep
/// the engine's working precision, so `debt_amount` equals
/// `flashloan_amount` rounded half-up to [`DISPLAY_SCALE`] digits, not the
/// unrounded value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeverageResult {
    /// Amount of debt token to flash-borrow.
    pub flashloan_amount: BigDecimal,
    /// Loan-to-value of the resulting position.
    pub ltv: BigDecimal,
    /// Leveraged collateral leg.
    pub collateral_amount: BigDecimal,
    /// Leveraged debt leg.
    pub debt_amount: BigDecimal,
}

impl LeverageResult {
    /// Pass-through result for a degenerate market: no flashloan, no LTV.
    #[must_use]
    pub fn passthrough(collateral_amount: BigDecimal, debt_amount: BigDecimal) -> Self {
        Self {
            flashloan_amount: BigDecimal::zero(),
            ltv: BigDecimal::zero(),
            collateral_amount: DecimalEngine::round_dp(&collateral_amount, DISPLAY_SCALE),
            debt_amount: DecimalEngine::round_dp(&debt_amount, DISPLAY_SCALE),
        }
    }
}

/// Highest safe leverage multiplier, always within `[1, 25]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaxLeverage(BigDecimal);

impl MaxLeverage {
    /// No leverage possible.
    #[must_use]
    pub fn none() -> Self {
        Self(BigDecimal::one())
    }

    /// Clamp `value` into `[1, ceiling]`.
    #[must_use]
    pub(crate) fn clamped(value: BigDecimal, ceiling: &BigDecimal) -> Self {
        let value = DecimalEngine::max(value, BigDecimal::one());
        Self(DecimalEngine::min(value, ceiling.clone()))
    }

    /// The multiplier.
    #[must_use]
    pub const fn value(&self) -> &BigDecimal {
        &self.0
    }

    /// Consume into the multiplier.
    #[must_use]
    pub fn into_inner(self) -> BigDecimal {
        self.0
    }

    /// Returns true when no leverage is possible.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.0 <= BigDecimal::one()
    }
}

impl fmt::Display for MaxLeverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", DecimalEngine::to_fixed(&self.0, 2))
    }
}

impl From<MaxLeverage> for BigDecimal {
    fn from(value: MaxLeverage) -> Self {
        value.0
    }
}
