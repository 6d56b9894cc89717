//! Decimal-string transport types for collaborators.
//!
//! Prices, ratios and amounts cross the boundary as decimal strings so no
//! floating-point artifacts creep in. Ratios are plain decimals (`"0.0009"`,
//! never `"9"` bps), amounts are human-readable (`"100.5"`), and outputs are
//! formatted to the calculator's display scale.

use bigdecimal::BigDecimal;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculator::LeverageCalculator;
use crate::decimal::DecimalEngine;
use crate::error::LeverageError;
use crate::types::{LeverageResult, MarketParams, MaxLeverage, PositionState, TokenScale};

/// Request to size a leveraged position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeverageRequestDto {
    /// Fractional digits of the collateral token.
    pub collateral_decimals: u32,
    /// Fractional digits of the debt token.
    pub debt_decimals: u32,
    /// Collateral already supplied.
    #[serde(default = "zero_string")]
    pub initial_collateral_amount: String,
    /// Debt already borrowed.
    #[serde(default = "zero_string")]
    pub initial_debt_amount: String,
    /// Fresh collateral added now.
    pub additional_collateral_amount: String,
    /// Requested leverage multiplier, clamped before sizing.
    pub target_leverage: String,
    /// Quote price of the collateral token.
    pub price_of_collateral: String,
    /// Quote price of the debt token.
    pub price_of_debt: String,
    /// Flashloan fee ratio.
    pub flashloan_premium: String,
    /// Protocol LTV ceiling ratio.
    pub max_ltv: String,
}

fn zero_string() -> String {
    "0".to_string()
}

impl LeverageRequestDto {
    /// Token decimal counts.
    ///
    /// # Errors
    ///
    /// Returns error if either count exceeds 30.
    pub const fn token_scale(&self) -> Result<TokenScale, LeverageError> {
        TokenScale::new(self.collateral_decimals, self.debt_decimals)
    }

    /// Parsed and validated position amounts.
    ///
    /// # Errors
    ///
    /// Returns error for malformed or negative amounts.
    pub fn position_state(&self) -> Result<PositionState, LeverageError> {
        let state = PositionState {
            initial_collateral_amount: DecimalEngine::parse(
                "initial_collateral_amount",
                &self.initial_collateral_amount,
            )?,
            initial_debt_amount: DecimalEngine::parse(
                "initial_debt_amount",
                &self.initial_debt_amount,
            )?,
            additional_collateral_amount: DecimalEngine::parse(
                "additional_collateral_amount",
                &self.additional_collateral_amount,
            )?,
        };
        state.validate()?;
        Ok(state)
    }

    /// Parsed and validated market parameters.
    ///
    /// # Errors
    ///
    /// Returns error for malformed or negative values, or `max_ltv >= 1`.
    pub fn market_params(&self) -> Result<MarketParams, LeverageError> {
        let market = MarketParams {
            price_of_collateral: DecimalEngine::parse(
                "price_of_collateral",
                &self.price_of_collateral,
            )?,
            price_of_debt: DecimalEngine::parse("price_of_debt", &self.price_of_debt)?,
            flashloan_premium: DecimalEngine::parse(
                "flashloan_premium",
                &self.flashloan_premium,
            )?,
            max_ltv: DecimalEngine::parse("max_ltv", &self.max_ltv)?,
        };
        market.validate()?;
        Ok(market)
    }

    /// Parsed target leverage.
    ///
    /// # Errors
    ///
    /// Returns error for a malformed or negative multiplier.
    pub fn target_leverage(&self) -> Result<BigDecimal, LeverageError> {
        let target = DecimalEngine::parse("target_leverage", &self.target_leverage)?;
        if target < BigDecimal::zero() {
            return Err(LeverageError::InvalidTargetLeverage {
                value: self.target_leverage.clone(),
            });
        }
        Ok(target)
    }
}

/// Formatted sizing quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeverageQuoteDto {
    /// Highest safe multiplier for this position.
    pub max_leverage: String,
    /// Multiplier actually sized, after clamping.
    pub applied_leverage: String,
    /// Amount of debt token to flash-borrow.
    pub flashloan_amount: String,
    /// Loan-to-value after the loop.
    pub ltv: String,
    /// Leveraged collateral leg.
    pub collateral_amount: String,
    /// Leveraged debt leg.
    pub debt_amount: String,
}

impl LeverageQuoteDto {
    /// Format a sizing result with `scale` fractional digits.
    #[must_use]
    pub fn from_result(
        max_leverage: &MaxLeverage,
        applied_leverage: &BigDecimal,
        result: &LeverageResult,
        scale: u32,
    ) -> Self {
        Self {
            max_leverage: DecimalEngine::to_fixed(max_leverage.value(), scale),
            applied_leverage: DecimalEngine::to_fixed(applied_leverage, scale),
            flashloan_amount: DecimalEngine::to_fixed(&result.flashloan_amount, scale),
            ltv: DecimalEngine::to_fixed(&result.ltv, scale),
            collateral_amount: DecimalEngine::to_fixed(&result.collateral_amount, scale),
            debt_amount: DecimalEngine::to_fixed(&result.debt_amount, scale),
        }
    }
}

/// Request for the LTV of an open position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentLtvRequestDto {
    /// Collateral held, human-readable.
    pub collateral_amount: String,
    /// Debt owed, human-readable.
    pub debt_amount: String,
    /// Quote price of the collateral token.
    pub price_of_collateral: String,
    /// Quote price of the debt token.
    pub price_of_debt: String,
}

impl LeverageCalculator {
    /// Parse a request, bound and clamp its target, size it, and format.
    ///
    /// # Errors
    ///
    /// Returns error if any field of `request` is malformed or violates its
    /// invariants. Numerical degeneracies never fail.
    pub fn quote(&self, request: &LeverageRequestDto) -> Result<LeverageQuoteDto, LeverageError> {
        let scale = request.token_scale()?;
        let state = request.position_state()?;
        let market = request.market_params()?;
        let requested = request.target_leverage()?;

        let max = self.max_leverage(&state, &scale, &market);
        let target = DecimalEngine::min(
            DecimalEngine::max(requested.clone(), BigDecimal::from(1)),
            max.value().clone(),
        );
        if target != requested {
            debug!(requested = %requested, applied = %target, "Clamped target leverage");
        }

        let result = self.leverage_params(&state, &scale, &market, &target);
        Ok(LeverageQuoteDto::from_result(
            &max,
            &target,
            &result,
            self.display_scale(),
        ))
    }

    /// Parse a request and format the current LTV.
    ///
    /// # Errors
    ///
    /// Returns error if any field of `request` is not a decimal.
    pub fn quote_current_ltv(
        &self,
        request: &CurrentLtvRequestDto,
    ) -> Result<String, LeverageError> {
        let ltv = self.current_ltv(
            &DecimalEngine::parse("collateral_amount", &request.collateral_amount)?,
            &DecimalEngine::parse("debt_amount", &request.debt_amount)?,
            &DecimalEngine::parse("price_of_collateral", &request.price_of_collateral)?,
            &DecimalEngine::parse("price_of_debt", &request.price_of_debt)?,
        );
        Ok(DecimalEngine::to_fixed(&ltv, self.display_scale()))
    }
}
