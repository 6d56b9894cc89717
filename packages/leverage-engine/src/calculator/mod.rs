//! Leverage calculators for flashloan-assisted looping.
//!
//! Three independent, total calculators:
//! - max leverage: the highest multiplier that stays under the LTV ceiling
//! - sizing: flashloan amount and resulting legs for a target multiplier
//! - current LTV: the instantaneous LTV of an open position
//!
//! None of them calls another; composing them is the caller's job. The one
//! composition offered here, [`LeverageCalculator::leverage_params_clamped`],
//! is a convenience on top of the unclamped contract.
//!
//! # Example
//!
//! ```rust,ignore
//! use leverage_engine::{LeverageCalculator, MarketParams, PositionState, TokenScale};
//!
//! let calculator = LeverageCalculator::default();
//! let max = calculator.max_leverage(&state, &scale, &market);
//! let target = requested.min(max.into_inner());
//! let sized = calculator.leverage_params(&state, &scale, &market, &target);
//! ```

mod ltv;
mod max_leverage;
mod sizer;

use bigdecimal::BigDecimal;
use num_traits::One;

use crate::config::EngineConfig;
use crate::decimal::{DISPLAY_SCALE, DecimalEngine};
use crate::error::LeverageError;
use crate::types::{
    LEVERAGE_CEILING, LeverageResult, MarketParams, MaxLeverage, PositionState, TokenScale,
};

/// Leverage calculator bound to one decimal engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeverageCalculator {
    engine: DecimalEngine,
    leverage_ceiling: BigDecimal,
    display_scale: u32,
}

impl Default for LeverageCalculator {
    fn default() -> Self {
        Self::new(DecimalEngine::default())
    }
}

impl LeverageCalculator {
    /// Create a calculator with the hard ceiling of 25x.
    #[must_use]
    pub fn new(engine: DecimalEngine) -> Self {
        Self {
            engine,
            leverage_ceiling: BigDecimal::from(LEVERAGE_CEILING),
            display_scale: DISPLAY_SCALE,
        }
    }

    /// Create a calculator with a lower leverage ceiling.
    ///
    /// The ceiling is clamped into `[1, 25]`; it can never exceed the hard cap.
    #[must_use]
    pub fn with_ceiling(engine: DecimalEngine, ceiling: BigDecimal) -> Self {
        let ceiling = MaxLeverage::clamped(ceiling, &BigDecimal::from(LEVERAGE_CEILING));
        Self {
            engine,
            leverage_ceiling: ceiling.into_inner(),
            display_scale: DISPLAY_SCALE,
        }
    }

    /// Set the fractional digits used by the decimal-string boundary.
    #[must_use]
    pub const fn with_display_scale(mut self, display_scale: u32) -> Self {
        self.display_scale = display_scale;
        self
    }

    /// Build from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the precision or ceiling in `config` is invalid.
    pub fn from_config(config: &EngineConfig) -> Result<Self, LeverageError> {
        let engine = DecimalEngine::new(config.precision)?;
        let ceiling = DecimalEngine::parse("leverage_ceiling", &config.leverage_ceiling)?;
        Ok(Self::with_ceiling(engine, ceiling).with_display_scale(config.display_scale))
    }

    /// The decimal engine used for every step.
    #[must_use]
    pub const fn engine(&self) -> &DecimalEngine {
        &self.engine
    }

    /// The leverage ceiling applied by [`Self::max_leverage`].
    #[must_use]
    pub const fn leverage_ceiling(&self) -> &BigDecimal {
        &self.leverage_ceiling
    }

    /// Fractional digits of formatted outputs.
    #[must_use]
    pub const fn display_scale(&self) -> u32 {
        self.display_scale
    }

    /// Highest safe leverage multiplier, within `[1, ceiling]`.
    #[must_use]
    pub fn max_leverage(
        &self,
        state: &PositionState,
        scale: &TokenScale,
        market: &MarketParams,
    ) -> MaxLeverage {
        max_leverage::max_leverage(&self.engine, &self.leverage_ceiling, state, scale, market)
    }

    /// Flashloan amount and resulting position for `target_leverage`.
    ///
    /// `target_leverage` is used as given. Callers must clamp it into
    /// `[1, max_leverage]` first, or use [`Self::leverage_params_clamped`];
    /// an unclamped target sizes a position past the LTV ceiling.
    #[must_use]
    pub fn leverage_params(
        &self,
        state: &PositionState,
        scale: &TokenScale,
        market: &MarketParams,
        target_leverage: &BigDecimal,
    ) -> LeverageResult {
        sizer::leverage_params(&self.engine, state, scale, market, target_leverage)
    }

    /// Clamp `target_leverage` into `[1, max_leverage]`, then size.
    #[must_use]
    pub fn leverage_params_clamped(
        &self,
        state: &PositionState,
        scale: &TokenScale,
        market: &MarketParams,
        target_leverage: &BigDecimal,
    ) -> LeverageResult {
        let target = self.clamp_target(state, scale, market, target_leverage);
        self.leverage_params(state, scale, market, &target)
    }

    /// `target_leverage` clamped into `[1, max_leverage]`.
    #[must_use]
    pub fn clamp_target(
        &self,
        state: &PositionState,
        scale: &TokenScale,
        market: &MarketParams,
        target_leverage: &BigDecimal,
    ) -> BigDecimal {
        let max = self.max_leverage(state, scale, market);
        let target = DecimalEngine::max(target_leverage.clone(), BigDecimal::one());
        DecimalEngine::min(target, max.into_inner())
    }

    /// Loan-to-value of an open position from human-readable amounts.
    #[must_use]
    pub fn current_ltv(
        &self,
        collateral_amount: &BigDecimal,
        debt_amount: &BigDecimal,
        price_of_collateral: &BigDecimal,
        price_of_debt: &BigDecimal,
    ) -> BigDecimal {
        ltv::current_ltv(
            &self.engine,
            collateral_amount,
            debt_amount,
            price_of_collateral,
            price_of_debt,
        )
    }
}

/// [`LeverageCalculator::max_leverage`] with the default engine.
#[must_use]
pub fn compute_max_leverage(
    state: &PositionState,
    scale: &TokenScale,
    market: &MarketParams,
) -> MaxLeverage {
    LeverageCalculator::default().max_leverage(state, scale, market)
}

/// [`LeverageCalculator::leverage_params`] with the default engine.
///
/// `target_leverage` must already be clamped by the caller.
#[must_use]
pub fn compute_leverage_params(
    state: &PositionState,
    scale: &TokenScale,
    market: &MarketParams,
    target_leverage: &BigDecimal,
) -> LeverageResult {
    LeverageCalculator::default().leverage_params(state, scale, market, target_leverage)
}

/// [`LeverageCalculator::current_ltv`] with the default engine.
#[must_use]
pub fn compute_current_ltv(
    collateral_amount: &BigDecimal,
    debt_amount: &BigDecimal,
    price_of_collateral: &BigDecimal,
    price_of_debt: &BigDecimal,
) -> BigDecimal {
    LeverageCalculator::default().current_ltv(
        collateral_amount,
        debt_amount,
        price_of_collateral,
        price_of_debt,
    )
}
