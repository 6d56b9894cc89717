//! Highest leverage reachable before the position hits the LTV ceiling.
//!
//! Closed form of "at which multiplier does the looped position's LTV equal
//! `max_ltv`", with the flashloan premium charged as extra debt:
//!
//! ```text
//! numerator   = pc² (1 + fl) − pd² D0 / Ctot
//! denominator = pc² (1 + fl − L)
//! ```
//!
//! Works on human-readable amounts; token decimals play no part.

use bigdecimal::BigDecimal;
use num_traits::{One, Zero};
use tracing::{debug, trace};

use crate::decimal::DecimalEngine;
use crate::types::{MarketParams, MaxLeverage, PositionState, TokenScale};

pub(crate) fn max_leverage(
    engine: &DecimalEngine,
    ceiling: &BigDecimal,
    state: &PositionState,
    _scale: &TokenScale,
    market: &MarketParams,
) -> MaxLeverage {
    let total_collateral = engine.add(
        &state.initial_collateral_amount,
        &state.additional_collateral_amount,
    );
    if total_collateral.is_zero() {
        debug!("No collateral, leverage unavailable");
        return MaxLeverage::none();
    }

    let one = BigDecimal::one();
    let price_sq = engine.square(&market.price_of_collateral);
    let premium_factor = engine.add(&one, &market.flashloan_premium);

    let debt_weight = engine.mul(
        &engine.square(&market.price_of_debt),
        &state.initial_debt_amount,
    );
    let Some(debt_drag) = engine.div(&debt_weight, &total_collateral) else {
        return MaxLeverage::none();
    };

    let numerator = engine.sub(&engine.mul(&price_sq, &premium_factor), &debt_drag);
    let denominator = engine.mul(&price_sq, &engine.sub(&premium_factor, &market.max_ltv));

    let Some(raw) = engine.div(&numerator, &denominator) else {
        debug!(
            price_of_collateral = %market.price_of_collateral,
            max_ltv = %market.max_ltv,
            "Degenerate leverage denominator"
        );
        return MaxLeverage::none();
    };

    // Also catches a negative numerator from an over-indebted position.
    if raw <= one {
        debug!(raw = %raw, "Position cannot take on leverage");
        return MaxLeverage::none();
    }

    let max = MaxLeverage::clamped(raw, ceiling);
    trace!(max_leverage = %max.value(), "Computed max leverage");
    max
}
