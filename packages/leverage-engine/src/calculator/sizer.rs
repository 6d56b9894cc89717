//! Flashloan sizing for a target leverage.
//!
//! Amounts are lifted to on-chain integer magnitudes (`amount * 10^decimals`)
//! before the formula is applied, so every term carries the same
//! `10^collateral_decimals * 10^debt_decimals` factor and the flashloan comes
//! out in human-readable debt units:
//!
//! ```text
//! nom1  = (pc − pd·tL) · D0 · Ctot
//! nom2  = pc² · Ctot² · (tL − 1) · (1 + fl) · debtScale / pd / collScale
//! denom = pc · Ctot · (1 + fl) · debtScale − pd · D0 · collScale
//! flashloan = (nom1 + nom2) / denom
//!
//! ltv = (pd · D0 · collScale + pc · Ctot · (tL − 1) · (1 + fl) · debtScale)
//!     / (pc · Ctot · tL · debtScale)
//! ```
//!
//! The collateral leg is `additional_collateral * tL` and deliberately leaves
//! the initial position out, matching the deployed contracts.

use bigdecimal::BigDecimal;
use num_traits::{One, Zero};
use tracing::{debug, trace};

use crate::decimal::{DISPLAY_SCALE, DecimalEngine};
use crate::types::{LeverageResult, MarketParams, PositionState, TokenScale};
use crate::units::{scale_factor, to_base_units};

pub(crate) fn leverage_params(
    engine: &DecimalEngine,
    state: &PositionState,
    scale: &TokenScale,
    market: &MarketParams,
    target_leverage: &BigDecimal,
) -> LeverageResult {
    let one = BigDecimal::one();
    let coll_scale = scale_factor(scale.collateral_decimals);
    let debt_scale = scale_factor(scale.debt_decimals);

    let total_collateral = engine.add(
        &state.initial_collateral_amount,
        &state.additional_collateral_amount,
    );
    let collateral = to_base_units(&total_collateral, scale.collateral_decimals);
    let debt = to_base_units(&state.initial_debt_amount, scale.debt_decimals);

    let pc = &market.price_of_collateral;
    let pd = &market.price_of_debt;
    let premium_factor = engine.add(&one, &market.flashloan_premium);
    let extra_leverage = engine.sub(target_leverage, &one);

    let spread = engine.sub(pc, &engine.mul(pd, target_leverage));
    let nom1 = engine.product(&[&spread, &debt, &collateral]);

    let nom2 = engine.product(&[
        &engine.square(pc),
        &engine.square(&collateral),
        &extra_leverage,
        &premium_factor,
        &debt_scale,
    ]);
    // A zero divisor here is skipped rather than treated as degenerate.
    let nom2 = engine.div(&nom2, pd).unwrap_or(nom2);
    let nom2 = engine.div(&nom2, &coll_scale).unwrap_or(nom2);

    let denom = engine.sub(
        &engine.product(&[pc, &collateral, &premium_factor, &debt_scale]),
        &engine.product(&[pd, &debt, &coll_scale]),
    );

    let Some(flashloan_amount) = engine.div(&engine.add(&nom1, &nom2), &denom) else {
        debug!(
            price_of_collateral = %pc,
            price_of_debt = %pd,
            "Degenerate sizing denominator, passing position through"
        );
        return LeverageResult::passthrough(total_collateral, state.initial_debt_amount.clone());
    };

    let ltv_numerator = engine.add(
        &engine.product(&[pd, &debt, &coll_scale]),
        &engine.product(&[pc, &collateral, &extra_leverage, &premium_factor, &debt_scale]),
    );
    let ltv_denominator = engine.product(&[pc, &collateral, target_leverage, &debt_scale]);
    let ltv = engine
        .div(&ltv_numerator, &ltv_denominator)
        .unwrap_or_else(|| {
            debug!("Zero LTV denominator, reporting zero LTV");
            BigDecimal::zero()
        });

    let collateral_amount = engine.mul(&state.additional_collateral_amount, target_leverage);

    trace!(
        flashloan_amount = %flashloan_amount,
        ltv = %ltv,
        target_leverage = %target_leverage,
        "Sized leverage position"
    );

    LeverageResult {
        debt_amount: DecimalEngine::round_dp(&flashloan_amount, DISPLAY_SCALE),
        collateral_amount: DecimalEngine::round_dp(&collateral_amount, DISPLAY_SCALE),
        flashloan_amount,
        ltv,
    }
}
