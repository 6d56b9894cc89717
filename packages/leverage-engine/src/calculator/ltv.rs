//! Loan-to-value of an open position.

use bigdecimal::BigDecimal;
use num_traits::Zero;
use tracing::debug;

use crate::decimal::DecimalEngine;

/// `debt * pd / (collateral * pc)`, or zero without collateral value.
///
/// Both amounts are human-readable, so token decimals cancel out and are not
/// taken as parameters.
pub(crate) fn current_ltv(
    engine: &DecimalEngine,
    collateral_amount: &BigDecimal,
    debt_amount: &BigDecimal,
    price_of_collateral: &BigDecimal,
    price_of_debt: &BigDecimal,
) -> BigDecimal {
    let zero = BigDecimal::zero();
    if *collateral_amount <= zero || *price_of_collateral <= zero {
        debug!("No collateral value, reporting zero LTV");
        return zero;
    }

    let debt_value = engine.mul(debt_amount, price_of_debt);
    let collateral_value = engine.mul(collateral_amount, price_of_collateral);
    engine.div(&debt_value, &collateral_value).unwrap_or(zero)
}
