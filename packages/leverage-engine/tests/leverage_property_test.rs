//! Property-based tests for the leverage calculators.
//!
//! Inputs are built from integer mantissas so every generated value is an
//! exact decimal. The f64 reference models are the textbook closed forms in
//! human units; the engine must agree with them to a relative 1e-6.

use leverage_engine::{
    BigDecimal, DecimalEngine, MarketParams, PositionState, TokenScale, compute_current_ltv,
    compute_leverage_params, compute_max_leverage,
};
use num_bigint::BigInt;
use proptest::prelude::*;

fn dec(mantissa: i64, scale: i64) -> BigDecimal {
    BigDecimal::new(BigInt::from(mantissa), scale)
}

fn f(value: &BigDecimal) -> f64 {
    DecimalEngine::to_f64(value).expect("value should fit in f64")
}

fn within(actual: f64, expected: f64, magnitude: f64) -> bool {
    (actual - expected).abs() <= 1e-6 * magnitude.abs().max(1.0)
}

/// Strategies for generating calculator inputs.
mod strategies {
    use super::*;

    /// Human-readable amount in `[0.01, 10_000]`.
    pub fn amount() -> impl Strategy<Value = BigDecimal> {
        (1i64..=1_000_000).prop_map(|m| dec(m, 2))
    }

    /// Price in `[0.0001, 5_000]`.
    pub fn price() -> impl Strategy<Value = BigDecimal> {
        (1i64..=50_000_000).prop_map(|m| dec(m, 4))
    }

    /// Flashloan premium between zero and 1%.
    pub fn premium() -> impl Strategy<Value = BigDecimal> {
        (0i64..=100).prop_map(|bps| dec(bps, 4))
    }

    /// LTV ceiling between 1% and 95%.
    pub fn max_ltv() -> impl Strategy<Value = BigDecimal> {
        (1i64..=95).prop_map(|pct| dec(pct, 2))
    }

    /// Token decimals seen in practice.
    pub fn decimals() -> impl Strategy<Value = u32> {
        prop_oneof![Just(6u32), Just(8u32), Just(18u32)]
    }

    /// Target leverage in `[1, 25]`.
    pub fn target() -> impl Strategy<Value = BigDecimal> {
        (100i64..=2_500).prop_map(|m| dec(m, 2))
    }
}

fn reference_max_leverage(ctot: f64, d0: f64, pc: f64, pd: f64, fl: f64, l: f64) -> f64 {
    if ctot == 0.0 {
        return 1.0;
    }
    let denominator = pc * pc * (1.0 + fl - l);
    if denominator == 0.0 {
        return 1.0;
    }
    let raw = (pc * pc * (1.0 + fl) - pd * pd * d0 / ctot) / denominator;
    if raw <= 1.0 { 1.0 } else { raw.min(25.0) }
}

proptest! {
    #[test]
    fn test_max_leverage_is_bounded(
        initial in strategies::amount(),
        debt in strategies::amount(),
        additional in strategies::amount(),
        pc in strategies::price(),
        pd in strategies::price(),
        fl in strategies::premium(),
        l in strategies::max_ltv(),
        cd in strategies::decimals(),
        dd in strategies::decimals(),
    ) {
        let state = PositionState {
            initial_collateral_amount: initial,
            initial_debt_amount: debt,
            additional_collateral_amount: additional,
        };
        let market = MarketParams {
            price_of_collateral: pc,
            price_of_debt: pd,
            flashloan_premium: fl,
            max_ltv: l,
        };
        let scale = TokenScale::new(cd, dd).expect("should build token scale");

        let max = compute_max_leverage(&state, &scale, &market);
        prop_assert!(max.value() >= &BigDecimal::from(1));
        prop_assert!(max.value() <= &BigDecimal::from(25));
    }

    #[test]
    fn test_max_leverage_grows_with_ltv_ceiling(
        collateral in strategies::amount(),
        debt in strategies::amount(),
        pc in strategies::price(),
        fl in strategies::premium(),
        low in 1i64..=94,
        step in 1i64..=10,
    ) {
        let high = (low + step).min(95);
        let state = PositionState {
            initial_debt_amount: debt,
            additional_collateral_amount: collateral,
            ..PositionState::default()
        };
        let market = |l: i64| MarketParams {
            price_of_collateral: pc.clone(),
            price_of_debt: pc.clone(),
            flashloan_premium: fl.clone(),
            max_ltv: dec(l, 2),
        };
        let scale = TokenScale::new(18, 6).expect("should build token scale");

        let at_low = compute_max_leverage(&state, &scale, &market(low));
        let at_high = compute_max_leverage(&state, &scale, &market(high));
        prop_assert!(at_low <= at_high, "{at_low} > {at_high}");
    }

    #[test]
    fn test_max_leverage_shrinks_with_premium(
        collateral in strategies::amount(),
        debt in strategies::amount(),
        pc in strategies::price(),
        pd in strategies::price(),
        l in strategies::max_ltv(),
        low in 0i64..=90,
        step in 1i64..=10,
    ) {
        let state = PositionState {
            initial_debt_amount: debt,
            additional_collateral_amount: collateral,
            ..PositionState::default()
        };
        let market = |bps: i64| MarketParams {
            price_of_collateral: pc.clone(),
            price_of_debt: pd.clone(),
            flashloan_premium: dec(bps, 4),
            max_ltv: l.clone(),
        };
        let scale = TokenScale::new(8, 6).expect("should build token scale");

        let cheap = compute_max_leverage(&state, &scale, &market(low));
        let dear = compute_max_leverage(&state, &scale, &market(low + step));
        prop_assert!(dear <= cheap, "{dear} > {cheap}");
    }

    #[test]
    fn test_current_ltv_ignores_price_unit(
        collateral in strategies::amount(),
        debt in strategies::amount(),
        pc in strategies::price(),
        pd in strategies::price(),
        factor in 1i64..=1_000,
    ) {
        let k = dec(factor, 1);
        let base = compute_current_ltv(&collateral, &debt, &pc, &pd);
        let scaled = compute_current_ltv(&collateral, &debt, &(&pc * &k), &(&pd * &k));
        let gap = (&base - &scaled).abs();
        prop_assert!(gap <= dec(1, 30), "{base} vs {scaled}");
    }

    #[test]
    fn test_current_ltv_matches_reference(
        collateral in strategies::amount(),
        debt in strategies::amount(),
        pc in strategies::price(),
        pd in strategies::price(),
    ) {
        let actual = f(&compute_current_ltv(&collateral, &debt, &pc, &pd));
        let expected = f(&debt) * f(&pd) / (f(&collateral) * f(&pc));
        prop_assert!(within(actual, expected, expected), "{actual} vs {expected}");
    }

    #[test]
    fn test_max_leverage_matches_reference(
        collateral in strategies::amount(),
        debt in strategies::amount(),
        pc in strategies::price(),
        pd in strategies::price(),
        fl in strategies::premium(),
        l in strategies::max_ltv(),
    ) {
        let state = PositionState {
            initial_debt_amount: debt.clone(),
            additional_collateral_amount: collateral.clone(),
            ..PositionState::default()
        };
        let market = MarketParams {
            price_of_collateral: pc.clone(),
            price_of_debt: pd.clone(),
            flashloan_premium: fl.clone(),
            max_ltv: l.clone(),
        };
        let scale = TokenScale::new(18, 6).expect("should build token scale");

        let actual = f(compute_max_leverage(&state, &scale, &market).value());
        let expected = reference_max_leverage(f(&collateral), f(&debt), f(&pc), f(&pd), f(&fl), f(&l));
        prop_assert!(within(actual, expected, expected), "{actual} vs {expected}");
    }

    #[test]
    fn test_flashloan_matches_reference(
        initial in strategies::amount(),
        debt_mantissa in 0i64..=100_000,
        additional in strategies::amount(),
        pc in strategies::price(),
        pd in strategies::price(),
        fl in strategies::premium(),
        target in strategies::target(),
        cd in strategies::decimals(),
        dd in strategies::decimals(),
    ) {
        let (ctot, pcf, pdf, flf, tl) = (
            f(&initial) + f(&additional),
            f(&pc),
            f(&pd),
            f(&fl),
            f(&target),
        );
        // Keep existing debt well below the collateral value.
        let debt = dec(debt_mantissa, 2);
        let d0 = f(&debt);
        prop_assume!(pdf * d0 < 0.5 * pcf * ctot);

        let state = PositionState {
            initial_collateral_amount: initial,
            initial_debt_amount: debt,
            additional_collateral_amount: additional.clone(),
        };
        let market = MarketParams {
            price_of_collateral: pc,
            price_of_debt: pd,
            flashloan_premium: fl,
            max_ltv: dec(8, 1),
        };
        let scale = TokenScale::new(cd, dd).expect("should build token scale");
        let sized = compute_leverage_params(&state, &scale, &market, &target);

        let nom1 = (pcf - pdf * tl) * d0 * ctot;
        let nom2 = pcf * pcf * ctot * ctot * (tl - 1.0) * (1.0 + flf) / pdf;
        let denom = pcf * ctot * (1.0 + flf) - pdf * d0;
        let expected = (nom1 + nom2) / denom;
        let magnitude = (nom1.abs() + nom2.abs()) / denom;
        let actual = f(&sized.flashloan_amount);
        prop_assert!(within(actual, expected, magnitude), "{actual} vs {expected}");

        let expected_ltv = (pdf * d0 + pcf * ctot * (tl - 1.0) * (1.0 + flf)) / (pcf * ctot * tl);
        prop_assert!(within(f(&sized.ltv), expected_ltv, expected_ltv));

        let leg = f(&additional) * tl;
        prop_assert!(within(f(&sized.collateral_amount), leg, leg));
    }
}
