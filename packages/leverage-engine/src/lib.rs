// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Leverage Engine - flashloan leverage math
//!
//! Exact-decimal calculations behind flashloan-assisted leverage looping on
//! lending protocols: deposit collateral, flash-borrow the debt token, swap
//! it into more collateral, borrow against the larger deposit, repay.
//!
//! # Modules
//!
//! - `decimal`: arbitrary-precision arithmetic with at least 40 significant
//!   digits and total division
//! - `calculator`: max leverage, flashloan sizing, current LTV
//! - `types`: token scale, market parameters, position state, results
//! - `units`: basis points, RAY/WAD ratios, token base units
//! - `dto`: decimal-string request and quote types
//! - `config`: YAML configuration with `${VAR:-default}` interpolation
//!
//! Every calculator is total. Degenerate inputs (zero collateral, zero
//! prices, an LTV ceiling at or above `1 + premium`) return the documented
//! sentinel result rather than an error; only malformed input at the
//! boundary fails.
//!
//! # Logging
//!
//! Diagnostics are emitted through `tracing` under the `leverage_engine`
//! target. The host installs the subscriber; see
//! [`config::LoggingConfig::env_filter`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Leverage calculators.
pub mod calculator;

/// Engine configuration.
pub mod config;

/// Arbitrary-precision decimal engine.
pub mod decimal;

/// Decimal-string transport types.
pub mod dto;

/// Error types.
pub mod error;

/// Calculator value types.
pub mod types;

/// Unit and ratio conversions.
pub mod units;

pub use bigdecimal::BigDecimal;
pub use calculator::{
    LeverageCalculator, compute_current_ltv, compute_leverage_params, compute_max_leverage,
};
pub use config::{Config, ConfigError, EngineConfig, load_config, load_config_from_string};
pub use decimal::{
    DEFAULT_PRECISION, DISPLAY_SCALE, DecimalEngine, MAX_PARSE_SCALE, MAX_PRECISION, MIN_PRECISION,
};
pub use dto::{CurrentLtvRequestDto, LeverageQuoteDto, LeverageRequestDto};
pub use error::LeverageError;
pub use types::{
    LEVERAGE_CEILING, LeverageResult, MarketParams, MaxLeverage, PositionState, TokenScale,
};
