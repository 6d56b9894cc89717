//! Error types for the leverage engine.
//!
//! The calculators themselves are total and never fail. These errors come
//! from the edges: building a [`DecimalEngine`](crate::DecimalEngine),
//! parsing decimal strings handed over by collaborators, and validating
//! market or position inputs on request.

use thiserror::Error;

/// Errors raised while constructing or validating engine inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeverageError {
    /// A decimal string could not be parsed.
    #[error("Invalid decimal for '{field}': {value:?}")]
    InvalidDecimal {
        /// Name of the input field.
        field: &'static str,
        /// The rejected text.
        value: String,
    },

    /// A value that must be non-negative was negative.
    #[error("'{field}' cannot be negative: {value}")]
    NegativeValue {
        /// Name of the input field.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The protocol LTV ceiling is outside `[0, 1)`.
    #[error("max LTV must be within [0, 1): {value}")]
    LtvOutOfRange {
        /// The rejected value.
        value: String,
    },

    /// A token decimal count is outside the supported range.
    #[error("'{field}' must be within 0..={max}: {value}")]
    TokenDecimalsOutOfRange {
        /// Name of the input field.
        field: &'static str,
        /// The rejected decimal count.
        value: u32,
        /// Largest supported decimal count.
        max: u32,
    },

    /// The requested working precision is unsupported.
    #[error("precision {precision} outside supported range [{min}, {max}]")]
    InvalidPrecision {
        /// The requested number of significant digits.
        precision: u64,
        /// Smallest supported precision.
        min: u64,
        /// Largest supported precision.
        max: u64,
    },

    /// A target leverage below zero was requested.
    #[error("target leverage cannot be negative: {value}")]
    InvalidTargetLeverage {
        /// The rejected value.
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_field() {
        let err = LeverageError::InvalidDecimal {
            field: "price_of_debt",
            value: "1,0".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid decimal for 'price_of_debt': \"1,0\"");

        let err = LeverageError::TokenDecimalsOutOfRange {
            field: "debt_decimals",
            value: 31,
            max: 30,
        };
        assert_eq!(err.to_string(), "'debt_decimals' must be within 0..=30: 31");
    }
}
