//! Row-level and run-level valuation errors.

use thiserror::Error;

/// Irregularities met while valuing a portfolio.
///
/// Only [`ValuationError::EmptyInput`] stops a run. The row variants are
/// collected into the run report: some drop the row, the others leave it
/// enriched with degraded values (see [`ValuationError::skips_row`]).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValuationError {
    /// Ticker, type or quantity is absent.
    #[error("Row {row}: missing required field '{field}'")]
    MissingRequiredField { row: usize, field: &'static str },

    #[error("Row {row}: unsupported asset type '{value}'")]
    UnsupportedAssetType { row: usize, value: String },

    /// Quantity is not a non-negative number.
    #[error("Row {row}: invalid quantity '{value}'")]
    InvalidQuantity { row: usize, value: String },

    /// The quote provider failed; the row is valued at price 0.
    #[error("Price unavailable for {ticker}: {reason}")]
    PriceUnavailable { ticker: String, reason: String },

    #[error("Row {row}: invalid purchase date '{value}', expected YYYY-MM-DD")]
    InvalidDateFormat { row: usize, value: String },

    #[error("Portfolio is empty, check your CSV file")]
    EmptyInput,
}

impl ValuationError {
    /// Whether this error removes the row from the output and the total.
    pub fn skips_row(&self) -> bool {
        matches!(
            self,
            ValuationError::MissingRequiredField { .. }
                | ValuationError::UnsupportedAssetType { .. }
                | ValuationError::InvalidQuantity { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skipping_and_degrading_variants() {
        let missing = ValuationError::MissingRequiredField {
            row: 3,
            field: "Quantity",
        };
        assert!(missing.skips_row());
        assert_eq!(missing.to_string(), "Row 3: missing required field 'Quantity'");

        let unavailable = ValuationError::PriceUnavailable {
            ticker: "AAPL".to_string(),
            reason: "HTTP 500".to_string(),
        };
        assert!(!unavailable.skips_row());

        let bad_date = ValuationError::InvalidDateFormat {
            row: 1,
            value: "yesterday".to_string(),
        };
        assert!(!bad_date.skips_row());
    }
}
