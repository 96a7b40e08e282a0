//! Holdings as read from the portfolio file.

use crate::core::error::ValuationError;
use std::fmt::Display;
use std::str::FromStr;

/// Kind of asset a holding represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub enum AssetType {
    Cash,
    Retirement401k,
    Hsa,
    Espp,
    Stock,
    Etf,
    Crypto,
}

/// How a holding's unit price is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PricingStrategy {
    /// Tracked in already-valued units, price is always 1.
    FixedUnit,
    /// Latest traded price from a quote provider.
    Quote,
    /// Exchange rate of the ticker against USD.
    ExchangeRate,
}

impl AssetType {
    pub const ALL: [AssetType; 7] = [
        AssetType::Cash,
        AssetType::Retirement401k,
        AssetType::Hsa,
        AssetType::Espp,
        AssetType::Stock,
        AssetType::Etf,
        AssetType::Crypto,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Cash => "cash",
            AssetType::Retirement401k => "401k",
            AssetType::Hsa => "hsa",
            AssetType::Espp => "espp",
            AssetType::Stock => "stock",
            AssetType::Etf => "etf",
            AssetType::Crypto => "crypto",
        }
    }

    pub fn pricing(&self) -> PricingStrategy {
        match self {
            AssetType::Cash | AssetType::Retirement401k | AssetType::Hsa | AssetType::Espp => {
                PricingStrategy::FixedUnit
            }
            AssetType::Stock | AssetType::Etf => PricingStrategy::Quote,
            AssetType::Crypto => PricingStrategy::ExchangeRate,
        }
    }

    /// Account-style holdings whose quantity is a dollar balance and whose
    /// cost basis is a total rather than a per-unit figure.
    pub fn is_account_balance(&self) -> bool {
        matches!(
            self,
            AssetType::Cash | AssetType::Retirement401k | AssetType::Hsa
        )
    }
}

impl Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        AssetType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| s.trim().to_string())
    }
}

/// The cells of one input row relevant to valuation, before validation.
/// `None` marks an absent cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawHolding {
    pub row: usize,
    pub ticker: Option<String>,
    pub asset_type: Option<String>,
    pub quantity: Option<String>,
    pub cost_basis: Option<String>,
    pub purchase_date: Option<String>,
}

/// A validated holding.
#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    /// Zero-based position of the row in the input file.
    pub row: usize,
    pub ticker: String,
    pub asset_type: AssetType,
    pub quantity: f64,
    pub cost_basis: Option<f64>,
    pub purchase_date: Option<String>,
}

impl Holding {
    /// Cost basis if one is known, i.e. present and strictly positive.
    pub fn known_cost_basis(&self) -> Option<f64> {
        self.cost_basis.filter(|cb| *cb > 0.0)
    }
}

impl TryFrom<RawHolding> for Holding {
    type Error = ValuationError;

    fn try_from(raw: RawHolding) -> Result<Self, Self::Error> {
        let row = raw.row;
        let missing = |field| ValuationError::MissingRequiredField { row, field };

        let ticker = raw.ticker.ok_or_else(|| missing("Ticker"))?;
        let asset_type = raw.asset_type.ok_or_else(|| missing("Type"))?;
        let quantity = raw.quantity.ok_or_else(|| missing("Quantity"))?;

        let asset_type = asset_type
            .parse::<AssetType>()
            .map_err(|value| ValuationError::UnsupportedAssetType { row, value })?;

        let quantity = parse_number(&quantity)
            .filter(|q| *q >= 0.0)
            .ok_or_else(|| ValuationError::InvalidQuantity {
                row,
                value: quantity.clone(),
            })?;

        let cost_basis = raw.cost_basis.and_then(|cb| {
            let parsed = parse_number(&cb);
            if parsed.is_none() {
                tracing::warn!(row, cost_basis = %cb, "Ignoring unparseable cost basis");
            }
            parsed
        });

        Ok(Holding {
            row,
            ticker,
            asset_type,
            quantity,
            cost_basis,
            purchase_date: raw.purchase_date,
        })
    }
}

/// Parses a finite decimal number.
pub(crate) fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}
