//! Value and gain/loss arithmetic for a single holding.
use crate::core::holding::{AssetType, Holding};

/// Percentage reported when no cost basis is known.
pub const UNKNOWN_BASIS_PERCENT: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Valuation {
    pub value: f64,
    pub gain_loss: f64,
    pub percent_gain_loss: f64,
}

/// Values `holding` at `price` per unit.
///
/// Cash never gains or loses. 401k and HSA balances subtract their cost
/// basis as a total, whatever its sign; every other type treats cost basis
/// as per-unit. A holding without a positive cost basis counts as fully
/// gained.
pub fn value_holding(holding: &Holding, price: f64) -> Valuation {
    let value = price * holding.quantity;

    let (gain_loss, percent_gain_loss) = match holding.asset_type {
        AssetType::Cash => (0.0, 0.0),
        AssetType::Retirement401k | AssetType::Hsa => {
            let gain_loss = value - holding.cost_basis.unwrap_or(0.0);
            let percent = match holding.known_cost_basis() {
                Some(basis) => gain_loss / basis * 100.0,
                None => UNKNOWN_BASIS_PERCENT,
            };
            (gain_loss, percent)
        }
        _ => match holding.known_cost_basis() {
            Some(basis) => {
                let invested = basis * holding.quantity;
                let gain_loss = value - invested;
                let percent = if invested > 0.0 {
                    gain_loss / invested * 100.0
                } else {
                    0.0
                };
                (gain_loss, percent)
            }
            None => (value, UNKNOWN_BASIS_PERCENT),
        },
    };

    Valuation {
        value,
        gain_loss,
        percent_gain_loss,
    }
}
