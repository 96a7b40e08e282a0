//! Aggregations over enriched holdings for the portfolio summary.
use crate::core::hold_period::HoldPeriodStatus;
use crate::core::holding::AssetType;
use crate::core::pipeline::EnrichedHolding;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Share of the portfolio held in one asset type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAllocation {
    pub asset_type: AssetType,
    pub value: f64,
    pub weight: f64,
}

/// Gain direction combined with holding period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GainTone {
    PositiveLong,
    PositiveShort,
    NegativeShort,
    NegativeLong,
    Undated,
}

/// Holdings that carry value; zero-valued rows (e.g. a failed quote) are
/// left out of every summary.
pub fn valued(holdings: &[EnrichedHolding]) -> Vec<&EnrichedHolding> {
    holdings.iter().filter(|h| h.valuation.value > 0.0).collect()
}

pub fn total_value(holdings: &[EnrichedHolding]) -> f64 {
    valued(holdings).iter().map(|h| h.valuation.value).sum()
}

/// Value per asset type, largest first.
pub fn allocation_by_type(holdings: &[EnrichedHolding]) -> Vec<TypeAllocation> {
    let mut by_type: BTreeMap<AssetType, f64> = BTreeMap::new();
    for h in valued(holdings) {
        *by_type.entry(h.holding.asset_type).or_default() += h.valuation.value;
    }
    let total: f64 = by_type.values().sum();

    let mut allocation: Vec<TypeAllocation> = by_type
        .into_iter()
        .map(|(asset_type, value)| TypeAllocation {
            asset_type,
            value,
            weight: if total > 0.0 { value / total * 100.0 } else { 0.0 },
        })
        .collect();
    allocation.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(Ordering::Equal));
    allocation
}

/// Valued holdings ordered by percentage gain, best first.
pub fn ranked_by_gain(holdings: &[EnrichedHolding]) -> Vec<&EnrichedHolding> {
    let mut ranked = valued(holdings);
    ranked.sort_by(|a, b| {
        b.valuation
            .percent_gain_loss
            .partial_cmp(&a.valuation.percent_gain_loss)
            .unwrap_or(Ordering::Equal)
    });
    ranked
}

/// Display name: the ticker, or the account type for balance-style holdings.
pub fn display_label(h: &EnrichedHolding) -> String {
    if h.holding.asset_type.is_account_balance() {
        h.holding.asset_type.as_str().to_uppercase()
    } else {
        h.holding.ticker.to_uppercase()
    }
}

/// Money put into the holding: the cost basis itself for account balances,
/// per-unit basis times quantity otherwise.
pub fn invested(h: &EnrichedHolding) -> f64 {
    let basis = h.holding.cost_basis.unwrap_or(0.0);
    if h.holding.asset_type.is_account_balance() {
        basis
    } else {
        basis * h.holding.quantity
    }
}

pub fn gain_tone(h: &EnrichedHolding) -> GainTone {
    let gained = h.valuation.percent_gain_loss > 0.0;
    match (h.hold_period, gained) {
        (HoldPeriodStatus::LongTerm, true) => GainTone::PositiveLong,
        (HoldPeriodStatus::ShortTerm, true) => GainTone::PositiveShort,
        (HoldPeriodStatus::ShortTerm, false) => GainTone::NegativeShort,
        (HoldPeriodStatus::LongTerm, false) => GainTone::NegativeLong,
        _ => GainTone::Undated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::holding::Holding;
    use crate::core::valuation::Valuation;

    fn enriched(
        ticker: &str,
        asset_type: AssetType,
        quantity: f64,
        cost_basis: Option<f64>,
        value: f64,
        percent: f64,
        hold_period: HoldPeriodStatus,
    ) -> EnrichedHolding {
        EnrichedHolding {
            holding: Holding {
                row: 0,
                ticker: ticker.to_string(),
                asset_type,
                quantity,
                cost_basis,
                purchase_date: None,
            },
            price: 0.0,
            valuation: Valuation {
                value,
                gain_loss: 0.0,
                percent_gain_loss: percent,
            },
            hold_period,
        }
    }

    fn sample() -> Vec<EnrichedHolding> {
        vec![
            enriched("aapl", AssetType::Stock, 10.0, Some(150.0), 1800.0, 20.0, HoldPeriodStatus::LongTerm),
            enriched("msft", AssetType::Stock, 2.0, None, 800.0, 100.0, HoldPeriodStatus::ShortTerm),
            enriched("savings", AssetType::Cash, 2400.0, None, 2400.0, 0.0, HoldPeriodStatus::NoDate),
            enriched("nope", AssetType::Etf, 3.0, Some(50.0), 0.0, -100.0, HoldPeriodStatus::ShortTerm),
        ]
    }

    #[test]
    fn test_allocation_by_type_ignores_zero_values() {
        let holdings = sample();
        let allocation = allocation_by_type(&holdings);
        assert_eq!(allocation.len(), 2);
        assert_eq!(allocation[0].asset_type, AssetType::Stock);
        assert_eq!(allocation[0].value, 2600.0);
        assert_eq!(allocation[0].weight, 52.0);
        assert_eq!(allocation[1].asset_type, AssetType::Cash);
        assert_eq!(allocation[1].weight, 48.0);
        assert_eq!(total_value(&holdings), 5000.0);
    }

    #[test]
    fn test_ranked_by_gain() {
        let holdings = sample();
        let ranked: Vec<String> = ranked_by_gain(&holdings).iter().map(|h| display_label(h)).collect();
        assert_eq!(ranked, vec!["MSFT", "AAPL", "CASH"]);
    }

    #[test]
    fn test_invested_amount() {
        let holdings = sample();
        assert_eq!(invested(&holdings[0]), 1500.0);
        assert_eq!(invested(&holdings[1]), 0.0);
        let hsa = enriched("h", AssetType::Hsa, 900.0, Some(700.0), 900.0, 28.0, HoldPeriodStatus::NoDate);
        assert_eq!(invested(&hsa), 700.0);
    }

    #[test]
    fn test_gain_tone() {
        let holdings = sample();
        assert_eq!(gain_tone(&holdings[0]), GainTone::PositiveLong);
        assert_eq!(gain_tone(&holdings[1]), GainTone::PositiveShort);
        assert_eq!(gain_tone(&holdings[2]), GainTone::Undated);
        assert_eq!(gain_tone(&holdings[3]), GainTone::NegativeShort);
    }
}
