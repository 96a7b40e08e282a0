//! Unit price resolution by asset type.

use crate::core::currency::{CurrencyRateProvider, QUOTE_CURRENCY};
use crate::core::error::ValuationError;
use crate::core::holding::{AssetType, PricingStrategy};
use crate::core::price::PriceProvider;
use tracing::{debug, warn};

/// Outcome of resolving one holding's unit price.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceResolution {
    /// Fixed-unit asset, no provider consulted.
    Fixed,
    Quoted(f64),
    /// The provider failed; carries a `PriceUnavailable` error.
    Unavailable(ValuationError),
}

impl PriceResolution {
    /// Unit price to value the holding at. Unavailable prices count as 0.
    pub fn price(&self) -> f64 {
        match self {
            PriceResolution::Fixed => 1.0,
            PriceResolution::Quoted(price) => *price,
            PriceResolution::Unavailable(_) => 0.0,
        }
    }
}

/// Dispatches price lookups to the quote or exchange-rate provider.
pub struct PriceResolver<'a> {
    quotes: &'a (dyn PriceProvider + Send + Sync),
    rates: &'a (dyn CurrencyRateProvider + Send + Sync),
}

impl<'a> PriceResolver<'a> {
    pub fn new(
        quotes: &'a (dyn PriceProvider + Send + Sync),
        rates: &'a (dyn CurrencyRateProvider + Send + Sync),
    ) -> Self {
        Self { quotes, rates }
    }

    /// Resolves the unit price of `ticker`. Provider failures never escape:
    /// they become [`PriceResolution::Unavailable`].
    pub async fn resolve(&self, ticker: &str, asset_type: AssetType) -> PriceResolution {
        let fetched = match asset_type.pricing() {
            PricingStrategy::FixedUnit => return PriceResolution::Fixed,
            PricingStrategy::Quote => self.quotes.fetch_price(ticker).await.map(|quote| {
                debug!(
                    ticker,
                    price = quote.price,
                    trading_day = ?quote.latest_trading_day,
                    "Resolved quote"
                );
                quote.price
            }),
            PricingStrategy::ExchangeRate => {
                self.rates
                    .get_rate(&ticker.to_uppercase(), QUOTE_CURRENCY)
                    .await
            }
        };

        match fetched {
            Ok(price) => PriceResolution::Quoted(price),
            Err(e) => {
                warn!(ticker, %asset_type, error = %e, "Error fetching price");
                PriceResolution::Unavailable(ValuationError::PriceUnavailable {
                    ticker: ticker.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }
}
