//! Exchange rate abstractions

use anyhow::Result;
use async_trait::async_trait;

/// Currency every price is expressed in.
pub const QUOTE_CURRENCY: &str = "USD";

#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64>;
}
