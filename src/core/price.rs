//! Quote abstractions and core types

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceResult {
    pub price: f64,
    pub latest_trading_day: Option<NaiveDate>,
}

#[async_trait]
pub trait PriceProvider: Send + Sync {
    async fn fetch_price(&self, symbol: &str) -> Result<PriceResult>;
}
