use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::core::cache::Cache;
use crate::core::config::AlphaVantageConfig;
use crate::core::currency::CurrencyRateProvider;
use crate::core::price::{PriceProvider, PriceResult};
use crate::providers::util::with_retry;

const RETRY_DELAY_MS: u64 = 500;

/// Fields Alpha Vantage returns instead of data when a call is rejected.
#[derive(Deserialize, Debug, Default)]
struct ApiNotice {
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

impl ApiNotice {
    fn check(&self) -> Result<()> {
        if let Some(msg) = self
            .error_message
            .as_ref()
            .or(self.note.as_ref())
            .or(self.information.as_ref())
        {
            return Err(anyhow!("Alpha Vantage API error: {}", msg));
        }
        Ok(())
    }
}

/// HTTP plumbing shared by the quote and exchange-rate providers.
#[derive(Clone)]
struct AlphaVantageClient {
    base_url: String,
    api_key: Option<String>,
    retries: usize,
    timeout: Duration,
}

impl AlphaVantageClient {
    fn new(config: &AlphaVantageConfig, api_key: Option<String>) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            retries: config.retries,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Calls the `query` endpoint and returns the body of a successful response.
    async fn query(&self, params: &[(&str, &str)]) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("Alpha Vantage API key is not configured"))?;

        let mut all_params = params.to_vec();
        all_params.push(("apikey", api_key));
        let url = reqwest::Url::parse_with_params(&format!("{}/query", self.base_url), &all_params)
            .context("Failed to build Alpha Vantage URL")?;
        debug!(
            "Requesting {}",
            url.as_str().replace(api_key, "***")
        );

        let client = reqwest::Client::builder()
            .user_agent("finboard/1.0")
            .timeout(self.timeout)
            .build()?;
        let response = with_retry(
            || async { client.get(url.clone()).send().await },
            self.retries,
            RETRY_DELAY_MS,
        )
        .await
        .map_err(|e| anyhow!("Request error: {}", e))?;

        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: {}", response.status()));
        }

        Ok(response.text().await?)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|p| p.is_finite() && *p > 0.0)
}

/// Latest traded prices from the `GLOBAL_QUOTE` function.
pub struct AlphaVantageQuoteProvider {
    client: AlphaVantageClient,
    cache: Arc<Cache<String, PriceResult>>,
}

impl AlphaVantageQuoteProvider {
    pub fn new(
        config: &AlphaVantageConfig,
        api_key: Option<String>,
        cache: Arc<Cache<String, PriceResult>>,
    ) -> Self {
        AlphaVantageQuoteProvider {
            client: AlphaVantageClient::new(config, api_key),
            cache,
        }
    }
}

#[derive(Deserialize, Debug)]
struct GlobalQuoteResponse {
    #[serde(rename = "Global Quote")]
    global_quote: Option<GlobalQuote>,
    #[serde(flatten)]
    notice: ApiNotice,
}

#[derive(Deserialize, Debug)]
struct GlobalQuote {
    #[serde(rename = "05. price")]
    price: Option<String>,
    #[serde(rename = "07. latest trading day")]
    latest_trading_day: Option<String>,
}

#[async_trait]
impl PriceProvider for AlphaVantageQuoteProvider {
    #[instrument(
        name = "AlphaVantageQuoteFetch",
        skip(self),
        fields(symbol = %symbol)
    )]
    async fn fetch_price(&self, symbol: &str) -> Result<PriceResult> {
        let key = symbol.to_string();
        if let Some(cached) = self.cache.get(&key).await {
            return Ok(cached);
        }

        let body = self
            .client
            .query(&[("function", "GLOBAL_QUOTE"), ("symbol", symbol)])
            .await?;
        let data: GlobalQuoteResponse = serde_json::from_str(&body)
            .map_err(|e| anyhow!("Failed to parse quote response for {}: {}", symbol, e))?;
        data.notice.check()?;

        let quote = data
            .global_quote
            .ok_or_else(|| anyhow!("No quote data found for symbol: {}", symbol))?;
        let price = parse_positive(quote.price.as_deref())
            .ok_or_else(|| anyhow!("No price in quote response for symbol: {}", symbol))?;
        let latest_trading_day = quote.latest_trading_day.and_then(|d| {
            NaiveDate::parse_from_str(&d, "%Y-%m-%d")
                .inspect_err(|e| warn!("Unreadable trading day '{}': {}", d, e))
                .ok()
        });

        let result = PriceResult {
            price,
            latest_trading_day,
        };
        self.cache.put(key, result.clone()).await;
        Ok(result)
    }
}

/// Currency and crypto rates from the `CURRENCY_EXCHANGE_RATE` function.
pub struct AlphaVantageRateProvider {
    client: AlphaVantageClient,
    cache: Arc<Cache<String, f64>>,
}

impl AlphaVantageRateProvider {
    pub fn new(
        config: &AlphaVantageConfig,
        api_key: Option<String>,
        cache: Arc<Cache<String, f64>>,
    ) -> Self {
        AlphaVantageRateProvider {
            client: AlphaVantageClient::new(config, api_key),
            cache,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExchangeRateResponse {
    #[serde(rename = "Realtime Currency Exchange Rate")]
    rate: Option<ExchangeRate>,
    #[serde(flatten)]
    notice: ApiNotice,
}

#[derive(Debug, Deserialize)]
struct ExchangeRate {
    #[serde(rename = "5. Exchange Rate")]
    exchange_rate: Option<String>,
}

#[async_trait]
impl CurrencyRateProvider for AlphaVantageRateProvider {
    #[instrument(name = "AlphaVantageRateFetch", skip(self))]
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64> {
        let pair = format!("{from}/{to}");
        if let Some(cached) = self.cache.get(&pair).await {
            return Ok(cached);
        }

        let body = self
            .client
            .query(&[
                ("function", "CURRENCY_EXCHANGE_RATE"),
                ("from_currency", from),
                ("to_currency", to),
            ])
            .await?;
        let data: ExchangeRateResponse = serde_json::from_str(&body)
            .map_err(|e| anyhow!("Failed to parse JSON response for {}: {}", pair, e))?;
        data.notice.check()?;

        let rate = data
            .rate
            .and_then(|r| parse_positive(r.exchange_rate.as_deref()))
            .ok_or_else(|| anyhow!("No rate data found for currency pair: {}", pair))?;

        self.cache.put(pair, rate).await;
        Ok(rate)
    }
}
