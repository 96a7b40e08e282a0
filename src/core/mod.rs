//! Core valuation logic and abstractions

pub mod analytics;
pub mod budget;
pub mod cache;
pub mod config;
pub mod currency;
pub mod error;
pub mod hold_period;
pub mod holding;
pub mod ledger;
pub mod log;
pub mod pipeline;
pub mod price;
pub mod resolver;
pub mod valuation;

// Re-export main types for cleaner imports
pub use currency::CurrencyRateProvider;
pub use error::ValuationError;
pub use holding::{AssetType, Holding};
pub use pipeline::{EnrichedHolding, Pipeline, PipelineConfig, PortfolioReport};
pub use price::{PriceProvider, PriceResult};
pub use resolver::{PriceResolution, PriceResolver};
