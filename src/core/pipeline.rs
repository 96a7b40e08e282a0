//! The valuation pipeline: validate, price, value and classify each row.
use crate::core::error::ValuationError;
use crate::core::hold_period::{self, DEFAULT_LONG_TERM_HOLD_YEARS, HoldPeriodStatus};
use crate::core::holding::{Holding, RawHolding};
use crate::core::resolver::{PriceResolution, PriceResolver};
use crate::core::valuation::{self, Valuation};
use chrono::NaiveDate;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    pub long_term_hold_years: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            long_term_hold_years: DEFAULT_LONG_TERM_HOLD_YEARS,
        }
    }
}

/// A holding with its resolved price and derived figures.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedHolding {
    pub holding: Holding,
    pub price: f64,
    pub valuation: Valuation,
    pub hold_period: HoldPeriodStatus,
}

/// Result of one pipeline run.
#[derive(Debug, Default)]
pub struct PortfolioReport {
    /// Enriched rows in input order.
    pub holdings: Vec<EnrichedHolding>,
    pub total_value: f64,
    /// Rows left out of the output.
    pub skipped: Vec<ValuationError>,
    /// Rows kept with a zero price or an invalid date.
    pub degraded: Vec<ValuationError>,
}

pub struct Pipeline<'a> {
    resolver: PriceResolver<'a>,
    config: PipelineConfig,
}

impl<'a> Pipeline<'a> {
    pub fn new(resolver: PriceResolver<'a>, config: PipelineConfig) -> Self {
        Self { resolver, config }
    }

    /// Values `rows` one at a time, in order, as of `today`.
    ///
    /// Row-level problems never abort the run; only an input without rows
    /// does. `on_row` is called once per processed row.
    pub async fn run(
        &self,
        rows: Vec<RawHolding>,
        today: NaiveDate,
        on_row: &(dyn Fn()),
    ) -> Result<PortfolioReport, ValuationError> {
        if rows.is_empty() {
            return Err(ValuationError::EmptyInput);
        }
        info!(rows = rows.len(), %today, "Valuing portfolio");

        let mut report = PortfolioReport::default();
        for raw in rows {
            match Holding::try_from(raw) {
                Ok(holding) => {
                    let enriched = self.enrich(holding, today, &mut report.degraded).await;
                    report.total_value += enriched.valuation.value;
                    report.holdings.push(enriched);
                }
                Err(e) => {
                    warn!(error = %e, "Skipping row");
                    report.skipped.push(e);
                }
            }
            on_row();
        }

        info!(
            enriched = report.holdings.len(),
            skipped = report.skipped.len(),
            total_value = report.total_value,
            "Portfolio valued"
        );
        Ok(report)
    }

    async fn enrich(
        &self,
        holding: Holding,
        today: NaiveDate,
        degraded: &mut Vec<ValuationError>,
    ) -> EnrichedHolding {
        let resolution = self
            .resolver
            .resolve(&holding.ticker, holding.asset_type)
            .await;
        let price = resolution.price();
        if let PriceResolution::Unavailable(e) = resolution {
            degraded.push(e);
        }

        let valuation = valuation::value_holding(&holding, price);
        let hold_period = hold_period::classify(
            holding.purchase_date.as_deref(),
            today,
            self.config.long_term_hold_years,
        );
        if hold_period == HoldPeriodStatus::InvalidDate {
            let e = ValuationError::InvalidDateFormat {
                row: holding.row,
                value: holding.purchase_date.clone().unwrap_or_default(),
            };
            warn!(error = %e, "Unreadable purchase date");
            degraded.push(e);
        }

        debug!(
            ticker = %holding.ticker,
            price,
            value = valuation.value,
            gain_loss = valuation.gain_loss,
            hold = %hold_period,
            "Enriched holding"
        );

        EnrichedHolding {
            holding,
            price,
            valuation,
            hold_period,
        }
    }
}
