use super::ui;
use crate::core::ledger::HoldingsTable;
use crate::core::{
    CurrencyRateProvider, Pipeline, PipelineConfig, PortfolioReport, PriceProvider, PriceResolver,
    ValuationError,
};
use anyhow::Result;
use chrono::NaiveDate;
use std::path::Path;
use tracing::{info, warn};

/// Values the portfolio at `input` and writes the enriched copy to `output`.
///
/// An input without rows is reported and leaves `output` untouched; that
/// case returns `Ok(None)`.
pub async fn run(
    input: &Path,
    output: &Path,
    quote_provider: &(dyn PriceProvider + Send + Sync),
    rate_provider: &(dyn CurrencyRateProvider + Send + Sync),
    config: PipelineConfig,
    today: NaiveDate,
) -> Result<Option<PortfolioReport>> {
    let table = HoldingsTable::read_from_path(input)?;
    let pipeline = Pipeline::new(PriceResolver::new(quote_provider, rate_provider), config);

    let pb = ui::new_progress_bar(table.len() as u64, true);
    pb.set_message("Valuing holdings...");
    let result = pipeline
        .run(table.raw_holdings(), today, &|| pb.inc(1))
        .await;
    pb.finish_and_clear();

    let report = match result {
        Ok(report) => report,
        Err(ValuationError::EmptyInput) => {
            warn!(input = %input.display(), "Portfolio is empty, no output written");
            eprintln!(
                "{}",
                ui::style_text(
                    &format!("Portfolio is empty. Check your CSV file: {}", input.display()),
                    ui::StyleType::Warning
                )
            );
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    table.write_enriched_to_path(&report, output)?;
    info!(output = %output.display(), "Portfolio saved");

    println!("{}", display_report(&report, output));
    Ok(Some(report))
}

fn display_report(report: &PortfolioReport, output: &Path) -> String {
    let mut out = format!(
        "{}\n\nEnriched {} holding(s) into {}\n",
        ui::style_text("Portfolio valuation", ui::StyleType::Title),
        report.holdings.len(),
        output.display()
    );

    for (label, issues, style_type) in [
        ("Skipped", &report.skipped, ui::StyleType::Error),
        ("Degraded", &report.degraded, ui::StyleType::Warning),
    ] {
        if issues.is_empty() {
            continue;
        }
        out.push_str(&format!("\n{label}:\n"));
        for issue in issues {
            out.push_str(&format!(
                "  {}\n",
                ui::style_text(&issue.to_string(), style_type)
            ));
        }
    }

    out.push_str(&format!(
        "\nTotal Value: {}",
        ui::style_text(
            &ui::format_dollars(report.total_value),
            ui::StyleType::TotalValue
        )
    ));
    out
}
