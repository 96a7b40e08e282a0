use super::ui;
use crate::core::EnrichedHolding;
use crate::core::analytics;
use crate::core::ledger::HoldingsTable;
use anyhow::Result;
use comfy_table::Cell;
use std::path::Path;

/// Prints the summary of an enriched portfolio file.
pub fn run(enriched_path: &Path, show_dollar: bool) -> Result<()> {
    let table = HoldingsTable::read_from_path(enriched_path)?;
    let holdings = table.enriched_holdings()?;

    if analytics::valued(&holdings).is_empty() {
        println!(
            "{}",
            ui::style_text(
                "No valued holdings to summarize.",
                ui::StyleType::Warning
            )
        );
        return Ok(());
    }

    println!("{}", display_holdings(&holdings, show_dollar));
    ui::print_separator();
    println!("{}", display_allocation(&holdings, show_dollar));
    Ok(())
}

/// Holdings ranked by percentage gain.
pub fn display_holdings(holdings: &[EnrichedHolding], show_dollar: bool) -> String {
    let mut table = ui::new_styled_table();

    let mut header = vec![ui::header_cell("Holding"), ui::header_cell("Type")];
    if show_dollar {
        header.extend([
            ui::header_cell("Invested"),
            ui::header_cell("Value"),
            ui::header_cell("Gain/Loss"),
        ]);
    }
    header.extend([ui::header_cell("Gain (%)"), ui::header_cell("Held")]);
    table.set_header(header);

    for h in analytics::ranked_by_gain(holdings) {
        let mut row = vec![
            Cell::new(analytics::display_label(h)),
            Cell::new(h.holding.asset_type.as_str().to_uppercase()),
        ];
        if show_dollar {
            row.extend([
                ui::number_cell(ui::format_dollars(analytics::invested(h))),
                ui::number_cell(ui::format_dollars(h.valuation.value)),
                ui::number_cell(ui::format_dollars(h.valuation.gain_loss)),
            ]);
        }
        row.extend([
            ui::gain_cell(
                format!("{:.1}%", h.valuation.percent_gain_loss),
                analytics::gain_tone(h),
            ),
            Cell::new(h.hold_period.to_string()),
        ]);
        table.add_row(row);
    }

    format!(
        "{}\n\n{}",
        ui::style_text("Gain/Loss", ui::StyleType::Title),
        table
    )
}

/// Value split by asset type, with the portfolio total.
pub fn display_allocation(holdings: &[EnrichedHolding], show_dollar: bool) -> String {
    let mut table = ui::new_styled_table();
    let mut header = vec![ui::header_cell("Type")];
    if show_dollar {
        header.push(ui::header_cell("Value"));
    }
    header.push(ui::header_cell("Weight (%)"));
    table.set_header(header);

    for allocation in analytics::allocation_by_type(holdings) {
        let mut row = vec![Cell::new(allocation.asset_type.as_str().to_uppercase())];
        if show_dollar {
            row.push(ui::number_cell(ui::format_dollars(allocation.value)));
        }
        row.push(ui::number_cell(format!("{:.1}%", allocation.weight)));
        table.add_row(row);
    }

    let mut output = format!(
        "{}\n\n{}",
        ui::style_text("Distribution", ui::StyleType::Title),
        table
    );
    if show_dollar {
        output.push_str(&format!(
            "\n\n{}: {}",
            ui::style_text("Total Portfolio Value", ui::StyleType::TotalLabel),
            ui::style_text(
                &ui::format_dollars(analytics::total_value(holdings)),
                ui::StyleType::TotalValue
            )
        ));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const ENRICHED: &str = "\
Ticker,Type,Quantity,Cost Basis,Current Price,Value,Gain/Loss,% Gain/Loss,Long-Term Hold
aapl,stock,10,150,180,1800,300,20,Green
hsa,hsa,700,500,1,700,200,40,No Date
zero,etf,1,,0,0,0,100,Red
";

    fn holdings() -> Vec<EnrichedHolding> {
        HoldingsTable::from_reader(ENRICHED.as_bytes())
            .unwrap()
            .enriched_holdings()
            .unwrap()
    }

    #[test]
    fn test_holdings_table_with_dollars() {
        let output = console::strip_ansi_codes(&display_holdings(&holdings(), true)).to_string();
        assert!(output.contains("AAPL"));
        assert!(output.contains("HSA"));
        assert!(output.contains("$1,500.00"));
        assert!(output.contains("$1,800.00"));
        assert!(output.contains("20.0%"));
        assert!(!output.contains("ZERO"));
        // Ranked by percentage gain
        assert!(output.find("HSA").unwrap() < output.find("AAPL").unwrap());
    }

    #[test]
    fn test_hiding_dollars() {
        let output = console::strip_ansi_codes(&display_holdings(&holdings(), false)).to_string();
        assert!(!output.contains('$'));
        assert!(output.contains("40.0%"));

        let allocation =
            console::strip_ansi_codes(&display_allocation(&holdings(), false)).to_string();
        assert!(!allocation.contains('$'));
        assert!(!allocation.contains("Total Portfolio Value"));
    }

    #[test]
    fn test_allocation_with_total() {
        let output = console::strip_ansi_codes(&display_allocation(&holdings(), true)).to_string();
        assert!(output.contains("STOCK"));
        assert!(output.contains("72.0%"));
        assert!(output.contains("28.0%"));
        assert!(output.contains("Total Portfolio Value: $2,500.00"));
    }

    #[test]
    fn test_run_on_plain_portfolio_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("portfolio.csv");
        fs::write(&path, "Ticker,Type,Quantity\nAAPL,stock,1\n").unwrap();
        assert!(run(&path, true).is_err());
    }
}
