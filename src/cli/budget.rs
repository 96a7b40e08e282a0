use super::ui;
use crate::core::budget::{BudgetSummary, Flow};
use anyhow::Result;
use comfy_table::Cell;
use std::path::Path;

/// Prints the income and expense flows of the budget file at `path`.
pub fn run(path: &Path, show_dollar: bool) -> Result<()> {
    let summary = BudgetSummary::read_from_path(path)?;
    println!("{}", display_budget(&summary, show_dollar));
    Ok(())
}

pub fn display_budget(summary: &BudgetSummary, show_dollar: bool) -> String {
    let mut output = format!(
        "{}\n\n{}\n\n{}\n\n{}\n\n{}",
        ui::style_text("Income", ui::StyleType::Title),
        flows_table(&summary.income, summary.total_income, show_dollar),
        ui::style_text("Expenses", ui::StyleType::Title),
        flows_table(&summary.expenses, summary.total_expenses, show_dollar),
        ui::style_text("Cash Flow", ui::StyleType::Title),
    );

    let amount = |value: f64| {
        if show_dollar {
            ui::format_dollars(value)
        } else {
            format!("{:.1}%", value / summary.total_income * 100.0)
        }
    };
    let mut lines = vec![
        ("Total Income", amount(summary.total_income)),
        ("Total Expenses", amount(summary.total_expenses)),
    ];
    if let Some(surplus) = summary.surplus() {
        lines.push(("Savings", amount(surplus)));
    }
    for (label, value) in lines {
        output.push_str(&format!(
            "\n{}: {}",
            ui::style_text(label, ui::StyleType::TotalLabel),
            ui::style_text(&value, ui::StyleType::TotalValue)
        ));
    }
    output
}

/// Sources with their amount, or their share of `total`.
fn flows_table(flows: &[Flow], total: f64, show_dollar: bool) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Source"),
        ui::header_cell(if show_dollar { "Amount" } else { "Share (%)" }),
    ]);
    for flow in flows {
        let amount = if show_dollar {
            ui::format_dollars(flow.amount)
        } else {
            format!("{:.1}%", flow.amount / total * 100.0)
        };
        table.add_row(vec![Cell::new(&flow.source), ui::number_cell(amount)]);
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn summary(csv: &str) -> BudgetSummary {
        BudgetSummary::from_reader(csv.as_bytes()).unwrap()
    }

    const BUDGET: &str = "\
Category,Source,Amount
income,Salary,4000
expenses,Rent,1500
expenses,Food,500
";

    #[test]
    fn test_budget_with_dollars() {
        let output = console::strip_ansi_codes(&display_budget(&summary(BUDGET), true)).to_string();
        assert!(output.contains("Salary"));
        assert!(output.contains("$4,000.00"));
        assert!(output.find("Rent").unwrap() < output.find("Food").unwrap());
        assert!(output.contains("Total Expenses: $2,000.00"));
        assert!(output.contains("Savings: $2,000.00"));
    }

    #[test]
    fn test_budget_as_shares() {
        let output = console::strip_ansi_codes(&display_budget(&summary(BUDGET), false)).to_string();
        assert!(!output.contains('$'));
        assert!(output.contains("75.0%"));
        assert!(output.contains("25.0%"));
        assert!(output.contains("Savings: 50.0%"));
    }

    #[test]
    fn test_no_savings_line_without_surplus() {
        let csv = "Category,Source,Amount\nincome,Salary,1000\nexpenses,Rent,1200\n";
        let output = console::strip_ansi_codes(&display_budget(&summary(csv), true)).to_string();
        assert!(!output.contains("Savings"));
    }

    #[test]
    fn test_run_requires_both_groups() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("income_expenses.csv");
        fs::write(&path, "Category,Source,Amount\nincome,Salary,1000\n").unwrap();
        assert!(run(&path, true).is_err());
    }
}
