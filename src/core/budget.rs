//! Income and expense flows read from a budget CSV.
//!
//! The file carries `Category, Source, Amount` columns. Rows categorised as
//! `income` flow into the budget and rows categorised as `expenses` flow out
//! of it; any other category is ignored.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BudgetEntry {
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Amount")]
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    Income,
    Expense,
}

impl FlowKind {
    fn from_category(category: &str) -> Option<Self> {
        match category.trim().to_lowercase().as_str() {
            "income" => Some(FlowKind::Income),
            "expenses" => Some(FlowKind::Expense),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Flow {
    pub source: String,
    pub amount: f64,
}

/// Income and expenses, each sorted by amount, largest first.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetSummary {
    pub income: Vec<Flow>,
    pub expenses: Vec<Flow>,
    pub total_income: f64,
    pub total_expenses: f64,
}

impl BudgetSummary {
    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = fs::File::open(path)
            .with_context(|| format!("Failed to open budget file: {}", path.display()))?;
        Self::from_reader(file)
            .with_context(|| format!("Failed to read budget file: {}", path.display()))
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let entries = rdr
            .deserialize()
            .collect::<Result<Vec<BudgetEntry>, _>>()?;
        Self::from_entries(entries)
    }

    /// Splits `entries` into income and expenses. Both groups must be
    /// non-empty.
    pub fn from_entries<I: IntoIterator<Item = BudgetEntry>>(entries: I) -> Result<Self> {
        let mut income = Vec::new();
        let mut expenses = Vec::new();
        for entry in entries {
            let flow = Flow {
                source: entry.source,
                amount: entry.amount,
            };
            match FlowKind::from_category(&entry.category) {
                Some(FlowKind::Income) => income.push(flow),
                Some(FlowKind::Expense) => expenses.push(flow),
                None => debug!(category = %entry.category, source = %flow.source, "Ignoring budget row"),
            }
        }

        if income.is_empty() || expenses.is_empty() {
            bail!("Both income and expenses data must be present");
        }

        income.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        expenses.sort_by(|a, b| b.amount.total_cmp(&a.amount));
        let total_income = income.iter().map(|f| f.amount).sum();
        let total_expenses = expenses.iter().map(|f| f.amount).sum();

        Ok(Self {
            income,
            expenses,
            total_income,
            total_expenses,
        })
    }

    pub fn savings(&self) -> f64 {
        self.total_income - self.total_expenses
    }

    /// What is left of income after expenses, only when something is.
    pub fn surplus(&self) -> Option<f64> {
        Some(self.savings()).filter(|s| *s > 0.0)
    }
}
