//! Reading portfolio CSV files and writing the enriched copy.
//!
//! Columns are located by header name, so the file may carry extra columns
//! (they pass through to the output untouched) and any column order.

use crate::core::hold_period::HoldPeriodStatus;
use crate::core::holding::{Holding, RawHolding, parse_number};
use crate::core::pipeline::{EnrichedHolding, PortfolioReport};
use crate::core::valuation::Valuation;
use anyhow::{Context, Result, anyhow};
use csv::StringRecord;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

pub const TICKER: &str = "Ticker";
pub const TYPE: &str = "Type";
pub const QUANTITY: &str = "Quantity";
pub const COST_BASIS: &str = "Cost Basis";
pub const PURCHASE_DATE: &str = "Purchase Date";
/// Optional pass-through column, written in lower case.
pub const LIQUIDITY: &str = "Liquidity";

pub const CURRENT_PRICE: &str = "Current Price";
pub const VALUE: &str = "Value";
pub const GAIN_LOSS: &str = "Gain/Loss";
pub const PERCENT_GAIN_LOSS: &str = "% Gain/Loss";
pub const LONG_TERM_HOLD: &str = "Long-Term Hold";

/// Columns appended to every enriched file, in output order.
pub const ENRICHED_COLUMNS: [&str; 5] = [
    CURRENT_PRICE,
    VALUE,
    GAIN_LOSS,
    PERCENT_GAIN_LOSS,
    LONG_TERM_HOLD,
];

const ABSENT_MARKERS: [&str; 5] = ["na", "n/a", "nan", "null", "none"];

/// A portfolio file held in memory: its header row and data rows.
#[derive(Debug, Clone)]
pub struct HoldingsTable {
    headers: StringRecord,
    records: Vec<StringRecord>,
}

impl HoldingsTable {
    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = fs::File::open(path)
            .with_context(|| format!("Failed to open portfolio file: {}", path.display()))?;
        Self::from_reader(file)
            .with_context(|| format!("Failed to parse portfolio file: {}", path.display()))
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let records = rdr
            .records()
            .filter(|r| r.as_ref().map_or(true, |rec| !is_blank(rec)))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(rows = records.len(), columns = headers.len(), "Read portfolio table");

        Ok(Self { headers, records })
    }

    /// True when the file has no data rows (or no header at all).
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    fn cell(&self, record: &StringRecord, column: Option<usize>) -> Option<String> {
        column
            .and_then(|idx| record.get(idx))
            .map(str::trim)
            .filter(|v| !is_absent(v))
            .map(str::to_string)
    }

    /// Extracts the valuation-relevant cells of every row, in file order.
    pub fn raw_holdings(&self) -> Vec<RawHolding> {
        let ticker = self.column(TICKER);
        let asset_type = self.column(TYPE);
        let quantity = self.column(QUANTITY);
        let cost_basis = self.column(COST_BASIS);
        let purchase_date = self.column(PURCHASE_DATE);

        self.records
            .iter()
            .enumerate()
            .map(|(row, record)| RawHolding {
                row,
                ticker: self.cell(record, ticker),
                asset_type: self.cell(record, asset_type),
                quantity: self.cell(record, quantity),
                cost_basis: self.cell(record, cost_basis),
                purchase_date: self.cell(record, purchase_date),
            })
            .collect()
    }

    /// Writes the enriched rows of `report` as CSV: every input column in
    /// input order, followed by the computed columns.
    pub fn write_enriched<W: io::Write>(&self, report: &PortfolioReport, writer: W) -> Result<()> {
        let mut headers: Vec<String> = self.headers.iter().map(str::to_string).collect();
        let type_column = self.column(TYPE);
        let liquidity_column = self.column(LIQUIDITY);
        let computed: Vec<usize> = ENRICHED_COLUMNS
            .iter()
            .map(|name| {
                self.column(name).unwrap_or_else(|| {
                    headers.push(name.to_string());
                    headers.len() - 1
                })
            })
            .collect();

        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&headers)?;

        for enriched in &report.holdings {
            let source = self
                .records
                .get(enriched.holding.row)
                .ok_or_else(|| anyhow!("No input row {} for enriched holding", enriched.holding.row))?;

            if source.len() > self.headers.len() {
                warn!(
                    row = enriched.holding.row,
                    cells = source.len(),
                    columns = self.headers.len(),
                    "Dropping cells beyond the header row"
                );
            }
            let mut row: Vec<String> = source
                .iter()
                .take(self.headers.len())
                .map(str::to_string)
                .collect();
            row.resize(headers.len(), String::new());

            if let Some(idx) = type_column {
                row[idx] = enriched.holding.asset_type.to_string();
            }
            if let Some(idx) = liquidity_column {
                row[idx] = row[idx].to_lowercase();
            }
            let values = [
                enriched.price.to_string(),
                enriched.valuation.value.to_string(),
                enriched.valuation.gain_loss.to_string(),
                enriched.valuation.percent_gain_loss.to_string(),
                enriched.hold_period.label().to_string(),
            ];
            for (idx, value) in computed.iter().zip(values) {
                row[*idx] = value;
            }
            wtr.write_record(&row)?;
        }

        wtr.flush()?;
        Ok(())
    }

    pub fn write_enriched_to_path<P: AsRef<Path>>(
        &self,
        report: &PortfolioReport,
        path: P,
    ) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let file = fs::File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        self.write_enriched(report, io::BufWriter::new(file))
            .with_context(|| format!("Failed to write output file: {}", path.display()))
    }

    /// Reads back a file produced by [`HoldingsTable::write_enriched`].
    /// Rows that cannot be interpreted are logged and left out.
    pub fn enriched_holdings(&self) -> Result<Vec<EnrichedHolding>> {
        let columns = ENRICHED_COLUMNS
            .iter()
            .map(|name| {
                self.column(name).ok_or_else(|| {
                    anyhow!("Column '{name}' not found, is this an enriched portfolio file?")
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let (price, value, gain_loss, percent, hold) =
            (columns[0], columns[1], columns[2], columns[3], columns[4]);

        let mut holdings = Vec::new();
        for (raw, record) in self.raw_holdings().into_iter().zip(&self.records) {
            let row = raw.row;
            let holding = match Holding::try_from(raw) {
                Ok(h) => h,
                Err(e) => {
                    warn!(error = %e, "Skipping enriched row");
                    continue;
                }
            };
            let number = |idx: usize| record.get(idx).and_then(parse_number);
            let parsed = (
                number(price),
                number(value),
                number(gain_loss),
                number(percent),
                record.get(hold).and_then(HoldPeriodStatus::from_label),
            );
            let (Some(price), Some(value), Some(gain_loss), Some(percent_gain_loss), Some(hold_period)) =
                parsed
            else {
                warn!(row, "Skipping enriched row with unreadable computed columns");
                continue;
            };

            holdings.push(EnrichedHolding {
                holding,
                price,
                valuation: Valuation {
                    value,
                    gain_loss,
                    percent_gain_loss,
                },
                hold_period,
            });
        }

        Ok(holdings)
    }
}

fn is_absent(value: &str) -> bool {
    value.is_empty() || ABSENT_MARKERS.iter().any(|m| value.eq_ignore_ascii_case(m))
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}
