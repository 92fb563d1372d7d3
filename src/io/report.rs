//! Report output
//!
//! Writes a [`SettlementReport`] as CSV tables, JSON, or plain text. The plain
//! text form is also what an export hook (for example an image renderer in the
//! presentation layer) consumes: see [`ReportRenderer`].

use crate::cli::{OutputFormat, ReportKind};
use crate::core::engine::SettlementReport;
use crate::io::csv_format::{write_balances_csv, write_settlements_csv};
use crate::types::money::format_amount;
use crate::types::{BalanceSheet, LedgerSummary, SplitError, Standing, Transfer};
use serde::Serialize;
use std::io::Write;
use tracing::warn;

/// Default currency symbol for display strings
pub const DEFAULT_CURRENCY: &str = "₹";

/// Output options
#[derive(Clone, Debug, PartialEq)]
pub struct ReportConfig {
    /// Which sections to write
    pub kind: ReportKind,
    /// Serialization format
    pub format: OutputFormat,
    /// Symbol prefixed to amounts in text output
    pub currency: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            kind: ReportKind::All,
            format: OutputFormat::Csv,
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

impl ReportConfig {
    /// Create a ReportConfig, falling back to the default symbol for a blank currency
    pub fn new(kind: ReportKind, format: OutputFormat, currency: &str) -> Self {
        let currency = if currency.trim().is_empty() {
            warn!(
                "Invalid currency symbol ({:?}), using default ({})",
                currency, DEFAULT_CURRENCY
            );
            DEFAULT_CURRENCY.to_string()
        } else {
            currency.trim().to_string()
        };

        Self {
            kind,
            format,
            currency,
        }
    }

    fn includes_balances(&self) -> bool {
        matches!(self.kind, ReportKind::Balances | ReportKind::All)
    }

    fn includes_settlements(&self) -> bool {
        matches!(self.kind, ReportKind::Settlements | ReportKind::All)
    }
}

/// Turns a report into display lines
///
/// This is the seam for export collaborators: anything that renders the
/// settlement for people (a terminal, an image, a message) starts from these
/// lines rather than from the raw numbers.
pub trait ReportRenderer {
    fn render(&self, report: &SettlementReport) -> Vec<String>;
}

/// Plain-text renderer
#[derive(Debug, Clone, PartialEq)]
pub struct TextRenderer {
    currency: String,
    kind: ReportKind,
}

impl TextRenderer {
    pub fn new(config: &ReportConfig) -> Self {
        Self {
            currency: config.currency.clone(),
            kind: config.kind.clone(),
        }
    }

    fn summary_lines(&self, summary: &LedgerSummary, lines: &mut Vec<String>) {
        lines.push(format!(
            "Total Amount Split: {}{}",
            self.currency,
            format_amount(summary.total_amount)
        ));
        lines.push(format!(
            "{} • {}",
            plural(summary.expense_count, "expense"),
            plural(summary.participant_count, "participant")
        ));
    }

    fn balance_lines(&self, balances: &BalanceSheet, lines: &mut Vec<String>) {
        lines.push("Individual Balances".to_string());
        for balance in balances {
            let standing = match balance.standing() {
                Standing::Creditor => format!("+{}{}", self.currency, format_amount(balance.net)),
                Standing::Debtor => format!("-{}{}", self.currency, format_amount(-balance.net)),
                Standing::Settled => "Settled".to_string(),
            };
            lines.push(format!(
                "{}: {} (paid {}{}, owes {}{})",
                balance.name,
                standing,
                self.currency,
                format_amount(balance.paid),
                self.currency,
                format_amount(balance.owed)
            ));
        }
    }

    fn settlement_lines(&self, transfers: &[Transfer], lines: &mut Vec<String>) {
        lines.push("Settlement".to_string());
        if transfers.is_empty() {
            lines.push("All settled up!".to_string());
            return;
        }
        lines.extend(transfers.iter().map(|t| t.display_line(&self.currency)));
        lines.push(format!("{} needed", plural(transfers.len(), "transaction")));
    }
}

impl ReportRenderer for TextRenderer {
    fn render(&self, report: &SettlementReport) -> Vec<String> {
        let mut lines = Vec::new();
        self.summary_lines(&report.summary, &mut lines);

        if matches!(self.kind, ReportKind::Balances | ReportKind::All) {
            lines.push(String::new());
            self.balance_lines(&report.balances, &mut lines);
        }
        if matches!(self.kind, ReportKind::Settlements | ReportKind::All) {
            lines.push(String::new());
            self.settlement_lines(&report.settlements, &mut lines);
        }
        lines
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    summary: &'a LedgerSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    balances: Option<&'a BalanceSheet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    settlements: Option<&'a [Transfer]>,
}

/// Write a report in the configured format and sections
///
/// With CSV and `ReportKind::All`, the balance table comes first, followed by
/// an empty line and the settlement table.
pub fn write_report(
    report: &SettlementReport,
    config: &ReportConfig,
    output: &mut dyn Write,
) -> Result<(), SplitError> {
    match config.format {
        OutputFormat::Csv => {
            if config.includes_balances() {
                write_balances_csv(&report.balances, output)?;
            }
            if config.includes_balances() && config.includes_settlements() {
                writeln!(output)?;
            }
            if config.includes_settlements() {
                write_settlements_csv(&report.settlements, output)?;
            }
        }
        OutputFormat::Json => {
            let json = JsonReport {
                summary: &report.summary,
                balances: config.includes_balances().then_some(&report.balances),
                settlements: config
                    .includes_settlements()
                    .then_some(report.settlements.as_slice()),
            };
            serde_json::to_writer_pretty(&mut *output, &json)?;
            writeln!(output)?;
        }
        OutputFormat::Text => {
            for line in TextRenderer::new(config).render(report) {
                writeln!(output, "{}", line)?;
            }
        }
    }
    output.flush()?;

    Ok(())
}
