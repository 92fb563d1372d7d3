use crate::io::report::ReportConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Split shared expenses and suggest who pays whom
#[derive(Parser, Debug)]
#[command(name = "fairshare")]
#[command(about = "Split shared expenses and suggest who pays whom", long_about = None)]
pub struct CliArgs {
    /// CSV file with `id,name` participant rows
    #[arg(value_name = "PARTICIPANTS", help = "Path to the participants CSV file")]
    pub participants_file: PathBuf,

    /// CSV file with expense rows
    #[arg(value_name = "EXPENSES", help = "Path to the expenses CSV file")]
    pub expenses_file: PathBuf,

    /// Settlement strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "greedy",
        help = "Settlement strategy: 'greedy' pairs in order, 'optimal' minimizes transfers"
    )]
    pub strategy: StrategyType,

    /// Sections to output
    #[arg(
        long = "report",
        value_name = "REPORT",
        default_value = "all",
        help = "Report sections: 'balances', 'settlements' or 'all'"
    )]
    pub report: ReportKind,

    /// Output format
    #[arg(
        long = "format",
        value_name = "FORMAT",
        default_value = "csv",
        help = "Output format: 'csv', 'json' or 'text'"
    )]
    pub format: OutputFormat,

    /// Currency symbol for text output
    #[arg(
        long = "currency",
        value_name = "SYMBOL",
        help = "Currency symbol used in text output (default: ₹)"
    )]
    pub currency: Option<String>,
}

/// Available settlement strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Greedy,
    Optimal,
}

/// Report sections
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    Balances,
    Settlements,
    All,
}

/// Output formats
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
    Text,
}

impl CliArgs {
    /// Create a ReportConfig from CLI arguments
    ///
    /// Falls back to the default currency when none is given; a blank symbol
    /// also falls back, with a warning.
    pub fn to_report_config(&self) -> ReportConfig {
        match &self.currency {
            Some(currency) => ReportConfig::new(self.report.clone(), self.format.clone(), currency),
            None => ReportConfig {
                kind: self.report.clone(),
                format: self.format.clone(),
                ..ReportConfig::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::report::DEFAULT_CURRENCY;
    use rstest::rstest;

    const FILES: [&str; 3] = ["program", "people.csv", "expenses.csv"];

    fn args(extra: &[&'static str]) -> Vec<&'static str> {
        FILES.iter().copied().chain(extra.iter().copied()).collect()
    }

    #[test]
    fn test_positional_files() {
        let parsed = CliArgs::try_parse_from(args(&[])).unwrap();
        assert_eq!(parsed.participants_file, PathBuf::from("people.csv"));
        assert_eq!(parsed.expenses_file, PathBuf::from("expenses.csv"));
    }

    #[rstest]
    #[case::default_strategy(&[], StrategyType::Greedy)]
    #[case::explicit_greedy(&["--strategy", "greedy"], StrategyType::Greedy)]
    #[case::explicit_optimal(&["--strategy", "optimal"], StrategyType::Optimal)]
    fn test_strategy_parsing(#[case] extra: &[&'static str], #[case] expected: StrategyType) {
        let parsed = CliArgs::try_parse_from(args(extra)).unwrap();
        assert_eq!(parsed.strategy, expected);
    }

    #[rstest]
    #[case::defaults(&[], ReportKind::All, OutputFormat::Csv, DEFAULT_CURRENCY)]
    #[case::json_settlements(
        &["--report", "settlements", "--format", "json"],
        ReportKind::Settlements,
        OutputFormat::Json,
        DEFAULT_CURRENCY
    )]
    #[case::text_dollars(
        &["--format", "text", "--currency", "$", "--report", "balances"],
        ReportKind::Balances,
        OutputFormat::Text,
        "$"
    )]
    #[case::blank_currency(&["--currency", " "], ReportKind::All, OutputFormat::Csv, DEFAULT_CURRENCY)]
    fn test_report_config_conversion(
        #[case] extra: &[&'static str],
        #[case] kind: ReportKind,
        #[case] format: OutputFormat,
        #[case] currency: &str,
    ) {
        let config = CliArgs::try_parse_from(args(extra))
            .unwrap()
            .to_report_config();

        assert_eq!(config.kind, kind);
        assert_eq!(config.format, format);
        assert_eq!(config.currency, currency);
    }

    #[rstest]
    #[case::missing_files(vec!["program"])]
    #[case::missing_expenses(vec!["program", "people.csv"])]
    #[case::invalid_strategy(args(&["--strategy", "fastest"]))]
    #[case::invalid_format(args(&["--format", "xml"]))]
    fn test_parsing_errors(#[case] argv: Vec<&'static str>) {
        assert!(CliArgs::try_parse_from(argv).is_err());
    }
}
