//! I/O module
//!
//! Handles CSV parsing and report output.
//!
//! # Components
//!
//! - `csv_format` - Row types, record conversion, and CSV tables
//! - `reader` - Streaming CSV reader with iterator interface
//! - `report` - Report configuration and CSV / JSON / text writers

pub mod csv_format;
pub mod reader;
pub mod report;

pub use csv_format::{write_balances_csv, write_settlements_csv, ExpenseRecord, FromRow};
pub use reader::RecordReader;
pub use report::{write_report, ReportConfig, ReportRenderer, TextRenderer};
