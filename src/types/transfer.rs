//! Settlement transfer type

use super::money::round_to_cents;
use rust_decimal::Decimal;
use serde::Serialize;

/// One suggested payment from a debtor to a creditor
///
/// Names rather than ids are carried because transfers are consumed as
/// display strings by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transfer {
    /// Name of the participant who pays
    pub from: String,

    /// Name of the participant who receives
    pub to: String,

    /// Strictly positive amount in whole cents
    pub amount: Decimal,
}

impl Transfer {
    pub fn new(from: impl Into<String>, to: impl Into<String>, amount: Decimal) -> Self {
        Transfer {
            from: from.into(),
            to: to.into(),
            amount: round_to_cents(amount),
        }
    }

    /// Human-readable line, e.g. `Ben pays Asha ₹100.00`
    pub fn display_line(&self, currency: &str) -> String {
        format!(
            "{} pays {} {}{:.2}",
            self.from, self.to, currency, self.amount
        )
    }
}
