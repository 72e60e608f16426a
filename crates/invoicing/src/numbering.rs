//! Display invoice numbers.

use chrono::{Datelike, NaiveDate};

pub const DEFAULT_PREFIX: &str = "INV";

/// Produces `PREFIX-YYMM-NNN` invoice numbers.
///
/// `NNN` is the number of invoices already known to the session plus one. The
/// number is not reserved anywhere, so two drafts opened before either is saved
/// get the same number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceNumberGenerator {
    prefix: String,
}

impl Default for InvoiceNumberGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

impl InvoiceNumberGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn generate(&self, today: NaiveDate, known_invoices: usize) -> String {
        format!(
            "{}-{:02}{:02}-{:03}",
            self.prefix,
            today.year().rem_euclid(100),
            today.month(),
            known_invoices + 1
        )
    }
}
