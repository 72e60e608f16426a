use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::numeric::{coerce_decimal, non_negative};

/// One billable row on an invoice.
///
/// `amount` is always `quantity * rate`; it is derived on every change and
/// cannot be set directly. Quantity and rate are never negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LineItemFields")]
pub struct LineItem {
    pub description: String,
    quantity: Decimal,
    rate: Decimal,
    amount: Decimal,
}

/// Wire shape of a line item; `amount` is ignored and re-derived on load.
#[derive(Debug, Deserialize)]
struct LineItemFields {
    description: String,
    quantity: Decimal,
    rate: Decimal,
}

impl From<LineItemFields> for LineItem {
    fn from(fields: LineItemFields) -> Self {
        LineItem::new(fields.description, fields.quantity, fields.rate)
    }
}

impl Default for LineItem {
    /// The row the editor adds: empty description, quantity 1, rate 0.
    fn default() -> Self {
        LineItem::new(String::new(), Decimal::ONE, Decimal::ZERO)
    }
}

impl LineItem {
    pub fn new(description: impl Into<String>, quantity: Decimal, rate: Decimal) -> Self {
        let mut item = Self {
            description: description.into(),
            quantity: non_negative(quantity),
            rate: non_negative(rate),
            amount: Decimal::ZERO,
        };
        item.refresh_amount();
        item
    }

    /// Build a line item from raw form input (non-numeric input counts as 0).
    pub fn from_input(description: impl Into<String>, quantity: &str, rate: &str) -> Self {
        Self::new(description, coerce_decimal(quantity), coerce_decimal(rate))
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn set_quantity(&mut self, quantity: Decimal) {
        self.quantity = non_negative(quantity);
        self.refresh_amount();
    }

    pub fn set_rate(&mut self, rate: Decimal) {
        self.rate = non_negative(rate);
        self.refresh_amount();
    }

    pub(crate) fn refresh_amount(&mut self) {
        self.amount = self.quantity.saturating_mul(self.rate);
    }
}
