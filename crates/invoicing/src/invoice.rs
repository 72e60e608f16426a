use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use prathabill_core::{DomainResult, InvoiceId};
use prathabill_parties::BillTo;

use crate::lifecycle::{self, InvoiceStatus, LifecycleAction};
use crate::line_item::LineItem;
use crate::totals::Totals;

/// Invoice header: everything persisted on the invoice record itself.
///
/// Tax rate, totals and status are read-only from outside the crate. Totals
/// come from [`crate::InvoiceForm`] recomputation and status only changes via
/// [`InvoiceHeader::apply`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceHeader {
    pub invoice_number: String,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub client: BillTo,
    pub notes: String,
    pub(crate) tax_rate: Decimal,
    pub(crate) totals: Totals,
    pub(crate) status: InvoiceStatus,
}

impl InvoiceHeader {
    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status
    }

    /// Apply a lifecycle action in place and return the new status.
    ///
    /// `persisted` is whether the invoice has a backend id.
    pub fn apply(&mut self, action: LifecycleAction, persisted: bool) -> DomainResult<InvoiceStatus> {
        self.status = lifecycle::transition(self.status, action, persisted)?;
        Ok(self.status)
    }

    pub fn forward_action(&self) -> Option<LifecycleAction> {
        lifecycle::forward_action(self.status)
    }

    pub fn is_past_due(&self, today: NaiveDate) -> bool {
        lifecycle::is_past_due(self.status, self.due_date, today)
    }
}

/// A persisted invoice with its line items.
///
/// Header and items are read-only; edits go through [`crate::InvoiceForm`] so
/// the header totals always match the items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    header: InvoiceHeader,
    items: Vec<LineItem>,
}

impl Invoice {
    /// Assemble an invoice from its stored header and item rows.
    pub fn new(id: InvoiceId, header: InvoiceHeader, items: Vec<LineItem>) -> Self {
        Self { id, header, items }
    }

    pub fn header(&self) -> &InvoiceHeader {
        &self.header
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn into_parts(self) -> (InvoiceId, InvoiceHeader, Vec<LineItem>) {
        (self.id, self.header, self.items)
    }

    pub fn status(&self) -> InvoiceStatus {
        self.header.status
    }

    pub fn forward_action(&self) -> Option<LifecycleAction> {
        self.header.forward_action()
    }
}

/// Validated form output, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceSubmission {
    pub(crate) header: InvoiceHeader,
    pub(crate) items: Vec<LineItem>,
}

impl InvoiceSubmission {
    pub fn header(&self) -> &InvoiceHeader {
        &self.header
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn into_parts(self) -> (InvoiceHeader, Vec<LineItem>) {
        (self.header, self.items)
    }
}
