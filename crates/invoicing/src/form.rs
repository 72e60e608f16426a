//! Invoice editor model.
//!
//! Every mutation that can change money (item add/remove/edit, tax rate) runs
//! [`recompute`] before returning. Other fields never trigger a recompute.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

use prathabill_core::{DomainError, DomainResult};
use prathabill_parties::BillTo;

use crate::invoice::{Invoice, InvoiceHeader, InvoiceSubmission};
use crate::lifecycle::InvoiceStatus;
use crate::line_item::LineItem;
use crate::numeric::coerce_decimal;
use crate::totals::{Totals, recompute};
use crate::validation::{self, ValidationErrors};

/// Defaults applied to freshly opened drafts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormDefaults {
    /// Tax rate in percent.
    pub tax_rate: Decimal,
    /// Days between issue date and due date.
    pub payment_terms_days: u32,
}

impl Default for FormDefaults {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::from(18),
            payment_terms_days: 30,
        }
    }
}

/// In-progress invoice being created or edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceForm {
    invoice_number: String,
    issue_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
    client: BillTo,
    notes: String,
    tax_rate: Decimal,
    items: Vec<LineItem>,
    totals: Totals,
    status: InvoiceStatus,
    errors: ValidationErrors,
}

impl InvoiceForm {
    /// An empty form: no number, no dates, one blank item.
    pub fn blank(tax_rate: Decimal) -> Self {
        let mut form = Self {
            invoice_number: String::new(),
            issue_date: None,
            due_date: None,
            client: BillTo::default(),
            notes: String::new(),
            tax_rate,
            items: vec![LineItem::default()],
            totals: Totals::default(),
            status: InvoiceStatus::Draft,
            errors: ValidationErrors::new(),
        };
        form.recompute();
        form
    }

    /// A new draft issued today and due after the payment terms.
    pub fn new_draft(
        invoice_number: impl Into<String>,
        today: NaiveDate,
        defaults: &FormDefaults,
    ) -> Self {
        let mut form = Self::blank(defaults.tax_rate);
        form.invoice_number = invoice_number.into();
        form.issue_date = Some(today);
        form.due_date = today.checked_add_days(Days::new(u64::from(defaults.payment_terms_days)));
        form
    }

    /// Load an existing invoice for editing. Its status is kept on save.
    pub fn from_invoice(invoice: &Invoice) -> Self {
        let header = invoice.header();
        let items = if invoice.items().is_empty() {
            vec![LineItem::default()]
        } else {
            invoice.items().to_vec()
        };
        let mut form = Self {
            invoice_number: header.invoice_number.clone(),
            issue_date: Some(header.issue_date),
            due_date: Some(header.due_date),
            client: header.client.clone(),
            notes: header.notes.clone(),
            tax_rate: header.tax_rate,
            items,
            totals: Totals::default(),
            status: header.status,
            errors: ValidationErrors::new(),
        };
        form.recompute();
        form
    }

    pub fn invoice_number(&self) -> &str {
        &self.invoice_number
    }

    pub fn issue_date(&self) -> Option<NaiveDate> {
        self.issue_date
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    pub fn client(&self) -> &BillTo {
        &self.client
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn tax_rate(&self) -> Decimal {
        self.tax_rate
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn totals(&self) -> Totals {
        self.totals
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status
    }

    /// Errors from the last [`InvoiceForm::validate`] call, minus fields edited since.
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn set_client_name(&mut self, name: impl Into<String>) {
        self.client.name = name.into();
        self.errors.clear_field(validation::CLIENT_NAME);
    }

    pub fn set_client_email(&mut self, email: impl Into<String>) {
        self.client.email = email.into();
        self.errors.clear_field(validation::CLIENT_EMAIL);
    }

    pub fn set_client_address(&mut self, address: impl Into<String>) {
        self.client.address = address.into();
    }

    /// Copy a directory client's details onto the invoice.
    pub fn set_bill_to(&mut self, bill_to: BillTo) {
        self.client = bill_to;
        self.errors.clear_field(validation::CLIENT_NAME);
        self.errors.clear_field(validation::CLIENT_EMAIL);
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Set the issue date from `YYYY-MM-DD` input; anything else clears it.
    pub fn set_issue_date(&mut self, input: &str) {
        self.issue_date = parse_date_input(input);
        self.errors.clear_field(validation::ISSUE_DATE);
    }

    /// Set the due date from `YYYY-MM-DD` input; anything else clears it.
    pub fn set_due_date(&mut self, input: &str) {
        self.due_date = parse_date_input(input);
        self.errors.clear_field(validation::DUE_DATE);
    }

    pub fn set_tax_rate(&mut self, input: &str) {
        self.tax_rate = coerce_decimal(input);
        self.errors.clear_field(validation::TAX_RATE);
        self.recompute();
    }

    /// Append a blank row and return its index.
    pub fn add_item(&mut self) -> usize {
        self.items.push(LineItem::default());
        self.recompute();
        self.items.len() - 1
    }

    /// Remove a row. The last remaining row cannot be removed.
    pub fn remove_item(&mut self, index: usize) -> DomainResult<LineItem> {
        self.check_index(index)?;
        if self.items.len() == 1 {
            return Err(DomainError::invariant(
                "an invoice must keep at least one line item",
            ));
        }
        let removed = self.items.remove(index);
        self.recompute();
        Ok(removed)
    }

    pub fn set_item_description(
        &mut self,
        index: usize,
        description: impl Into<String>,
    ) -> DomainResult<()> {
        self.check_index(index)?;
        self.items[index].description = description.into();
        self.recompute();
        Ok(())
    }

    pub fn set_item_quantity(&mut self, index: usize, input: &str) -> DomainResult<()> {
        self.check_index(index)?;
        self.items[index].set_quantity(coerce_decimal(input));
        self.recompute();
        Ok(())
    }

    pub fn set_item_rate(&mut self, index: usize, input: &str) -> DomainResult<()> {
        self.check_index(index)?;
        self.items[index].set_rate(coerce_decimal(input));
        self.recompute();
        Ok(())
    }

    /// Run the validator and remember its result.
    pub fn validate(&mut self) -> &ValidationErrors {
        self.errors = validation::validate(self);
        &self.errors
    }

    /// Validate and, if clean, produce the header and items to persist.
    pub fn submit(&mut self) -> Result<InvoiceSubmission, ValidationErrors> {
        if !self.validate().is_empty() {
            return Err(self.errors.clone());
        }
        let (Some(issue_date), Some(due_date)) = (self.issue_date, self.due_date) else {
            return Err(self.errors.clone());
        };

        Ok(InvoiceSubmission {
            header: InvoiceHeader {
                invoice_number: self.invoice_number.clone(),
                issue_date,
                due_date,
                client: self.client.clone(),
                notes: self.notes.clone(),
                tax_rate: self.tax_rate,
                totals: self.totals,
                status: self.status,
            },
            items: self.items.clone(),
        })
    }

    fn check_index(&self, index: usize) -> DomainResult<()> {
        if index >= self.items.len() {
            return Err(DomainError::validation(format!(
                "no line item at index {index}"
            )));
        }
        Ok(())
    }

    fn recompute(&mut self) {
        let out = recompute(std::mem::take(&mut self.items), self.tax_rate);
        self.items = out.items;
        self.totals = out.totals;
    }
}

/// Parse `YYYY-MM-DD` form input.
pub fn parse_date_input(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").ok()
}
