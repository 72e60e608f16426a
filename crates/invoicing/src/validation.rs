//! Invoice form validation.
//!
//! Produces a map from field key to a human-readable message. Keys match the
//! form field names so a UI can render each message next to its input.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use prathabill_parties::is_valid_email;

use crate::form::InvoiceForm;

pub const CLIENT_NAME: &str = "clientName";
pub const CLIENT_EMAIL: &str = "clientEmail";
pub const ISSUE_DATE: &str = "issueDate";
pub const DUE_DATE: &str = "dueDate";
pub const TAX_RATE: &str = "taxRate";
pub const ITEMS: &str = "items";

/// Key of the description error for the item at `index`.
pub fn item_description_key(index: usize) -> String {
    format!("item-{index}-description")
}

/// Field-scoped validation failures. Empty means valid.
#[derive(Debug, Error, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
#[error("invalid fields: {}", field_list(.0))]
pub struct ValidationErrors(BTreeMap<String, String>);

fn field_list(errors: &BTreeMap<String, String>) -> String {
    errors.keys().map(String::as_str).collect::<Vec<_>>().join(", ")
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.insert(field.into(), message.into());
    }

    /// Drop the error for one field (used when the user edits it).
    pub fn clear_field(&mut self, field: &str) {
        self.0.remove(field);
    }
}

/// Check a candidate invoice before it is saved.
///
/// Due dates before the issue date are accepted.
pub fn validate(form: &InvoiceForm) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    let client = form.client();

    if client.name.trim().is_empty() {
        errors.insert(CLIENT_NAME, "Client name is required");
    }

    let email = client.email.trim();
    if email.is_empty() {
        errors.insert(CLIENT_EMAIL, "Client email is required");
    } else if !is_valid_email(email) {
        errors.insert(CLIENT_EMAIL, "Email address is invalid");
    }

    if form.issue_date().is_none() {
        errors.insert(ISSUE_DATE, "Issue date is required");
    }
    if form.due_date().is_none() {
        errors.insert(DUE_DATE, "Due date is required");
    }

    let tax_rate = form.tax_rate();
    if tax_rate < Decimal::ZERO || tax_rate > Decimal::ONE_HUNDRED {
        errors.insert(TAX_RATE, "Tax rate must be between 0 and 100");
    }

    let mut item_errors = false;
    for (index, item) in form.items().iter().enumerate() {
        if item.description.trim().is_empty() {
            errors.insert(item_description_key(index), "Description is required");
            item_errors = true;
        }
    }
    if item_errors {
        errors.insert(ITEMS, "Please complete all item details");
    }

    errors
}
