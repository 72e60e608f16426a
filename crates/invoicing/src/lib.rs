//! Invoicing domain module.
//!
//! This crate contains the business rules for invoices: line-item amounts,
//! subtotal/tax/total aggregation, the status lifecycle, form validation,
//! invoice numbering and dashboard statistics. Everything here is deterministic
//! domain logic (no IO, no storage, no clock).

pub mod dashboard;
pub mod form;
pub mod invoice;
pub mod lifecycle;
pub mod line_item;
pub mod numbering;
pub mod numeric;
pub mod totals;
pub mod validation;

pub use dashboard::DashboardStats;
pub use form::{FormDefaults, InvoiceForm};
pub use invoice::{Invoice, InvoiceHeader, InvoiceSubmission};
pub use lifecycle::{InvoiceStatus, LifecycleAction, forward_action, is_past_due, transition};
pub use line_item::LineItem;
pub use numbering::InvoiceNumberGenerator;
pub use totals::{Recomputed, Totals, recompute};
pub use validation::{ValidationErrors, validate};
