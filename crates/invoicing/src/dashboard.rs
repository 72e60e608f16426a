//! Dashboard summary statistics.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::invoice::InvoiceHeader;
use crate::lifecycle::InvoiceStatus;

/// Summary figures shown above the invoice list. Derived, never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_invoices: usize,
    /// Invoices in `draft` or `sent`.
    pub pending_payments: usize,
    /// Sum of totals of `paid` invoices.
    pub total_revenue: Decimal,
    /// Distinct client email addresses.
    pub active_clients: usize,
}

impl DashboardStats {
    /// Full recomputation over every known invoice.
    pub fn compute<'a>(invoices: impl IntoIterator<Item = &'a InvoiceHeader>) -> Self {
        let mut stats = DashboardStats::default();
        let mut clients: HashSet<&str> = HashSet::new();

        for invoice in invoices {
            stats.total_invoices += 1;
            if invoice.status().is_pending() {
                stats.pending_payments += 1;
            }
            if invoice.status() == InvoiceStatus::Paid {
                stats.total_revenue = stats
                    .total_revenue
                    .saturating_add(invoice.totals().total());
            }
            clients.insert(invoice.client.email.as_str());
        }

        stats.active_clients = clients.len();
        stats
    }
}
