use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use prathabill_core::{Entity, InvoiceId, LineItemId};
use prathabill_invoicing::{InvoiceHeader, InvoiceStatus, LineItem};

use super::Record;

/// Characters of the description copied into an item record's display name.
pub const ITEM_NAME_LEN: usize = 50;

/// Invoice row in the backend (`invoice` table). Items live in their own table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub id: InvoiceId,
    /// Display name; the backend uses the invoice number.
    pub name: String,
    pub header: InvoiceHeader,
}

impl Entity for InvoiceRecord {
    type Id = InvoiceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Invoice listing query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvoiceFilter {
    /// Exact status match.
    pub status: Option<InvoiceStatus>,
    /// Case-insensitive substring of the client name.
    pub client_name: Option<String>,
}

impl InvoiceFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: InvoiceStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_client_name(mut self, needle: impl Into<String>) -> Self {
        self.client_name = Some(needle.into());
        self
    }
}

impl Record for InvoiceRecord {
    type Fields = InvoiceHeader;
    type Filter = InvoiceFilter;

    const KIND: &'static str = "invoice";

    fn new_id() -> InvoiceId {
        InvoiceId::new()
    }

    fn from_fields(id: InvoiceId, header: InvoiceHeader) -> Self {
        Self {
            id,
            name: header.invoice_number.clone(),
            header,
        }
    }

    fn matches(&self, filter: &InvoiceFilter) -> bool {
        if let Some(status) = filter.status {
            if self.header.status() != status {
                return false;
            }
        }
        if let Some(needle) = &filter.client_name {
            let name = self.header.client.name.to_lowercase();
            if !name.contains(&needle.trim().to_lowercase()) {
                return false;
            }
        }
        true
    }

    /// Newest issue date first.
    fn listing_order(&self, other: &Self) -> Ordering {
        other.header.issue_date.cmp(&self.header.issue_date)
    }
}

/// Line item row in the backend (`invoice_item` table), linked to its invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItemRecord {
    pub id: LineItemId,
    pub name: String,
    pub invoice: InvoiceId,
    pub item: LineItem,
}

impl Entity for InvoiceItemRecord {
    type Id = LineItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceItemFields {
    pub invoice: InvoiceId,
    pub item: LineItem,
}

/// Item listing query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub invoice: Option<InvoiceId>,
}

impl ItemFilter {
    pub fn for_invoice(invoice: InvoiceId) -> Self {
        Self {
            invoice: Some(invoice),
        }
    }
}

impl Record for InvoiceItemRecord {
    type Fields = InvoiceItemFields;
    type Filter = ItemFilter;

    const KIND: &'static str = "invoice_item";

    fn new_id() -> LineItemId {
        LineItemId::new()
    }

    fn from_fields(id: LineItemId, fields: InvoiceItemFields) -> Self {
        Self {
            id,
            name: fields.item.description.chars().take(ITEM_NAME_LEN).collect(),
            invoice: fields.invoice,
            item: fields.item,
        }
    }

    fn matches(&self, filter: &ItemFilter) -> bool {
        filter.invoice.is_none_or(|invoice| invoice == self.invoice)
    }
}
