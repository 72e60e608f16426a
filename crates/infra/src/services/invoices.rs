use tracing::{info, warn};

use prathabill_core::{DomainError, InvoiceId, LineItemId};
use prathabill_invoicing::{
    Invoice, InvoiceHeader, InvoiceStatus, InvoiceSubmission, LifecycleAction, LineItem,
};

use crate::records::{
    InvoiceFilter, InvoiceItemFields, InvoiceItemRecord, InvoiceRecord, ItemFilter, RecordResult,
    SharedStore,
};
use crate::services::error::{Operation, ServiceError, ServiceResult};

/// Invoice persistence flows over the invoice and invoice-item collaborators.
///
/// Both collaborators are injected; the service keeps no state of its own.
#[derive(Clone)]
pub struct InvoiceService {
    invoices: SharedStore<InvoiceRecord>,
    items: SharedStore<InvoiceItemRecord>,
}

impl InvoiceService {
    pub fn new(invoices: SharedStore<InvoiceRecord>, items: SharedStore<InvoiceItemRecord>) -> Self {
        Self { invoices, items }
    }

    /// List invoice headers, newest issue date first.
    pub async fn list(&self, filter: &InvoiceFilter) -> ServiceResult<Vec<InvoiceRecord>> {
        self.invoices
            .list(filter)
            .await
            .map_err(ServiceError::remote(Operation::LoadInvoices))
    }

    /// Load an invoice with its items.
    pub async fn get(&self, id: InvoiceId) -> ServiceResult<Option<Invoice>> {
        let op = Operation::LoadInvoice;
        let Some(record) = self
            .invoices
            .get_by_id(&id)
            .await
            .map_err(ServiceError::remote(op))?
        else {
            return Ok(None);
        };
        let items = self.load_items(id).await.map_err(ServiceError::remote(op))?;
        Ok(Some(Invoice::new(record.id, record.header, items)))
    }

    /// Persist a new invoice and its items.
    ///
    /// If the items cannot be stored the freshly created invoice is removed
    /// again so no half-saved invoice is left behind.
    pub async fn create(&self, submission: InvoiceSubmission) -> ServiceResult<Invoice> {
        let op = Operation::CreateInvoice;
        let (header, items) = submission.into_parts();
        if header.status() != InvoiceStatus::Draft {
            return Err(DomainError::invariant("new invoices start as draft").into());
        }

        let record = self
            .invoices
            .create(vec![header])
            .await
            .map_err(ServiceError::remote(op))?
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::Remote {
                operation: op,
                source: crate::records::RecordError::Rejected(
                    "backend returned no invoice record".to_string(),
                ),
            })?;

        let items = match self.store_items(record.id, items).await {
            Ok(items) => items,
            Err(source) => {
                if let Err(cleanup) = self.invoices.delete(&[record.id]).await {
                    warn!(invoice_id = %record.id, error = %cleanup, "failed to roll back invoice after item failure");
                }
                return Err(ServiceError::Remote { operation: op, source });
            }
        };

        info!(invoice_id = %record.id, number = %record.name, items = items.len(), "invoice created");
        Ok(Invoice::new(record.id, record.header, items))
    }

    /// Replace an invoice's header and its full item set.
    ///
    /// If the new items cannot be stored, the previous items and header are
    /// written back so the stored totals keep matching the stored items.
    pub async fn update(&self, id: InvoiceId, submission: InvoiceSubmission) -> ServiceResult<Invoice> {
        let op = Operation::UpdateInvoice;
        let (header, items) = submission.into_parts();

        let previous = self
            .invoices
            .get_by_id(&id)
            .await
            .map_err(ServiceError::remote(op))?
            .ok_or(DomainError::NotFound)?;
        let previous_items = self.load_items(id).await.map_err(ServiceError::remote(op))?;

        let record = self
            .invoices
            .update(&id, header)
            .await
            .map_err(ServiceError::remote(op))?;

        if let Err(source) = self.delete_items(id).await {
            self.restore_header(id, previous.header).await;
            return Err(ServiceError::Remote { operation: op, source });
        }
        let items = match self.store_items(id, items).await {
            Ok(items) => items,
            Err(source) => {
                if let Err(err) = self.store_items(id, previous_items).await {
                    warn!(invoice_id = %id, error = %err, "failed to restore items after update failure");
                }
                self.restore_header(id, previous.header).await;
                return Err(ServiceError::Remote { operation: op, source });
            }
        };

        info!(invoice_id = %id, items = items.len(), "invoice updated");
        Ok(Invoice::new(record.id, record.header, items))
    }

    /// Delete an invoice, then its items.
    pub async fn delete(&self, id: InvoiceId) -> ServiceResult<()> {
        self.invoices
            .delete(&[id])
            .await
            .map_err(ServiceError::remote(Operation::DeleteInvoice))?;

        if let Err(err) = self.delete_items(id).await {
            warn!(invoice_id = %id, error = %err, "invoice deleted but its items were not");
        }
        info!(invoice_id = %id, "invoice deleted");
        Ok(())
    }

    /// Apply a lifecycle action to a persisted invoice, updating it in place.
    pub async fn transition(
        &self,
        id: InvoiceId,
        action: LifecycleAction,
    ) -> ServiceResult<InvoiceRecord> {
        let op = Operation::UpdateStatus;
        let mut record = self
            .invoices
            .get_by_id(&id)
            .await
            .map_err(ServiceError::remote(op))?
            .ok_or(DomainError::NotFound)?;

        let from = record.header.status();
        let to = record.header.apply(action, true)?;

        let updated = self
            .invoices
            .update(&id, record.header)
            .await
            .map_err(ServiceError::remote(op))?;

        info!(invoice_id = %id, %from, %to, "invoice status changed");
        Ok(updated)
    }

    async fn restore_header(&self, id: InvoiceId, header: InvoiceHeader) {
        if let Err(err) = self.invoices.update(&id, header).await {
            warn!(invoice_id = %id, error = %err, "failed to restore invoice header after update failure");
        }
    }

    async fn load_items(&self, id: InvoiceId) -> RecordResult<Vec<LineItem>> {
        let records = self.items.list(&ItemFilter::for_invoice(id)).await?;
        Ok(records.into_iter().map(|r| r.item).collect())
    }

    async fn store_items(&self, id: InvoiceId, items: Vec<LineItem>) -> RecordResult<Vec<LineItem>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }
        let fields = items
            .into_iter()
            .map(|item| InvoiceItemFields { invoice: id, item })
            .collect();
        let created = self.items.create(fields).await?;
        Ok(created.into_iter().map(|r| r.item).collect())
    }

    async fn delete_items(&self, id: InvoiceId) -> RecordResult<()> {
        let ids: Vec<LineItemId> = self
            .items
            .list(&ItemFilter::for_invoice(id))
            .await?
            .into_iter()
            .map(|r| r.id)
            .collect();
        if ids.is_empty() {
            return Ok(());
        }
        self.items.delete(&ids).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;

    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use prathabill_invoicing::{FormDefaults, InvoiceForm};

    use super::*;
    use crate::records::{InMemoryRecordStore, RecordError, RecordStore};

    struct Harness {
        invoices: Arc<InMemoryRecordStore<InvoiceRecord>>,
        items: Arc<InMemoryRecordStore<InvoiceItemRecord>>,
        service: InvoiceService,
    }

    fn harness() -> Harness {
        let invoices = Arc::new(InMemoryRecordStore::new());
        let items = Arc::new(InMemoryRecordStore::new());
        let service = InvoiceService::new(invoices.clone(), items.clone());
        Harness {
            invoices,
            items,
            service,
        }
    }

    fn submission(client: &str, issue: &str, rows: &[(&str, &str, &str)]) -> InvoiceSubmission {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let mut form = InvoiceForm::new_draft("INV-2610-001", today, &FormDefaults::default());
        form.set_client_name(client);
        form.set_client_email(format!("{}@example.com", client.to_lowercase()));
        form.set_issue_date(issue);
        for (i, (description, qty, rate)) in rows.iter().enumerate() {
            if i > 0 {
                form.add_item();
            }
            form.set_item_description(i, *description).unwrap();
            form.set_item_quantity(i, qty).unwrap();
            form.set_item_rate(i, rate).unwrap();
        }
        form.submit().unwrap()
    }

    #[tokio::test]
    async fn create_persists_header_and_items() {
        let h = harness();
        let invoice = h
            .service
            .create(submission("Acme", "2026-10-19", &[("Design", "2", "500")]))
            .await
            .unwrap();

        assert_eq!(invoice.status(), InvoiceStatus::Draft);
        assert_eq!(invoice.header().totals().total(), Decimal::from(1180));
        assert_eq!(h.invoices.len(), 1);
        assert_eq!(h.items.len(), 1);

        let loaded = h.service.get(invoice.id).await.unwrap().unwrap();
        assert_eq!(loaded, invoice);
    }

    #[tokio::test]
    async fn update_replaces_all_items() {
        let h = harness();
        let invoice = h
            .service
            .create(submission(
                "Acme",
                "2026-10-19",
                &[("Design", "2", "500"), ("Hosting", "1", "100")],
            ))
            .await
            .unwrap();
        assert_eq!(h.items.len(), 2);

        let updated = h
            .service
            .update(invoice.id, submission("Acme", "2026-10-19", &[("Audit", "3", "10")]))
            .await
            .unwrap();

        assert_eq!(updated.id, invoice.id);
        assert_eq!(updated.items().len(), 1);
        assert_eq!(updated.items()[0].description, "Audit");
        assert_eq!(h.items.len(), 1);
        assert_eq!(updated.header().totals().subtotal(), Decimal::from(30));
    }

    /// Item store that can be told to reject its next bulk create.
    struct FlakyItems {
        inner: InMemoryRecordStore<InvoiceItemRecord>,
        reject_next_create: AtomicBool,
    }

    #[async_trait]
    impl RecordStore<InvoiceItemRecord> for FlakyItems {
        async fn list(&self, filter: &ItemFilter) -> RecordResult<Vec<InvoiceItemRecord>> {
            self.inner.list(filter).await
        }

        async fn get_by_id(&self, id: &LineItemId) -> RecordResult<Option<InvoiceItemRecord>> {
            self.inner.get_by_id(id).await
        }

        async fn create(
            &self,
            fields: Vec<InvoiceItemFields>,
        ) -> RecordResult<Vec<InvoiceItemRecord>> {
            if self.reject_next_create.swap(false, Ordering::SeqCst) {
                return Err(RecordError::Rejected("item quota exceeded".to_string()));
            }
            self.inner.create(fields).await
        }

        async fn update(
            &self,
            id: &LineItemId,
            fields: InvoiceItemFields,
        ) -> RecordResult<InvoiceItemRecord> {
            self.inner.update(id, fields).await
        }

        async fn delete(&self, ids: &[LineItemId]) -> RecordResult<()> {
            self.inner.delete(ids).await
        }
    }

    #[tokio::test]
    async fn failed_item_rewrite_restores_the_previous_invoice() {
        let invoices = Arc::new(InMemoryRecordStore::<InvoiceRecord>::new());
        let items = Arc::new(FlakyItems {
            inner: InMemoryRecordStore::new(),
            reject_next_create: AtomicBool::new(false),
        });
        let service = InvoiceService::new(invoices.clone(), items.clone());

        let original = service
            .create(submission("Acme", "2026-10-19", &[("Design", "2", "500")]))
            .await
            .unwrap();

        let mut form = InvoiceForm::from_invoice(&original);
        form.set_notes("tweak");
        form.set_item_rate(0, "700").unwrap();
        let edited = form.submit().unwrap();

        items.reject_next_create.store(true, Ordering::SeqCst);
        let err = service.update(original.id, edited).await.unwrap_err();
        assert_eq!(err.user_message(), "Failed to update invoice");

        let stored = service.get(original.id).await.unwrap().unwrap();
        assert_eq!(stored, original);
        let summed = stored
            .items()
            .iter()
            .fold(Decimal::ZERO, |acc, item| acc + item.amount());
        assert_eq!(stored.header().totals().subtotal(), summed);
        assert_eq!(stored.header().notes, "");
    }

    #[tokio::test]
    async fn updating_an_unknown_invoice_is_not_found() {
        let h = harness();
        let err = h
            .service
            .update(InvoiceId::new(), submission("Acme", "2026-10-19", &[("Design", "1", "1")]))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Invoice not found");
    }

    #[tokio::test]
    async fn item_failure_rolls_back_the_new_invoice() {
        let h = harness();
        h.items.set_offline(true);

        let err = h
            .service
            .create(submission("Acme", "2026-10-19", &[("Design", "1", "1")]))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "failed to create invoice");
        assert!(h.invoices.is_empty());
    }

    #[tokio::test]
    async fn delete_removes_invoice_and_items() {
        let h = harness();
        let keep = h
            .service
            .create(submission("Globex", "2026-10-01", &[("Support", "1", "10")]))
            .await
            .unwrap();
        let doomed = h
            .service
            .create(submission("Acme", "2026-10-19", &[("Design", "1", "1")]))
            .await
            .unwrap();

        h.service.delete(doomed.id).await.unwrap();

        assert_eq!(h.invoices.len(), 1);
        assert_eq!(h.items.len(), 1);
        assert!(h.service.get(doomed.id).await.unwrap().is_none());
        assert!(h.service.get(keep.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn deleting_twice_reports_failure() {
        let h = harness();
        let invoice = h
            .service
            .create(submission("Acme", "2026-10-19", &[("Design", "1", "1")]))
            .await
            .unwrap();
        h.service.delete(invoice.id).await.unwrap();

        let err = h.service.delete(invoice.id).await.unwrap_err();
        assert_eq!(err.user_message(), "Failed to delete invoice");
    }

    #[tokio::test]
    async fn transition_walks_the_lifecycle() {
        let h = harness();
        let invoice = h
            .service
            .create(submission("Acme", "2026-10-19", &[("Design", "2", "500")]))
            .await
            .unwrap();

        let sent = h
            .service
            .transition(invoice.id, LifecycleAction::MarkSent)
            .await
            .unwrap();
        assert_eq!(sent.header.status(), InvoiceStatus::Sent);

        let paid = h
            .service
            .transition(invoice.id, LifecycleAction::MarkPaid)
            .await
            .unwrap();
        assert_eq!(paid.header.status(), InvoiceStatus::Paid);

        let err = h
            .service
            .transition(invoice.id, LifecycleAction::MarkOverdue)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::InvariantViolation(_))));

        let stored = h.invoices.get_by_id(&invoice.id).await.unwrap().unwrap();
        assert_eq!(stored.header.status(), InvoiceStatus::Paid);
    }

    #[tokio::test]
    async fn transition_of_unknown_invoice_is_not_found() {
        let h = harness();
        let err = h
            .service
            .transition(InvoiceId::new(), LifecycleAction::MarkSent)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::NotFound)));
    }

    #[tokio::test]
    async fn list_filters_and_orders_by_issue_date() {
        let h = harness();
        for (client, issue) in [
            ("Acme", "2026-09-01"),
            ("Globex", "2026-10-15"),
            ("Acme East", "2026-10-01"),
        ] {
            h.service
                .create(submission(client, issue, &[("Work", "1", "1")]))
                .await
                .unwrap();
        }

        let all = h.service.list(&InvoiceFilter::all()).await.unwrap();
        let clients: Vec<&str> = all.iter().map(|r| r.header.client.name.as_str()).collect();
        assert_eq!(clients, ["Globex", "Acme East", "Acme"]);

        let acme = h
            .service
            .list(&InvoiceFilter::all().with_client_name("acme"))
            .await
            .unwrap();
        assert_eq!(acme.len(), 2);

        let sent = h
            .service
            .list(&InvoiceFilter::all().with_status(InvoiceStatus::Sent))
            .await
            .unwrap();
        assert!(sent.is_empty());
    }

    #[tokio::test]
    async fn offline_backend_surfaces_generic_load_failure() {
        let h = harness();
        h.invoices.set_offline(true);
        let err = h.service.list(&InvoiceFilter::all()).await.unwrap_err();
        assert_eq!(err.user_message(), "Failed to load invoices");
    }
}
