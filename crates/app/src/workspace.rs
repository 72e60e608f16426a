//! Invoice session controller.
//!
//! Owns the locally cached invoice list, the dashboard figures derived from it,
//! the current view and the editor form. Every operation goes to the record
//! backend first; local state only changes after the backend succeeded.

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{error, info};

use prathabill_core::InvoiceId;
use prathabill_infra::{InvoiceFilter, InvoiceRecord, InvoiceService, Record, ServiceError};
use prathabill_invoicing::{
    DashboardStats, FormDefaults, Invoice, InvoiceForm, InvoiceNumberGenerator, LifecycleAction,
    ValidationErrors,
};

use crate::clock::Clock;
use crate::config::Settings;
use crate::notify::{Notification, Notifier};

const CREATED: &str = "Invoice created successfully!";
const UPDATED: &str = "Invoice updated successfully!";
const DELETED: &str = "Invoice deleted successfully!";
const REQUIRED_FIELDS: &str = "Please fill in all required fields";

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("form has invalid fields ({0})")]
    Validation(ValidationErrors),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("invoice {0} does not exist")]
    NoSuchInvoice(InvoiceId),

    #[error("no invoice form is open")]
    NotEditing,
}

/// What the session is showing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewMode {
    List,
    /// Editor; `editing` is set when an existing invoice is being changed.
    Create { editing: Option<InvoiceId> },
    Detail(Box<Invoice>),
}

/// Backend call in flight, for a busy indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingOperation {
    Loading,
    Saving,
    Deleting(InvoiceId),
    UpdatingStatus(InvoiceId),
}

/// Shared view of the backend call in flight.
///
/// Clones observe the same slot, so a UI can hold one while the workspace is
/// busy. The slot is cleared when the call finishes or its future is dropped.
#[derive(Debug, Clone, Default)]
pub struct PendingTracker(Arc<Mutex<Option<PendingOperation>>>);

impl PendingTracker {
    pub fn current(&self) -> Option<PendingOperation> {
        self.0.lock().ok().and_then(|slot| *slot)
    }

    fn begin(&self, operation: PendingOperation) -> PendingGuard {
        self.set(Some(operation));
        PendingGuard(self.clone())
    }

    fn set(&self, value: Option<PendingOperation>) {
        if let Ok(mut slot) = self.0.lock() {
            *slot = value;
        }
    }
}

struct PendingGuard(PendingTracker);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.set(None);
    }
}

pub struct InvoiceWorkspace {
    service: InvoiceService,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    numbering: InvoiceNumberGenerator,
    defaults: FormDefaults,
    invoices: Vec<InvoiceRecord>,
    stats: DashboardStats,
    view: ViewMode,
    form: InvoiceForm,
    pending: PendingTracker,
}

impl InvoiceWorkspace {
    pub fn new(service: InvoiceService, notifier: Arc<dyn Notifier>, clock: Arc<dyn Clock>) -> Self {
        Self::with_settings(service, notifier, clock, &Settings::default())
    }

    pub fn with_settings(
        service: InvoiceService,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        settings: &Settings,
    ) -> Self {
        Self {
            service,
            notifier,
            clock,
            numbering: settings.numbering(),
            defaults: settings.defaults,
            invoices: Vec::new(),
            stats: DashboardStats::default(),
            view: ViewMode::List,
            form: InvoiceForm::blank(settings.defaults.tax_rate),
            pending: PendingTracker::default(),
        }
    }

    /// Cached invoice headers, newest issue date first.
    pub fn invoices(&self) -> &[InvoiceRecord] {
        &self.invoices
    }

    pub fn dashboard(&self) -> &DashboardStats {
        &self.stats
    }

    pub fn view(&self) -> &ViewMode {
        &self.view
    }

    pub fn detail(&self) -> Option<&Invoice> {
        match &self.view {
            ViewMode::Detail(invoice) => Some(&**invoice),
            _ => None,
        }
    }

    pub fn form(&self) -> &InvoiceForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut InvoiceForm {
        &mut self.form
    }

    pub fn pending(&self) -> Option<PendingOperation> {
        self.pending.current()
    }

    /// Handle for observing [`Self::pending`] while an operation runs.
    pub fn pending_tracker(&self) -> PendingTracker {
        self.pending.clone()
    }

    /// The single forward lifecycle action offered by the detail view.
    pub fn forward_action(&self) -> Option<LifecycleAction> {
        self.detail().and_then(Invoice::forward_action)
    }

    /// Re-fetch every invoice and recompute the dashboard.
    pub async fn load(&mut self) -> Result<(), WorkspaceError> {
        let busy = self.pending.begin(PendingOperation::Loading);
        let result = self.service.list(&InvoiceFilter::all()).await;
        drop(busy);

        let records = result.map_err(|err| self.fail(err))?;
        info!(count = records.len(), "invoices loaded");
        self.invoices = records;
        self.refresh_stats();
        Ok(())
    }

    /// Open the editor on a fresh draft.
    pub fn open_create(&mut self) {
        let today = self.clock.today();
        let number = self.numbering.generate(today, self.invoices.len());
        self.form = InvoiceForm::new_draft(number, today, &self.defaults);
        self.view = ViewMode::Create { editing: None };
    }

    /// Open the editor on an existing invoice, items included.
    pub async fn open_edit(&mut self, id: InvoiceId) -> Result<(), WorkspaceError> {
        let invoice = self.fetch(id).await?;
        self.form = InvoiceForm::from_invoice(&invoice);
        self.view = ViewMode::Create { editing: Some(id) };
        Ok(())
    }

    pub async fn view_detail(&mut self, id: InvoiceId) -> Result<(), WorkspaceError> {
        let invoice = self.fetch(id).await?;
        self.view = ViewMode::Detail(Box::new(invoice));
        Ok(())
    }

    pub fn back_to_list(&mut self) {
        self.form = InvoiceForm::blank(self.defaults.tax_rate);
        self.view = ViewMode::List;
    }

    /// Validate the open form and create or update the invoice.
    pub async fn save(&mut self) -> Result<Invoice, WorkspaceError> {
        let ViewMode::Create { editing } = self.view else {
            return Err(WorkspaceError::NotEditing);
        };
        let submission = match self.form.submit() {
            Ok(submission) => submission,
            Err(errors) => {
                self.notifier.notify(Notification::error(REQUIRED_FIELDS));
                return Err(WorkspaceError::Validation(errors));
            }
        };

        let busy = self.pending.begin(PendingOperation::Saving);
        let result = match editing {
            Some(id) => self.service.update(id, submission).await,
            None => self.service.create(submission).await,
        };
        drop(busy);

        let invoice = result.map_err(|err| self.fail(err))?;
        self.upsert(InvoiceRecord::from_fields(invoice.id, invoice.header().clone()));
        self.refresh_stats();
        self.notifier
            .notify(Notification::success(if editing.is_some() { UPDATED } else { CREATED }));
        self.back_to_list();
        Ok(invoice)
    }

    pub async fn delete(&mut self, id: InvoiceId) -> Result<(), WorkspaceError> {
        let busy = self.pending.begin(PendingOperation::Deleting(id));
        let result = self.service.delete(id).await;
        drop(busy);
        result.map_err(|err| self.fail(err))?;

        self.invoices.retain(|record| record.id != id);
        self.refresh_stats();
        let showing = match &self.view {
            ViewMode::Detail(invoice) => invoice.id == id,
            ViewMode::Create { editing } => *editing == Some(id),
            ViewMode::List => false,
        };
        if showing {
            self.back_to_list();
        }
        self.notifier.notify(Notification::success(DELETED));
        Ok(())
    }

    pub async fn mark_sent(&mut self, id: InvoiceId) -> Result<(), WorkspaceError> {
        self.apply(id, LifecycleAction::MarkSent).await
    }

    pub async fn mark_paid(&mut self, id: InvoiceId) -> Result<(), WorkspaceError> {
        self.apply(id, LifecycleAction::MarkPaid).await
    }

    pub async fn mark_overdue(&mut self, id: InvoiceId) -> Result<(), WorkspaceError> {
        self.apply(id, LifecycleAction::MarkOverdue).await
    }

    /// Mark every cached invoice that is past due on `today` as overdue.
    ///
    /// Stops at the first failure; invoices already marked stay marked.
    pub async fn sweep_overdue(&mut self, today: NaiveDate) -> Result<Vec<InvoiceId>, WorkspaceError> {
        let due: Vec<InvoiceId> = self
            .invoices
            .iter()
            .filter(|record| record.header.is_past_due(today))
            .map(|record| record.id)
            .collect();

        let mut marked = Vec::with_capacity(due.len());
        for id in due {
            self.transition(id, LifecycleAction::MarkOverdue).await?;
            marked.push(id);
        }
        if !marked.is_empty() {
            info!(count = marked.len(), %today, "overdue sweep finished");
            self.notifier.notify(Notification::info(format!(
                "{} invoice(s) marked as overdue",
                marked.len()
            )));
        }
        Ok(marked)
    }

    async fn apply(&mut self, id: InvoiceId, action: LifecycleAction) -> Result<(), WorkspaceError> {
        self.transition(id, action).await?;
        self.notifier.notify(Notification::success(match action {
            LifecycleAction::MarkSent => "Invoice marked as sent!",
            LifecycleAction::MarkPaid => "Invoice marked as paid!",
            LifecycleAction::MarkOverdue => "Invoice marked as overdue!",
        }));
        Ok(())
    }

    async fn transition(&mut self, id: InvoiceId, action: LifecycleAction) -> Result<(), WorkspaceError> {
        let busy = self.pending.begin(PendingOperation::UpdatingStatus(id));
        let result = self.service.transition(id, action).await;
        drop(busy);

        let record = result.map_err(|err| self.fail(err))?;
        if let ViewMode::Detail(invoice) = &mut self.view {
            if invoice.id == id {
                let items = invoice.items().to_vec();
                **invoice = Invoice::new(id, record.header.clone(), items);
            }
        }
        self.upsert(record);
        self.refresh_stats();
        Ok(())
    }

    async fn fetch(&mut self, id: InvoiceId) -> Result<Invoice, WorkspaceError> {
        let busy = self.pending.begin(PendingOperation::Loading);
        let result = self.service.get(id).await;
        drop(busy);

        match result.map_err(|err| self.fail(err))? {
            Some(invoice) => Ok(invoice),
            None => {
                self.notifier.notify(Notification::error("Invoice not found"));
                Err(WorkspaceError::NoSuchInvoice(id))
            }
        }
    }

    fn upsert(&mut self, record: InvoiceRecord) {
        match self.invoices.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => *slot = record,
            None => self.invoices.push(record),
        }
        self.invoices.sort_by(|a, b| a.listing_order(b));
    }

    fn refresh_stats(&mut self) {
        self.stats = DashboardStats::compute(self.invoices.iter().map(|r| &r.header));
    }

    fn fail(&self, err: ServiceError) -> WorkspaceError {
        match std::error::Error::source(&err) {
            Some(source) => error!(error = %err, %source, "invoice operation failed"),
            None => error!(error = %err, "invoice operation failed"),
        }
        self.notifier.notify(Notification::error(err.user_message()));
        WorkspaceError::Service(err)
    }
}
