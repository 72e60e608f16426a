//! Local demo session: runs one invoice through its lifecycle against
//! in-memory record stores and logs the resulting dashboard.

use std::sync::Arc;

use anyhow::{Context, bail};

use prathabill_app::present::{format_currency, format_date, format_revenue};
use prathabill_app::{InvoiceWorkspace, Settings, SystemClock, TracingNotifier};
use prathabill_infra::{InMemoryRecordStore, InvoiceItemRecord, InvoiceRecord, InvoiceService};
use prathabill_invoicing::LifecycleAction;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env().context("reading configuration")?;
    prathabill_observability::init(settings.log_format);

    match &settings.backend {
        Some(backend) => tracing::warn!(
            project_id = %backend.project_id,
            "no remote record client in this build; using in-memory stores"
        ),
        None => tracing::info!("no backend configured; using in-memory stores"),
    }

    let service = InvoiceService::new(
        Arc::new(InMemoryRecordStore::<InvoiceRecord>::new()),
        Arc::new(InMemoryRecordStore::<InvoiceItemRecord>::new()),
    );
    let mut workspace = InvoiceWorkspace::with_settings(
        service,
        Arc::new(TracingNotifier),
        Arc::new(SystemClock),
        &settings,
    );

    workspace.load().await?;
    workspace.open_create();
    let form = workspace.form_mut();
    form.set_client_name("Acme Traders");
    form.set_client_email("accounts@acme.example");
    form.set_client_address("12 MG Road, Bengaluru");
    form.set_item_description(0, "Design")?;
    form.set_item_quantity(0, "2")?;
    form.set_item_rate(0, "500")?;

    let invoice = workspace.save().await?;
    tracing::info!(
        number = %invoice.header().invoice_number,
        issued = %format_date(invoice.header().issue_date),
        due = %format_date(invoice.header().due_date),
        total = %format_currency(invoice.header().totals().total()),
        "invoice saved"
    );

    workspace.view_detail(invoice.id).await?;
    while let Some(action) = workspace.forward_action() {
        tracing::info!(action = action.label(), "advancing invoice");
        match action {
            LifecycleAction::MarkSent => workspace.mark_sent(invoice.id).await?,
            LifecycleAction::MarkPaid => workspace.mark_paid(invoice.id).await?,
            other => bail!("unexpected forward action {other:?}"),
        }
    }

    let stats = workspace.dashboard();
    tracing::info!(
        invoices = stats.total_invoices,
        pending = stats.pending_payments,
        revenue = %format_revenue(stats.total_revenue),
        clients = stats.active_clients,
        "dashboard"
    );
    Ok(())
}
