use thiserror::Error;

use prathabill_core::DomainError;

use crate::records::RecordError;

/// What a service call was trying to do when the backend failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    LoadInvoices,
    LoadInvoice,
    CreateInvoice,
    UpdateInvoice,
    DeleteInvoice,
    UpdateStatus,
    LoadClients,
    LoadClient,
    CreateClient,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::LoadInvoices => "load invoices",
            Operation::LoadInvoice => "load invoice details",
            Operation::CreateInvoice => "create invoice",
            Operation::UpdateInvoice => "update invoice",
            Operation::DeleteInvoice => "delete invoice",
            Operation::UpdateStatus => "update invoice status",
            Operation::LoadClients => "load clients",
            Operation::LoadClient => "load client details",
            Operation::CreateClient => "create client",
        }
    }
}

impl core::fmt::Display for Operation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service-level failure.
///
/// Every backend failure collapses to one generic message per operation; the
/// underlying [`RecordError`] is kept as the source for logs.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("failed to {operation}")]
    Remote {
        operation: Operation,
        #[source]
        source: RecordError,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ServiceError {
    pub fn remote(operation: Operation) -> impl FnOnce(RecordError) -> Self {
        move |source| ServiceError::Remote { operation, source }
    }

    /// Sentence-case message suitable for a notification.
    pub fn user_message(&self) -> String {
        match self {
            ServiceError::Remote { operation, .. } => format!("Failed to {operation}"),
            ServiceError::Domain(DomainError::NotFound) => "Invoice not found".to_string(),
            ServiceError::Domain(err) => err.to_string(),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_failures_use_generic_messages() {
        let err = ServiceError::remote(Operation::DeleteInvoice)(RecordError::Unavailable(
            "timeout".into(),
        ));
        assert_eq!(err.to_string(), "failed to delete invoice");
        assert_eq!(err.user_message(), "Failed to delete invoice");
    }

    #[test]
    fn source_is_preserved() {
        use std::error::Error as _;
        let err = ServiceError::remote(Operation::LoadInvoices)(RecordError::Rejected("bad".into()));
        assert_eq!(
            err.source().map(|s| s.to_string()),
            Some("record rejected by backend: bad".to_string())
        );
    }
}
