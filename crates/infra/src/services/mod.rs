//! Save flows over the record collaborators.

pub mod clients;
pub mod error;
pub mod invoices;

pub use clients::ClientService;
pub use error::{Operation, ServiceError, ServiceResult};
pub use invoices::InvoiceService;
