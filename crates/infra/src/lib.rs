//! Infrastructure layer: record collaborators and the services that drive them.
//!
//! Persistence lives in an external record backend. This crate defines the
//! collaborator contract ([`records::RecordStore`]), an in-memory implementation
//! for tests and local runs, and the invoice/client save flows on top of it.

pub mod records;
pub mod services;

pub use records::{
    ClientFilter, ClientRecord, InMemoryRecordStore, InvoiceFilter, InvoiceItemFields,
    InvoiceItemRecord, InvoiceRecord, ItemFilter, Record, RecordError, RecordResult, RecordStore,
    SharedStore,
};
pub use services::{ClientService, InvoiceService, Operation, ServiceError, ServiceResult};
