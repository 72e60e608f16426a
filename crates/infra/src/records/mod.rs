//! Record collaborator contract.
//!
//! A record store exposes list/get/create/update/delete over one record type.
//! `create` and `update` echo the persisted record back, including the
//! backend-assigned identifier.

pub mod client;
pub mod in_memory;
pub mod invoice;

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use prathabill_core::Entity;

pub use client::{ClientFilter, ClientRecord};
pub use in_memory::InMemoryRecordStore;
pub use invoice::{InvoiceFilter, InvoiceItemFields, InvoiceItemRecord, InvoiceRecord, ItemFilter};

/// Failure reported by a record collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("record backend unavailable: {0}")]
    Unavailable(String),

    #[error("{kind} record not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("record rejected by backend: {0}")]
    Rejected(String),
}

pub type RecordResult<T> = Result<T, RecordError>;

/// A record type stored by the backend.
pub trait Record: Entity<Id: Send + Sync + 'static> + Clone + Send + Sync + 'static {
    /// Writable fields sent on create/update.
    type Fields: Clone + Send + Sync + 'static;
    /// Query accepted by `list`.
    type Filter: Default + Send + Sync;

    /// Backend table name.
    const KIND: &'static str;

    /// Mint a fresh identifier (used by stores that assign ids locally).
    fn new_id() -> Self::Id;

    fn from_fields(id: Self::Id, fields: Self::Fields) -> Self;

    fn matches(&self, filter: &Self::Filter) -> bool;

    /// Ordering of `list` results. Equal records keep insertion order.
    fn listing_order(&self, _other: &Self) -> Ordering {
        Ordering::Equal
    }
}

/// Remote record collaborator.
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    async fn list(&self, filter: &R::Filter) -> RecordResult<Vec<R>>;

    async fn get_by_id(&self, id: &R::Id) -> RecordResult<Option<R>>;

    /// Bulk create; returns the persisted records in input order.
    async fn create(&self, fields: Vec<R::Fields>) -> RecordResult<Vec<R>>;

    async fn update(&self, id: &R::Id, fields: R::Fields) -> RecordResult<R>;

    /// Delete every id or none of them.
    async fn delete(&self, ids: &[R::Id]) -> RecordResult<()>;
}

/// Shared handle to a collaborator, passed explicitly to services.
pub type SharedStore<R> = Arc<dyn RecordStore<R>>;

#[async_trait]
impl<R, S> RecordStore<R> for Arc<S>
where
    R: Record,
    S: RecordStore<R> + ?Sized,
{
    async fn list(&self, filter: &R::Filter) -> RecordResult<Vec<R>> {
        (**self).list(filter).await
    }

    async fn get_by_id(&self, id: &R::Id) -> RecordResult<Option<R>> {
        (**self).get_by_id(id).await
    }

    async fn create(&self, fields: Vec<R::Fields>) -> RecordResult<Vec<R>> {
        (**self).create(fields).await
    }

    async fn update(&self, id: &R::Id, fields: R::Fields) -> RecordResult<R> {
        (**self).update(id, fields).await
    }

    async fn delete(&self, ids: &[R::Id]) -> RecordResult<()> {
        (**self).delete(ids).await
    }
}
