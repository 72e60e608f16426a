//! `prathabill-core` — shared building blocks for the invoicing domain.
//!
//! This crate contains **pure domain** primitives (identifiers, the domain error
//! model, the entity trait). It has no knowledge of storage or presentation.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ClientId, InvoiceId, LineItemId};
