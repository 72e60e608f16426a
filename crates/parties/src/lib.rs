//! Parties domain module (clients that invoices are billed to).
//!
//! This crate contains the client directory model and contact validation,
//! implemented purely as deterministic domain logic (no IO, no storage).

pub mod client;
pub mod email;

pub use client::{BillTo, Client};
pub use email::is_valid_email;
