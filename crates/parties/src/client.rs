use serde::{Deserialize, Serialize};

use prathabill_core::{DomainError, DomainResult};

use crate::email::is_valid_email;

/// Maximum client name length accepted by the directory.
pub const MAX_NAME_LEN: usize = 255;

/// A client in the client directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    name: String,
    email: String,
    address: String,
}

impl Client {
    /// Register a new directory entry.
    ///
    /// Name is trimmed and required; email must be a valid address.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        address: impl Into<String>,
    ) -> DomainResult<Self> {
        let name = name.into().trim().to_string();
        let email = email.into().trim().to_string();

        if name.is_empty() {
            return Err(DomainError::validation("client name is required"));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::validation(format!(
                "client name must be at most {MAX_NAME_LEN} characters"
            )));
        }
        if !is_valid_email(&email) {
            return Err(DomainError::validation("client email is invalid"));
        }

        Ok(Self {
            name,
            email,
            address: address.into(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Case-insensitive substring match used by directory search.
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name
            .to_lowercase()
            .contains(&needle.trim().to_lowercase())
    }

    /// Billing details to copy onto an invoice.
    pub fn bill_to(&self) -> BillTo {
        BillTo {
            name: self.name.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
        }
    }
}

/// Client details as they appear on an invoice.
///
/// Unlike [`Client`], this is raw form data: it may be incomplete while an
/// invoice is being edited and is only checked by the invoice form validator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillTo {
    pub name: String,
    pub email: String,
    pub address: String,
}
