//! Runtime configuration from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `PRATHABILL_DEFAULT_TAX_RATE` | `18` |
//! | `PRATHABILL_PAYMENT_TERMS_DAYS` | `30` |
//! | `PRATHABILL_INVOICE_PREFIX` | `INV` |
//! | `PRATHABILL_LOG_FORMAT` | `json` |
//! | `APPER_PROJECT_ID`, `APPER_PUBLIC_KEY` | unset (no remote backend) |

use core::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use prathabill_invoicing::{FormDefaults, InvoiceNumberGenerator};
use prathabill_observability::LogFormat;

pub const TAX_RATE_VAR: &str = "PRATHABILL_DEFAULT_TAX_RATE";
pub const PAYMENT_TERMS_VAR: &str = "PRATHABILL_PAYMENT_TERMS_DAYS";
pub const INVOICE_PREFIX_VAR: &str = "PRATHABILL_INVOICE_PREFIX";
pub const LOG_FORMAT_VAR: &str = "PRATHABILL_LOG_FORMAT";
pub const PROJECT_ID_VAR: &str = "APPER_PROJECT_ID";
pub const PUBLIC_KEY_VAR: &str = "APPER_PUBLIC_KEY";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("{missing} must be set together with {present}")]
    IncompleteBackend {
        present: &'static str,
        missing: &'static str,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Session parameters for the remote record backend.
#[derive(Clone, PartialEq, Eq)]
pub struct BackendConfig {
    pub project_id: String,
    pub public_key: String,
}

impl core::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("project_id", &self.project_id)
            .field("public_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub defaults: FormDefaults,
    pub invoice_prefix: String,
    pub log_format: LogFormat,
    pub backend: Option<BackendConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            defaults: FormDefaults::default(),
            invoice_prefix: prathabill_invoicing::numbering::DEFAULT_PREFIX.to_string(),
            log_format: LogFormat::default(),
            backend: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut settings = Settings::default();

        if let Some(raw) = get(TAX_RATE_VAR) {
            let rate = Decimal::from_str(raw.trim())
                .map_err(|e| ConfigError::invalid(TAX_RATE_VAR, &raw, e.to_string()))?;
            if rate < Decimal::ZERO || rate > Decimal::ONE_HUNDRED {
                return Err(ConfigError::invalid(
                    TAX_RATE_VAR,
                    &raw,
                    "must be between 0 and 100",
                ));
            }
            settings.defaults.tax_rate = rate;
        }

        if let Some(raw) = get(PAYMENT_TERMS_VAR) {
            settings.defaults.payment_terms_days = raw
                .trim()
                .parse()
                .map_err(|e: core::num::ParseIntError| {
                    ConfigError::invalid(PAYMENT_TERMS_VAR, &raw, e.to_string())
                })?;
        }

        if let Some(raw) = get(INVOICE_PREFIX_VAR) {
            let prefix = raw.trim();
            if !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(ConfigError::invalid(
                    INVOICE_PREFIX_VAR,
                    &raw,
                    "must be ASCII letters and digits",
                ));
            }
            settings.invoice_prefix = prefix.to_string();
        }

        if let Some(raw) = get(LOG_FORMAT_VAR) {
            settings.log_format = raw
                .parse()
                .map_err(|e: prathabill_observability::ParseLogFormatError| {
                    ConfigError::invalid(LOG_FORMAT_VAR, &raw, e.to_string())
                })?;
        }

        settings.backend = match (get(PROJECT_ID_VAR), get(PUBLIC_KEY_VAR)) {
            (Some(project_id), Some(public_key)) => Some(BackendConfig {
                project_id: project_id.trim().to_string(),
                public_key: public_key.trim().to_string(),
            }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ConfigError::IncompleteBackend {
                    present: PROJECT_ID_VAR,
                    missing: PUBLIC_KEY_VAR,
                });
            }
            (None, Some(_)) => {
                return Err(ConfigError::IncompleteBackend {
                    present: PUBLIC_KEY_VAR,
                    missing: PROJECT_ID_VAR,
                });
            }
        };

        Ok(settings)
    }

    pub fn numbering(&self) -> InvoiceNumberGenerator {
        InvoiceNumberGenerator::new(self.invoice_prefix.clone())
    }
}
