//! Invoice status lifecycle.
//!
//! ```text
//! draft --Mark as Sent--> sent --Mark as Paid--> paid
//!   \                      /
//!    `----mark overdue----'--> overdue
//! ```
//!
//! `paid` is terminal. `overdue` has no user-facing trigger; it is only reached
//! through [`LifecycleAction::MarkOverdue`] issued by code.

use core::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use prathabill_core::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Sent,
    Paid,
    Overdue,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "draft",
            InvoiceStatus::Sent => "sent",
            InvoiceStatus::Paid => "paid",
            InvoiceStatus::Overdue => "overdue",
        }
    }

    /// Awaiting payment from the dashboard's point of view.
    pub fn is_pending(&self) -> bool {
        matches!(self, InvoiceStatus::Draft | InvoiceStatus::Sent)
    }

    pub fn is_terminal(&self) -> bool {
        *self == InvoiceStatus::Paid
    }
}

impl core::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(InvoiceStatus::Draft),
            "sent" => Ok(InvoiceStatus::Sent),
            "paid" => Ok(InvoiceStatus::Paid),
            "overdue" => Ok(InvoiceStatus::Overdue),
            other => Err(DomainError::validation(format!(
                "unknown invoice status: {other}"
            ))),
        }
    }
}

/// A status-changing action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleAction {
    MarkSent,
    MarkPaid,
    MarkOverdue,
}

impl LifecycleAction {
    pub fn label(&self) -> &'static str {
        match self {
            LifecycleAction::MarkSent => "Mark as Sent",
            LifecycleAction::MarkPaid => "Mark as Paid",
            LifecycleAction::MarkOverdue => "Mark as Overdue",
        }
    }

    pub fn target(&self) -> InvoiceStatus {
        match self {
            LifecycleAction::MarkSent => InvoiceStatus::Sent,
            LifecycleAction::MarkPaid => InvoiceStatus::Paid,
            LifecycleAction::MarkOverdue => InvoiceStatus::Overdue,
        }
    }
}

/// The single user-facing action offered for an invoice in `status`.
pub fn forward_action(status: InvoiceStatus) -> Option<LifecycleAction> {
    match status {
        InvoiceStatus::Draft => Some(LifecycleAction::MarkSent),
        InvoiceStatus::Sent => Some(LifecycleAction::MarkPaid),
        InvoiceStatus::Paid | InvoiceStatus::Overdue => None,
    }
}

/// Decide the status that results from applying `action` to `from`.
///
/// `persisted` is whether the invoice already has a backend id; sending and
/// paying require it.
pub fn transition(
    from: InvoiceStatus,
    action: LifecycleAction,
    persisted: bool,
) -> DomainResult<InvoiceStatus> {
    match (from, action) {
        (InvoiceStatus::Draft, LifecycleAction::MarkSent)
        | (InvoiceStatus::Sent, LifecycleAction::MarkPaid) => {
            if !persisted {
                return Err(DomainError::invariant(format!(
                    "'{}' requires a saved invoice",
                    action.label()
                )));
            }
            Ok(action.target())
        }
        (InvoiceStatus::Paid, LifecycleAction::MarkOverdue) => Err(DomainError::invariant(
            "a paid invoice cannot become overdue",
        )),
        (_, LifecycleAction::MarkOverdue) => Ok(InvoiceStatus::Overdue),
        (from, action) => Err(DomainError::invariant(format!(
            "'{}' is not allowed for a {from} invoice",
            action.label()
        ))),
    }
}

/// Whether an unpaid invoice has passed its due date as of `today`.
pub fn is_past_due(status: InvoiceStatus, due_date: NaiveDate, today: NaiveDate) -> bool {
    status.is_pending() && due_date < today
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [InvoiceStatus; 4] = [
        InvoiceStatus::Draft,
        InvoiceStatus::Sent,
        InvoiceStatus::Paid,
        InvoiceStatus::Overdue,
    ];

    #[test]
    fn draft_to_sent_to_paid() {
        let mut status = InvoiceStatus::default();
        assert_eq!(status, InvoiceStatus::Draft);
        assert_eq!(forward_action(status), Some(LifecycleAction::MarkSent));

        status = transition(status, LifecycleAction::MarkSent, true).unwrap();
        assert_eq!(status, InvoiceStatus::Sent);
        assert_eq!(forward_action(status), Some(LifecycleAction::MarkPaid));

        status = transition(status, LifecycleAction::MarkPaid, true).unwrap();
        assert_eq!(status, InvoiceStatus::Paid);
        assert_eq!(forward_action(status), None);
    }

    #[test]
    fn forward_action_always_targets_a_legal_transition() {
        for status in ALL {
            if let Some(action) = forward_action(status) {
                assert_eq!(transition(status, action, true), Ok(action.target()));
            }
        }
    }

    #[test]
    fn sending_requires_a_saved_invoice() {
        let err = transition(InvoiceStatus::Draft, LifecycleAction::MarkSent, false).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn no_skipping_or_reversing() {
        assert!(transition(InvoiceStatus::Draft, LifecycleAction::MarkPaid, true).is_err());
        assert!(transition(InvoiceStatus::Paid, LifecycleAction::MarkSent, true).is_err());
        assert!(transition(InvoiceStatus::Sent, LifecycleAction::MarkSent, true).is_err());
        assert!(transition(InvoiceStatus::Overdue, LifecycleAction::MarkPaid, true).is_err());
    }

    #[test]
    fn paid_is_terminal() {
        for action in [
            LifecycleAction::MarkSent,
            LifecycleAction::MarkPaid,
            LifecycleAction::MarkOverdue,
        ] {
            assert!(transition(InvoiceStatus::Paid, action, true).is_err());
        }
        assert!(InvoiceStatus::Paid.is_terminal());
    }

    #[test]
    fn overdue_is_reachable_from_any_unpaid_state_without_an_id() {
        for status in [InvoiceStatus::Draft, InvoiceStatus::Sent, InvoiceStatus::Overdue] {
            assert_eq!(
                transition(status, LifecycleAction::MarkOverdue, false),
                Ok(InvoiceStatus::Overdue)
            );
        }
        assert_eq!(forward_action(InvoiceStatus::Overdue), None);
    }

    #[test]
    fn past_due_only_counts_unpaid_invoices() {
        let due = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        assert!(is_past_due(InvoiceStatus::Sent, due, today));
        assert!(is_past_due(InvoiceStatus::Draft, due, today));
        assert!(!is_past_due(InvoiceStatus::Paid, due, today));
        assert!(!is_past_due(InvoiceStatus::Overdue, due, today));
        assert!(!is_past_due(InvoiceStatus::Sent, today, today));
    }

    #[test]
    fn status_parses_and_serializes_lowercase() {
        for status in ALL {
            assert_eq!(status.as_str().parse::<InvoiceStatus>(), Ok(status));
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
        assert!("void".parse::<InvoiceStatus>().is_err());
    }
}
