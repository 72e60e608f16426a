//! Headless invoicing session: configuration, notifications, presentation
//! helpers and the workspace controller that ties the domain to the record
//! backend.

pub mod clock;
pub mod config;
pub mod notify;
pub mod present;
pub mod workspace;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{BackendConfig, ConfigError, Settings};
pub use notify::{Notification, NotificationLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use workspace::{InvoiceWorkspace, PendingOperation, PendingTracker, ViewMode, WorkspaceError};
