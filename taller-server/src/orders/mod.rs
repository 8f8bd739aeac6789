//! Orders domain
//!
//! - [`lifecycle`] - the status state machine and its guards
//! - [`money`] - decimal totals computation (18% tax)
//! - [`search`] - free-text substring filter
//! - [`maintenance`] - preventive-maintenance reminder evaluation

pub mod lifecycle;
pub mod maintenance;
pub mod money;
pub mod search;

pub use lifecycle::{DiagnosisSubmit, LifecycleError, PaymentInput};
pub use maintenance::{due_reminders, MaintenanceDue, MAINTENANCE_THRESHOLD_DAYS};
pub use money::{compute_totals, TAX_RATE};
pub use search::search;
