//! RxLedger: a prescription lifecycle engine
//!
//! RxLedger tracks pharmacy prescriptions from intake to dispensing:
//! drug interaction screening at creation, a forward-only status state
//! machine with lifecycle timestamps, operational alerts for controlled
//! substances and pickups, and a scheduler-driven monitoring sweep for
//! overdue and expired prescriptions.

pub mod api;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod model;
pub mod storage;

pub use config::{Config, LifecycleConfig};
pub use error::{ConfigError, LifecycleError, RxError};
pub use lifecycle::interactions::check_interactions;
pub use lifecycle::{MonitorOutcome, PrescriptionService, QueryEngine};
pub use model::{
    Alert, AlertSeverity, AlertType, InteractionWarning, Medication, Prescription,
    PrescriptionInput, PrescriptionStats, PrescriptionStatus, Priority,
};
pub use storage::{FileStore, MemoryStore, RecordStore, StoreError};
