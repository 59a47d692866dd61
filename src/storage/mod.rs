//! Record store boundary
//!
//! Prescriptions and alerts are persisted as whole collections keyed by
//! collection name. Every mutation in the core is a load-modify-save
//! cycle against this boundary, so a store implementation must provide an
//! atomic load-and-save contract if callers run concurrently.

pub mod persistence;
pub use persistence::FileStore;

use std::fmt;
use std::sync::RwLock;

use crate::model::{Alert, Prescription};

#[derive(Debug, Clone)]
pub enum StoreError {
    Io(String),
    Serialization(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(msg) => write!(f, "Store I/O error: {}", msg),
            StoreError::Serialization(msg) => write!(f, "Store serialization error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Durable key-value persistence for the two lifecycle collections.
pub trait RecordStore: Send + Sync {
    fn load_prescriptions(&self) -> Result<Vec<Prescription>, StoreError>;
    fn save_prescriptions(&self, prescriptions: &[Prescription]) -> Result<(), StoreError>;
    fn load_alerts(&self) -> Result<Vec<Alert>, StoreError>;
    fn save_alerts(&self, alerts: &[Alert]) -> Result<(), StoreError>;
}

/// In-memory store for tests and embedded use.
#[derive(Debug, Default)]
pub struct MemoryStore {
    prescriptions: RwLock<Vec<Prescription>>,
    alerts: RwLock<Vec<Alert>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }
}

impl RecordStore for MemoryStore {
    fn load_prescriptions(&self) -> Result<Vec<Prescription>, StoreError> {
        Ok(self.prescriptions.read().unwrap().clone())
    }

    fn save_prescriptions(&self, prescriptions: &[Prescription]) -> Result<(), StoreError> {
        *self.prescriptions.write().unwrap() = prescriptions.to_vec();
        Ok(())
    }

    fn load_alerts(&self) -> Result<Vec<Alert>, StoreError> {
        Ok(self.alerts.read().unwrap().clone())
    }

    fn save_alerts(&self, alerts: &[Alert]) -> Result<(), StoreError> {
        *self.alerts.write().unwrap() = alerts.to_vec();
        Ok(())
    }
}
