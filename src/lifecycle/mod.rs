//! Prescription lifecycle core.
//!
//! `PrescriptionService` owns every mutation of the prescription and
//! alert collections: creation with interaction screening, status
//! transitions with their alert side effects, pharmacist validation, and
//! the automated monitoring sweep. All operations are synchronous
//! load-modify-save cycles against the injected record store.

pub mod alerts;
pub mod interactions;
pub mod monitor;
pub mod query;
pub mod status;

pub use monitor::MonitorOutcome;
pub use query::QueryEngine;

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::config::LifecycleConfig;
use crate::error::LifecycleError;
use crate::model::{
    Alert, AlertSeverity, AlertType, AuditAction, AuditEntry, LifecycleTimestamps, Medication,
    MedicationInput, PatientInfo, Prescription, PrescriptionDetails, PrescriptionInput,
    PrescriptionMetadata, PrescriptionStatus, ValidationState,
};
use crate::storage::{RecordStore, StoreError};

pub struct PrescriptionService {
    store: Arc<dyn RecordStore>,
    config: LifecycleConfig,
}

impl PrescriptionService {
    pub fn new(store: Arc<dyn RecordStore>, config: LifecycleConfig) -> Self {
        PrescriptionService { store, config }
    }

    /// Builds and persists a new prescription.
    ///
    /// Field-level validation is assumed to have run upstream; the only
    /// guard here is the empty medication list. Screens the medication
    /// list for interactions and raises a controlled-substance alert per
    /// controlled line item.
    pub fn create_prescription(
        &self,
        input: PrescriptionInput,
    ) -> Result<Prescription, LifecycleError> {
        if input.medications.is_empty() {
            return Err(LifecycleError::Validation(
                "a prescription requires at least one medication".to_string(),
            ));
        }

        let mut prescriptions = self.store.load_prescriptions()?;
        let mut alerts = self.store.load_alerts()?;

        let now = Utc::now();
        let number = next_prescription_number(&prescriptions);
        let medications: Vec<Medication> =
            input.medications.into_iter().map(instantiate_medication).collect();
        let interactions = interactions::check_interactions(&medications);
        let total_items = medications.len();

        let prescription = Prescription {
            id: format!("rx_{}", Uuid::new_v4().simple()),
            patient: PatientInfo {
                patient_id: input.patient_id,
                name: input.patient_name,
                phone: input.patient_phone,
                email: input.patient_email,
            },
            details: PrescriptionDetails {
                number,
                doctor_name: input.doctor_name,
                doctor_license: input.doctor_license,
                medications,
                instructions: input.instructions,
                notes: input.notes,
            },
            status: PrescriptionStatus::Pending,
            validation: ValidationState {
                is_validated: false,
                validated_by: None,
                validation_notes: None,
                interactions,
            },
            metadata: PrescriptionMetadata {
                created_by: input.created_by.clone(),
                last_modified_by: input.created_by.clone(),
                priority: input.priority,
                has_insurance: input.has_insurance,
                total_items,
            },
            timestamps: LifecycleTimestamps {
                date_created: now,
                date_due: now + Duration::days(self.config.due_window_days),
                date_processed: None,
                date_ready: None,
                date_dispensed: None,
                date_expired: None,
            },
            audit_log: vec![AuditEntry {
                timestamp: now,
                actor: input.created_by,
                action: AuditAction::Created,
                message: format!("Prescription created with {} medication(s)", total_items),
            }],
        };

        for medication in prescription.details.medications.iter().filter(|m| m.is_controlled) {
            alerts::raise(
                &mut alerts,
                AlertType::ControlledSubstance,
                AlertSeverity::Medium,
                format!("Controlled substance prescribed: {}", medication.name),
                &prescription.id,
            );
        }

        prescriptions.push(prescription.clone());
        self.store.save_prescriptions(&prescriptions)?;
        self.store.save_alerts(&alerts)?;

        Ok(prescription)
    }

    /// Applies a status transition.
    ///
    /// Returns `Ok(false)` without touching anything when the id is
    /// unknown or the transition is illegal. On success stamps the
    /// first-entry timestamp, records an audit entry, fires the alert
    /// side effects, and persists both collections.
    pub fn update_status(
        &self,
        id: &str,
        new_status: PrescriptionStatus,
        actor: &str,
        note: Option<&str>,
    ) -> Result<bool, StoreError> {
        let mut prescriptions = self.store.load_prescriptions()?;

        let index = match prescriptions.iter().position(|p| p.id == id) {
            Some(index) => index,
            None => return Ok(false),
        };
        if !status::can_transition(prescriptions[index].status, new_status) {
            return Ok(false);
        }

        let now = Utc::now();
        {
            let rx = &mut prescriptions[index];
            rx.status = new_status;
            status::stamp(&mut rx.timestamps, new_status, now);
            rx.metadata.last_modified_by = actor.to_string();
            rx.audit_log.push(AuditEntry {
                timestamp: now,
                actor: actor.to_string(),
                action: AuditAction::StatusChanged,
                message: match note {
                    Some(note) => format!("Status changed to {}: {}", new_status, note),
                    None => format!("Status changed to {}", new_status),
                },
            });
        }

        let rx_id = prescriptions[index].id.clone();
        let rx_number = prescriptions[index].details.number.clone();

        let mut alerts = self.store.load_alerts()?;
        match new_status {
            PrescriptionStatus::Ready => {
                // At most one unresolved pickup notice per prescription
                if !alerts::has_unresolved(&alerts, &rx_id, AlertType::ReadyForPickup) {
                    alerts::raise(
                        &mut alerts,
                        AlertType::ReadyForPickup,
                        AlertSeverity::Medium,
                        format!("Prescription {} is ready for pickup", rx_number),
                        &rx_id,
                    );
                }
            }
            PrescriptionStatus::Dispensed => {
                alerts::resolve(&mut alerts, &rx_id, AlertType::ReadyForPickup);
            }
            _ => {}
        }

        self.store.save_prescriptions(&prescriptions)?;
        self.store.save_alerts(&alerts)?;
        Ok(true)
    }

    /// Records a pharmacist's validation. Returns `Ok(false)` for an
    /// unknown id.
    pub fn validate_prescription(
        &self,
        id: &str,
        actor: &str,
        notes: Option<&str>,
    ) -> Result<bool, StoreError> {
        let mut prescriptions = self.store.load_prescriptions()?;

        let rx = match prescriptions.iter_mut().find(|p| p.id == id) {
            Some(rx) => rx,
            None => return Ok(false),
        };

        let now = Utc::now();
        rx.validation.is_validated = true;
        rx.validation.validated_by = Some(actor.to_string());
        rx.validation.validation_notes = notes.map(str::to_string);
        rx.metadata.last_modified_by = actor.to_string();
        rx.audit_log.push(AuditEntry {
            timestamp: now,
            actor: actor.to_string(),
            action: AuditAction::Validated,
            message: match notes {
                Some(notes) => format!("Prescription validated: {}", notes),
                None => "Prescription validated".to_string(),
            },
        });

        self.store.save_prescriptions(&prescriptions)?;
        Ok(true)
    }

    /// Runs one monitoring sweep over the full collection. Intended to
    /// be triggered by an external scheduler; this core keeps no timers
    /// of its own.
    pub fn perform_automated_monitoring(&self) -> Result<MonitorOutcome, StoreError> {
        let mut prescriptions = self.store.load_prescriptions()?;
        let mut alerts = self.store.load_alerts()?;

        let outcome = monitor::sweep(&mut prescriptions, &mut alerts, &self.config, Utc::now());

        self.store.save_prescriptions(&prescriptions)?;
        self.store.save_alerts(&alerts)?;
        Ok(outcome)
    }

    /// The full alert log, resolved and unresolved.
    pub fn alerts(&self) -> Result<Vec<Alert>, StoreError> {
        self.store.load_alerts()
    }
}

fn instantiate_medication(input: MedicationInput) -> Medication {
    Medication {
        id: format!("med_{}", Uuid::new_v4().simple()),
        name: input.name,
        generic_name: input.generic_name,
        dosage: input.dosage,
        frequency: input.frequency,
        duration: input.duration,
        quantity: input.quantity,
        unit: input.unit,
        instructions: input.instructions,
        is_controlled: input.is_controlled,
    }
}

/// Generates a prescription number, retrying until it is unique within
/// the stored collection.
fn next_prescription_number(existing: &[Prescription]) -> String {
    loop {
        let candidate = format!(
            "RX-{}",
            Uuid::new_v4().simple().to_string()[..8].to_uppercase()
        );
        if !existing.iter().any(|p| p.details.number == candidate) {
            return candidate;
        }
    }
}
