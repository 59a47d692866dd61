//! Read-only queries and statistics over the prescription collection.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::config::LifecycleConfig;
use crate::model::{Prescription, PrescriptionStats, PrescriptionStatus};
use crate::storage::{RecordStore, StoreError};

pub struct QueryEngine {
    store: Arc<dyn RecordStore>,
    config: LifecycleConfig,
}

impl QueryEngine {
    pub fn new(store: Arc<dyn RecordStore>, config: LifecycleConfig) -> Self {
        QueryEngine { store, config }
    }

    pub fn all(&self) -> Result<Vec<Prescription>, StoreError> {
        self.store.load_prescriptions()
    }

    pub fn by_status(&self, status: PrescriptionStatus) -> Result<Vec<Prescription>, StoreError> {
        let prescriptions = self.store.load_prescriptions()?;
        Ok(prescriptions.into_iter().filter(|p| p.status == status).collect())
    }

    /// Ready prescriptions waiting longer than the pickup threshold.
    /// Mirrors the monitor's cutoff without mutating anything.
    pub fn overdue(&self) -> Result<Vec<Prescription>, StoreError> {
        let now = Utc::now();
        let threshold = Duration::days(self.config.pickup_overdue_days);
        let prescriptions = self.store.load_prescriptions()?;

        Ok(prescriptions
            .into_iter()
            .filter(|p| {
                p.status == PrescriptionStatus::Ready
                    && p.timestamps
                        .date_ready
                        .map_or(false, |ready| now - ready > threshold)
            })
            .collect())
    }

    /// Case-insensitive substring search over patient name, doctor name,
    /// and medication names.
    pub fn search(&self, query: &str) -> Result<Vec<Prescription>, StoreError> {
        let needle = query.to_lowercase();
        let prescriptions = self.store.load_prescriptions()?;

        Ok(prescriptions
            .into_iter()
            .filter(|p| {
                p.patient.name.to_lowercase().contains(&needle)
                    || p.details.doctor_name.to_lowercase().contains(&needle)
                    || p.details.medications.iter().any(|m| {
                        m.name.to_lowercase().contains(&needle)
                            || m.generic_name
                                .as_deref()
                                .map_or(false, |g| g.to_lowercase().contains(&needle))
                    })
            })
            .collect())
    }

    pub fn stats(&self) -> Result<PrescriptionStats, StoreError> {
        let prescriptions = self.store.load_prescriptions()?;

        let mut by_status: HashMap<String, usize> = HashMap::new();
        let mut by_priority: HashMap<String, usize> = HashMap::new();
        for rx in &prescriptions {
            *by_status.entry(rx.status.as_str().to_string()).or_insert(0) += 1;
            *by_priority
                .entry(rx.metadata.priority.as_str().to_string())
                .or_insert(0) += 1;
        }

        let ready_count = prescriptions
            .iter()
            .filter(|p| p.status == PrescriptionStatus::Ready)
            .count();

        Ok(PrescriptionStats {
            total: prescriptions.len(),
            by_status,
            by_priority,
            ready_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::PrescriptionService;
    use crate::model::{MedicationInput, PrescriptionInput, Priority};
    use crate::storage::MemoryStore;
    use pretty_assertions::assert_eq;

    fn input(patient: &str, doctor: &str, med: &str) -> PrescriptionInput {
        PrescriptionInput {
            patient_id: "pat_1".to_string(),
            patient_name: patient.to_string(),
            patient_phone: "555-0100".to_string(),
            patient_email: None,
            doctor_name: doctor.to_string(),
            doctor_license: "MD-1001".to_string(),
            medications: vec![MedicationInput {
                name: med.to_string(),
                generic_name: None,
                dosage: "1 tablet".to_string(),
                frequency: "daily".to_string(),
                duration: "30 days".to_string(),
                quantity: 30,
                unit: "tablet".to_string(),
                instructions: String::new(),
                is_controlled: false,
            }],
            instructions: "Take as directed".to_string(),
            notes: None,
            priority: Priority::Medium,
            has_insurance: true,
            created_by: "intake".to_string(),
        }
    }

    fn engine_with_service() -> (QueryEngine, PrescriptionService) {
        let store = Arc::new(MemoryStore::new());
        let service = PrescriptionService::new(store.clone(), LifecycleConfig::default());
        let engine = QueryEngine::new(store, LifecycleConfig::default());
        (engine, service)
    }

    #[test]
    fn stats_count_statuses_and_priorities() {
        let (engine, service) = engine_with_service();
        let first = service
            .create_prescription(input("Ada Lovelace", "Dr. Menabrea", "Lisinopril 10mg"))
            .unwrap();
        let second = service
            .create_prescription(input("Grace Hopper", "Dr. Aiken", "Metformin 500mg"))
            .unwrap();

        service
            .update_status(&first.id, PrescriptionStatus::Ready, "tech", None)
            .unwrap();
        service
            .update_status(&second.id, PrescriptionStatus::Dispensed, "tech", None)
            .unwrap();

        let stats = engine.stats().unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.by_status.get("ready"), Some(&1));
        assert_eq!(stats.by_status.get("dispensed"), Some(&1));
        assert_eq!(stats.by_priority.get("medium"), Some(&2));
        assert_eq!(stats.ready_count, 1);
    }

    #[test]
    fn by_status_filters_exactly() {
        let (engine, service) = engine_with_service();
        let rx = service
            .create_prescription(input("Ada Lovelace", "Dr. Menabrea", "Lisinopril 10mg"))
            .unwrap();
        service
            .create_prescription(input("Grace Hopper", "Dr. Aiken", "Metformin 500mg"))
            .unwrap();
        service
            .update_status(&rx.id, PrescriptionStatus::Processing, "tech", None)
            .unwrap();

        let processing = engine.by_status(PrescriptionStatus::Processing).unwrap();
        assert_eq!(processing.len(), 1);
        assert_eq!(processing[0].id, rx.id);
        assert_eq!(engine.by_status(PrescriptionStatus::Pending).unwrap().len(), 1);
        assert!(engine.by_status(PrescriptionStatus::Expired).unwrap().is_empty());
    }

    #[test]
    fn search_matches_patient_doctor_and_medication() {
        let (engine, service) = engine_with_service();
        service
            .create_prescription(input("Ada Lovelace", "Dr. Menabrea", "Lisinopril 10mg"))
            .unwrap();
        service
            .create_prescription(input("Grace Hopper", "Dr. Aiken", "Metformin 500mg"))
            .unwrap();

        assert_eq!(engine.search("lovelace").unwrap().len(), 1);
        assert_eq!(engine.search("AIKEN").unwrap().len(), 1);
        assert_eq!(engine.search("metformin").unwrap().len(), 1);
        assert_eq!(engine.search("dr.").unwrap().len(), 2);
        assert!(engine.search("penicillin").unwrap().is_empty());
    }

    #[test]
    fn overdue_requires_ready_past_the_threshold() {
        let store = Arc::new(MemoryStore::new());
        let service = PrescriptionService::new(store.clone(), LifecycleConfig::default());
        let engine = QueryEngine::new(store.clone(), LifecycleConfig::default());

        let rx = service
            .create_prescription(input("Ada Lovelace", "Dr. Menabrea", "Lisinopril 10mg"))
            .unwrap();
        service
            .update_status(&rx.id, PrescriptionStatus::Ready, "tech", None)
            .unwrap();
        assert!(engine.overdue().unwrap().is_empty());

        // Backdate the ready stamp past the threshold
        let mut prescriptions = store.load_prescriptions().unwrap();
        prescriptions[0].timestamps.date_ready = Some(Utc::now() - Duration::days(4));
        store.save_prescriptions(&prescriptions).unwrap();

        let overdue = engine.overdue().unwrap();
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].id, rx.id);
    }
}
