//! Automated monitoring sweep.
//!
//! One pass over the full prescription collection, invoked by an
//! external scheduler. Raises overdue-pickup alerts for ready
//! prescriptions past the pickup threshold and forces expiry of
//! non-terminal prescriptions past their due date. A sweep is
//! idempotent: re-running it immediately changes nothing.

use chrono::{DateTime, Duration, Utc};

use super::{alerts, status};
use crate::config::LifecycleConfig;
use crate::model::{
    Alert, AlertSeverity, AlertType, AuditAction, AuditEntry, Prescription, PrescriptionStatus,
};

/// Actor recorded on automated mutations.
pub const SYSTEM_ACTOR: &str = "system";

/// What one sweep did, for the scheduler's logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonitorOutcome {
    pub overdue_alerts: usize,
    pub expired: usize,
}

pub fn sweep(
    prescriptions: &mut [Prescription],
    alerts: &mut Vec<Alert>,
    config: &LifecycleConfig,
    now: DateTime<Utc>,
) -> MonitorOutcome {
    let mut outcome = MonitorOutcome::default();
    let pickup_threshold = Duration::days(config.pickup_overdue_days);

    // Pass 1: overdue pickups. Suppressed while an unresolved overdue
    // alert already exists for the prescription.
    for rx in prescriptions.iter() {
        if rx.status != PrescriptionStatus::Ready {
            continue;
        }
        let date_ready = match rx.timestamps.date_ready {
            Some(ts) => ts,
            None => continue,
        };
        let waited = now - date_ready;
        if waited >= pickup_threshold && !alerts::has_unresolved(alerts, &rx.id, AlertType::Overdue)
        {
            let message = format!(
                "Prescription {} has been ready for pickup for {} days",
                rx.details.number,
                waited.num_days()
            );
            alerts::raise(alerts, AlertType::Overdue, AlertSeverity::Medium, message, &rx.id);
            outcome.overdue_alerts += 1;
        }
    }

    // Pass 2: forced expiry of anything non-terminal past its due date.
    for rx in prescriptions.iter_mut() {
        if rx.status.is_terminal() || rx.timestamps.date_due >= now {
            continue;
        }
        rx.status = PrescriptionStatus::Expired;
        status::stamp(&mut rx.timestamps, PrescriptionStatus::Expired, now);
        rx.metadata.last_modified_by = SYSTEM_ACTOR.to_string();
        rx.audit_log.push(AuditEntry {
            timestamp: now,
            actor: SYSTEM_ACTOR.to_string(),
            action: AuditAction::StatusChanged,
            message: format!(
                "Status changed to expired: {} days past due",
                (now - rx.timestamps.date_due).num_days()
            ),
        });
        outcome.expired += 1;
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        LifecycleTimestamps, Medication, PatientInfo, PrescriptionDetails, PrescriptionMetadata,
        Priority, ValidationState,
    };

    fn sample_prescription(status: PrescriptionStatus) -> Prescription {
        let now = Utc::now();
        Prescription {
            id: "rx_test".to_string(),
            patient: PatientInfo {
                patient_id: "pat_1".to_string(),
                name: "Ada Lovelace".to_string(),
                phone: "555-0100".to_string(),
                email: None,
            },
            details: PrescriptionDetails {
                number: "RX-TEST0001".to_string(),
                doctor_name: "Dr. Menabrea".to_string(),
                doctor_license: "MD-1842".to_string(),
                medications: vec![Medication {
                    id: "med_1".to_string(),
                    name: "Lisinopril 10mg".to_string(),
                    generic_name: None,
                    dosage: "10mg".to_string(),
                    frequency: "daily".to_string(),
                    duration: "30 days".to_string(),
                    quantity: 30,
                    unit: "tablet".to_string(),
                    instructions: String::new(),
                    is_controlled: false,
                }],
                instructions: "Take with water".to_string(),
                notes: None,
            },
            status,
            validation: ValidationState {
                is_validated: false,
                validated_by: None,
                validation_notes: None,
                interactions: Vec::new(),
            },
            metadata: PrescriptionMetadata {
                created_by: "intake".to_string(),
                last_modified_by: "intake".to_string(),
                priority: Priority::Medium,
                has_insurance: true,
                total_items: 1,
            },
            timestamps: LifecycleTimestamps {
                date_created: now,
                date_due: now + Duration::days(7),
                date_processed: None,
                date_ready: None,
                date_dispensed: None,
                date_expired: None,
            },
            audit_log: Vec::new(),
        }
    }

    #[test]
    fn ready_past_threshold_raises_one_overdue_alert() {
        let now = Utc::now();
        let mut rx = sample_prescription(PrescriptionStatus::Ready);
        rx.timestamps.date_ready = Some(now - Duration::days(4));
        let mut prescriptions = vec![rx];
        let mut alerts = Vec::new();
        let config = LifecycleConfig::default();

        let outcome = sweep(&mut prescriptions, &mut alerts, &config, now);
        assert_eq!(outcome.overdue_alerts, 1);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].alert_type, AlertType::Overdue);
        assert_eq!(alerts[0].severity, AlertSeverity::Medium);
        assert!(alerts[0].message.contains("4 days"));
    }

    #[test]
    fn a_second_sweep_is_idempotent() {
        let now = Utc::now();
        let mut rx = sample_prescription(PrescriptionStatus::Ready);
        rx.timestamps.date_ready = Some(now - Duration::days(4));
        let mut prescriptions = vec![rx];
        let mut alerts = Vec::new();
        let config = LifecycleConfig::default();

        sweep(&mut prescriptions, &mut alerts, &config, now);
        let second = sweep(&mut prescriptions, &mut alerts, &config, now);
        assert_eq!(second, MonitorOutcome::default());
        assert_eq!(alerts.len(), 1);
    }

    #[test]
    fn ready_within_threshold_stays_quiet() {
        let now = Utc::now();
        let mut rx = sample_prescription(PrescriptionStatus::Ready);
        rx.timestamps.date_ready = Some(now - Duration::days(2));
        let mut prescriptions = vec![rx];
        let mut alerts = Vec::new();

        let outcome = sweep(&mut prescriptions, &mut alerts, &LifecycleConfig::default(), now);
        assert_eq!(outcome.overdue_alerts, 0);
        assert!(alerts.is_empty());
    }

    #[test]
    fn past_due_prescriptions_expire() {
        let now = Utc::now();
        let mut rx = sample_prescription(PrescriptionStatus::Pending);
        rx.timestamps.date_created = now - Duration::days(8);
        rx.timestamps.date_due = now - Duration::days(1);
        let mut prescriptions = vec![rx];
        let mut alerts = Vec::new();

        let outcome = sweep(&mut prescriptions, &mut alerts, &LifecycleConfig::default(), now);
        assert_eq!(outcome.expired, 1);
        assert_eq!(prescriptions[0].status, PrescriptionStatus::Expired);
        assert_eq!(prescriptions[0].timestamps.date_expired, Some(now));
        assert_eq!(prescriptions[0].metadata.last_modified_by, SYSTEM_ACTOR);
    }

    #[test]
    fn expiry_does_not_touch_dispensed_prescriptions() {
        let now = Utc::now();
        let mut rx = sample_prescription(PrescriptionStatus::Dispensed);
        rx.timestamps.date_due = now - Duration::days(1);
        let mut prescriptions = vec![rx];
        let mut alerts = Vec::new();

        let outcome = sweep(&mut prescriptions, &mut alerts, &LifecycleConfig::default(), now);
        assert_eq!(outcome.expired, 0);
        assert_eq!(prescriptions[0].status, PrescriptionStatus::Dispensed);
    }

    #[test]
    fn an_expired_prescription_is_not_re_expired() {
        let now = Utc::now();
        let mut rx = sample_prescription(PrescriptionStatus::Pending);
        rx.timestamps.date_due = now - Duration::days(2);
        let mut prescriptions = vec![rx];
        let mut alerts = Vec::new();
        let config = LifecycleConfig::default();

        sweep(&mut prescriptions, &mut alerts, &config, now);
        let stamped = prescriptions[0].timestamps.date_expired;

        let later = now + Duration::hours(1);
        let second = sweep(&mut prescriptions, &mut alerts, &config, later);
        assert_eq!(second.expired, 0);
        assert_eq!(prescriptions[0].timestamps.date_expired, stamped);
    }
}
