//! Domain types for the prescription lifecycle.
//!
//! A `Prescription` is the aggregate root tracking a patient's medication
//! order through the pharmacy workflow. Alerts are operational
//! notifications tied to a prescription and resolved independently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Workflow status of a prescription.
///
/// `Dispensed` and `Expired` are terminal; no further transitions are
/// permitted once either is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrescriptionStatus {
    Pending,
    Processing,
    Ready,
    Dispensed,
    Expired,
}

impl PrescriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrescriptionStatus::Pending => "pending",
            PrescriptionStatus::Processing => "processing",
            PrescriptionStatus::Ready => "ready",
            PrescriptionStatus::Dispensed => "dispensed",
            PrescriptionStatus::Expired => "expired",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(PrescriptionStatus::Pending),
            "processing" => Some(PrescriptionStatus::Processing),
            "ready" => Some(PrescriptionStatus::Ready),
            "dispensed" => Some(PrescriptionStatus::Dispensed),
            "expired" => Some(PrescriptionStatus::Expired),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PrescriptionStatus::Dispensed | PrescriptionStatus::Expired)
    }
}

impl fmt::Display for PrescriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    ControlledSubstance,
    ReadyForPickup,
    Overdue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
}

/// Severity of a drug-drug interaction warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionSeverity {
    Minor,
    Moderate,
    Major,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    StatusChanged,
    Validated,
}

/// Patient contact details, copied onto the prescription at creation
/// time rather than referencing a live patient record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientInfo {
    pub patient_id: String,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

/// One prescribed drug line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub id: String,
    pub name: String,
    pub generic_name: Option<String>,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub quantity: u32,
    pub unit: String,
    pub instructions: String,
    pub is_controlled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionDetails {
    /// Unique prescription number, collision-checked against the store.
    pub number: String,
    pub doctor_name: String,
    pub doctor_license: String,
    pub medications: Vec<Medication>,
    pub instructions: String,
    pub notes: Option<String>,
}

/// A flagged risk between two medications on the same prescription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionWarning {
    pub drug_a: String,
    pub drug_b: String,
    pub severity: InteractionSeverity,
    pub description: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationState {
    pub is_validated: bool,
    pub validated_by: Option<String>,
    pub validation_notes: Option<String>,
    /// Computed once at creation from the medication list present then.
    pub interactions: Vec<InteractionWarning>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionMetadata {
    pub created_by: String,
    pub last_modified_by: String,
    pub priority: Priority,
    pub has_insurance: bool,
    /// Denormalized medication count.
    pub total_items: usize,
}

/// Lifecycle timestamps, each set exactly once when the corresponding
/// status is first reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LifecycleTimestamps {
    pub date_created: DateTime<Utc>,
    pub date_due: DateTime<Utc>,
    pub date_processed: Option<DateTime<Utc>>,
    pub date_ready: Option<DateTime<Utc>>,
    pub date_dispensed: Option<DateTime<Utc>>,
    pub date_expired: Option<DateTime<Utc>>,
}

/// One entry of the structured audit trail kept on each prescription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub action: AuditAction,
    pub message: String,
}

/// The aggregate record for one medication order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: String,
    pub patient: PatientInfo,
    pub details: PrescriptionDetails,
    pub status: PrescriptionStatus,
    pub validation: ValidationState,
    pub metadata: PrescriptionMetadata,
    pub timestamps: LifecycleTimestamps,
    pub audit_log: Vec<AuditEntry>,
}

/// Operational notification tied to a prescription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
    pub prescription_id: String,
    pub created_at: DateTime<Utc>,
    pub is_resolved: bool,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// Aggregate counts over the prescription collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionStats {
    pub total: usize,
    pub by_status: HashMap<String, usize>,
    pub by_priority: HashMap<String, usize>,
    pub ready_count: usize,
}

/// Creation input for a new prescription. Field-level validation is the
/// caller's concern; the factory only rejects an empty medication list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrescriptionInput {
    pub patient_id: String,
    pub patient_name: String,
    pub patient_phone: String,
    pub patient_email: Option<String>,
    pub doctor_name: String,
    pub doctor_license: String,
    pub medications: Vec<MedicationInput>,
    pub instructions: String,
    pub notes: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub has_insurance: bool,
    pub created_by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationInput {
    pub name: String,
    pub generic_name: Option<String>,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub quantity: u32,
    pub unit: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub is_controlled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&PrescriptionStatus::Ready).unwrap();
        assert_eq!(json, "\"ready\"");
        let parsed: PrescriptionStatus = serde_json::from_str("\"dispensed\"").unwrap();
        assert_eq!(parsed, PrescriptionStatus::Dispensed);
    }

    #[test]
    fn status_parse_round_trips() {
        for status in [
            PrescriptionStatus::Pending,
            PrescriptionStatus::Processing,
            PrescriptionStatus::Ready,
            PrescriptionStatus::Dispensed,
            PrescriptionStatus::Expired,
        ] {
            assert_eq!(PrescriptionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(PrescriptionStatus::parse("filled"), None);
    }

    #[test]
    fn alert_type_serializes_snake_case() {
        let json = serde_json::to_string(&AlertType::ReadyForPickup).unwrap();
        assert_eq!(json, "\"ready_for_pickup\"");
    }

    #[test]
    fn terminal_statuses() {
        assert!(PrescriptionStatus::Dispensed.is_terminal());
        assert!(PrescriptionStatus::Expired.is_terminal());
        assert!(!PrescriptionStatus::Ready.is_terminal());
    }
}
