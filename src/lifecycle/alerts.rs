//! Alert generation and resolution.
//!
//! Alerts are an append-only log. Resolution marks the most recent
//! matching unresolved entry rather than removing it, so the history of
//! a prescription's notifications stays readable.

use chrono::Utc;
use uuid::Uuid;

use crate::model::{Alert, AlertSeverity, AlertType};

/// Appends a new unresolved alert to the log.
pub fn raise(
    alerts: &mut Vec<Alert>,
    alert_type: AlertType,
    severity: AlertSeverity,
    message: String,
    prescription_id: &str,
) {
    alerts.push(Alert {
        id: format!("alert_{}", Uuid::new_v4().simple()),
        alert_type,
        severity,
        message,
        prescription_id: prescription_id.to_string(),
        created_at: Utc::now(),
        is_resolved: false,
        resolved_at: None,
    });
}

/// Resolves the most recent unresolved alert of the given type for a
/// prescription. Returns `false` when nothing matched.
pub fn resolve(alerts: &mut [Alert], prescription_id: &str, alert_type: AlertType) -> bool {
    let target = alerts
        .iter_mut()
        .rev()
        .find(|a| !a.is_resolved && a.alert_type == alert_type && a.prescription_id == prescription_id);

    match target {
        Some(alert) => {
            alert.is_resolved = true;
            alert.resolved_at = Some(Utc::now());
            true
        }
        None => false,
    }
}

pub fn has_unresolved(alerts: &[Alert], prescription_id: &str, alert_type: AlertType) -> bool {
    alerts
        .iter()
        .any(|a| !a.is_resolved && a.alert_type == alert_type && a.prescription_id == prescription_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raise_appends_an_unresolved_alert() {
        let mut alerts = Vec::new();
        raise(
            &mut alerts,
            AlertType::ReadyForPickup,
            AlertSeverity::Medium,
            "ready".to_string(),
            "rx_1",
        );

        assert_eq!(alerts.len(), 1);
        assert!(!alerts[0].is_resolved);
        assert!(alerts[0].resolved_at.is_none());
        assert!(has_unresolved(&alerts, "rx_1", AlertType::ReadyForPickup));
    }

    #[test]
    fn resolve_targets_the_most_recent_match() {
        let mut alerts = Vec::new();
        raise(&mut alerts, AlertType::Overdue, AlertSeverity::Medium, "first".to_string(), "rx_1");
        raise(&mut alerts, AlertType::Overdue, AlertSeverity::Medium, "second".to_string(), "rx_1");

        assert!(resolve(&mut alerts, "rx_1", AlertType::Overdue));
        assert!(!alerts[0].is_resolved);
        assert!(alerts[1].is_resolved);
        assert!(alerts[1].resolved_at.is_some());
    }

    #[test]
    fn resolve_ignores_other_prescriptions_and_types() {
        let mut alerts = Vec::new();
        raise(&mut alerts, AlertType::Overdue, AlertSeverity::Medium, "overdue".to_string(), "rx_1");

        assert!(!resolve(&mut alerts, "rx_2", AlertType::Overdue));
        assert!(!resolve(&mut alerts, "rx_1", AlertType::ReadyForPickup));
        assert!(!alerts[0].is_resolved);
    }
}
