//! Appointment model and its status transitions.

use std::fmt;

use serde::{Deserialize, Serialize};

const FROM_SCHEDULED: &[AppointmentStatus] =
    &[AppointmentStatus::Completed, AppointmentStatus::Cancelled];

/// Appointment status label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
    Other(String),
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Other(other) => other,
        }
    }

    /// Statuses reachable from this one through the frontend.
    ///
    /// Only a scheduled appointment moves, and only forward.
    pub fn next_statuses(&self) -> &'static [AppointmentStatus] {
        match self {
            AppointmentStatus::Scheduled => FROM_SCHEDULED,
            _ => &[],
        }
    }

    pub fn can_transition_to(&self, target: &AppointmentStatus) -> bool {
        self.next_statuses().contains(target)
    }
}

impl From<String> for AppointmentStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "scheduled" => AppointmentStatus::Scheduled,
            "completed" => AppointmentStatus::Completed,
            "cancelled" => AppointmentStatus::Cancelled,
            _ => AppointmentStatus::Other(value),
        }
    }
}

impl From<AppointmentStatus> for String {
    fn from(status: AppointmentStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An appointment as returned by `GET /appointments/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: u64,
    pub doctor: u64,
    #[serde(default)]
    pub patient: Option<u64>,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub patient_name: Option<String>,
    pub appointment_date: String,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub notes: String,
}

impl Appointment {
    /// Doctor column text; the backend sends an empty name when no full name is set.
    pub fn doctor_label(&self) -> String {
        match non_empty(&self.doctor_name) {
            Some(name) => name.to_string(),
            None => format!("Dr. {}", self.doctor),
        }
    }

    pub fn patient_label(&self) -> String {
        match (non_empty(&self.patient_name), self.patient) {
            (Some(name), _) => name.to_string(),
            (None, Some(id)) => id.to_string(),
            (None, None) => String::new(),
        }
    }
}

pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_only_scheduled_moves() {
        let scheduled = AppointmentStatus::Scheduled;
        assert!(scheduled.can_transition_to(&AppointmentStatus::Completed));
        assert!(scheduled.can_transition_to(&AppointmentStatus::Cancelled));
        assert!(!scheduled.can_transition_to(&AppointmentStatus::Scheduled));

        for status in [
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::Other("no_show".to_string()),
        ] {
            assert!(status.next_statuses().is_empty());
        }
    }

    #[test]
    fn test_labels_fall_back_to_ids() {
        let appt: Appointment = serde_json::from_value(json!({
            "id": 4,
            "doctor": 2,
            "patient": 9,
            "doctor_name": "",
            "appointment_date": "2026-03-01T10:30:00Z",
            "status": "scheduled"
        }))
        .unwrap();

        assert_eq!(appt.doctor_label(), "Dr. 2");
        assert_eq!(appt.patient_label(), "9");
        assert_eq!(appt.notes, "");
    }

    #[test]
    fn test_unknown_status_round_trips_as_label() {
        let appt: Appointment = serde_json::from_value(json!({
            "id": 1, "doctor": 1, "patient": null,
            "appointment_date": "2026-03-01", "status": "no_show", "notes": ""
        }))
        .unwrap();
        assert_eq!(appt.status.as_str(), "no_show");
        assert_eq!(appt.patient_label(), "");
    }
}
