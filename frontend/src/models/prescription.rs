//! Prescription record.

use serde::{Deserialize, Serialize};

use super::appointment::non_empty;

/// A prescription as returned by `GET /prescriptions/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: u64,
    pub appointment: u64,
    #[serde(default)]
    pub diagnosis: String,
    #[serde(default)]
    pub medicines: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub doctor_name: Option<String>,
    #[serde(default)]
    pub patient_name: Option<String>,
}

impl Prescription {
    pub fn patient_label(&self) -> String {
        match non_empty(&self.patient_name) {
            Some(name) => name.to_string(),
            None => format!("Appt #{}", self.appointment),
        }
    }

    pub fn doctor_label(&self) -> String {
        non_empty(&self.doctor_name).unwrap_or("—").to_string()
    }
}
