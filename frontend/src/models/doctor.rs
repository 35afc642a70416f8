//! Doctor directory entry.

use serde::{Deserialize, Serialize};

use super::Numeric;

/// Specializations offered by the "Add Doctor" form.
pub const SPECIALIZATIONS: [&str; 4] = ["general", "cardiologist", "neurologist", "orthopedic"];

/// A doctor as listed by `GET /users/doctors/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub specialization: String,
    #[serde(default)]
    pub experience_years: Numeric,
    #[serde(default)]
    pub consultation_fee: Numeric,
    #[serde(default = "default_available")]
    pub is_available: bool,
}

fn default_available() -> bool {
    true
}
