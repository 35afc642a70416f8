//! Prescriptions: diagnosis and medication records.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tera::Context;

use super::{page_href, Modal, Submission};
use crate::api::{both_or_empty, ApiClient};
use crate::errors::AppError;
use crate::models::{Appointment, AppointmentStatus, Prescription, User};
use crate::policy::{self, Action, Page};
use crate::session::Session;
use crate::ui::{self, Choice};
use crate::{shell, AppState};

#[derive(Debug, Clone, Default)]
pub struct PrescriptionsData {
    pub prescriptions: Vec<Prescription>,
    /// Choices for the prescription form
    pub appointments: Vec<Appointment>,
}

/// "New Prescription" form fields.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PrescriptionForm {
    #[serde(default)]
    pub appointment: String,
    #[serde(default)]
    pub diagnosis: String,
    #[serde(default)]
    pub medicines: String,
    #[serde(default)]
    pub instructions: String,
}

impl PrescriptionForm {
    pub fn payload(&self) -> Value {
        json!({
            "appointment": self.appointment,
            "diagnosis": self.diagnosis,
            "medicines": self.medicines,
            "instructions": self.instructions,
        })
    }

    fn missing_required(&self) -> bool {
        self.appointment.trim().is_empty() || self.diagnosis.trim().is_empty()
    }
}

pub async fn load(api: &ApiClient, session: &Session) -> Result<PrescriptionsData, AppError> {
    let (prescriptions, appointments) =
        tokio::join!(api.prescriptions(session), api.appointments(session));
    let (prescriptions, appointments) = both_or_empty(prescriptions, appointments)?;
    Ok(PrescriptionsData {
        prescriptions,
        appointments,
    })
}

#[derive(Serialize)]
struct PrescriptionRow<'a> {
    id: u64,
    patient: String,
    doctor: String,
    diagnosis: &'a str,
    date: String,
}

/// Booking choices for the form; cancelled visits get no prescription.
fn appointment_choices(appointments: &[Appointment]) -> Vec<Choice> {
    appointments
        .iter()
        .filter(|a| a.status != AppointmentStatus::Cancelled)
        .map(|a| {
            let patient = match a.patient_name.as_deref().filter(|n| !n.trim().is_empty()) {
                Some(name) => name.to_string(),
                None => format!("Patient #{}", a.patient_label()),
            };
            Choice::new(
                a.id.to_string(),
                format!("{} - {}", patient, ui::format_date(&a.appointment_date)),
            )
        })
        .collect()
}

pub fn render(
    user: &User,
    data: &PrescriptionsData,
    modal: Option<&Modal<PrescriptionForm>>,
) -> Result<String, AppError> {
    let can_write = policy::allows(&user.role, Action::WritePrescription);

    let rows: Vec<PrescriptionRow<'_>> = data
        .prescriptions
        .iter()
        .map(|p| PrescriptionRow {
            id: p.id,
            patient: p.patient_label(),
            doctor: p.doctor_label(),
            diagnosis: &p.diagnosis,
            date: ui::format_date(&p.created_at),
        })
        .collect();

    let mut context = Context::new();
    context.insert("can_write", &can_write);
    context.insert("rows", &rows);
    context.insert("modal", &modal.filter(|_| can_write));
    context.insert("appointments", &appointment_choices(&data.appointments));
    ui::render("prescriptions.html", &context)
}

/// POST /prescriptions - Write a prescription for an appointment.
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<PrescriptionForm>,
) -> Result<Response, AppError> {
    let user = shell::require_user(&state.api, &session).await?;
    if !policy::allows(&user.role, Action::WritePrescription) {
        return Err(AppError::Forbidden(
            "Only doctors can write prescriptions".to_string(),
        ));
    }

    let submission = if form.missing_required() {
        Submission::Rejected("Appointment and diagnosis are required".to_string())
    } else {
        Submission::judge(state.api.create_prescription(&session, &form.payload()).await)?
    };

    match submission {
        Submission::Created => {
            Ok(Redirect::to(&page_href(Page::Prescriptions)).into_response())
        }
        Submission::Rejected(error) => {
            let data = load(&state.api, &session).await?;
            let main = render(&user, &data, Some(&Modal::rejected(form, error)))?;
            shell::app_page(&user, Some(Page::Prescriptions), &main)
        }
    }
}
