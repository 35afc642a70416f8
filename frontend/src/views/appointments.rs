//! Appointments: booking and status transitions.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tera::Context;

use super::{page_href, Modal, Submission};
use crate::api::{both_or_empty, or_empty, ApiClient};
use crate::errors::AppError;
use crate::models::{Appointment, AppointmentStatus, Doctor, Role, User};
use crate::policy::{self, Action, Page};
use crate::session::Session;
use crate::ui::{self, Choice};
use crate::{shell, AppState};

#[derive(Debug, Clone, Default)]
pub struct AppointmentsData {
    pub appointments: Vec<Appointment>,
    /// Choices for the booking form
    pub doctors: Vec<Doctor>,
}

/// "Book Appointment" form fields.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppointmentForm {
    #[serde(default)]
    pub doctor: String,
    #[serde(default)]
    pub patient: String,
    #[serde(default)]
    pub appointment_date: String,
    #[serde(default)]
    pub notes: String,
}

impl AppointmentForm {
    /// Booking payload. The patient field is only sent by roles that choose
    /// the patient; everyone else books for themselves.
    pub fn payload(&self, role: &Role) -> Value {
        let mut body = Map::new();
        body.insert("doctor".to_string(), Value::from(self.doctor.as_str()));
        if policy::allows(role, Action::AssignPatient) {
            body.insert("patient".to_string(), Value::from(self.patient.as_str()));
        }
        body.insert(
            "appointment_date".to_string(),
            Value::from(self.appointment_date.as_str()),
        );
        body.insert("notes".to_string(), Value::from(self.notes.as_str()));
        Value::Object(body)
    }

    fn missing_required(&self) -> bool {
        self.doctor.trim().is_empty() || self.appointment_date.trim().is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

pub async fn load(api: &ApiClient, session: &Session) -> Result<AppointmentsData, AppError> {
    let (appointments, doctors) = tokio::join!(api.appointments(session), api.doctors(session));
    let (appointments, doctors) = both_or_empty(appointments, doctors)?;
    Ok(AppointmentsData {
        appointments,
        doctors,
    })
}

fn action_for(status: &AppointmentStatus) -> Option<Action> {
    match status {
        AppointmentStatus::Completed => Some(Action::CompleteAppointment),
        AppointmentStatus::Cancelled => Some(Action::CancelAppointment),
        _ => None,
    }
}

#[derive(Serialize)]
struct AppointmentRow<'a> {
    id: u64,
    doctor: String,
    patient: String,
    date: String,
    status: &'a str,
    /// Statuses this user may move the appointment to
    targets: Vec<&'a str>,
}

pub fn render(
    user: &User,
    data: &AppointmentsData,
    modal: Option<&Modal<AppointmentForm>>,
) -> Result<String, AppError> {
    let can_book = policy::allows(&user.role, Action::BookAppointment);

    let rows: Vec<AppointmentRow<'_>> = data
        .appointments
        .iter()
        .map(|a| AppointmentRow {
            id: a.id,
            doctor: a.doctor_label(),
            patient: a.patient_label(),
            date: ui::format_date(&a.appointment_date),
            status: a.status.as_str(),
            targets: a
                .status
                .next_statuses()
                .iter()
                .filter(|target| {
                    action_for(target).is_some_and(|action| policy::allows(&user.role, action))
                })
                .map(|target| target.as_str())
                .collect(),
        })
        .collect();
    let doctors: Vec<Choice> = data
        .doctors
        .iter()
        .map(|d| Choice::new(d.id.to_string(), format!("{} ({})", d.username, d.specialization)))
        .collect();

    let mut context = Context::new();
    context.insert("can_book", &can_book);
    context.insert("rows", &rows);
    context.insert("modal", &modal.filter(|_| can_book));
    context.insert("doctors", &doctors);
    context.insert(
        "assign_patient",
        &policy::allows(&user.role, Action::AssignPatient),
    );
    ui::render("appointments.html", &context)
}

/// POST /appointments - Book an appointment.
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AppointmentForm>,
) -> Result<Response, AppError> {
    let user = shell::require_user(&state.api, &session).await?;
    if !policy::allows(&user.role, Action::BookAppointment) {
        return Err(AppError::Forbidden(
            "Only patients or admins can book appointments".to_string(),
        ));
    }

    let submission = if form.missing_required() {
        Submission::Rejected("Doctor and date are required".to_string())
    } else {
        let payload = form.payload(&user.role);
        Submission::judge(state.api.create_appointment(&session, &payload).await)?
    };

    match submission {
        Submission::Created => Ok(Redirect::to(&page_href(Page::Appointments)).into_response()),
        Submission::Rejected(error) => {
            let data = load(&state.api, &session).await?;
            let main = render(&user, &data, Some(&Modal::rejected(form, error)))?;
            shell::app_page(&user, Some(Page::Appointments), &main)
        }
    }
}

/// POST /appointments/{id}/status - Complete or cancel a scheduled appointment.
///
/// Always answers with a redirect back to the list, which re-fetches it.
pub async fn update_status(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<u64>,
    Form(form): Form<StatusForm>,
) -> Result<Response, AppError> {
    let user = shell::require_user(&state.api, &session).await?;
    let target = AppointmentStatus::from(form.status);
    let allowed = action_for(&target).is_some_and(|action| policy::allows(&user.role, action));
    if !allowed {
        return Err(AppError::Forbidden(format!(
            "Role {} cannot mark appointments {}",
            user.role, target
        )));
    }

    let appointments = or_empty(state.api.appointments(&session).await)?;
    match appointments.iter().find(|a| a.id == id) {
        Some(current) if current.status.can_transition_to(&target) => {
            match state
                .api
                .update_appointment_status(&session, id, &target)
                .await
            {
                Ok(_) => tracing::info!("Appointment {} marked {}", id, target),
                Err(AppError::Unauthorized) => return Err(AppError::Unauthorized),
                Err(err) => tracing::warn!("Status update for appointment {} failed: {}", id, err),
            }
        }
        Some(current) => tracing::warn!(
            "Refusing to move appointment {} from {} to {}",
            id,
            current.status,
            target
        ),
        None => tracing::warn!("Appointment {} is not visible to {}", id, user.username),
    }

    Ok(Redirect::to(&page_href(Page::Appointments)).into_response())
}
