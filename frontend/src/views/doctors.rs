//! Doctors directory.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tera::Context;

use super::{Modal, Submission};
use crate::api::{or_empty, ApiClient};
use crate::errors::AppError;
use crate::models::{Doctor, User, SPECIALIZATIONS};
use crate::policy::{self, Action, Page};
use crate::session::Session;
use crate::ui::{self, Choice};
use crate::{shell, AppState};

/// Notice key set after a doctor account is created.
pub const REGISTERED_NOTICE: &str = "doctor-registered";

#[derive(Debug, Clone, Default)]
pub struct DoctorsData {
    pub doctors: Vec<Doctor>,
}

/// "Add Doctor" form fields.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DoctorForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(default)]
    pub specialization: String,
}

impl DoctorForm {
    /// Registration payload creating a user with the doctor role.
    pub fn payload(&self) -> Value {
        let specialization = if self.specialization.is_empty() {
            SPECIALIZATIONS[0]
        } else {
            self.specialization.as_str()
        };
        json!({
            "username": self.username,
            "email": self.email,
            "password": self.password,
            "role": "doctor",
            "specialization": specialization,
        })
    }
}

pub fn notice_text(key: &str) -> Option<&'static str> {
    (key == REGISTERED_NOTICE)
        .then_some("Doctor registered! They need to create their profile via admin.")
}

pub async fn load(api: &ApiClient, session: &Session) -> Result<DoctorsData, AppError> {
    Ok(DoctorsData {
        doctors: or_empty(api.doctors(session).await)?,
    })
}

#[derive(Serialize)]
struct DoctorRow<'a> {
    name: &'a str,
    specialization: &'a str,
    experience: String,
    fee: String,
}

pub fn render(
    user: &User,
    data: &DoctorsData,
    modal: Option<&Modal<DoctorForm>>,
    notice: Option<&str>,
) -> Result<String, AppError> {
    let can_add = policy::allows(&user.role, Action::AddDoctor);

    let rows: Vec<DoctorRow<'_>> = data
        .doctors
        .iter()
        .map(|d| DoctorRow {
            name: &d.username,
            specialization: &d.specialization,
            experience: format!("{} yrs", d.experience_years),
            fee: ui::rupees(d.consultation_fee.as_str()),
        })
        .collect();
    let specializations: Vec<Choice> = SPECIALIZATIONS
        .iter()
        .map(|s| Choice::new(*s, *s))
        .collect();

    let mut context = Context::new();
    context.insert("can_add", &can_add);
    context.insert("rows", &rows);
    context.insert("notice", &notice);
    context.insert("modal", &modal.filter(|_| can_add));
    context.insert("specializations", &specializations);
    ui::render("doctors.html", &context)
}

/// POST /doctors - Register a new doctor account.
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<DoctorForm>,
) -> Result<Response, AppError> {
    let user = shell::require_user(&state.api, &session).await?;
    if !policy::allows(&user.role, Action::AddDoctor) {
        return Err(AppError::Forbidden("Only admins can add doctors".to_string()));
    }

    let submission = if form.username.trim().is_empty() || form.password.is_empty() {
        Submission::Rejected("Username and password are required".to_string())
    } else {
        Submission::judge(state.api.register(&session, &form.payload()).await)?
    };

    match submission {
        Submission::Created => {
            tracing::info!("Doctor account {} registered by {}", form.username, user.username);
            Ok(Redirect::to(&format!("/?page=doctors&notice={}", REGISTERED_NOTICE)).into_response())
        }
        Submission::Rejected(error) => {
            let data = load(&state.api, &session).await?;
            let main = render(&user, &data, Some(&Modal::rejected(form, error)), None)?;
            shell::app_page(&user, Some(Page::Doctors), &main)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use serde_json::json;

    fn user(role: Role) -> User {
        User {
            id: 1,
            username: "u".to_string(),
            email: String::new(),
            role,
        }
    }

    fn sample() -> DoctorsData {
        DoctorsData {
            doctors: vec![serde_json::from_value(json!({
                "id": 3, "username": "house", "email": "h@h.com",
                "specialization": "general", "experience_years": 12,
                "consultation_fee": "750.00", "is_available": true
            }))
            .unwrap()],
        }
    }

    #[test]
    fn test_rows() {
        let html = render(&user(Role::Patient), &sample(), None, None).unwrap();
        assert!(html.contains("<span>house</span>"));
        assert!(html.contains("<span>12 yrs</span>"));
        assert!(html.contains("<span>₹750.00</span>"));
        assert!(!html.contains("NO DOCTORS FOUND"));
    }

    #[test]
    fn test_empty_state() {
        let html = render(&user(Role::Admin), &DoctorsData::default(), None, None).unwrap();
        assert!(html.contains("NO DOCTORS FOUND"));
    }

    #[test]
    fn test_add_button_and_modal_admin_only() {
        let modal = Modal::<DoctorForm>::blank();

        let admin = render(&user(Role::Admin), &sample(), Some(&modal), None).unwrap();
        assert!(admin.contains(r#"href="/?page=doctors&amp;modal=create">+ Add Doctor</a>"#));
        assert!(admin.contains(r#"action="/doctors""#));
        assert!(admin.contains(r#"<option value="general">general</option>"#));

        let doctor = render(&user(Role::Doctor), &sample(), Some(&modal), None).unwrap();
        assert!(!doctor.contains("+ Add Doctor"));
        assert!(!doctor.contains("modal-bg"));
    }

    #[test]
    fn test_payload_forces_doctor_role() {
        let form = DoctorForm {
            username: "strange".to_string(),
            email: "s@h.com".to_string(),
            password: "pw".to_string(),
            specialization: String::new(),
        };
        let payload = form.payload();
        assert_eq!(payload["role"], "doctor");
        assert_eq!(payload["specialization"], "general");
    }

    #[test]
    fn test_rejected_modal_keeps_input_but_not_password() {
        let form = DoctorForm {
            username: "strange".to_string(),
            email: "s@h.com".to_string(),
            password: "secret".to_string(),
            specialization: "neurologist".to_string(),
        };
        let modal = Modal::rejected(form, r#"{"username":["exists"]}"#);
        let html = render(&user(Role::Admin), &sample(), Some(&modal), None).unwrap();

        assert!(html.contains(r#"value="strange""#));
        assert!(!html.contains("secret"));
        assert!(html.contains(r#"<option value="neurologist" selected>"#));
        assert!(html.contains("{&quot;username&quot;:[&quot;exists&quot;]}"));
    }

    #[test]
    fn test_names_are_escaped() {
        let data = DoctorsData {
            doctors: vec![serde_json::from_value(json!({
                "id": 4, "username": "<script>alert(1)</script>",
                "specialization": "general", "experience_years": 1,
                "consultation_fee": "100"
            }))
            .unwrap()],
        };
        let html = render(&user(Role::Admin), &data, None, Some("Saved & done")).unwrap();
        assert!(html.contains("<span>&lt;script&gt;alert(1)&lt;&#x2F;script&gt;</span>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains(r#"<div class="ok">✓ Saved &amp; done</div>"#));
    }

    #[test]
    fn test_notice() {
        assert!(notice_text(REGISTERED_NOTICE).is_some());
        assert!(notice_text("other").is_none());
    }
}
