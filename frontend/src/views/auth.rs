//! Login and registration screen.

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tera::Context;

use crate::errors::{AppError, UNREACHABLE_MESSAGE};
use crate::models::User;
use crate::session::{self, Session};
use crate::ui::{self, Choice};
use crate::{shell, AppState};

pub const REGISTERED_MESSAGE: &str = "Registered! Please login.";

/// Which tab of the auth screen is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

impl AuthMode {
    pub fn from_query(mode: Option<&str>) -> Self {
        match mode {
            Some("register") => AuthMode::Register,
            _ => AuthMode::Login,
        }
    }
}

/// Fields of both tabs; login only reads username and password.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "patient".to_string()
}

impl Default for AuthForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            password: String::new(),
            role: default_role(),
        }
    }
}

/// Full auth page. The password is never echoed back.
pub fn render(
    mode: AuthMode,
    form: &AuthForm,
    error: Option<&str>,
    notice: Option<&str>,
) -> Result<String, AppError> {
    let roles = [
        Choice::new("patient", "Patient"),
        Choice::new("doctor", "Doctor"),
        Choice::new("admin", "Admin"),
    ];

    let mut context = Context::new();
    context.insert("register", &(mode == AuthMode::Register));
    context.insert("form", form);
    context.insert("roles", &roles);
    context.insert("error", &error);
    context.insert("notice", &notice);
    ui::render("auth.html", &context)
}

fn page(mode: AuthMode, form: &AuthForm, error: Option<&str>, notice: Option<&str>) -> Response {
    match render(mode, form, error, notice) {
        Ok(html) => Html(html).into_response(),
        Err(err) => err.into_response(),
    }
}

/// POST /login - Exchange credentials for a token.
pub async fn login(State(state): State<AppState>, Form(form): Form<AuthForm>) -> Response {
    let body = match state.api.login(&form.username, &form.password).await {
        Ok(body) => body,
        Err(_) => return page(AuthMode::Login, &form, Some(UNREACHABLE_MESSAGE), None),
    };

    let Some(access) = body.str_field("access").filter(|t| !t.is_empty()) else {
        let detail = body.str_field("detail").unwrap_or("Login failed");
        tracing::info!("Login rejected for {}", form.username);
        return page(AuthMode::Login, &form, Some(detail), None);
    };

    let cookie = session::token_cookie(access, state.config.secure_cookie);
    let session = Session::with_token(access);
    tracing::info!("User {} logged in", form.username);

    match state.api.me(&session).await {
        Ok(me) => match me.json().and_then(User::identified) {
            Some(_) => ([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response(),
            None => {
                // Nothing identifiable came back; carry on with a stand-in user.
                let user = User::fallback(&form.username);
                let app = shell::default_main(&user)
                    .and_then(|main| shell::app_page(&user, Some(shell::DEFAULT_PAGE), &main));
                match app {
                    Ok(app) => ([(header::SET_COOKIE, cookie)], app).into_response(),
                    Err(err) => err.into_response(),
                }
            }
        },
        Err(AppError::Unauthorized) => AppError::Unauthorized.into_response(),
        Err(_) => (
            [(header::SET_COOKIE, cookie)],
            page(AuthMode::Login, &form, Some(UNREACHABLE_MESSAGE), None),
        )
            .into_response(),
    }
}

/// POST /register - Create an account from the auth screen.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AuthForm>,
) -> Response {
    let payload = json!({
        "username": form.username,
        "email": form.email,
        "password": form.password,
        "role": form.role,
    });

    match state.api.register(&session, &payload).await {
        Ok(body) if body.has_id() => {
            tracing::info!("Registered account {}", form.username);
            page(AuthMode::Login, &form, None, Some(REGISTERED_MESSAGE))
        }
        Ok(body) => page(AuthMode::Register, &form, Some(&body.raw_text()), None),
        Err(AppError::Unauthorized) => AppError::Unauthorized.into_response(),
        Err(_) => page(AuthMode::Register, &form, Some(UNREACHABLE_MESSAGE), None),
    }
}
