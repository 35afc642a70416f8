//! App shell: resolves the current user, builds the role navigation and
//! dispatches the main area to the selected view.

use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Serialize;
use tera::Context;

use crate::api::ApiClient;
use crate::errors::{AppError, UNREACHABLE_MESSAGE};
use crate::models::User;
use crate::policy::{self, Page};
use crate::session::{self, Session};
use crate::views::{self, auth, auth::AuthForm, auth::AuthMode, dashboard, PageQuery};
use crate::{ui, AppState};

/// Page shown when none is selected.
pub const DEFAULT_PAGE: Page = Page::Dashboard;

/// Resolve the session's user via `GET /users/me/`.
///
/// `Ok(None)` means the backend answered but did not identify anyone.
pub async fn current_user(api: &ApiClient, session: &Session) -> Result<Option<User>, AppError> {
    if !session.is_authenticated() {
        return Ok(None);
    }
    let body = api.me(session).await?;
    Ok(body.json().and_then(User::identified))
}

/// Like [`current_user`], but an unidentified session is treated as expired.
pub async fn require_user(api: &ApiClient, session: &Session) -> Result<User, AppError> {
    current_user(api, session)
        .await?
        .ok_or(AppError::Unauthorized)
}

pub fn default_main(user: &User) -> Result<String, AppError> {
    dashboard::render(user)
}

#[derive(Serialize)]
struct NavItem {
    id: &'static str,
    label: &'static str,
    icon: &'static str,
    active: bool,
}

/// Full authenticated layout: sidebar navigation plus `main`.
pub fn render_app(user: &User, active: Option<Page>, main: &str) -> Result<String, AppError> {
    let nav: Vec<NavItem> = policy::nav_pages(&user.role)
        .into_iter()
        .map(|page| NavItem {
            id: page.id(),
            label: page.label(),
            icon: page.icon(),
            active: Some(page) == active,
        })
        .collect();

    let mut context = Context::new();
    context.insert("username", &user.username);
    context.insert("role", user.role.as_str());
    context.insert("nav", &nav);
    context.insert("main", main);
    ui::render("app.html", &context)
}

pub fn app_page(user: &User, active: Option<Page>, main: &str) -> Result<Response, AppError> {
    Ok(Html(render_app(user, active, main)?).into_response())
}

fn auth_page(mode: AuthMode, error: Option<&str>) -> Result<Response, AppError> {
    Ok(Html(auth::render(mode, &AuthForm::default(), error, None)?).into_response())
}

/// GET / - Auth screen or the role layout with the selected page.
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<PageQuery>,
) -> Result<Response, AppError> {
    let mode = AuthMode::from_query(query.mode.as_deref());
    if !session.is_authenticated() {
        return auth_page(mode, None);
    }

    let user = match current_user(&state.api, &session).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            tracing::info!("Stored token does not identify a user; clearing it");
            return Ok((
                [(header::SET_COOKIE, session::clear_cookie())],
                auth_page(mode, None)?,
            )
                .into_response());
        }
        Err(AppError::Unauthorized) => return Err(AppError::Unauthorized),
        Err(err) => {
            tracing::warn!("Could not resolve current user: {}", err);
            return auth_page(mode, Some(UNREACHABLE_MESSAGE));
        }
    };

    let selected = Page::from_id(query.page.as_deref().unwrap_or(DEFAULT_PAGE.id()));
    let main = match selected.filter(|page| policy::can_view(&user.role, *page)) {
        Some(page) => views::render_page(&state.api, &session, &user, page, &query).await?,
        None => String::new(),
    };

    app_page(&user, selected, &main)
}

/// POST /logout - Forget the token and return to the auth screen.
pub async fn logout() -> Response {
    tracing::info!("User logged out");
    (
        [(header::SET_COOKIE, session::clear_cookie())],
        Redirect::to("/"),
    )
        .into_response()
}
