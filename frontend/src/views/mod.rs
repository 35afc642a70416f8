//! Page views.
//!
//! Each resource view loads its lists when the page is requested, renders a
//! table plus an optional creation modal, and handles its own form posts.

pub mod appointments;
pub mod auth;
pub mod billing;
pub mod dashboard;
pub mod doctors;
pub mod prescriptions;

use serde::{Deserialize, Serialize};

use crate::api::{ApiBody, ApiClient};
use crate::errors::AppError;
use crate::models::User;
use crate::policy::Page;
use crate::session::Session;

/// Query string understood by the shell and the views.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<String>,
    /// `create` opens the view's creation modal
    #[serde(default)]
    pub modal: Option<String>,
    /// `register` switches the auth screen to registration
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub notice: Option<String>,
}

impl PageQuery {
    pub fn wants_modal(&self) -> bool {
        self.modal.as_deref() == Some("create")
    }
}

/// Creation modal state: the submitted form and the backend's rejection, if any.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Modal<F> {
    pub form: F,
    pub error: Option<String>,
}

impl<F: Default> Modal<F> {
    pub fn blank() -> Self {
        Self::default()
    }
}

impl<F> Modal<F> {
    pub fn rejected(form: F, error: impl Into<String>) -> Self {
        Self {
            form,
            error: Some(error.into()),
        }
    }
}

/// Result of a creation request, judged the way the backend signals success.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Created,
    /// Text to show inline: the raw response, or the generic network message
    Rejected(String),
}

impl Submission {
    pub fn judge(result: Result<ApiBody, AppError>) -> Result<Submission, AppError> {
        match result {
            Ok(body) if body.has_id() => Ok(Submission::Created),
            Ok(body) => Ok(Submission::Rejected(body.raw_text())),
            Err(AppError::Unauthorized) => Err(AppError::Unauthorized),
            Err(err) => Ok(Submission::Rejected(err.message())),
        }
    }
}

/// Link back to a page.
pub fn page_href(page: Page) -> String {
    format!("/?page={}", page.id())
}

/// Main-area HTML for `page`, loading whatever the view needs.
pub async fn render_page(
    api: &ApiClient,
    session: &Session,
    user: &User,
    page: Page,
    query: &PageQuery,
) -> Result<String, AppError> {
    let open = query.wants_modal();

    let html = match page {
        Page::Dashboard => dashboard::render(user)?,
        Page::Doctors => {
            let data = doctors::load(api, session).await?;
            let notice = query.notice.as_deref().and_then(doctors::notice_text);
            doctors::render(user, &data, open.then(Modal::blank).as_ref(), notice)?
        }
        Page::Appointments => {
            let data = appointments::load(api, session).await?;
            appointments::render(user, &data, open.then(Modal::blank).as_ref())?
        }
        Page::Prescriptions => {
            let data = prescriptions::load(api, session).await?;
            prescriptions::render(user, &data, open.then(Modal::blank).as_ref())?
        }
        Page::Billing => {
            let data = billing::load(api, session).await?;
            billing::render(user, &data, open.then(Modal::blank).as_ref())?
        }
    };

    Ok(html)
}
