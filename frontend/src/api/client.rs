//! HTTP wrapper around the backend REST surface.

use reqwest::{header::CONTENT_TYPE, Method, StatusCode};
use serde_json::{json, Value};

use super::ApiBody;
use crate::errors::AppError;
use crate::models::{Appointment, AppointmentStatus, Doctor, Invoice, Prescription};
use crate::session::Session;

/// Backend client shared by all handlers.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the backend rooted at `base_url` (e.g. `http://host/api`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a request and hand back the status together with the decoded body.
    async fn dispatch(
        &self,
        session: &Session,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<(StatusCode, ApiBody), AppError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .http
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(token) = session.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.body(body.to_string());
        }

        let response = request.send().await?;
        let status = response.status();

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.contains("application/json"));

        let body = if is_json {
            ApiBody::Json(response.json::<Value>().await?)
        } else {
            ApiBody::Status {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            }
        };

        Ok((status, body))
    }

    /// Issue a request; a 401 ends the session.
    pub async fn request(
        &self,
        session: &Session,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<ApiBody, AppError> {
        let (status, body) = self.dispatch(session, method, path, body).await?;
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("Backend rejected the session token for {}", path);
            return Err(AppError::Unauthorized);
        }
        Ok(body)
    }

    /// `POST /users/login/`.
    ///
    /// A rejected login answers 401 as well; that is a credential error to
    /// show on the form, not an expired session.
    pub async fn login(&self, username: &str, password: &str) -> Result<ApiBody, AppError> {
        let payload = json!({ "username": username, "password": password });
        let (_, body) = self
            .dispatch(&Session::anonymous(), Method::POST, "/users/login/", Some(&payload))
            .await?;
        Ok(body)
    }

    /// `POST /users/register/`.
    pub async fn register(&self, session: &Session, payload: &Value) -> Result<ApiBody, AppError> {
        self.request(session, Method::POST, "/users/register/", Some(payload))
            .await
    }

    /// `GET /users/me/`.
    pub async fn me(&self, session: &Session) -> Result<ApiBody, AppError> {
        self.request(session, Method::GET, "/users/me/", None).await
    }

    /// `GET /users/doctors/`.
    pub async fn doctors(&self, session: &Session) -> Result<Vec<Doctor>, AppError> {
        Ok(self
            .request(session, Method::GET, "/users/doctors/", None)
            .await?
            .into_list())
    }

    /// `GET /appointments/`.
    pub async fn appointments(&self, session: &Session) -> Result<Vec<Appointment>, AppError> {
        Ok(self
            .request(session, Method::GET, "/appointments/", None)
            .await?
            .into_list())
    }

    /// `POST /appointments/`.
    pub async fn create_appointment(
        &self,
        session: &Session,
        payload: &Value,
    ) -> Result<ApiBody, AppError> {
        self.request(session, Method::POST, "/appointments/", Some(payload))
            .await
    }

    /// `PATCH /appointments/{id}/` with only the status field.
    pub async fn update_appointment_status(
        &self,
        session: &Session,
        id: u64,
        status: &AppointmentStatus,
    ) -> Result<ApiBody, AppError> {
        let payload = json!({ "status": status.as_str() });
        self.request(
            session,
            Method::PATCH,
            &format!("/appointments/{}/", id),
            Some(&payload),
        )
        .await
    }

    /// `GET /prescriptions/`.
    pub async fn prescriptions(&self, session: &Session) -> Result<Vec<Prescription>, AppError> {
        Ok(self
            .request(session, Method::GET, "/prescriptions/", None)
            .await?
            .into_list())
    }

    /// `POST /prescriptions/`.
    pub async fn create_prescription(
        &self,
        session: &Session,
        payload: &Value,
    ) -> Result<ApiBody, AppError> {
        self.request(session, Method::POST, "/prescriptions/", Some(payload))
            .await
    }

    /// `GET /billing/`.
    pub async fn invoices(&self, session: &Session) -> Result<Vec<Invoice>, AppError> {
        Ok(self
            .request(session, Method::GET, "/billing/", None)
            .await?
            .into_list())
    }

    /// `POST /billing/`.
    pub async fn create_invoice(
        &self,
        session: &Session,
        payload: &Value,
    ) -> Result<ApiBody, AppError> {
        self.request(session, Method::POST, "/billing/", Some(payload))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let client = ApiClient::new("http://127.0.0.1:8000/api/");
        assert_eq!(client.base_url(), "http://127.0.0.1:8000/api");
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        // Port 9 (discard) on localhost is not expected to accept connections.
        let client = ApiClient::new("http://127.0.0.1:9/api");
        let result = client.me(&Session::with_token("tok")).await;
        assert!(matches!(result, Err(AppError::Unreachable(_))));
    }
}
