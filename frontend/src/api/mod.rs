//! Client for the HMS REST backend.
//!
//! [`ApiClient`] is the only place that talks HTTP to the backend. Responses
//! are surfaced as [`ApiBody`] so callers can apply the backend's own
//! conventions (an `id` means "created", `access` means "logged in").

mod client;

pub use client::*;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::errors::AppError;

/// A decoded backend response.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiBody {
    /// The response declared a JSON content type
    Json(Value),
    /// Anything else, reduced to its status line
    Status { status: u16, status_text: String },
}

impl ApiBody {
    pub fn json(&self) -> Option<&Value> {
        match self {
            ApiBody::Json(value) => Some(value),
            ApiBody::Status { .. } => None,
        }
    }

    /// String field of a JSON object body.
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.json()?.get(name)?.as_str()
    }

    /// True when the body is an object carrying a non-null `id`.
    pub fn has_id(&self) -> bool {
        self.json()
            .and_then(|v| v.get("id"))
            .is_some_and(|id| !id.is_null())
    }

    /// The body as shown verbatim to the user.
    pub fn raw_text(&self) -> String {
        match self {
            ApiBody::Json(value) => value.to_string(),
            ApiBody::Status {
                status,
                status_text,
            } => json!({ "status": status, "statusText": status_text }).to_string(),
        }
    }

    /// Decode a list body row by row. Rows that do not decode are skipped;
    /// anything that is not an array is empty.
    pub fn into_list<T: DeserializeOwned>(self) -> Vec<T> {
        match self {
            ApiBody::Json(Value::Array(rows)) => rows
                .into_iter()
                .filter_map(|row| match serde_json::from_value(row) {
                    Ok(item) => Some(item),
                    Err(err) => {
                        tracing::warn!("Skipping undecodable row: {}", err);
                        None
                    }
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Reset a failed list load to empty; only a 401 keeps propagating.
pub fn or_empty<T>(result: Result<Vec<T>, AppError>) -> Result<Vec<T>, AppError> {
    match result {
        Ok(list) => Ok(list),
        Err(AppError::Unauthorized) => Err(AppError::Unauthorized),
        Err(err) => {
            tracing::warn!("List load failed, showing empty state: {}", err);
            Ok(Vec::new())
        }
    }
}

/// Like [`or_empty`] for two lists loaded together: a failure of either one
/// empties both.
pub fn both_or_empty<A, B>(
    first: Result<Vec<A>, AppError>,
    second: Result<Vec<B>, AppError>,
) -> Result<(Vec<A>, Vec<B>), AppError> {
    match (first, second) {
        (Ok(first), Ok(second)) => Ok((first, second)),
        (Err(AppError::Unauthorized), _) | (_, Err(AppError::Unauthorized)) => {
            Err(AppError::Unauthorized)
        }
        (Err(err), _) | (_, Err(err)) => {
            tracing::warn!("List load failed, showing empty state: {}", err);
            Ok((Vec::new(), Vec::new()))
        }
    }
}
