//! Page templates.
//!
//! Every page is a tera template compiled into the binary. Backend and user
//! values reach the markup only as template variables, which tera escapes in
//! `.html` templates.

mod icons;

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tera::{Context, Tera};

use crate::errors::AppError;

const TEMPLATES: [(&str, &str); 11] = [
    ("style.css", include_str!("../../templates/style.css")),
    ("macros.html", include_str!("../../templates/macros.html")),
    ("base.html", include_str!("../../templates/base.html")),
    ("error.html", include_str!("../../templates/error.html")),
    ("auth.html", include_str!("../../templates/auth.html")),
    ("app.html", include_str!("../../templates/app.html")),
    ("dashboard.html", include_str!("../../templates/dashboard.html")),
    ("doctors.html", include_str!("../../templates/doctors.html")),
    ("appointments.html", include_str!("../../templates/appointments.html")),
    ("prescriptions.html", include_str!("../../templates/prescriptions.html")),
    ("billing.html", include_str!("../../templates/billing.html")),
];

static TERA: LazyLock<Result<Tera, tera::Error>> = LazyLock::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES)?;
    tera.register_function("icon_path", icons::icon_path_function);
    Ok(tera)
});

fn engine() -> Result<&'static Tera, AppError> {
    TERA.as_ref().map_err(|err| {
        tracing::error!("Template setup failed: {:?}", err);
        AppError::Internal("Page templates are unavailable".to_string())
    })
}

/// Render the template `name` with `context`.
pub fn render(name: &str, context: &Context) -> Result<String, AppError> {
    engine()?.render(name, context).map_err(|err| {
        tracing::error!("Rendering {} failed: {:?}", name, err);
        AppError::Internal(format!("Could not render {}", name))
    })
}

/// Standalone page for errors that escape the normal views.
pub fn error_page(status: u16, message: &str) -> Result<String, AppError> {
    let mut context = Context::new();
    context.insert("status", &status);
    context.insert("message", message);
    render("error.html", &context)
}

/// One `<option>` of a select field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Amount in rupees, as shown in tables.
pub fn rupees(amount: &str) -> String {
    format!("₹{}", amount)
}

/// Render a backend timestamp as a day/month/year date.
///
/// Accepts RFC 3339 timestamps, `datetime-local` values and bare dates;
/// anything else is shown as received.
pub fn format_date(raw: &str) -> String {
    const FORMAT: &str = "%d/%m/%Y";

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(FORMAT).to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return dt.format(FORMAT).to_string();
        }
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format(FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}
