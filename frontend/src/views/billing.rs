//! Billing: invoices and PDF download.

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tera::Context;

use super::{page_href, Modal, Submission};
use crate::api::{or_empty, ApiClient};
use crate::errors::AppError;
use crate::models::{Invoice, User};
use crate::policy::{self, Action, Page};
use crate::session::Session;
use crate::{invoice, shell, ui, AppState};

#[derive(Debug, Clone, Default)]
pub struct BillingData {
    pub invoices: Vec<Invoice>,
}

/// "New Invoice" form fields.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InvoiceForm {
    #[serde(default)]
    pub appointment: String,
    #[serde(default)]
    pub amount: String,
}

impl InvoiceForm {
    pub fn payload(&self) -> Value {
        json!({
            "appointment": self.appointment,
            "amount": self.amount,
        })
    }
}

pub async fn load(api: &ApiClient, session: &Session) -> Result<BillingData, AppError> {
    Ok(BillingData {
        invoices: or_empty(api.invoices(session).await)?,
    })
}

#[derive(Serialize)]
struct InvoiceRow<'a> {
    id: u64,
    appointment: u64,
    amount: String,
    status: &'a str,
}

pub fn render(
    user: &User,
    data: &BillingData,
    modal: Option<&Modal<InvoiceForm>>,
) -> Result<String, AppError> {
    let can_create = policy::allows(&user.role, Action::CreateInvoice);

    let rows: Vec<InvoiceRow<'_>> = data
        .invoices
        .iter()
        .map(|i| InvoiceRow {
            id: i.id,
            appointment: i.appointment,
            amount: ui::rupees(i.amount.as_str()),
            status: i.status.as_str(),
        })
        .collect();

    let mut context = Context::new();
    context.insert("can_create", &can_create);
    context.insert(
        "can_download",
        &policy::allows(&user.role, Action::DownloadInvoice),
    );
    context.insert("rows", &rows);
    context.insert("modal", &modal.filter(|_| can_create));
    ui::render("billing.html", &context)
}

/// POST /billing - Create an invoice.
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<InvoiceForm>,
) -> Result<Response, AppError> {
    let user = shell::require_user(&state.api, &session).await?;
    if !policy::allows(&user.role, Action::CreateInvoice) {
        return Err(AppError::Forbidden("Only admins can create invoices".to_string()));
    }

    match Submission::judge(state.api.create_invoice(&session, &form.payload()).await)? {
        Submission::Created => Ok(Redirect::to(&page_href(Page::Billing)).into_response()),
        Submission::Rejected(error) => {
            let data = load(&state.api, &session).await?;
            let main = render(&user, &data, Some(&Modal::rejected(form, error)))?;
            shell::app_page(&user, Some(Page::Billing), &main)
        }
    }
}

/// GET /billing/{id}/invoice.pdf - Download an invoice as PDF.
///
/// Failures are logged and the browser is sent back to the billing page.
pub async fn download(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<u64>,
) -> Result<Response, AppError> {
    let user = shell::require_user(&state.api, &session).await?;
    if !policy::allows(&user.role, Action::DownloadInvoice) {
        return Err(AppError::Forbidden("Invoices are not available".to_string()));
    }

    let back = Redirect::to(&page_href(Page::Billing)).into_response();

    let invoices = match state.api.invoices(&session).await {
        Ok(invoices) => invoices,
        Err(AppError::Unauthorized) => return Err(AppError::Unauthorized),
        Err(err) => {
            tracing::error!("PDF generation for invoice {} failed: {}", id, err);
            return Ok(back);
        }
    };

    let Some(found) = invoices.into_iter().find(|i| i.id == id) else {
        tracing::error!("PDF generation failed: invoice {} not found", id);
        return Ok(back);
    };

    let bytes = match invoice::invoice_pdf(&found, Local::now().date_naive(), &state.fonts) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!("PDF generation for invoice {} failed: {}", id, err);
            return Ok(back);
        }
    };
    tracing::info!("Generated invoice {} ({} bytes)", id, bytes.len());

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", invoice::file_name(&found)),
            ),
        ],
        bytes,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use serde_json::json;

    fn user(role: Role) -> User {
        User {
            id: 7,
            username: "u".to_string(),
            email: String::new(),
            role,
        }
    }

    fn sample() -> BillingData {
        BillingData {
            invoices: serde_json::from_value(json!([
                {"id": 1, "appointment": 5, "amount": "500", "status": "pending"}
            ]))
            .unwrap(),
        }
    }

    #[test]
    fn test_invoice_row() {
        let html = render(&user(Role::Patient), &sample(), None).unwrap();
        assert_eq!(html.matches(r#"class="table-row"#).count(), 1);
        assert!(html.contains("<span>Appt #5</span>"));
        assert!(html.contains("<span>₹500</span>"));
        assert!(html.contains(r#"<span class="badge pending">pending</span>"#));
        assert!(html.contains(r#"href="/billing/1/invoice.pdf""#));
        assert!(!html.contains("+ Invoice"));
    }

    #[test]
    fn test_admin_sees_create_modal() {
        let modal = Modal::<InvoiceForm>::blank();
        let html = render(&user(Role::Admin), &sample(), Some(&modal)).unwrap();
        assert!(html.contains("+ Invoice"));
        assert!(html.contains("New Invoice"));
        assert!(html.contains(r#"action="/billing""#));
    }

    #[test]
    fn test_no_download_link_without_grant() {
        let html = render(&user(Role::Unknown("nurse".to_string())), &sample(), None).unwrap();
        assert!(html.contains("<span>Appt #5</span>"));
        assert!(!html.contains("invoice.pdf"));
    }

    #[test]
    fn test_empty_state() {
        let html = render(&user(Role::Admin), &BillingData::default(), None).unwrap();
        assert!(html.contains("NO INVOICES"));
    }
}
