//! Invoice documents.
//!
//! An invoice is first laid out as positioned primitives ([`Layout`]) and then
//! rendered to a vector PDF, so the download never depends on a browser
//! rasterizing the page.

mod layout;
mod pdf;

pub use layout::*;
pub use pdf::{render, InvoiceFonts};

use chrono::NaiveDate;

use crate::errors::AppError;
use crate::models::Invoice;

/// File name offered for the download.
pub fn file_name(invoice: &Invoice) -> String {
    format!("invoice_{}.pdf", invoice.id)
}

/// Build the PDF bytes for `invoice`.
pub fn invoice_pdf(
    invoice: &Invoice,
    issued_on: NaiveDate,
    fonts: &InvoiceFonts,
) -> Result<Vec<u8>, AppError> {
    render(&invoice_layout(invoice, issued_on), fonts)
}
