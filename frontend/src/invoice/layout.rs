//! Invoice layout as positioned drawing primitives.
//!
//! Coordinates are PDF points with the origin at the top-left corner of the
//! page; the renderer flips them.

use chrono::NaiveDate;

use crate::models::Invoice;

/// A4 portrait, in points.
pub const A4_WIDTH: f32 = 595.28;
pub const A4_HEIGHT: f32 = 841.89;

const MARGIN: f32 = 40.0;
const RIGHT: f32 = A4_WIDTH - MARGIN;
const CONTENT_WIDTH: f32 = A4_WIDTH - 2.0 * MARGIN;
const COLUMN_WIDTH: f32 = CONTENT_WIDTH * 0.45;

pub const HOSPITAL_NAME: &str = "Zetran Hospital";
pub const GSTIN: &str = "123456789321456";
pub const ADDRESS: &str = "Adambakkam, Chennai, Tamil Nadu 600088";
pub const MOBILE: &str = "9876543210";
pub const WEBSITE: &str = "www.zetran.com";

pub const CURRENCY: &str = "₹";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub f32, pub f32, pub f32);

impl Color {
    pub const BRAND: Color = Color(0.0, 0.533, 1.0);
    pub const WHITE: Color = Color(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color(0.0, 0.0, 0.0);
    pub const GREY: Color = Color(0.333, 0.333, 0.333);
    pub const RULE: Color = Color(0.867, 0.867, 0.867);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Filled rectangle; `y` is its top edge
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        fill: Color,
    },
    /// Single line of text; `y` is the baseline, `x` the anchor for `align`
    Text {
        x: f32,
        y: f32,
        size: f32,
        font: Font,
        color: Color,
        align: Align,
        text: String,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
        color: Color,
    },
}

/// A single page of positioned elements.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub title: String,
    pub width: f32,
    pub height: f32,
    pub elements: Vec<Element>,
}

impl Layout {
    fn a4(title: String) -> Self {
        Self {
            title,
            width: A4_WIDTH,
            height: A4_HEIGHT,
            elements: Vec::new(),
        }
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, fill: Color) {
        self.elements.push(Element::Rect { x, y, w, h, fill });
    }

    #[allow(clippy::too_many_arguments)]
    fn text(
        &mut self,
        x: f32,
        y: f32,
        size: f32,
        font: Font,
        color: Color,
        align: Align,
        text: impl Into<String>,
    ) {
        self.elements.push(Element::Text {
            x,
            y,
            size,
            font,
            color,
            align,
            text: text.into(),
        });
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32, color: Color) {
        self.elements.push(Element::Line {
            x1,
            y1,
            x2,
            y2,
            width,
            color,
        });
    }

    /// All text on the page, in drawing order.
    #[cfg(test)]
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|e| match e {
            Element::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Invoice number shown on the document.
pub fn invoice_number(invoice: &Invoice) -> String {
    format!("EST-000{}", invoice.id)
}

/// Lay out the invoice for `invoice`, issued on `issued_on`.
pub fn invoice_layout(invoice: &Invoice, issued_on: NaiveDate) -> Layout {
    let number = invoice_number(invoice);
    let amount = format!("{}{}", CURRENCY, invoice.amount);
    let mut page = Layout::a4(format!("Invoice {}", number));

    // Header band
    page.rect(MARGIN, MARGIN, CONTENT_WIDTH, 70.0, Color::BRAND);
    page.text(MARGIN + 16.0, 72.0, 20.0, Font::Bold, Color::WHITE, Align::Left, HOSPITAL_NAME);
    page.text(
        MARGIN + 16.0,
        92.0,
        9.0,
        Font::Regular,
        Color::WHITE,
        Align::Left,
        format!("GSTIN: {}", GSTIN),
    );
    page.text(RIGHT - 16.0, 72.0, 16.0, Font::Bold, Color::WHITE, Align::Right, number);
    page.text(
        RIGHT - 16.0,
        92.0,
        9.0,
        Font::Regular,
        Color::WHITE,
        Align::Right,
        format!("Date: {}", issued_on.format("%d/%m/%Y")),
    );

    // Bill to / clinician columns
    let second_column = RIGHT - COLUMN_WIDTH;
    for (x, heading, first, second) in [
        (
            MARGIN,
            "Bill to",
            format!("Patient: {}", invoice.patient_label()),
            format!("Appointment ID: #{}", invoice.appointment),
        ),
        (
            second_column,
            "Clinician Details",
            format!("Doctor: {}", invoice.doctor_label()),
            format!("Status: {}", invoice.status.as_str().to_uppercase()),
        ),
    ] {
        page.text(x, 150.0, 12.0, Font::Bold, Color::BLACK, Align::Left, heading);
        page.line(x, 157.0, x + COLUMN_WIDTH, 157.0, 2.0, Color::BRAND);
        page.text(x, 177.0, 11.0, Font::Regular, Color::BLACK, Align::Left, first);
        page.text(x, 195.0, 11.0, Font::Regular, Color::BLACK, Align::Left, second);
    }

    // Line items
    page.rect(MARGIN, 230.0, CONTENT_WIDTH, 26.0, Color::BRAND);
    page.text(MARGIN + 10.0, 247.0, 11.0, Font::Bold, Color::WHITE, Align::Left, "Item Description");
    page.text(RIGHT - 10.0, 247.0, 11.0, Font::Bold, Color::WHITE, Align::Right, "Amount");

    page.text(
        MARGIN + 10.0,
        278.0,
        11.0,
        Font::Regular,
        Color::BLACK,
        Align::Left,
        format!(
            "Medical Consultation & Services for Appt #{}",
            invoice.appointment
        ),
    );
    page.text(RIGHT - 10.0, 278.0, 11.0, Font::Regular, Color::BLACK, Align::Right, amount.clone());
    page.line(MARGIN, 290.0, RIGHT, 290.0, 0.5, Color::RULE);

    page.rect(MARGIN, 296.0, CONTENT_WIDTH, 26.0, Color::BRAND);
    page.text(MARGIN + 10.0, 313.0, 11.0, Font::Bold, Color::WHITE, Align::Left, "Total");
    page.text(RIGHT - 10.0, 313.0, 11.0, Font::Bold, Color::WHITE, Align::Right, amount.clone());

    // Terms, total and signature
    page.text(MARGIN, 372.0, 9.0, Font::Bold, Color::GREY, Align::Left, "Terms & Notes");
    page.text(
        MARGIN,
        388.0,
        9.0,
        Font::Regular,
        Color::GREY,
        Align::Left,
        "Valid for 7 days from the date of issue.",
    );
    page.text(
        RIGHT,
        372.0,
        14.0,
        Font::Bold,
        Color::BLACK,
        Align::Right,
        format!("Total Amount: {}", amount),
    );
    page.line(RIGHT - 150.0, 432.0, RIGHT, 432.0, 1.0, Color::BLACK);
    page.text(RIGHT, 448.0, 9.0, Font::Regular, Color::BLACK, Align::Right, "Authorised Signature");

    // Footer band
    page.rect(MARGIN, 490.0, CONTENT_WIDTH, 28.0, Color::BRAND);
    page.text(MARGIN + 10.0, 508.0, 8.5, Font::Regular, Color::WHITE, Align::Left, ADDRESS);
    page.text(
        A4_WIDTH / 2.0 + 60.0,
        508.0,
        8.5,
        Font::Regular,
        Color::WHITE,
        Align::Center,
        format!("Mobile: {}", MOBILE),
    );
    page.text(RIGHT - 10.0, 508.0, 8.5, Font::Regular, Color::WHITE, Align::Right, WEBSITE);

    page
}
