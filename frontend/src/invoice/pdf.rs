//! PDF rendering of a [`Layout`] with printpdf.
//!
//! Text is set in embedded TrueType faces so that anything the face covers
//! (the rupee sign, accented and Cyrillic names) reaches the page intact.

use std::borrow::Cow;
use std::io::BufWriter;
use std::path::Path;

use printpdf::{
    Color as PdfColor, IndirectFontRef, Line, Mm, PdfDocument, Point, Pt, Rect, Rgb,
};
use ttf_parser::{Face, GlyphId};

use super::layout::{Align, Color, Element, Font, Layout};
use crate::config::Config;
use crate::errors::AppError;

const DEJAVU_SANS: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
const DEJAVU_SANS_BOLD: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans-Bold.ttf");

/// The two faces embedded in every invoice.
#[derive(Debug, Clone)]
pub struct InvoiceFonts {
    regular: Cow<'static, [u8]>,
    bold: Cow<'static, [u8]>,
}

impl Default for InvoiceFonts {
    fn default() -> Self {
        Self::embedded()
    }
}

impl InvoiceFonts {
    /// DejaVu Sans, compiled into the binary.
    pub fn embedded() -> Self {
        Self {
            regular: Cow::Borrowed(DEJAVU_SANS),
            bold: Cow::Borrowed(DEJAVU_SANS_BOLD),
        }
    }

    /// Read both faces from disk. Without a bold file the regular face is used
    /// for bold text too.
    pub fn from_files(regular: &Path, bold: Option<&Path>) -> Result<Self, AppError> {
        let regular = read_face(regular)?;
        let bold = match bold {
            Some(path) => read_face(path)?,
            None => regular.clone(),
        };
        Ok(Self {
            regular: Cow::Owned(regular),
            bold: Cow::Owned(bold),
        })
    }

    /// Faces named by `HMS_INVOICE_FONT` / `HMS_INVOICE_FONT_BOLD`, else the embedded ones.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        match &config.invoice_font {
            Some(path) => Self::from_files(path, config.invoice_font_bold.as_deref()),
            None => Ok(Self::embedded()),
        }
    }

    fn data(&self, font: Font) -> &[u8] {
        match font {
            Font::Regular => self.regular.as_ref(),
            Font::Bold => self.bold.as_ref(),
        }
    }

    fn face(&self, font: Font) -> Result<Face<'_>, AppError> {
        Face::parse(self.data(font), 0)
            .map_err(|e| AppError::Internal(format!("PDF font error: {e}")))
    }

    /// Characters of `text` the face for `font` has no glyph for.
    pub fn missing_glyphs(&self, font: Font, text: &str) -> Vec<char> {
        match self.face(font) {
            Ok(face) => text
                .chars()
                .filter(|c| !c.is_whitespace() && face.glyph_index(*c).is_none())
                .collect(),
            Err(_) => text.chars().filter(|c| !c.is_whitespace()).collect(),
        }
    }
}

fn read_face(path: &Path) -> Result<Vec<u8>, AppError> {
    let data = std::fs::read(path).map_err(|e| {
        AppError::Internal(format!("Cannot read font {}: {e}", path.display()))
    })?;
    Face::parse(&data, 0)
        .map_err(|e| AppError::Internal(format!("Invalid font {}: {e}", path.display())))?;
    Ok(data)
}

/// Advance width of `text` at `size`, in points. Uncovered characters take
/// the width of the fallback glyph, as they do on the page.
fn text_width(face: &Face<'_>, text: &str, size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| {
            let glyph = face.glyph_index(c).unwrap_or(GlyphId(0));
            u32::from(face.glyph_hor_advance(glyph).unwrap_or(0))
        })
        .sum();
    units as f32 * size / f32::from(face.units_per_em())
}

fn mm(points: f32) -> Mm {
    Mm::from(Pt(points))
}

fn rgb(color: Color) -> PdfColor {
    PdfColor::Rgb(Rgb::new(color.0, color.1, color.2, None))
}

/// Render a single-page layout to PDF bytes.
pub fn render(layout: &Layout, fonts: &InvoiceFonts) -> Result<Vec<u8>, AppError> {
    let (doc, page, layer) = PdfDocument::new(
        layout.title.as_str(),
        mm(layout.width),
        mm(layout.height),
        "Invoice",
    );
    let layer = doc.get_page(page).get_layer(layer);

    let regular = doc
        .add_external_font(fonts.data(Font::Regular))
        .map_err(|e| AppError::Internal(format!("PDF font error: {e}")))?;
    let bold = doc
        .add_external_font(fonts.data(Font::Bold))
        .map_err(|e| AppError::Internal(format!("PDF font error: {e}")))?;
    let regular_face = fonts.face(Font::Regular)?;
    let bold_face = fonts.face(Font::Bold)?;

    // Layout y grows downwards; PDF y grows upwards.
    let flip = |y: f32| mm(layout.height - y);

    for element in &layout.elements {
        match *element {
            Element::Rect { x, y, w, h, fill } => {
                layer.set_fill_color(rgb(fill));
                layer.add_rect(Rect::new(mm(x), flip(y + h), mm(x + w), flip(y)));
            }
            Element::Line {
                x1,
                y1,
                x2,
                y2,
                width,
                color,
            } => {
                layer.set_outline_color(rgb(color));
                layer.set_outline_thickness(width);
                layer.add_line(Line {
                    points: vec![
                        (Point::new(mm(x1), flip(y1)), false),
                        (Point::new(mm(x2), flip(y2)), false),
                    ],
                    is_closed: false,
                });
            }
            Element::Text {
                x,
                y,
                size,
                font,
                color,
                align,
                ref text,
            } => {
                let (face, font_ref): (&Face<'_>, &IndirectFontRef) = match font {
                    Font::Regular => (&regular_face, &regular),
                    Font::Bold => (&bold_face, &bold),
                };

                let missing = fonts.missing_glyphs(font, text);
                if !missing.is_empty() {
                    tracing::warn!(
                        "Invoice font has no glyph for {:?} in {:?}",
                        missing,
                        text
                    );
                }

                let width = text_width(face, text, size);
                let left = match align {
                    Align::Left => x,
                    Align::Center => x - width / 2.0,
                    Align::Right => x - width,
                };
                layer.set_fill_color(rgb(color));
                layer.use_text(text.as_str(), size, mm(left), flip(y), font_ref);
            }
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| AppError::Internal(format!("PDF save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| AppError::Internal(format!("PDF buffer error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn bundled(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("assets/fonts")
            .join(name)
    }

    #[test]
    fn test_embedded_fonts_draw_rupee_sign() {
        let fonts = InvoiceFonts::embedded();
        assert!(fonts.missing_glyphs(Font::Regular, "Total Amount: ₹500").is_empty());
        assert!(fonts.missing_glyphs(Font::Bold, "₹500").is_empty());
    }

    #[test]
    fn test_missing_glyphs_are_reported() {
        let fonts = InvoiceFonts::embedded();
        assert_eq!(
            fonts.missing_glyphs(Font::Regular, "Patient: राम"),
            vec!['र', 'ा', 'म']
        );
    }

    #[test]
    fn test_text_width_scales_with_size() {
        let fonts = InvoiceFonts::embedded();
        let face = fonts.face(Font::Regular).unwrap();

        assert_eq!(text_width(&face, "", 12.0), 0.0);
        let small = text_width(&face, "Amount", 10.0);
        let large = text_width(&face, "Amount", 20.0);
        assert!(small > 0.0);
        assert!((large - 2.0 * small).abs() < 0.01);
        assert!(text_width(&face, "WW", 10.0) > text_width(&face, "ii", 10.0));
    }

    #[test]
    fn test_fonts_from_files() {
        let fonts = InvoiceFonts::from_files(&bundled("DejaVuSans.ttf"), None).unwrap();
        assert_eq!(fonts.data(Font::Bold), fonts.data(Font::Regular));

        let missing = InvoiceFonts::from_files(&bundled("NoSuchFont.ttf"), None);
        assert!(matches!(missing, Err(AppError::Internal(_))));

        let not_a_font = InvoiceFonts::from_files(&bundled("LICENSE-DejaVu.txt"), None);
        assert!(matches!(not_a_font, Err(AppError::Internal(_))));
    }

    #[test]
    fn test_render_produces_pdf() {
        let layout = Layout {
            title: "Invoice EST-0001".to_string(),
            width: 595.28,
            height: 841.89,
            elements: vec![
                Element::Rect {
                    x: 40.0,
                    y: 40.0,
                    w: 515.28,
                    h: 70.0,
                    fill: Color::BRAND,
                },
                Element::Text {
                    x: 555.28,
                    y: 72.0,
                    size: 16.0,
                    font: Font::Bold,
                    color: Color::WHITE,
                    align: Align::Right,
                    text: "₹500".to_string(),
                },
                Element::Line {
                    x1: 40.0,
                    y1: 290.0,
                    x2: 555.28,
                    y2: 290.0,
                    width: 0.5,
                    color: Color::RULE,
                },
            ],
        };

        let pdf = render(&layout, &InvoiceFonts::embedded()).unwrap();
        assert!(pdf.starts_with(b"%PDF-"));
        assert!(pdf.len() > 1000);
    }
}
