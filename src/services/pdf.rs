//! Single-page plan document.
//!
//! The layout is fixed: one A4 page with a centred bold heading naming the user.
//! Only the standard Helvetica-Bold font is referenced, so nothing is embedded.

use std::fmt::Write as _;

pub const FILE_NAME: &str = "Fitness_Plan.pdf";

const PAGE_WIDTH: f64 = 595.28;
const PAGE_HEIGHT: f64 = 841.89;
const FONT_SIZE: f64 = 14.0;
const TOP_MARGIN: f64 = 56.7;
// Helvetica-Bold has no fixed advance; this average keeps centring close enough.
const AVG_GLYPH_WIDTH: f64 = 0.6;

pub fn plan_heading(user: &str) -> String {
    format!("Fitness Plan for {user}")
}

pub fn render_plan_document(user: &str) -> Vec<u8> {
    let text = escape_text(&plan_heading(user));
    let glyphs = plan_heading(user).chars().count() as f64;
    let text_width = glyphs * FONT_SIZE * AVG_GLYPH_WIDTH;
    let x = ((PAGE_WIDTH - text_width) / 2.0).max(0.0);
    let y = PAGE_HEIGHT - TOP_MARGIN;

    let content = format!("BT\n/F1 {FONT_SIZE} Tf\n{x:.2} {y:.2} Td\n({text}) Tj\nET\n");

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
             /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
            .to_string(),
        format!("<< /Length {} >>\nstream\n{content}endstream", content.len()),
    ];

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (idx, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        // Writing into a String cannot fail.
        let _ = write!(out, "{} 0 obj\n{}\nendobj\n", idx + 1, body);
    }

    let xref_at = out.len();
    let _ = write!(out, "xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in &offsets {
        let _ = write!(out, "{offset:010} 00000 n \n");
    }
    let _ = write!(
        out,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_at
    );
    out.into_bytes()
}

/// Escapes PDF string delimiters and replaces anything outside printable ASCII.
fn escape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            ' '..='~' => out.push(ch),
            _ => out.push('?'),
        }
    }
    out
}
