use std::collections::BTreeMap;

use qrcode::render::svg;
use qrcode::{Color, QrCode};
use serde::Serialize;
use tracing::warn;

use super::PdfError;

/// Links printed on every poster: (key, url, label).
pub const STANDARD_QR_CODES: [(&str, &str, &str); 4] = [
    ("tide_tables", "https://www.met.ie/forecasts/marine-tides", "Tide Tables"),
    ("weather", "https://www.met.ie/forecasts/beach", "Weather Forecast"),
    ("bathing_faq", "https://www.beaches.ie/faq", "Bathing FAQ"),
    ("beaches_ie", "https://www.beaches.ie", "beaches.ie"),
];

pub fn beach_url(beach_id: &str) -> String {
    format!("https://www.beaches.ie/beach/{beach_id}")
}

/// Module grid of an encoded QR code, row-major, `true` for dark.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QrMatrix {
    pub width: usize,
    pub dark: Vec<bool>,
}

impl QrMatrix {
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        self.dark.get(y * self.width + x).copied().unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QrImage {
    pub url: String,
    pub label: String,
    /// Inline SVG for the HTML rendition; empty when encoding failed.
    pub svg: String,
    #[serde(skip)]
    pub matrix: QrMatrix,
}

impl QrImage {
    pub fn is_empty(&self) -> bool {
        self.matrix.width == 0
    }
}

pub fn generate_qr(data: &str, size_px: u32) -> Result<(QrMatrix, String), PdfError> {
    let code = QrCode::new(data.as_bytes()).map_err(|e| PdfError::QrCode(e.to_string()))?;
    let matrix = QrMatrix {
        width: code.width(),
        dark: code.to_colors().into_iter().map(|c| c == Color::Dark).collect(),
    };
    let svg = code
        .render::<svg::Color>()
        .min_dimensions(size_px, size_px)
        .quiet_zone(true)
        .build();
    Ok((matrix, svg))
}

fn image(url: String, label: &str, size_px: u32) -> QrImage {
    match generate_qr(&url, size_px) {
        Ok((matrix, svg)) => QrImage { url, label: label.to_string(), svg, matrix },
        Err(e) => {
            warn!(url = %url, error = %e, "QR code generation failed");
            QrImage { url, label: label.to_string(), svg: String::new(), matrix: QrMatrix::default() }
        }
    }
}

/// The standard set plus the beach's own page when an id is known.
pub fn poster_qr_codes(beach_id: &str, size_px: u32) -> BTreeMap<String, QrImage> {
    let mut codes: BTreeMap<String, QrImage> = STANDARD_QR_CODES
        .iter()
        .map(|(key, url, label)| (key.to_string(), image(url.to_string(), label, size_px)))
        .collect();
    if !beach_id.is_empty() {
        codes.insert("beach_url".to_string(), image(beach_url(beach_id), "Beach Page", size_px));
    }
    codes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_square_matrix() {
        let (matrix, svg) = generate_qr("https://www.beaches.ie", 200).unwrap();
        assert!(matrix.width >= 21);
        assert_eq!(matrix.dark.len(), matrix.width * matrix.width);
        // finder pattern corner
        assert!(matrix.is_dark(0, 0));
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn oversized_payload_is_an_error() {
        let data = "x".repeat(8000);
        assert!(matches!(generate_qr(&data, 100), Err(PdfError::QrCode(_))));
    }

    #[test]
    fn failed_codes_are_left_empty() {
        let img = image("y".repeat(8000), "Too long", 100);
        assert!(img.is_empty());
        assert!(img.svg.is_empty());
    }

    #[test]
    fn standard_set_plus_beach_page() {
        let codes = poster_qr_codes("IEEABWC010_0000_0100", 100);
        assert_eq!(codes.len(), 5);
        assert_eq!(codes["beach_url"].url, "https://www.beaches.ie/beach/IEEABWC010_0000_0100");
        assert_eq!(codes["tide_tables"].label, "Tide Tables");
        assert!(codes.values().all(|c| !c.is_empty()));

        assert_eq!(poster_qr_codes("", 100).len(), 4);
    }
}
