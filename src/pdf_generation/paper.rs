use std::str::FromStr;

use super::PdfError;
use crate::db::enums::{Orientation, PosterSize};

/// A1 portrait width, the reference for scaling.
pub const A1_WIDTH_MM: f32 = 594.0;

const MM_TO_PT: f32 = 72.0 / 25.4;

/// Portrait dimensions in millimetres.
pub fn portrait_mm(size: PosterSize) -> (u32, u32) {
    match size {
        PosterSize::A1 => (594, 841),
        PosterSize::A3 => (297, 420),
        PosterSize::A4 => (210, 297),
        PosterSize::A5 => (148, 210),
    }
}

pub fn dimensions(size: PosterSize, orientation: Orientation) -> (u32, u32) {
    let (w, h) = portrait_mm(size);
    match orientation {
        Orientation::Portrait => (w, h),
        Orientation::Landscape => (h, w),
    }
}

/// Size relative to A1, from the portrait width.
pub fn scale_factor(size: PosterSize) -> f32 {
    portrait_mm(size).0 as f32 / A1_WIDTH_MM
}

/// QR code edge length in pixels for the HTML rendition.
pub fn qr_pixel_size(size: PosterSize) -> u32 {
    (200.0 * scale_factor(size)) as u32
}

pub fn mm_to_pt(mm: f32) -> f32 {
    mm * MM_TO_PT
}

impl FromStr for PosterSize {
    type Err = PdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A1" => Ok(PosterSize::A1),
            "A3" => Ok(PosterSize::A3),
            "A4" => Ok(PosterSize::A4),
            "A5" => Ok(PosterSize::A5),
            other => Err(PdfError::InvalidSize(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landscape_swaps_dimensions() {
        assert_eq!(dimensions(PosterSize::A3, Orientation::Portrait), (297, 420));
        assert_eq!(dimensions(PosterSize::A3, Orientation::Landscape), (420, 297));
        assert_eq!(dimensions(PosterSize::A5, Orientation::Landscape), (210, 148));
    }

    #[test]
    fn size_codes_parse_case_insensitively() {
        assert_eq!("a4".parse::<PosterSize>().unwrap(), PosterSize::A4);
        assert_eq!(" A1 ".parse::<PosterSize>().unwrap(), PosterSize::A1);
        assert!(matches!("A2".parse::<PosterSize>(), Err(PdfError::InvalidSize(s)) if s == "A2"));
    }

    #[test]
    fn scale_is_relative_to_a1_width() {
        assert_eq!(scale_factor(PosterSize::A1), 1.0);
        assert!((scale_factor(PosterSize::A3) - 0.5).abs() < 1e-6);
        assert!((scale_factor(PosterSize::A4) - 210.0 / 594.0).abs() < 1e-6);
        assert_eq!(qr_pixel_size(PosterSize::A1), 200);
        assert_eq!(qr_pixel_size(PosterSize::A3), 100);
        assert_eq!(qr_pixel_size(PosterSize::A5), 49);
    }

    #[test]
    fn millimetres_to_points() {
        assert!((mm_to_pt(25.4) - 72.0).abs() < 1e-4);
    }
}
