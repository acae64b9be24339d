//! Named paper sizes with magnified/unmagnified depth and width, used
//! to size a page before any pagination logic (pagination itself is
//! out of scope; this table only supplies dimensions).

use crate::strfmt::Fixed;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperSize {
    A3,
    A4,
    A5,
    B5,
    Letter,
}

impl PaperSize {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "a3" => Some(PaperSize::A3),
            "a4" => Some(PaperSize::A4),
            "a5" => Some(PaperSize::A5),
            "b5" => Some(PaperSize::B5),
            "letter" => Some(PaperSize::Letter),
            _ => None,
        }
    }

    /// `(width, height)` in points at 1x magnification.
    #[must_use]
    pub fn dimensions(self) -> (Fixed, Fixed) {
        match self {
            PaperSize::A3 => (Fixed::from_points(842), Fixed::from_points(1191)),
            PaperSize::A4 => (Fixed::from_points(595), Fixed::from_points(842)),
            PaperSize::A5 => (Fixed::from_points(420), Fixed::from_points(595)),
            PaperSize::B5 => (Fixed::from_points(499), Fixed::from_points(709)),
            PaperSize::Letter => (Fixed::from_points(612), Fixed::from_points(792)),
        }
    }

    /// Dimensions scaled by an overall magnification factor (thousandths,
    /// 1000 = 1.0x), matching the `Fixed::muldiv` scaling convention
    /// used throughout the geometry layer.
    #[must_use]
    pub fn magnified_dimensions(self, magnification_milli: i32) -> (Fixed, Fixed) {
        let (w, h) = self.dimensions();
        (w.muldiv(magnification_milli, 1000), h.muldiv(magnification_milli, 1000))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!(PaperSize::parse("A4"), Some(PaperSize::A4));
        assert_eq!(PaperSize::parse("letter"), Some(PaperSize::Letter));
        assert_eq!(PaperSize::parse("tabloid"), None);
    }

    #[test]
    fn magnification_scales_both_dimensions() {
        let (w, h) = PaperSize::A4.magnified_dimensions(2000);
        let (w1, h1) = PaperSize::A4.dimensions();
        assert_eq!(w.0, w1.0 * 2);
        assert_eq!(h.0, h1.0 * 2);
    }
}
