//! Time-signature width: `time_width(ts)` from spec.md §4.6.

use crate::model::time::TimeSignature;
use crate::strfmt::Fixed;

fn digit_count(mut n: u32) -> i32 {
    if n == 0 {
        return 1;
    }
    let mut count = 0;
    while n > 0 {
        count += 1;
        n /= 10;
    }
    count
}

/// A registered `printtime` override: measured widths of the numerator
/// and denominator strings as the source directive supplied them.
#[derive(Debug, Clone, Copy)]
pub struct PrintTimeOverride {
    pub numerator_width: Fixed,
    pub denominator_width: Fixed,
}

/// The horizontal space a time signature occupies, stacked
/// numerator-over-denominator. `is_letter_form` marks `C`/`A` (common
/// time / alla breve), which always use the fixed glyph width
/// regardless of the underlying `4/4`/`2/2` numbers. `show_time` is the
/// movement-wide "print time signatures at all" switch.
#[must_use]
pub fn time_width(
    ts: TimeSignature,
    is_letter_form: bool,
    printtime_override: Option<PrintTimeOverride>,
    digit_width: Fixed,
    show_time: bool,
) -> Fixed {
    if !show_time {
        return Fixed::ZERO;
    }
    if let Some(o) = printtime_override {
        return if o.numerator_width.0 > o.denominator_width.0 {
            o.numerator_width
        } else {
            o.denominator_width
        };
    }
    if is_letter_form {
        return Fixed::from_points(10);
    }
    let digits = digit_count(ts.numerator as u32).max(digit_count(ts.denominator as u32));
    digit_width * digits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_display_returns_zero() {
        let w = time_width(TimeSignature::common(), false, None, Fixed::from_points(6), false);
        assert_eq!(w, Fixed::ZERO);
    }

    #[test]
    fn letter_form_uses_fixed_width_regardless_of_digits() {
        let w = time_width(TimeSignature::common(), true, None, Fixed::from_points(6), true);
        assert_eq!(w, Fixed::from_points(10));
    }

    #[test]
    fn digit_width_scales_with_widest_of_numerator_and_denominator() {
        let ts = TimeSignature::simple(12, 8);
        let w = time_width(ts, false, None, Fixed::from_points(6), true);
        assert_eq!(w, Fixed::from_points(12));
    }

    #[test]
    fn printtime_override_wins_and_takes_the_wider_string() {
        let o = PrintTimeOverride {
            numerator_width: Fixed::from_points(20),
            denominator_width: Fixed::from_points(15),
        };
        let w = time_width(TimeSignature::common(), false, Some(o), Fixed::from_points(6), true);
        assert_eq!(w, Fixed::from_points(20));
    }
}
