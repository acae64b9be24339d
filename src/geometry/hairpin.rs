//! Hairpin (crescendo/diminuendo wedge) geometry: the two line segments
//! that form the open/closed ends of the wedge between a start and end
//! x position on one stave line.

use super::Point;
use crate::model::hairpin::HairpinDirection;
use crate::strfmt::Fixed;

/// The two diverging (or converging) lines that draw a hairpin wedge,
/// plus the shared baseline y they sit either side of.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HairpinGeometry {
    pub upper: (Point, Point),
    pub lower: (Point, Point),
}

/// Computes wedge geometry running from `start_x` to `end_x` at
/// baseline `y`, opening to `half_opening` above and below the
/// baseline at its wide end. A crescendo opens left-to-right (point at
/// `start_x`); a diminuendo closes left-to-right (point at `end_x`).
#[must_use]
pub fn compute_hairpin(start_x: Fixed, end_x: Fixed, y: Fixed, direction: HairpinDirection, half_opening: Fixed) -> HairpinGeometry {
    let (point_x, open_x) = match direction {
        HairpinDirection::Crescendo => (start_x, end_x),
        HairpinDirection::Diminuendo => (end_x, start_x),
    };
    let apex = Point::new(point_x, y);
    let upper_open = Point::new(open_x, y + half_opening);
    let lower_open = Point::new(open_x, y - half_opening);
    HairpinGeometry {
        upper: (apex, upper_open),
        lower: (apex, lower_open),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crescendo_opens_toward_the_end_position() {
        let g = compute_hairpin(Fixed::from_points(0), Fixed::from_points(20), Fixed::ZERO, HairpinDirection::Crescendo, Fixed::from_points(3));
        assert_eq!(g.upper.0.x, Fixed::from_points(0));
        assert_eq!(g.upper.1.x, Fixed::from_points(20));
        assert_eq!(g.upper.1.y, Fixed::from_points(3));
        assert_eq!(g.lower.1.y, Fixed::from_points(-3));
    }

    #[test]
    fn diminuendo_opens_toward_the_start_position() {
        let g = compute_hairpin(Fixed::from_points(0), Fixed::from_points(20), Fixed::ZERO, HairpinDirection::Diminuendo, Fixed::from_points(3));
        assert_eq!(g.upper.0.x, Fixed::from_points(20));
        assert_eq!(g.upper.1.x, Fixed::from_points(0));
    }
}
