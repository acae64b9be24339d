//! Slur/line Bezier geometry: control-point computation in a rotated
//! coordinate frame, partial-curve extraction for gaps and line-broken
//! continuations, and arc-length sampling for dash fitting.
//!
//! Grounded on `setslur.c`: control points are found by working in a
//! frame where the chord from start to end is horizontal (simplifying
//! the curvature-bias math), then rotated back into page coordinates.
//! `find_t_for_x_fraction` and `arc_length_sampled` mirror that file's
//! bisection search and 20-step numerical integration, preserving the
//! three-decimal rounding policy from Design Notes §9 at every point
//! that would otherwise carry raw floats into a comparison.

use super::Point;
use crate::strfmt::Fixed;

/// A cubic Bezier curve in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierCurve {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

fn pt(x: f64, y: f64) -> Point {
    Point::new(Fixed::round3_from_f64(x), Fixed::round3_from_f64(y))
}

fn fx(p: Fixed) -> f64 {
    p.0 as f64 / 1000.0
}

/// Which side of the chord the curve bulges toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Above,
    Below,
}

/// Computes the four Bezier control points for a slur/line running
/// from `start` to `end`. `curvature_bias` is the `co` fraction from
/// spec.md §4.6 (in thousandths: 250 = a curve that bulges by a
/// quarter of the chord length at its widest).
#[must_use]
pub fn compute_slur_control_points(start: Point, end: Point, side: Side, curvature_bias: i32) -> BezierCurve {
    let (sx, sy) = (fx(start.x), fx(start.y));
    let (ex, ey) = (fx(end.x), fx(end.y));
    let dx = ex - sx;
    let dy = ey - sy;
    let length = (dx * dx + dy * dy).sqrt();
    let angle = dy.atan2(dx);

    let direction = match side {
        Side::Above => 1.0,
        Side::Below => -1.0,
    };
    let bulge = length * (curvature_bias as f64 / 1000.0) * direction;

    // Control points in the rotated frame: chord lies on the local
    // x-axis, bulge applied perpendicular to it at the 1/3 and 2/3
    // points (the standard visually-even Bezier bulge placement).
    let local = [(0.0, 0.0), (length / 3.0, bulge), (length * 2.0 / 3.0, bulge), (length, 0.0)];

    let cos_a = angle.cos();
    let sin_a = angle.sin();
    let rotated: Vec<Point> = local
        .iter()
        .map(|&(lx, ly)| {
            let rx = sx + lx * cos_a - ly * sin_a;
            let ry = sy + lx * sin_a + ly * cos_a;
            pt(rx, ry)
        })
        .collect();

    BezierCurve {
        p0: rotated[0],
        p1: rotated[1],
        p2: rotated[2],
        p3: rotated[3],
    }
}

/// Evaluates the cubic Bezier at parameter `t` in `[0, 1]`.
#[must_use]
pub fn curve_point(curve: &BezierCurve, t: f64) -> Point {
    let mt = 1.0 - t;
    let x = mt.powi(3) * fx(curve.p0.x)
        + 3.0 * mt.powi(2) * t * fx(curve.p1.x)
        + 3.0 * mt * t.powi(2) * fx(curve.p2.x)
        + t.powi(3) * fx(curve.p3.x);
    let y = mt.powi(3) * fx(curve.p0.y)
        + 3.0 * mt.powi(2) * t * fx(curve.p1.y)
        + 3.0 * mt * t.powi(2) * fx(curve.p2.y)
        + t.powi(3) * fx(curve.p3.y);
    pt(x, y)
}

/// Finds the Bezier parameter `t` whose curve point's x-coordinate
/// sits at the given fraction of the way from `p0.x` to `p3.x`, by
/// iterative bisection (x(t) is not linear in t once control points
/// are offset, so a closed form isn't available).
#[must_use]
pub fn find_t_for_x_fraction(curve: &BezierCurve, x_fraction: f64) -> f64 {
    let target_x = fx(curve.p0.x) + (fx(curve.p3.x) - fx(curve.p0.x)) * x_fraction;
    let mut low = 0.0_f64;
    let mut high = 1.0_f64;
    for _ in 0..40 {
        let mid = (low + high) / 2.0;
        let mid_x = fx(curve_point(curve, mid).x);
        if mid_x < target_x {
            low = mid;
        } else {
            high = mid;
        }
    }
    (low + high) / 2.0
}

/// Splits a cubic Bezier at parameter `t` via De Casteljau's algorithm,
/// returning the `[0, t]` and `[t, 1]` sub-curves.
#[must_use]
pub fn split_curve(curve: &BezierCurve, t: f64) -> (BezierCurve, BezierCurve) {
    let lerp = |a: Point, b: Point, t: f64| pt(fx(a.x) + (fx(b.x) - fx(a.x)) * t, fx(a.y) + (fx(b.y) - fx(a.y)) * t);

    let p01 = lerp(curve.p0, curve.p1, t);
    let p12 = lerp(curve.p1, curve.p2, t);
    let p23 = lerp(curve.p2, curve.p3, t);
    let p012 = lerp(p01, p12, t);
    let p123 = lerp(p12, p23, t);
    let p0123 = lerp(p012, p123, t);

    let left = BezierCurve {
        p0: curve.p0,
        p1: p01,
        p2: p012,
        p3: p0123,
    };
    let right = BezierCurve {
        p0: p0123,
        p1: p123,
        p2: p23,
        p3: curve.p3,
    };
    (left, right)
}

/// Extracts the sub-curve spanning Bezier parameters `[t0, t1]`
/// (`0 <= t0 < t1 <= 1`), used for slur-gap segments and for drawing
/// each half of a line-broken slur when `endlineslurstyle` selects
/// "truncate the full curve at the break" (style 0).
#[must_use]
pub fn partial_curve(curve: &BezierCurve, t0: f64, t1: f64) -> BezierCurve {
    let (_, tail) = split_curve(curve, t0);
    let relative_t1 = if t1 >= 1.0 {
        1.0
    } else {
        (t1 - t0) / (1.0 - t0)
    };
    let (head, _) = split_curve(&tail, relative_t1);
    head
}

const ARC_LENGTH_SAMPLES: usize = 20;

/// True arc length of the curve via piecewise-linear sampling at
/// `ARC_LENGTH_SAMPLES` steps, matching spec.md §4.6's "20-step
/// sampling" used to fit an exact dash count to dashed/dotted lines.
#[must_use]
pub fn arc_length_sampled(curve: &BezierCurve) -> Fixed {
    let mut total = 0.0_f64;
    let mut previous = curve_point(curve, 0.0);
    for step in 1..=ARC_LENGTH_SAMPLES {
        let t = step as f64 / ARC_LENGTH_SAMPLES as f64;
        let current = curve_point(curve, t);
        let dx = fx(current.x) - fx(previous.x);
        let dy = fx(current.y) - fx(previous.y);
        total += (dx * dx + dy * dy).sqrt();
        previous = current;
    }
    Fixed::round3_from_f64(total)
}

/// Picks a dash count and per-dash length so that `count` dashes and
/// `count - 1` full-length gaps exactly fill `total_length`, starting
/// and ending on a dash. Matches spec.md §4.6's "select dash length and
/// count to fit exactly" requirement; always returns at least one dash.
#[must_use]
pub fn fit_dash_pattern(total_length: Fixed, nominal_dash: Fixed, gap: Fixed) -> (u32, Fixed) {
    if nominal_dash.0 <= 0 || total_length.0 <= nominal_dash.0 {
        return (1, total_length);
    }
    let unit = nominal_dash.0 + gap.0;
    let count = ((total_length.0 + gap.0) / unit).max(1) as u32;
    let adjusted = Fixed((total_length.0 - (count as i32 - 1) * gap.0) / count as i32);
    (count, adjusted)
}

/// One gap cut into a slur/line, positioned by Bezier parameter.
#[derive(Debug, Clone, Copy)]
pub struct GapSpec {
    pub center_t: f64,
    pub half_width_t: f64,
}

/// Splits `curve` into the visible segments that remain once every gap
/// in `gaps` (processed left-to-right, per spec.md §4.6) has been cut
/// out. Overlapping gaps simply produce a merged blank stretch: any
/// segment whose `[t0, t1]` span becomes empty or inverted is dropped.
#[must_use]
pub fn segments_excluding_gaps(curve: &BezierCurve, gaps: &[GapSpec]) -> Vec<BezierCurve> {
    let mut sorted: Vec<GapSpec> = gaps.to_vec();
    sorted.sort_by(|a, b| a.center_t.partial_cmp(&b.center_t).unwrap());

    let mut segments = Vec::new();
    let mut cursor = 0.0_f64;
    for gap in &sorted {
        let gap_start = (gap.center_t - gap.half_width_t).max(0.0);
        let gap_end = (gap.center_t + gap.half_width_t).min(1.0);
        if gap_start > cursor {
            segments.push(partial_curve(curve, cursor, gap_start));
        }
        cursor = cursor.max(gap_end);
    }
    if cursor < 1.0 {
        segments.push(partial_curve(curve, cursor, 1.0));
    }
    segments
}

/// Tangent angle (radians) at parameter `t`, used to rotate gap text
/// and gap draw-call coordinate frames with the local curve slope.
#[must_use]
pub fn tangent_angle(curve: &BezierCurve, t: f64) -> f64 {
    let mt = 1.0 - t;
    let dx = 3.0 * mt.powi(2) * (fx(curve.p1.x) - fx(curve.p0.x))
        + 6.0 * mt * t * (fx(curve.p2.x) - fx(curve.p1.x))
        + 3.0 * t.powi(2) * (fx(curve.p3.x) - fx(curve.p2.x));
    let dy = 3.0 * mt.powi(2) * (fx(curve.p1.y) - fx(curve.p0.y))
        + 6.0 * mt * t * (fx(curve.p2.y) - fx(curve.p1.y))
        + 3.0 * t.powi(2) * (fx(curve.p3.y) - fx(curve.p2.y));
    dy.atan2(dx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level_chord(length: f64) -> (Point, Point) {
        (Point::new(Fixed::ZERO, Fixed::ZERO), Point::new(Fixed::from_points(length as i32), Fixed::ZERO))
    }

    #[test]
    fn control_points_bulge_toward_the_requested_side() {
        let (start, end) = level_chord(40.0);
        let above = compute_slur_control_points(start, end, Side::Above, 250);
        let below = compute_slur_control_points(start, end, Side::Below, 250);
        assert!(above.p1.y.0 > 0);
        assert!(below.p1.y.0 < 0);
    }

    #[test]
    fn endpoints_are_preserved_exactly() {
        let (start, end) = level_chord(30.0);
        let curve = compute_slur_control_points(start, end, Side::Above, 150);
        assert_eq!(curve.p0, start);
        assert_eq!(curve.p3, end);
    }

    #[test]
    fn find_t_for_x_fraction_brackets_the_midpoint() {
        let (start, end) = level_chord(50.0);
        let curve = compute_slur_control_points(start, end, Side::Above, 200);
        let t_half = find_t_for_x_fraction(&curve, 0.5);
        let point_at_t = curve_point(&curve, t_half);
        let expected_x = fx(start.x) + (fx(end.x) - fx(start.x)) * 0.5;
        assert!((fx(point_at_t.x) - expected_x).abs() < 0.01);
    }

    #[test]
    fn split_curve_endpoints_match_original_at_t() {
        let (start, end) = level_chord(60.0);
        let curve = compute_slur_control_points(start, end, Side::Above, 200);
        let (left, right) = split_curve(&curve, 0.4);
        assert_eq!(left.p0, curve.p0);
        assert_eq!(right.p3, curve.p3);
        assert_eq!(left.p3, right.p0);
    }

    #[test]
    fn partial_curve_covers_the_requested_parameter_range() {
        let (start, end) = level_chord(60.0);
        let curve = compute_slur_control_points(start, end, Side::Above, 200);
        let middle_third = partial_curve(&curve, 1.0 / 3.0, 2.0 / 3.0);
        let expected_start = curve_point(&curve, 1.0 / 3.0);
        let expected_end = curve_point(&curve, 2.0 / 3.0);
        assert!((fx(middle_third.p0.x) - fx(expected_start.x)).abs() < 0.01);
        assert!((fx(middle_third.p3.x) - fx(expected_end.x)).abs() < 0.01);
    }

    #[test]
    fn arc_length_of_a_flat_line_equals_its_chord() {
        let (start, end) = level_chord(48.0);
        let curve = compute_slur_control_points(start, end, Side::Above, 0);
        let length = arc_length_sampled(&curve);
        assert!((length.points() - 48.0).abs() < 0.05);
    }

    #[test]
    fn dash_pattern_fits_without_remainder() {
        let (count, dash) = fit_dash_pattern(Fixed::from_points(40), Fixed::from_points(4), Fixed::from_points(2));
        let total = count as i32 * dash.0 + (count as i32 - 1) * Fixed::from_points(2).0;
        assert_eq!(total, Fixed::from_points(40).0);
    }

    #[test]
    fn gaps_are_excluded_left_to_right() {
        let (start, end) = level_chord(60.0);
        let curve = compute_slur_control_points(start, end, Side::Above, 0);
        let gaps = vec![GapSpec { center_t: 0.5, half_width_t: 0.1 }];
        let segments = segments_excluding_gaps(&curve, &gaps);
        assert_eq!(segments.len(), 2);
    }
}
