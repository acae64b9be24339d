//! `y_bound(below, tie?, hasAcc, withDynamics)` from spec.md §4.6: the
//! stave-relative y clearance a slur or tie needs above/below a note.
//!
//! Grounded on `tables.c`'s `accdowntab`/`accuptab` accidental-overhang
//! tables and the accent-clearance tables referenced there; the exact
//! per-glyph tables belong to font metrics (out of scope per spec.md
//! §1), so this implements the same additive-clearance shape with
//! representative constants.

use crate::strfmt::Fixed;

/// Base clearance between a notehead and a same-side slur/tie, before
/// any accidental or dynamics allowance.
const BASE_CLEARANCE: i32 = 3000;
/// Extra clearance a tie needs over a plain slur (ties sit closer to
/// the notehead, but the curve itself still needs headroom).
const TIE_EXTRA: i32 = 1000;
/// Extra clearance when an accidental overhangs on the same side
/// (`accdowntab`/`accuptab` rows).
const ACCIDENTAL_EXTRA: i32 = 4000;
/// Extra clearance reserved when dynamics marks (hairpins, `p`/`f`
/// letters) occupy the same side.
const DYNAMICS_EXTRA: i32 = 5000;

/// Returns the y offset (in [`Fixed`] units, positive magnitude; the
/// caller negates it when `below` is true) a slur or tie control point
/// must clear past the notehead on the requested side.
#[must_use]
pub fn y_bound(below: bool, has_tie: bool, has_accidental: bool, with_dynamics: bool) -> Fixed {
    let mut total = BASE_CLEARANCE;
    if has_tie {
        total += TIE_EXTRA;
    }
    // Accidentals are only ever written above a note's printed pitch
    // (to its left, at notehead height), so they only add clearance on
    // the upper side; on the lower side they contribute nothing.
    if has_accidental && !below {
        total += ACCIDENTAL_EXTRA;
    }
    if with_dynamics {
        total += DYNAMICS_EXTRA;
    }
    let signed = if below { -total } else { total };
    Fixed(signed)
}
