//! Key-signature width: `key_width(key, clef)` from spec.md §4.6.
//!
//! Grounded on `tables.c`'s accidental-spacing table (`accspacing`) and
//! `setkey.c`'s standard-key accidental ordering; a `printkey` override
//! (registered per `(key, clef)` pair, valid from the movement it was
//! set in onward) takes priority over the computed width when present.

use crate::model::clef::Clef;
use crate::model::key::KeySignature;
use crate::strfmt::Fixed;
use crate::tree::BalancedTree;

/// Per-glyph horizontal advance used when laying out a key signature's
/// accidentals left to right. Defaults approximate the classic PMW
/// music-font metrics (in points).
#[derive(Debug, Clone, Copy)]
pub struct AccidentalSpacing {
    pub sharp: Fixed,
    pub flat: Fixed,
    pub natural: Fixed,
    /// Narrower substitute used for a half-sharp row in Egyptian-style
    /// key layouts, selected by the `narrow` flag below.
    pub narrow_sharp: Fixed,
}

impl Default for AccidentalSpacing {
    fn default() -> Self {
        AccidentalSpacing {
            sharp: Fixed::from_points(7),
            flat: Fixed::from_points(6),
            natural: Fixed::from_points(6),
            narrow_sharp: Fixed::from_points(5),
        }
    }
}

/// A registered `printkey` override string's measured width, keyed by
/// `"{key-name}/{clef-name}"` as `makekey`/`printkey` directives store
/// them (one entry per (key, clef) pair, last write wins per movement).
pub type PrintKeyOverrides = BalancedTree<Fixed>;

/// Builds the `"{key-name}/{clef-name}"` lookup key a registered
/// `printkey` override is stored under, shared between `header`'s
/// directive dispatch (which populates [`PrintKeyOverrides`]) and
/// [`key_width`] (which reads it back).
#[must_use]
pub fn override_key(key: &KeySignature, clef: Clef) -> String {
    let key_name = match key {
        KeySignature::Standard { sharps } => format!("std{sharps}"),
        KeySignature::Custom { name, .. } => name.clone(),
        KeySignature::NoKey => "none".to_string(),
    };
    format!("{key_name}/{clef:?}")
}

/// The horizontal space a key signature occupies at the given clef.
/// Prefers a registered `printkey` override string's measured width;
/// otherwise sums accidental glyph widths for a standard key, or each
/// nonzero row entry for a custom `makekey` key.
#[must_use]
pub fn key_width(
    key: &KeySignature,
    clef: Clef,
    overrides: &PrintKeyOverrides,
    spacing: AccidentalSpacing,
    narrow: bool,
) -> Fixed {
    if let Some(width) = overrides.get(&override_key(key, clef)) {
        return *width;
    }
    match key {
        KeySignature::Standard { sharps } => {
            let count = sharps.unsigned_abs() as i32;
            if count == 0 {
                return Fixed::ZERO;
            }
            let unit = if *sharps > 0 {
                if narrow {
                    spacing.narrow_sharp
                } else {
                    spacing.sharp
                }
            } else {
                spacing.flat
            };
            unit * count
        }
        KeySignature::Custom { accidentals, .. } => {
            accidentals
                .iter()
                .filter(|&&a| a != 0)
                .fold(Fixed::ZERO, |total, &a| {
                    total
                        + if a > 0 {
                            spacing.sharp
                        } else {
                            spacing.flat
                        }
                })
        }
        KeySignature::NoKey => Fixed::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_key_has_zero_width() {
        let overrides = PrintKeyOverrides::new();
        let w = key_width(&KeySignature::NoKey, Clef::Treble, &overrides, AccidentalSpacing::default(), false);
        assert_eq!(w, Fixed::ZERO);
    }

    #[test]
    fn sharps_and_flats_scale_with_count() {
        let overrides = PrintKeyOverrides::new();
        let spacing = AccidentalSpacing::default();
        let three_sharps = key_width(&KeySignature::Standard { sharps: 3 }, Clef::Treble, &overrides, spacing, false);
        assert_eq!(three_sharps, spacing.sharp * 3);
        let two_flats = key_width(&KeySignature::Standard { sharps: -2 }, Clef::Treble, &overrides, spacing, false);
        assert_eq!(two_flats, spacing.flat * 2);
    }

    #[test]
    fn printkey_override_wins_over_computed_width() {
        let mut overrides = PrintKeyOverrides::new();
        let key = KeySignature::Standard { sharps: 3 };
        overrides.insert(override_key(&key, Clef::Treble), Fixed::from_points(99));
        let w = key_width(&key, Clef::Treble, &overrides, AccidentalSpacing::default(), false);
        assert_eq!(w, Fixed::from_points(99));
    }

    #[test]
    fn narrow_flag_shrinks_sharp_rows_only() {
        let overrides = PrintKeyOverrides::new();
        let spacing = AccidentalSpacing::default();
        let key = KeySignature::Standard { sharps: 4 };
        let wide = key_width(&key, Clef::Treble, &overrides, spacing, false);
        let narrow = key_width(&key, Clef::Treble, &overrides, spacing, true);
        assert!(narrow.0 < wide.0);
    }

    #[test]
    fn custom_key_sums_only_nonzero_rows() {
        let overrides = PrintKeyOverrides::new();
        let spacing = AccidentalSpacing::default();
        let key = KeySignature::Custom {
            name: "X1".into(),
            accidentals: [1, 0, -1, 0, 0, 0, 0],
        };
        let w = key_width(&key, Clef::Treble, &overrides, spacing, false);
        assert_eq!(w, spacing.sharp + spacing.flat);
    }
}
