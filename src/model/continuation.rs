//! Continuation state: the per-stave carry-over data threaded across
//! bar, system, and page boundaries (open slurs, pending hairpins,
//! n-bar-rest counters, bar-accidental memory).

use crate::arena::{FreeList, Handle};
use crate::model::hairpin::Hairpin;
use crate::model::key::KeySignature;
use crate::model::slur::Slur;

/// Circle-of-fifths sharp order, read left to right for the first
/// `sharps` letters of a sharp key (matches [`crate::model::key`]'s
/// own sharps-count convention).
const SHARP_ORDER: [char; 7] = ['F', 'C', 'G', 'D', 'A', 'E', 'B'];

/// As [`SHARP_ORDER`], for flat keys.
const FLAT_ORDER: [char; 7] = ['B', 'E', 'A', 'D', 'G', 'C', 'F'];

/// The seven natural letters in the same order as
/// [`crate::model::key::LETTERS`], for indexing `Custom` key rows.
const NATURAL_ORDER: [char; 7] = ['C', 'D', 'E', 'F', 'G', 'A', 'B'];

/// Doubled diatonic step for each letter (matches
/// [`crate::stave::note_parser`]'s `LETTER_STEP` table), used as the
/// bar-accidental slot index so a note's letter name maps directly to
/// its memory slot regardless of octave.
#[must_use]
fn letter_slot(letter: char) -> Option<usize> {
    let step = match letter.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 6,
        'G' => 8,
        'A' => 10,
        'B' => 12,
        _ => return None,
    };
    Some(step as usize)
}

/// Bar-local accidental memory: one slot per letter/step position,
/// reset at each new bar from the active key signature, then updated
/// as accidentals are read (spec.md §4.4/§8's "read_baraccs" testable
/// property: an unmarked note later in the bar inherits the most
/// recent accidental written for its letter).
#[derive(Debug, Clone, Default)]
pub struct BarAccidentals {
    slots: [i8; 14],
}

impl BarAccidentals {
    /// Populates the bar's starting accidental row from a key
    /// signature: a sharp key sets `+2` quarter-tones (one sharp) on
    /// the first `sharps` letters of [`SHARP_ORDER`], a flat key sets
    /// `-2` on the first `-sharps` letters of [`FLAT_ORDER`], and a
    /// custom key copies its own seven-letter accidental row directly.
    #[must_use]
    pub fn from_key(key: &KeySignature) -> Self {
        let mut acc = BarAccidentals::default();
        match key {
            KeySignature::Standard { sharps } if *sharps > 0 => {
                for &letter in SHARP_ORDER.iter().take(*sharps as usize) {
                    if let Some(slot) = letter_slot(letter) {
                        acc.slots[slot] = 2;
                    }
                }
            }
            KeySignature::Standard { sharps } if *sharps < 0 => {
                for &letter in FLAT_ORDER.iter().take((-*sharps) as usize) {
                    if let Some(slot) = letter_slot(letter) {
                        acc.slots[slot] = -2;
                    }
                }
            }
            KeySignature::Standard { .. } | KeySignature::NoKey => {}
            KeySignature::Custom { accidentals, .. } => {
                for (letter, value) in NATURAL_ORDER.iter().zip(accidentals.iter()) {
                    if let Some(slot) = letter_slot(*letter) {
                        acc.slots[slot] = *value;
                    }
                }
            }
        }
        acc
    }

    pub fn set(&mut self, line: usize, value: i8) {
        if let Some(slot) = self.slots.get_mut(line) {
            *slot = value;
        }
    }

    #[must_use]
    pub fn get(&self, line: usize) -> i8 {
        self.slots.get(line).copied().unwrap_or(0)
    }

    /// The active quarter-tone shift for a note letter: the written
    /// accidental most recently seen in this bar for that letter, or
    /// the key signature's default if none has been written yet.
    #[must_use]
    pub fn quarter_shift_for_letter(&self, letter: char) -> i32 {
        letter_slot(letter).map(|slot| self.get(slot) as i32).unwrap_or(0)
    }

    /// Records an explicit accidental's quarter-tone value against its
    /// letter, so later unmarked notes of the same letter in this bar
    /// inherit it.
    pub fn record_letter_accidental(&mut self, letter: char, quarter_value: i32) {
        if let Some(slot) = letter_slot(letter) {
            self.set(slot, quarter_value as i8);
        }
    }
}

/// Per-stave state that persists across bars within one movement.
#[derive(Debug, Default)]
pub struct ContState {
    pub open_slurs: Vec<Handle<Slur>>,
    pub slur_free: FreeList<Slur>,
    pub open_hairpins: Vec<Hairpin>,
    pub bar_accidentals: BarAccidentals,
    /// Consecutive whole-bar rests pending collapse into an n-bar rest.
    pub pending_rest_bars: u32,
    pub last_was_tied: bool,
}

impl ContState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset_bar_accidentals(&mut self, key: &KeySignature) {
        self.bar_accidentals = BarAccidentals::from_key(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_accidentals_default_to_zero() {
        let acc = BarAccidentals::default();
        assert_eq!(acc.get(0), 0);
    }

    #[test]
    fn bar_accidentals_set_and_get() {
        let mut acc = BarAccidentals::default();
        acc.set(3, -1);
        assert_eq!(acc.get(3), -1);
        assert_eq!(acc.get(4), 0);
    }

    #[test]
    fn from_key_sets_sharps_in_fifths_order() {
        // G major: one sharp, F.
        let acc = BarAccidentals::from_key(&KeySignature::Standard { sharps: 1 });
        assert_eq!(acc.quarter_shift_for_letter('f'), 2);
        assert_eq!(acc.quarter_shift_for_letter('c'), 0);

        // D major: two sharps, F and C.
        let acc = BarAccidentals::from_key(&KeySignature::Standard { sharps: 2 });
        assert_eq!(acc.quarter_shift_for_letter('f'), 2);
        assert_eq!(acc.quarter_shift_for_letter('c'), 2);
        assert_eq!(acc.quarter_shift_for_letter('g'), 0);
    }

    #[test]
    fn from_key_sets_flats_in_fourths_order() {
        // F major: one flat, B.
        let acc = BarAccidentals::from_key(&KeySignature::Standard { sharps: -1 });
        assert_eq!(acc.quarter_shift_for_letter('b'), -2);
        assert_eq!(acc.quarter_shift_for_letter('e'), 0);
    }

    #[test]
    fn from_key_no_key_and_c_major_leave_everything_natural() {
        let acc = BarAccidentals::from_key(&KeySignature::NoKey);
        for letter in ['c', 'd', 'e', 'f', 'g', 'a', 'b'] {
            assert_eq!(acc.quarter_shift_for_letter(letter), 0);
        }
        let acc = BarAccidentals::from_key(&KeySignature::Standard { sharps: 0 });
        assert_eq!(acc.quarter_shift_for_letter('f'), 0);
    }

    #[test]
    fn record_letter_accidental_overrides_for_the_rest_of_the_bar() {
        let mut acc = BarAccidentals::from_key(&KeySignature::Standard { sharps: 1 });
        assert_eq!(acc.quarter_shift_for_letter('f'), 2);
        acc.record_letter_accidental('f', 0);
        assert_eq!(acc.quarter_shift_for_letter('f'), 0);
    }
}
