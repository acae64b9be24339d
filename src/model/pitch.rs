//! Pitch representations: quarter-tone absolute pitch, and the
//! stave-relative "spitch" used for vertical placement.

/// A pitch in quarter-tones from a fixed reference (middle C = 0),
/// allowing microtonal transposition by a single quarter-tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct QuarterTone(pub i32);

impl QuarterTone {
    pub const MIDDLE_C: QuarterTone = QuarterTone(0);

    #[must_use]
    pub fn semitones(self) -> i32 {
        self.0 / 2
    }

    #[must_use]
    pub fn is_quarter_sharp(self) -> bool {
        self.0 % 2 != 0
    }
}

/// Absolute chromatic pitch: semitone count from middle C, independent
/// of spelling. Used where only sounding pitch (not notated pitch)
/// matters, e.g. MIDI-range validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct AbsPitch(pub i32);

/// Stave-relative vertical position, in quarter-line units (one line
/// or space = 2 units), with octave folded in. Supported range is
/// octave -3..=4 around the stave's standard clef position (spec.md
/// §4.3's octave-range diagnostic, catalog entry 164).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct SPitch(pub i32);

impl SPitch {
    pub const MIN_OCTAVE: i32 = -3;
    pub const MAX_OCTAVE: i32 = 4;

    #[must_use]
    pub fn octave(self) -> i32 {
        self.0.div_euclid(14)
    }

    #[must_use]
    pub fn in_range(self) -> bool {
        (Self::MIN_OCTAVE..=Self::MAX_OCTAVE).contains(&self.octave())
    }
}
