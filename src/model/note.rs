//! Notes, rests, and chords within a bar.

use crate::model::pitch::{QuarterTone, SPitch};
use crate::model::time::MusicLen;
use crate::pmwstring::PmwString;

/// What kind of event a note slot represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteKind {
    Pitched(SPitch),
    Rest,
    /// A `p` placeholder: repeats the previous note's pitch/length,
    /// used for chord continuation shorthand.
    Placeholder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accidental {
    DoubleFlat,
    Flat,
    Natural,
    Sharp,
    DoubleSharp,
    QuarterFlat,
    QuarterSharp,
}

/// Stem direction override from the note's `\options\` section (`u`,
/// `d`, `sw` tokens); `Auto` leaves the stem direction to geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StemForce {
    #[default]
    Auto,
    Up,
    Down,
    /// `sw`: stems on this note swap sides of the notehead.
    Swap,
}

/// The `nh`/`harm`/`cross`/`only`/`direct` notehead-shape options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteheadStyle {
    #[default]
    Normal,
    Harmonic,
    Cross,
    None,
    Only,
    Direct,
}

/// Bracket style drawn around a printed accidental (`rb`/`sb` options).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccidentalBracket {
    #[default]
    None,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Articulation {
    pub staccato: bool,
    pub staccatissimo: bool,
    pub accent: bool,
    pub tenuto: bool,
    pub marcato: bool,
    /// `wedge`: accent drawn as a vertical wedge rather than `>`.
    pub wedge: bool,
    /// `bar`: a short horizontal bar accent.
    pub bar: bool,
    pub ring: bool,
    pub down_bow: bool,
    pub up_bow: bool,
    /// `!`: places the accent on the opposite side of the note from
    /// its default placement.
    pub opposite: bool,
    /// `trem1`/`trem2`/`trem3`: number of tremolo slash strokes (0 if
    /// none requested).
    pub tremolo_strokes: u8,
}

impl Articulation {
    /// Catalog entry 91: staccato and staccatissimo are mutually
    /// exclusive on a single note.
    pub fn validate(self) -> Result<(), String> {
        if self.staccato && self.staccatissimo {
            return Err("can't have both staccato and staccatissimo".into());
        }
        Ok(())
    }
}

/// A single note (or rest) within a bar, possibly one member of a
/// chord.
#[derive(Debug, Clone)]
pub struct Note {
    pub kind: NoteKind,
    pub length: MusicLen,
    pub accidental: Option<Accidental>,
    pub dot_count: u8,
    pub tied: bool,
    pub articulation: Articulation,
    pub text: Vec<PmwString>,
    /// The note's sounding pitch once the active key signature's
    /// implicit accidentals and this bar's written accidentals are
    /// folded in (spec.md §8's "spitch/abspitch consistency" seed
    /// scenario); `None` for rests and placeholders.
    pub sounding: Option<QuarterTone>,
    pub stem_force: StemForce,
    /// `cue`: printed at cue size.
    pub cue: bool,
    /// `cda`: a cue note's augmentation dot aligns with a full-size
    /// note's dot rather than its own head.
    pub cue_dot_align: bool,
    pub small: bool,
    /// `ih`: invert which side of the stem the notehead sits on.
    pub invert_head: bool,
    /// A grace-note prefix (`g`) on this token.
    pub grace: bool,
    /// `m<letter>`: the note prints as if it were this other letter
    /// while keeping its own pitch for playback/transposition.
    pub masquerade: Option<char>,
    /// `y<n>`: a stem-length delta in points (`lm<n>`'s signed value).
    pub y_extra: i32,
    pub noteheadstyle: NoteheadStyle,
    pub bracketed_accidental: AccidentalBracket,
}

impl Note {
    #[must_use]
    pub fn rest(length: MusicLen) -> Self {
        Note {
            kind: NoteKind::Rest,
            length,
            accidental: None,
            dot_count: 0,
            tied: false,
            articulation: Articulation::default(),
            text: Vec::new(),
            sounding: None,
            stem_force: StemForce::default(),
            cue: false,
            cue_dot_align: false,
            small: false,
            invert_head: false,
            grace: false,
            masquerade: None,
            y_extra: 0,
            noteheadstyle: NoteheadStyle::default(),
            bracketed_accidental: AccidentalBracket::default(),
        }
    }

    #[must_use]
    pub fn pitched(pitch: SPitch, length: MusicLen) -> Self {
        Note {
            kind: NoteKind::Pitched(pitch),
            length,
            accidental: None,
            dot_count: 0,
            tied: false,
            articulation: Articulation::default(),
            text: Vec::new(),
            sounding: None,
            stem_force: StemForce::default(),
            cue: false,
            cue_dot_align: false,
            small: false,
            invert_head: false,
            grace: false,
            masquerade: None,
            y_extra: 0,
            noteheadstyle: NoteheadStyle::default(),
            bracketed_accidental: AccidentalBracket::default(),
        }
    }

    /// Duration including augmentation dots (each dot adds half of the
    /// remaining value).
    #[must_use]
    pub fn effective_length(&self) -> MusicLen {
        let mut total = self.length.0;
        let mut add = self.length.0;
        for _ in 0..self.dot_count {
            add /= 2;
            total += add;
        }
        MusicLen(total)
    }
}

/// A chord: one or more simultaneous notes sharing a single duration.
/// Catalog entries 110 (too many notes), 113 (no rests in a chord), 123
/// (all members must share length), 111 (accidentals for above/below
/// placement only valid on the first note).
#[derive(Debug, Clone)]
pub struct Chord {
    pub notes: Vec<Note>,
}

pub const MAX_CHORD_NOTES: usize = 20;

impl Chord {
    pub fn validate(&self) -> Result<(), String> {
        if self.notes.len() > MAX_CHORD_NOTES {
            return Err(format!(
                "too many notes in a chord ({MAX_CHORD_NOTES} maximum)"
            ));
        }
        if self.notes.iter().any(|n| n.kind == NoteKind::Rest) {
            return Err("a chord may not contain a rest".into());
        }
        if let Some(first) = self.notes.first() {
            let len = first.length;
            if self.notes.iter().any(|n| n.length != len) {
                return Err("the notes of a chord must all be the same length".into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_length_applies_dots() {
        let mut n = Note::rest(MusicLen(384));
        n.dot_count = 1;
        assert_eq!(n.effective_length(), MusicLen(576));
        n.dot_count = 2;
        assert_eq!(n.effective_length(), MusicLen(672));
    }

    #[test]
    fn chord_rejects_mismatched_lengths() {
        let chord = Chord {
            notes: vec![
                Note::pitched(SPitch(0), MusicLen(384)),
                Note::pitched(SPitch(2), MusicLen(192)),
            ],
        };
        assert!(chord.validate().is_err());
    }

    #[test]
    fn chord_rejects_rests() {
        let chord = Chord {
            notes: vec![Note::rest(MusicLen(384)), Note::pitched(SPitch(0), MusicLen(384))],
        };
        assert!(chord.validate().is_err());
    }

    #[test]
    fn articulation_rejects_staccato_and_staccatissimo_together() {
        let art = Articulation {
            staccato: true,
            staccatissimo: true,
            ..Default::default()
        };
        assert!(art.validate().is_err());
    }
}
