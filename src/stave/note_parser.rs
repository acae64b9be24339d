//! The note grammar from spec.md §4.3: optional accidental, note
//! letter (case sets the starting octave), octave-shift marks, a
//! length suffix, augmentation dots.
//!
//! Grounded on `pmw_read_stavedirs.c`'s note-reading loop; reworked
//! here as a small cursor over the bar-content characters rather than
//! the original's single global "current char".

use crate::model::note::{Accidental, AccidentalBracket, Articulation, Note, NoteKind, NoteheadStyle, StemForce};
use crate::model::pitch::{AbsPitch, QuarterTone, SPitch};
use crate::model::time::{MusicLen, LEN_CROTCHET, LEN_QUAVER, LEN_SEMIQUAVER, LEN_DEMISEMIQUAVER, LEN_HEMIDEMISEMIQUAVER, LEN_MINIM, LEN_BREVE};

/// Diatonic step (doubled, so an octave is 14 units) and natural
/// quarter-tone offset (so an octave is 24 units) for each letter
/// name, indexed C..B.
const LETTER_STEP: [(char, i32, i32); 7] = [
    ('c', 0, 0),
    ('d', 2, 4),
    ('e', 4, 8),
    ('f', 6, 10),
    ('g', 8, 14),
    ('a', 10, 18),
    ('b', 12, 22),
];

/// The quarter-tone shift a written accidental contributes, independent
/// of letter or octave (e.g. a sharp always adds two quarter-tones).
#[must_use]
pub fn accidental_quarter_value(accidental: Option<Accidental>) -> i32 {
    match accidental {
        Some(Accidental::DoubleFlat) => -4,
        Some(Accidental::Flat) => -2,
        Some(Accidental::Natural) => 0,
        Some(Accidental::Sharp) => 2,
        Some(Accidental::DoubleSharp) => 4,
        Some(Accidental::QuarterFlat) => -1,
        Some(Accidental::QuarterSharp) => 1,
        None => 0,
    }
}

fn letter_info(letter: char) -> Option<(i32, i32)> {
    let lower = letter.to_ascii_lowercase();
    LETTER_STEP
        .iter()
        .find(|(l, _, _)| *l == lower)
        .map(|(_, spitch_step, quarter_step)| (*spitch_step, *quarter_step))
}

/// The trailing `\options\` section of a note token (spec.md §4.3):
/// stem-direction force, cue/small/invert-head/grace flags, a
/// masquerade letter, a y-extra stem-length delta, notehead style,
/// bracketed-accidental style, and the accent/ornament set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteOptions {
    pub stem_force: StemForce,
    pub cue: bool,
    pub cue_dot_align: bool,
    pub small: bool,
    pub invert_head: bool,
    pub grace: bool,
    pub masquerade: Option<char>,
    pub y_extra: i32,
    pub noteheadstyle: NoteheadStyle,
    pub bracketed_accidental: AccidentalBracket,
    pub articulation: Articulation,
}

/// Parses the `/`-separated tokens of a note's `\options\` section
/// (the slashes inside the backslash pair, e.g. `u/cue/stacc`).
pub fn parse_note_options(body: &str) -> Result<NoteOptions, String> {
    let mut options = NoteOptions::default();
    for part in body.split('/').filter(|p| !p.is_empty()) {
        match part {
            "u" => options.stem_force = StemForce::Up,
            "d" => options.stem_force = StemForce::Down,
            "sw" => options.stem_force = StemForce::Swap,
            "cue" => options.cue = true,
            "cda" => options.cue_dot_align = true,
            "small" => options.small = true,
            "ih" => options.invert_head = true,
            "g" => options.grace = true,
            "nh" => options.noteheadstyle = NoteheadStyle::None,
            "harm" => options.noteheadstyle = NoteheadStyle::Harmonic,
            "cross" => options.noteheadstyle = NoteheadStyle::Cross,
            "only" => options.noteheadstyle = NoteheadStyle::Only,
            "direct" => options.noteheadstyle = NoteheadStyle::Direct,
            "rb" => options.bracketed_accidental = AccidentalBracket::Round,
            "sb" => options.bracketed_accidental = AccidentalBracket::Square,
            "stacc" => options.articulation.staccato = true,
            "stss" => options.articulation.staccatissimo = true,
            "ten" => options.articulation.tenuto = true,
            "wedge" => options.articulation.wedge = true,
            "bar" => options.articulation.bar = true,
            ">" => options.articulation.accent = true,
            "ring" => options.articulation.ring = true,
            "db" => options.articulation.down_bow = true,
            "ub" => options.articulation.up_bow = true,
            "!" => options.articulation.opposite = true,
            "trem1" => options.articulation.tremolo_strokes = 1,
            "trem2" => options.articulation.tremolo_strokes = 2,
            "trem3" => options.articulation.tremolo_strokes = 3,
            p if p.starts_with('m') && p.len() == 2 => {
                options.masquerade = p.chars().nth(1);
            }
            p if p.starts_with('y') => {
                let digits = &p[1..];
                match digits.parse::<i32>() {
                    Ok(n) => options.y_extra = n,
                    Err(_) => return Err(format!("unknown note option \"{part}\"")),
                }
            }
            _ => return Err(format!("unknown note option \"{part}\"")),
        }
    }
    options.articulation.validate()?;
    Ok(options)
}

/// One fully parsed note token: its pitch (both representations, per
/// spec.md §8's "spitch/abspitch consistency" invariant), length, dot
/// count, and accidental.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedNote {
    pub kind: NoteKind,
    pub spitch: Option<SPitch>,
    pub abs_pitch: Option<AbsPitch>,
    pub length: MusicLen,
    pub dot_count: u8,
    pub accidental: Option<Accidental>,
    /// The note letter (`'A'..='G'`), uppercased, for pitched notes;
    /// `None` for rests and placeholders. Used by the caller to look
    /// up and update the bar's key-accidental memory.
    pub letter: Option<char>,
    /// The trailing `\options\` section, if the token carried one.
    pub options: NoteOptions,
}

impl ParsedNote {
    #[must_use]
    pub fn into_note(self) -> Note {
        let mut note = match self.kind {
            NoteKind::Rest => Note::rest(self.length),
            NoteKind::Placeholder => Note::rest(self.length),
            NoteKind::Pitched(spitch) => Note::pitched(spitch, self.length),
        };
        note.accidental = self.accidental;
        note.dot_count = self.dot_count;
        note.articulation = self.options.articulation;
        note.stem_force = self.options.stem_force;
        note.cue = self.options.cue;
        note.cue_dot_align = self.options.cue_dot_align;
        note.small = self.options.small;
        note.invert_head = self.options.invert_head;
        note.grace = self.options.grace;
        note.masquerade = self.options.masquerade;
        note.y_extra = self.options.y_extra;
        note.noteheadstyle = self.options.noteheadstyle;
        note.bracketed_accidental = self.options.bracketed_accidental;
        note
    }
}

/// Parses one note/rest/placeholder token with no internal whitespace
/// (e.g. `c-`, `#f''m.`, `r-`, `p`). `previous_length` supplies the
/// length a bare letter with no suffix should inherit (spec.md §4.3's
/// "bare-letter conventions"); it defaults to a crotchet when no
/// earlier note in the bar set one yet.
pub fn parse_note_token(token: &str, previous_length: Option<MusicLen>) -> Result<ParsedNote, String> {
    let mut chars = token.chars().peekable();

    // Leading accidental, optionally doubled.
    let mut accidental = None;
    match chars.peek() {
        Some('#') => {
            chars.next();
            accidental = Some(if chars.peek() == Some(&'#') {
                chars.next();
                Accidental::DoubleSharp
            } else if chars.peek() == Some(&'h') {
                chars.next();
                Accidental::QuarterSharp
            } else {
                Accidental::Sharp
            });
        }
        Some('$') => {
            chars.next();
            accidental = Some(if chars.peek() == Some(&'$') {
                chars.next();
                Accidental::DoubleFlat
            } else if chars.peek() == Some(&'h') {
                chars.next();
                Accidental::QuarterFlat
            } else {
                Accidental::Flat
            });
        }
        Some('%') => {
            chars.next();
            accidental = Some(Accidental::Natural);
        }
        _ => {}
    }

    if token.trim_start_matches(['#', '$', '%']) == "p" {
        return Ok(ParsedNote {
            kind: NoteKind::Placeholder,
            spitch: None,
            abs_pitch: None,
            length: previous_length.unwrap_or(MusicLen(LEN_CROTCHET)),
            dot_count: 0,
            accidental: None,
            letter: None,
            options: NoteOptions::default(),
        });
    }

    let Some(letter) = chars.next() else {
        return Err("note expected".into());
    };

    let is_rest = letter == 'r' || letter == 'R';
    let letter_data = if is_rest { None } else { letter_info(letter) };
    if !is_rest && letter_data.is_none() {
        return Err(format!("unexpected character '{letter}'"));
    }

    // Case sets the starting octave: lowercase is the octave above
    // middle C's octave, uppercase the octave below, matching the
    // seed scenario's "g' a' b' c'" reading an octave above "c d e f".
    let mut octave: i32 = if letter.is_ascii_lowercase() { 0 } else { -1 };

    while let Some(&c) = chars.peek() {
        match c {
            '\'' => {
                octave += 1;
                chars.next();
            }
            '`' => {
                octave -= 1;
                chars.next();
            }
            _ => break,
        }
    }

    // Length suffix.
    let mut length = previous_length.unwrap_or(MusicLen(LEN_CROTCHET));
    let mut explicit_length = false;
    if let Some(&c) = chars.peek() {
        let candidate = match c {
            'b' => Some(LEN_BREVE),
            'm' => Some(LEN_MINIM),
            'c' => Some(LEN_CROTCHET),
            '-' => Some(LEN_QUAVER),
            's' => Some(LEN_SEMIQUAVER),
            'd' => Some(LEN_DEMISEMIQUAVER),
            'h' => Some(LEN_HEMIDEMISEMIQUAVER),
            _ => None,
        };
        if let Some(units) = candidate {
            length = MusicLen(units);
            explicit_length = true;
            chars.next();
        }
    }
    let _ = explicit_length;

    // Augmentation dots.
    let mut dot_count = 0u8;
    while chars.peek() == Some(&'.') {
        dot_count += 1;
        chars.next();
        if dot_count >= 2 {
            break;
        }
    }

    // Trailing `\options\` section: slash-separated keys between a
    // pair of backslashes (spec.md §4.3).
    let mut options = NoteOptions::default();
    if chars.peek() == Some(&'\\') {
        chars.next();
        let mut body = String::new();
        let mut closed = false;
        for c in chars.by_ref() {
            if c == '\\' {
                closed = true;
                break;
            }
            body.push(c);
        }
        if !closed {
            return Err(format!("unterminated \\options\\ section in note \"{token}\""));
        }
        options = parse_note_options(&body)?;
    }

    if chars.peek().is_some() {
        return Err(format!("unexpected trailing characters in note \"{token}\""));
    }

    if is_rest {
        return Ok(ParsedNote {
            kind: NoteKind::Rest,
            spitch: None,
            abs_pitch: None,
            length,
            dot_count,
            accidental: None,
            letter: None,
            options,
        });
    }

    let (spitch_step, quarter_step) = letter_data.unwrap();
    let spitch = SPitch(spitch_step + octave * 14);
    let acc_quarter = accidental_quarter_value(accidental);
    let abs_pitch = AbsPitch(quarter_step + octave * 24 + acc_quarter);

    Ok(ParsedNote {
        kind: NoteKind::Pitched(spitch),
        spitch: Some(spitch),
        abs_pitch: Some(abs_pitch),
        length,
        dot_count,
        accidental,
        letter: Some(letter.to_ascii_uppercase()),
        options,
    })
}

/// `QuarterTone`-relative helper used by the transposer: a parsed
/// note's natural (no-accidental) absolute quarter-tone pitch, for
/// seed scenario 4's "F carries no written accidental but abs-pitch
/// reflects F#" check (the key signature supplies the implicit
/// accidental, not the token itself).
#[must_use]
pub fn apply_key_accidental(natural: AbsPitch, key_quarter_shift: i32) -> QuarterTone {
    QuarterTone(natural.0 + key_quarter_shift)
}

/// Finds the natural (accidental-free) letter and notated [`SPitch`]
/// for an absolute quarter-tone pitch, used to re-spell a transposed
/// note that lands exactly on a natural scale step (spec.md §8 seed
/// scenario 3: `-t 2` on middle C is spelled as D, not some
/// accidental-bearing respelling of C). Returns `None` when the
/// quarter-tone value falls between natural steps, in which case the
/// caller keeps the transposer's chosen accidental instead.
#[must_use]
pub fn natural_letter_for_quarter_tone(q: i32) -> Option<(char, SPitch)> {
    let octave = q.div_euclid(24);
    let remainder = q.rem_euclid(24);
    LETTER_STEP
        .iter()
        .find(|(_, _, quarter_step)| *quarter_step == remainder)
        .map(|(letter, spitch_step, _)| (*letter, SPitch(spitch_step + octave * 14)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_quaver_c() {
        let note = parse_note_token("c-", None).unwrap();
        assert_eq!(note.length, MusicLen(LEN_QUAVER));
        assert_eq!(note.spitch, Some(SPitch(0)));
    }

    #[test]
    fn octave_shift_raises_spitch_by_fourteen() {
        let low = parse_note_token("c-", None).unwrap();
        let high = parse_note_token("c'-", None).unwrap();
        assert_eq!(high.spitch.unwrap().0 - low.spitch.unwrap().0, 14);
    }

    #[test]
    fn bare_letter_inherits_previous_length() {
        let note = parse_note_token("d", Some(MusicLen(LEN_QUAVER))).unwrap();
        assert_eq!(note.length, MusicLen(LEN_QUAVER));
    }

    #[test]
    fn rest_token_has_no_pitch() {
        let note = parse_note_token("r-", None).unwrap();
        assert_eq!(note.kind, NoteKind::Rest);
        assert!(note.spitch.is_none());
    }

    #[test]
    fn placeholder_inherits_nothing_but_length() {
        let note = parse_note_token("p", Some(MusicLen(LEN_MINIM))).unwrap();
        assert_eq!(note.kind, NoteKind::Placeholder);
        assert_eq!(note.length, MusicLen(LEN_MINIM));
    }

    #[test]
    fn double_dot_caps_at_two() {
        let note = parse_note_token("c-..", None).unwrap();
        assert_eq!(note.dot_count, 2);
    }

    #[test]
    fn sharp_accidental_raises_abspitch_by_two_quarter_tones() {
        let natural = parse_note_token("f-", None).unwrap();
        let sharp = parse_note_token("#f-", None).unwrap();
        assert_eq!(
            sharp.abs_pitch.unwrap().0 - natural.abs_pitch.unwrap().0,
            2
        );
    }

    #[test]
    fn unrecognised_letter_is_an_error() {
        assert!(parse_note_token("z-", None).is_err());
    }

    #[test]
    fn natural_letter_lookup_finds_d_two_quarter_tones_above_c() {
        let (letter, spitch) = natural_letter_for_quarter_tone(4).unwrap();
        assert_eq!(letter, 'd');
        assert_eq!(spitch, SPitch(2));
    }

    #[test]
    fn natural_letter_lookup_rejects_a_non_natural_step() {
        assert!(natural_letter_for_quarter_tone(1).is_none());
    }

    #[test]
    fn natural_letter_lookup_carries_the_octave() {
        let (letter, spitch) = natural_letter_for_quarter_tone(24).unwrap();
        assert_eq!(letter, 'c');
        assert_eq!(spitch, SPitch(14));
    }

    #[test]
    fn quarter_sharp_is_reachable_via_the_h_suffix() {
        let note = parse_note_token("#hf-", None).unwrap();
        assert_eq!(note.accidental, Some(Accidental::QuarterSharp));
        assert_eq!(accidental_quarter_value(note.accidental), 1);
    }

    #[test]
    fn quarter_flat_is_reachable_via_the_h_suffix() {
        let note = parse_note_token("$hb-", None).unwrap();
        assert_eq!(note.accidental, Some(Accidental::QuarterFlat));
        assert_eq!(accidental_quarter_value(note.accidental), -1);
    }

    #[test]
    fn double_sharp_still_takes_priority_over_quarter_sharp() {
        let note = parse_note_token("##f-", None).unwrap();
        assert_eq!(note.accidental, Some(Accidental::DoubleSharp));
    }

    #[test]
    fn options_section_sets_stem_force_and_accent() {
        let parsed = parse_note_token("c-\\u/stacc\\", None).unwrap();
        assert_eq!(parsed.options.stem_force, StemForce::Up);
        assert!(parsed.options.articulation.staccato);
        let note = parsed.into_note();
        assert_eq!(note.stem_force, StemForce::Up);
        assert!(note.articulation.staccato);
    }

    #[test]
    fn options_section_sets_cue_small_invert_head_and_grace() {
        let parsed = parse_note_token("c-\\cue/cda/small/ih/g\\", None).unwrap();
        assert!(parsed.options.cue);
        assert!(parsed.options.cue_dot_align);
        assert!(parsed.options.small);
        assert!(parsed.options.invert_head);
        assert!(parsed.options.grace);
    }

    #[test]
    fn options_section_sets_masquerade_letter_and_y_extra() {
        let parsed = parse_note_token("c-\\mD/y-4\\", None).unwrap();
        assert_eq!(parsed.options.masquerade, Some('D'));
        assert_eq!(parsed.options.y_extra, -4);
    }

    #[test]
    fn options_section_sets_notehead_style_and_accidental_bracket() {
        let parsed = parse_note_token("c-\\cross/rb\\", None).unwrap();
        assert_eq!(parsed.options.noteheadstyle, NoteheadStyle::Cross);
        assert_eq!(parsed.options.bracketed_accidental, AccidentalBracket::Round);
    }

    #[test]
    fn options_section_sets_full_accent_set() {
        let parsed = parse_note_token("c-\\wedge/bar/>/ring/db/ub/!/trem2\\", None).unwrap();
        let art = parsed.options.articulation;
        assert!(art.wedge);
        assert!(art.bar);
        assert!(art.accent);
        assert!(art.ring);
        assert!(art.down_bow);
        assert!(art.up_bow);
        assert!(art.opposite);
        assert_eq!(art.tremolo_strokes, 2);
    }

    #[test]
    fn unknown_option_token_is_an_error() {
        assert!(parse_note_token("c-\\bogus\\", None).is_err());
    }

    #[test]
    fn unterminated_options_section_is_an_error() {
        assert!(parse_note_token("c-\\u", None).is_err());
    }

    #[test]
    fn conflicting_accents_in_options_still_report_catalog_91() {
        let err = parse_note_token("c-\\stacc/stss\\", None).unwrap_err();
        assert!(err.contains("staccato and staccatissimo"));
    }
}
