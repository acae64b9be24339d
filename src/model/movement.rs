//! A movement: a group of staves sharing headings, stave sizing, and
//! layout directives.

use crate::geometry::key_width::PrintKeyOverrides;
use crate::geometry::time_width::PrintTimeOverride;
use crate::model::key::KeySignature;
use crate::model::midi::MidiMapping;
use crate::model::pitch::SPitch;
use crate::model::stave::{Stave, MAX_STAVE};
use crate::model::time::TimeSignature;
use crate::pmwstring::PmwString;
use crate::tree::BalancedTree;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaveSizing {
    pub stave_number: u32,
    pub magnification_milli: i32,
}

#[derive(Debug, Clone, Default)]
pub struct Headings {
    pub heading: Vec<PmwString>,
    pub footing: Vec<PmwString>,
    pub page_heading: Vec<PmwString>,
    pub page_footing: Vec<PmwString>,
    pub last_footing: Vec<PmwString>,
}

/// One `fontsizes` table row: a named font-size slot (e.g. "music",
/// "text", "bold") and its point size in milli-points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSizeEntry {
    pub name: String,
    pub size_milli: i32,
}

/// The barline's drawn style, overridable per movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarlineStyle {
    #[default]
    Normal,
    Dotted,
    Dashed,
    None,
}

/// Movement-scoped boolean options, packed as a bitfield the way
/// `contstr`'s own flag words are (spec.md §3's continuation-state
/// description), rather than one `bool` field per option.
pub mod movement_flags {
    pub const JUSTIFY: u32 = 1 << 0;
    pub const DOUBLE_FIRST_BARLINE: u32 = 1 << 1;
    pub const STARTNOTIME: u32 = 1 << 2;
}

/// One opcode of a compiled `layout` instruction stream (spec.md
/// §4.2's "compact instruction stream", grounded on `layout.c`'s
/// `ly_barcount`/`ly_repeatcount`/`ly_newpage` opcodes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutOp {
    BarCount(u32),
    RepeatCount(u32),
    NewPage,
}

/// Per-stave gap/spacing overrides registered by `sgabove`/`sghere`/
/// `sgnext` (spec.md §4.2), each a stave-number -> milli-point value
/// list; "above" applies to the gap preceding the stave, "here" to the
/// stave's own row, "next" to the gap following it.
#[derive(Debug, Default)]
pub struct StaveGaps {
    pub above: Vec<(u32, i32)>,
    pub here: Vec<(u32, i32)>,
    pub next: Vec<(u32, i32)>,
}

#[derive(Debug)]
pub struct Movement {
    pub staves: Vec<Stave>,
    pub headings: Headings,
    pub stave_sizes: Vec<StaveSizing>,
    pub stave_spacing_milli: i32,
    pub stave_gaps: StaveGaps,
    pub midi: MidiMapping,
    /// The key set by a `key` header directive, applied as the
    /// starting key of every stave subsequently opened in this
    /// movement (spec.md §4.2's "key / time" semantics — the directive
    /// is read before any `[stave ...]` block, so it cannot mutate a
    /// stave's continuation state directly).
    pub default_key: KeySignature,
    /// As [`Self::default_key`], for the `time` header directive.
    pub default_time: TimeSignature,
    /// `makekey Xn` custom key-signature rows, looked up by name when a
    /// stave or the `key` directive references `Xn`.
    pub custom_keys: BalancedTree<KeySignature>,
    /// `printkey` overrides: measured-width substitutes for a computed
    /// key-signature width, keyed by `(key, clef)` (spec.md §4.6).
    pub printkey_overrides: PrintKeyOverrides,
    /// `printtime` overrides, keyed by the packed time-signature value.
    pub printtime_overrides: BalancedTree<PrintTimeOverride>,
    /// Compiled `layout` opcode stream (spec.md §4.2).
    pub layout: Vec<LayoutOp>,
    /// `fontsizes` table: named font-size slots read by the geometry
    /// layer instead of hard-coded point sizes.
    pub font_sizes: Vec<FontSizeEntry>,
    pub barline_style: BarlineStyle,
    /// Packed boolean options; test/set with the [`movement_flags`]
    /// constants.
    pub flags: u32,
    /// `bracket`: stave-number ranges joined by a printed bracket.
    pub bracketed_staves: Vec<(u32, u32)>,
    /// `brace`: as [`Self::bracketed_staves`], joined by a brace.
    pub braced_staves: Vec<(u32, u32)>,
    /// `join`: stave-number ranges whose barlines are drawn continuous
    /// across the gap between them.
    pub joined_staves: Vec<(u32, u32)>,
    /// `stemswap`: the pitch above/below which a note's stem direction
    /// is forced, when set by a `stemswap` directive.
    pub stemswap_pitch: Option<SPitch>,
}

impl Movement {
    pub fn new() -> Self {
        Movement {
            staves: Vec::new(),
            headings: Headings::default(),
            stave_sizes: Vec::new(),
            stave_spacing_milli: 1000,
            stave_gaps: StaveGaps::default(),
            midi: MidiMapping::default(),
            default_key: KeySignature::Standard { sharps: 0 },
            default_time: TimeSignature::common(),
            custom_keys: BalancedTree::new(),
            printkey_overrides: PrintKeyOverrides::new(),
            printtime_overrides: BalancedTree::new(),
            layout: Vec::new(),
            font_sizes: Vec::new(),
            barline_style: BarlineStyle::default(),
            flags: 0,
            bracketed_staves: Vec::new(),
            braced_staves: Vec::new(),
            joined_staves: Vec::new(),
            stemswap_pitch: None,
        }
    }

    /// Starts a new movement that inherits its predecessor's engraving
    /// defaults (spec.md §3: a movement carries "a pointer to the
    /// previous-movement descriptor from which defaults are copied"),
    /// rather than resetting every field to factory defaults. Per-
    /// movement declarative state — the stave table itself, `makekey`/
    /// `printkey`/`printtime` overrides, and the `layout` opcode
    /// stream — starts fresh, matching spec.md §4.2's "`[newmovement]`
    /// starts a new movement" description of these as things each
    /// movement declares for itself.
    #[must_use]
    pub fn continuing_from(prev: &Movement) -> Self {
        Movement {
            staves: Vec::new(),
            headings: prev.headings.clone(),
            stave_sizes: prev.stave_sizes.clone(),
            stave_spacing_milli: prev.stave_spacing_milli,
            stave_gaps: StaveGaps {
                above: prev.stave_gaps.above.clone(),
                here: prev.stave_gaps.here.clone(),
                next: prev.stave_gaps.next.clone(),
            },
            midi: prev.midi.clone(),
            default_key: prev.default_key.clone(),
            default_time: prev.default_time,
            custom_keys: prev.custom_keys.clone(),
            printkey_overrides: prev.printkey_overrides.clone(),
            printtime_overrides: prev.printtime_overrides.clone(),
            layout: Vec::new(),
            font_sizes: prev.font_sizes.clone(),
            barline_style: prev.barline_style,
            flags: prev.flags,
            bracketed_staves: prev.bracketed_staves.clone(),
            braced_staves: prev.braced_staves.clone(),
            joined_staves: prev.joined_staves.clone(),
            stemswap_pitch: prev.stemswap_pitch,
        }
    }

    /// Adds a stave, rejecting a duplicate stave number (catalog entry
    /// 85: "stave {0} is supplied twice") or a stave table already at
    /// spec.md §3's sparse "up to 64 staves" cap. The new stave
    /// inherits this movement's current `key`/`time` header defaults.
    pub fn add_stave(&mut self, mut stave: Stave) -> Result<(), String> {
        if self.staves.len() > MAX_STAVE as usize {
            return Err(format!(
                "stave number {} is too large - maximum is {MAX_STAVE}",
                stave.number
            ));
        }
        if self.staves.iter().any(|s| s.number == stave.number) {
            return Err(format!("stave {} is supplied twice", stave.number));
        }
        stave.current_key = self.default_key.clone();
        stave.current_time = self.default_time;
        self.staves.push(stave);
        Ok(())
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_stave_number_is_rejected() {
        let mut m = Movement::new();
        m.add_stave(Stave::new(1).unwrap()).unwrap();
        let err = m.add_stave(Stave::new(1).unwrap()).unwrap_err();
        assert!(err.contains("supplied twice"));
    }

    #[test]
    fn stave_table_rejects_a_65th_stave() {
        let mut m = Movement::new();
        for n in 0..=MAX_STAVE {
            m.add_stave(Stave::new(n).unwrap()).unwrap();
        }
        assert_eq!(m.staves.len(), MAX_STAVE as usize + 1);
        let err = m.add_stave(Stave::new(0).unwrap()).unwrap_err();
        assert!(err.contains("too large"));
    }

    #[test]
    fn continuing_from_copies_engraving_defaults_forward() {
        let mut prev = Movement::new();
        prev.default_key = KeySignature::Standard { sharps: 2 };
        prev.default_time = TimeSignature::simple(3, 4);
        prev.stave_spacing_milli = 2000;
        prev.barline_style = BarlineStyle::Dotted;
        prev.flags = movement_flags::JUSTIFY;
        prev.bracketed_staves.push((1, 2));
        prev.stemswap_pitch = Some(SPitch(4));
        prev.font_sizes.push(FontSizeEntry { name: "music".into(), size_milli: 12000 });
        prev.add_stave(Stave::new(1).unwrap()).unwrap();

        let next = Movement::continuing_from(&prev);
        assert!(next.staves.is_empty(), "stave table itself starts fresh");
        assert_eq!(next.default_key, prev.default_key);
        assert_eq!(next.default_time, prev.default_time);
        assert_eq!(next.stave_spacing_milli, 2000);
        assert_eq!(next.barline_style, BarlineStyle::Dotted);
        assert_eq!(next.flags, movement_flags::JUSTIFY);
        assert_eq!(next.bracketed_staves, vec![(1, 2)]);
        assert_eq!(next.stemswap_pitch, Some(SPitch(4)));
        assert_eq!(next.font_sizes, prev.font_sizes);
    }

    #[test]
    fn continuing_from_resets_per_movement_declarations() {
        let mut prev = Movement::new();
        prev.layout.push(LayoutOp::NewPage);
        let next = Movement::continuing_from(&prev);
        assert!(next.layout.is_empty());
    }
}
