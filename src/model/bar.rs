//! A single bar: an ordered sequence of musical events plus its
//! logical bar number.

use crate::model::draw::DrawCall;
use crate::model::hairpin::Hairpin;
use crate::model::note::Chord;
use crate::model::slur::SlurEvent;
use crate::model::time::MusicLen;
use crate::pmwstring::PmwString;
use crate::stave::beam::BeamMarker;

/// One item in a bar's event stream. Chords/notes, barline-attached
/// directives (hairpins, slur start/stop markers, draw calls) are all
/// modeled as events so the bar preserves source order for geometry
/// and debug dumping.
///
/// Directives that only affect continuation state (clef/key/time) are
/// applied directly to [`crate::model::stave::Stave`] rather than
/// queued as bar events, matching spec.md §3's "continuation state...
/// carried across bars" description. The rest of spec.md §3's closed
/// set of bar-content directives — `reset`, `plet`/`endplet`,
/// `ornament`, `accentmove`, `move`/`rmove`/`smove`, `nbar`/`all`,
/// `lrepeat`/`rrepeat`, `tremolo`, `midichange`, `footnote`, `notes
/// on`/`notes off`, `tripsw`, `bowing`, `ties`, `olevel`/`ulevel`/
/// `olhere`/`ulhere`, `ensure`, `newline`/`newpage`, `suspend`/
/// `resume`, `page`/`pagetopmargin`/`pagebotmargin`, `zerocopy`,
/// `sgabove`/`sghere`/`sgnext`, `dotbar`, `dotright`, `comma`/`tick`/
/// `caesura`, `breakbarline`/`unbreakbarline` — carry no payload a
/// pagination consumer would need shaped any differently from one
/// another, so they share the generic [`Event::Marker`] catch-all
/// rather than getting one dedicated variant each.
#[derive(Debug, Clone)]
pub enum Event {
    Chord(Chord),
    Slur(SlurEvent),
    Hairpin(Hairpin),
    Draw(DrawCall),
    Beam(BeamMarker),
    Text(PmwString),
    Barline,
    BeamBreak,
    /// A bar-content directive with no dedicated variant: its name
    /// (lowercased, as written) and its unparsed argument text.
    Marker { name: String, args: String },
}

/// A bar's packed logical number: integer part plus sub-bar count, per
/// `strfmt::format_bar_number`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct BarNumber(pub u32);

impl BarNumber {
    #[must_use]
    pub fn new(integer: u32, sub_bar: u16) -> Self {
        BarNumber((integer << 16) | sub_bar as u32)
    }

    #[must_use]
    pub fn integer_part(self) -> u32 {
        self.0 >> 16
    }

    #[must_use]
    pub fn sub_bar(self) -> u16 {
        (self.0 & 0xffff) as u16
    }
}

#[derive(Debug, Clone)]
pub struct Bar {
    pub number: BarNumber,
    pub events: Vec<Event>,
    pub declared_length: Option<MusicLen>,
}

impl Bar {
    #[must_use]
    pub fn new(number: BarNumber) -> Self {
        Bar {
            number,
            events: Vec::new(),
            declared_length: None,
        }
    }

    /// Sums the effective length of all chord events (rests and notes
    /// alike), used for the cross-stave bar-length consistency check.
    #[must_use]
    pub fn total_length(&self) -> MusicLen {
        let mut total = 0;
        for event in &self.events {
            if let Event::Chord(chord) = event {
                if let Some(first) = chord.notes.first() {
                    total += first.effective_length().0;
                }
            }
        }
        MusicLen(total)
    }

    /// Checks this bar's computed length against a time-signature-
    /// implied length, per catalog entry 101 ("incorrect bar length:
    /// too {long/short} by {n}"). Tolerance is zero: any mismatch is
    /// reported.
    pub fn check_length(&self, expected: MusicLen) -> Result<(), String> {
        let actual = self.total_length();
        if actual == expected {
            return Ok(());
        }
        let diff = actual.0 - expected.0;
        if diff > 0 {
            Err(format!("incorrect bar length: too long by {diff}"))
        } else {
            Err(format!("incorrect bar length: too short by {}", -diff))
        }
    }
}
