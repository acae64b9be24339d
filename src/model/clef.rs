//! Clefs: the stave-position origin a pitch is read against.
//!
//! Only the clefs the geometry layer needs to distinguish for
//! `key_width`'s accidental-line placement are modeled; glyph selection
//! for each clef is an external rendering concern.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Clef {
    Treble,
    Bass,
    Alto,
    Tenor,
    SopranoC,
    MezzoSopranoC,
    BaritoneC,
    BaritoneF,
    SubBass,
    TrebleOctaveUp,
    TrebleOctaveDown,
    Percussion,
    None,
}

impl Clef {
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "treble" => Some(Clef::Treble),
            "bass" => Some(Clef::Bass),
            "alto" => Some(Clef::Alto),
            "tenor" => Some(Clef::Tenor),
            "soprano" => Some(Clef::SopranoC),
            "mezzo" => Some(Clef::MezzoSopranoC),
            "baritone" => Some(Clef::BaritoneC),
            "baritonef" => Some(Clef::BaritoneF),
            "subbass" => Some(Clef::SubBass),
            "trebledescant" | "treble8up" => Some(Clef::TrebleOctaveUp),
            "tenorc" | "treble8down" => Some(Clef::TrebleOctaveDown),
            "perc" | "percussion" => Some(Clef::Percussion),
            "none" => Some(Clef::None),
            _ => None,
        }
    }

    /// The stave-line spitch (in quarter-line units) that sits on the
    /// middle line under this clef, used to offset a letter-derived
    /// spitch onto the actual visible stave.
    #[must_use]
    pub fn middle_line_offset(self) -> i32 {
        match self {
            Clef::Treble | Clef::TrebleOctaveUp | Clef::TrebleOctaveDown => 4,
            Clef::Bass | Clef::SubBass | Clef::BaritoneF => -4,
            Clef::Alto => 0,
            Clef::Tenor => 2,
            Clef::SopranoC => 6,
            Clef::MezzoSopranoC => -2,
            Clef::BaritoneC => -6,
            Clef::Percussion | Clef::None => 0,
        }
    }
}
