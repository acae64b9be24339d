//! The in-memory IR: movements, staves, bars, notes, and the
//! continuation state that threads across bar/system/page boundaries.

pub mod bar;
pub mod clef;
pub mod continuation;
pub mod draw;
pub mod hairpin;
pub mod key;
pub mod midi;
pub mod movement;
pub mod note;
pub mod paper;
pub mod pitch;
pub mod slur;
pub mod stave;
pub mod time;

pub use bar::Bar;
pub use clef::Clef;
pub use continuation::ContState;
pub use hairpin::Hairpin;
pub use key::KeySignature;
pub use midi::MidiMapping;
pub use movement::Movement;
pub use note::{Chord, Note, NoteKind};
pub use paper::PaperSize;
pub use pitch::{AbsPitch, QuarterTone, SPitch};
pub use slur::{Slur, SlurId};
pub use stave::Stave;
pub use time::TimeSignature;
