//! MIDI mapping validation: channel/program/volume ranges, pure
//! validation with no file writer (writing MIDI is out of scope).

use crate::diag_catalog::format_message;

#[derive(Debug, Clone, Default)]
pub struct MidiMapping {
    pub channel: Option<u8>,
    pub program: Option<u8>,
    pub volume: Option<u8>,
}

/// One MIDI-numbered-range field, named for diagnostic text (catalog
/// entry 48: "incorrect MIDI {0} number {1} (must be between 1 and {2}
/// inclusive)").
pub fn validate_range(field: &str, value: u32, max: u32) -> Result<(), String> {
    if value < 1 || value > max {
        return Err(format_message(
            48,
            &[field.to_string(), value.to_string(), max.to_string()],
        ));
    }
    Ok(())
}

/// Named MIDI voice/percussion lookups (catalog entry 49: "unrecognized
/// MIDI {0} name"). Only a representative subset is carried; General
/// MIDI's full 128-name instrument table is not reproduced here.
pub fn voice_name_to_program(name: &str) -> Option<u8> {
    match name {
        "Acoustic Grand Piano" => Some(1),
        "Violin" => Some(41),
        "Trumpet" => Some(57),
        "Flute" => Some(74),
        _ => None,
    }
}
