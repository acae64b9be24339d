//! The debug/dump renderer: a symmetrical, stable textual form of the
//! IR, used by the test suite's round-trip checks (spec.md §4.7, §8).
//!
//! Grounded on `debug.c`'s per-item-tag dump loop: each IR variant has
//! one fixed label and a fixed field order, so two dumps of
//! semantically equal IR are byte-identical regardless of how that IR
//! was produced.

use crate::model::bar::{Bar, Event};
use crate::model::movement::Movement;
use crate::model::note::{Note, NoteKind};
use crate::model::slur::SlurEvent;
use crate::model::stave::Stave;
use crate::strfmt::{format_bar_number, format_note_length};
use std::fmt::Write as _;

fn dump_note(out: &mut String, note: &Note) {
    match note.kind {
        NoteKind::Rest => write!(out, "rest").unwrap(),
        NoteKind::Placeholder => write!(out, "placeholder").unwrap(),
        NoteKind::Pitched(p) => write!(out, "pitch={}", p.0).unwrap(),
    }
    write!(out, " len={}", format_note_length(note.length.0, crate::model::time::LEN_CROTCHET)).unwrap();
    if note.dot_count > 0 {
        write!(out, " dots={}", note.dot_count).unwrap();
    }
    if let Some(acc) = note.accidental {
        write!(out, " acc={acc:?}").unwrap();
    }
    if let Some(sounding) = note.sounding {
        write!(out, " sounding={}", sounding.0).unwrap();
    }
    if note.tied {
        write!(out, " tied").unwrap();
    }
}

fn dump_event(out: &mut String, event: &Event, indent: &str) {
    match event {
        Event::Chord(chord) => {
            if chord.notes.len() == 1 {
                write!(out, "{indent}note ").unwrap();
                dump_note(out, &chord.notes[0]);
                writeln!(out).unwrap();
            } else {
                writeln!(out, "{indent}chord {{").unwrap();
                for note in &chord.notes {
                    write!(out, "{indent}  ").unwrap();
                    dump_note(out, note);
                    writeln!(out).unwrap();
                }
                writeln!(out, "{indent}}}").unwrap();
            }
        }
        Event::Slur(SlurEvent::Start { id, style, modifiers }) => {
            writeln!(out, "{indent}slur start id={} style={:?} above={} below={}", id.0, style, modifiers.above, modifiers.below).unwrap();
        }
        Event::Slur(SlurEvent::Stop { id }) => {
            writeln!(out, "{indent}slur stop id={}", id.0).unwrap();
        }
        Event::Slur(SlurEvent::Gap { id, text, width_milli }) => {
            writeln!(out, "{indent}slur gap id={} text={:?} width_milli={:?}", id.0, text, width_milli).unwrap();
        }
        Event::Hairpin(h) => {
            writeln!(out, "{indent}hairpin direction={:?} above={} open={}", h.direction, h.above, h.open).unwrap();
        }
        Event::Draw(call) => {
            writeln!(out, "{indent}draw fn={} nargs={}", call.function_name, call.args.len()).unwrap();
        }
        Event::Beam(marker) => {
            writeln!(out, "{indent}beam {marker:?}").unwrap();
        }
        Event::Text(s) => {
            writeln!(out, "{indent}text \"{s}\"").unwrap();
        }
        Event::Barline => {
            writeln!(out, "{indent}barline").unwrap();
        }
        Event::BeamBreak => {
            writeln!(out, "{indent}beambreak").unwrap();
        }
        Event::Marker { name, args } => {
            if args.is_empty() {
                writeln!(out, "{indent}marker {name}").unwrap();
            } else {
                writeln!(out, "{indent}marker {name} args={args:?}").unwrap();
            }
        }
    }
}

fn dump_bar(out: &mut String, bar: &Bar) {
    writeln!(out, "  bar {} {{", format_bar_number(bar.number.0)).unwrap();
    for event in &bar.events {
        dump_event(out, event, "    ");
    }
    writeln!(out, "  }}").unwrap();
}

fn dump_stave(out: &mut String, stave: &Stave) {
    writeln!(out, "stave {} {{", stave.number).unwrap();
    for bar in &stave.bars {
        dump_bar(out, bar);
    }
    writeln!(out, "}}").unwrap();
}

/// Renders one movement's staves and bars as a stable, indentation-based
/// textual dump.
#[must_use]
pub fn dump_movement(movement: &Movement) -> String {
    let mut out = String::new();
    for stave in &movement.staves {
        dump_stave(&mut out, stave);
    }
    out
}

/// Renders every movement in sequence, each preceded by its ordinal.
#[must_use]
pub fn dump_movements(movements: &[Movement]) -> String {
    let mut out = String::new();
    for (i, movement) in movements.iter().enumerate() {
        writeln!(out, "movement {i} {{").unwrap();
        out.push_str(&dump_movement(movement));
        writeln!(out, "}}").unwrap();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ParserContext;

    #[test]
    fn dump_is_stable_across_two_runs_of_the_same_source() {
        let source = "[stave 1 treble]\nc- d- e- f- | g' a' b' c' |\n[endstave]\n";
        let mut ctx1 = ParserContext::new();
        let movements1 = crate::run_pipeline(source, &mut ctx1).unwrap();
        let mut ctx2 = ParserContext::new();
        let movements2 = crate::run_pipeline(source, &mut ctx2).unwrap();
        assert_eq!(dump_movements(&movements1), dump_movements(&movements2));
    }

    #[test]
    fn dump_lists_every_bar_and_note() {
        let source = "[stave 1]\nc- d- |\n[endstave]\n";
        let mut ctx = ParserContext::new();
        let movements = crate::run_pipeline(source, &mut ctx).unwrap();
        let dump = dump_movements(&movements);
        assert!(dump.contains("stave 1"));
        assert!(dump.contains("bar 1"));
        assert!(dump.contains("bar 2"));
        assert_eq!(dump.matches("note ").count(), 4);
    }

    #[test]
    fn chord_dump_lists_every_member_note() {
        let source = "[stave 1]\n(c- e- g-) |\n[endstave]\n";
        let mut ctx = ParserContext::new();
        let movements = crate::run_pipeline(source, &mut ctx).unwrap();
        let dump = dump_movements(&movements);
        assert!(dump.contains("chord {"));
        assert_eq!(dump.matches("pitch=").count(), 3);
    }
}
