//! Stave-body parsing: the bar-content scanner and the bracketed
//! stave-directive dispatch table (spec.md §4.3).
//!
//! Bar content is scanned by leading character class exactly as
//! spec.md describes: digit/accidental/letter starts a note, `(`/`)`
//! start/end a chord, `[` a bracketed directive, `|` a barline, `"` a
//! string. Tuplet `{`/`}` delimiters are recognised but tuplet-scaled
//! length bookkeeping is delegated to [`tuplet::PletStack`].

pub mod beam;
pub mod note_parser;
pub mod slur;
pub mod tuplet;

use crate::context::ParserContext;
use crate::diag::{Abandoned, Severity, SourceLocation};
use crate::diag_catalog::format_message;
use crate::model::bar::{Bar, BarNumber, Event};
use crate::model::draw::{DrawCall, DrawValue};
use crate::model::hairpin::{Hairpin, HairpinDirection};
use crate::model::movement::Movement;
use crate::model::note::{Chord, Note, NoteKind};
use crate::model::pitch::{AbsPitch, QuarterTone, SPitch};
use crate::model::slur::{LineStyle, SlurEvent, SlurId};
use crate::model::stave::Stave;
use crate::model::time::MusicLen;
use crate::pmwstring::read_pmw_string;
use crate::strfmt::Fixed;
use crate::transpose::transpose_note;
use beam::parse_beam_marker;
use note_parser::{accidental_quarter_value, apply_key_accidental, natural_letter_for_quarter_tone, parse_note_token, ParsedNote};
use tuplet::{PletRecord, PletStack};

/// Resolves a parsed note's sounding pitch against the stave's active
/// key/bar-accidental memory (spec.md §8 seed scenario 4: an unmarked
/// note takes the key's implicit accidental, a written accidental
/// overrides it and is remembered for the rest of the bar), applies
/// the run-wide `-t` transposition (seed scenario 3), and turns it
/// into an IR [`Note`].
fn finish_note(stave: &mut Stave, parsed: ParsedNote, ctx: &ParserContext) -> Note {
    let abs_pitch = parsed.abs_pitch;
    let letter = parsed.letter;
    let accidental = parsed.accidental;
    let mut note = parsed.into_note();
    if let (Some(letter), Some(abs_pitch)) = (letter, abs_pitch) {
        let natural_sounding = if accidental.is_some() {
            stave.cont.bar_accidentals.record_letter_accidental(letter, accidental_quarter_value(accidental));
            QuarterTone(abs_pitch.0)
        } else {
            let key_shift = stave.cont.bar_accidentals.quarter_shift_for_letter(letter);
            apply_key_accidental(abs_pitch, key_shift)
        };
        if ctx.transpose_quarter_tones == 0 {
            note.sounding = Some(natural_sounding);
        } else {
            let transposed = transpose_note(
                AbsPitch(natural_sounding.0),
                ctx.transpose_quarter_tones,
                accidental,
                None,
                false,
                false,
                false,
                0,
            );
            note.sounding = Some(QuarterTone(transposed.abs_pitch.0));
            match natural_letter_for_quarter_tone(transposed.abs_pitch.0) {
                Some((_, spitch)) => {
                    note.kind = NoteKind::Pitched(spitch);
                    note.accidental = None;
                }
                None => note.accidental = transposed.accidental,
            }
        }
    }
    note
}

/// Standalone bracketed stave directives that appear outside bar
/// content (stave-scoped, not per-bar). Directives that can appear
/// *inside* bar content (`[slur]`, `[endslur]`, `[slurgap]`,
/// `[beambreak]`, ...) are handled by [`parse_bar_line`] instead.
pub fn dispatch_bracketed(
    movement: &mut Movement,
    keyword: &str,
    _args: &str,
    ctx: &mut ParserContext,
) -> Result<(), Abandoned> {
    match keyword {
        "omitempty" => {
            let msg = format_message(170, &["omitempty".into()]);
            ctx.sink.report(170, Severity::Warning, msg, SourceLocation::default())?;
        }
        "stavelines" => {
            let msg = format_message(170, &["stavelines".into()]);
            ctx.sink.report(170, Severity::Warning, msg, SourceLocation::default())?;
        }
        "name" => {
            // Stave name chains are PmwStrings handled by the stave
            // header reader, not modeled further here.
        }
        _ => {
            let _ = movement;
            ctx.sink.report(
                86,
                Severity::Major,
                format!("unknown stave directive \"{keyword}\""),
                SourceLocation::default(),
            )?;
        }
    }
    Ok(())
}

/// Parses one physical line of bar content for `stave`, splitting on
/// `|` into bars, recording each bar's events and running the
/// bar-length consistency check (catalog entry 101) once a bar closes
/// with a declared time-signature length.
pub fn parse_bar_line(
    stave: &mut Stave,
    line: &str,
    ctx: &mut ParserContext,
) -> Result<(), Abandoned> {
    let mut segments = line.split('|').peekable();
    let expected_length = stave.current_time.bar_length();

    while let Some(segment) = segments.next() {
        let is_final_empty_trailer = segment.trim().is_empty() && segments.peek().is_none();
        if segment.trim().is_empty() && !is_final_empty_trailer {
            // An empty segment between two `|` (e.g. "||") still
            // produces a bar; a trailing empty segment after the
            // final `|` on the line does not.
        } else if segment.trim().is_empty() && is_final_empty_trailer {
            continue;
        }
        let active_key = stave.current_key.clone();
        stave.cont.reset_bar_accidentals(&active_key);
        let events = parse_bar_body(stave, segment, ctx)?;
        let number = BarNumber::new(stave.bars.len() as u32 + 1, 0);
        let mut bar = Bar::new(number);
        bar.events = events;
        bar.declared_length = expected_length;
        if let Some(expected) = expected_length {
            if let Err(msg) = bar.check_length(expected) {
                ctx.sink.report(101, Severity::Warning, msg, SourceLocation::default())?;
            }
        }
        stave.bars.push(bar);
    }
    Ok(())
}

fn parse_bar_body(
    stave: &mut Stave,
    segment: &str,
    ctx: &mut ParserContext,
) -> Result<Vec<Event>, Abandoned> {
    let mut events = Vec::new();
    let mut chars = segment.chars().peekable();
    let mut previous_length: Option<MusicLen> = None;
    let mut plets = PletStack::new();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '[' => {
                chars.next();
                let mut body = String::new();
                for c in chars.by_ref() {
                    if c == ']' {
                        break;
                    }
                    body.push(c);
                }
                let mut words = body.splitn(2, char::is_whitespace);
                let directive = words.next().unwrap_or("");
                let rest = words.next().unwrap_or("").trim();
                handle_inline_directive(stave, directive, rest, &mut events, ctx)?;
            }
            '"' => {
                chars.next();
                let mut body = String::new();
                for c in chars.by_ref() {
                    if c == '"' {
                        break;
                    }
                    body.push(c);
                }
                match read_pmw_string(&body) {
                    Ok(s) => events.push(Event::Text(s)),
                    Err(e) => {
                        ctx.sink.report(69, Severity::Major, e.to_string(), SourceLocation::default())?;
                    }
                }
            }
            '{' => {
                chars.next();
                let spec: String = take_while(&mut chars, |c| c.is_ascii_digit() || c == '/');
                let mut parts = spec.splitn(2, '/');
                let numerator: u8 = parts.next().unwrap_or("3").parse().unwrap_or(3);
                let denominator: u8 = parts.next().unwrap_or("2").parse().unwrap_or(2);
                match plets.push(PletRecord::new(numerator.max(1), denominator.max(1))) {
                    Ok(()) => events.push(Event::Marker {
                        name: "plet".into(),
                        args: format!("{numerator}/{denominator}"),
                    }),
                    Err(msg) => {
                        ctx.sink.report(100, Severity::Major, msg, SourceLocation::default())?;
                    }
                }
            }
            '}' => {
                chars.next();
                if plets.pop().is_some() {
                    events.push(Event::Marker { name: "endplet".into(), args: String::new() });
                }
            }
            '(' => {
                chars.next();
                let mut notes = Vec::new();
                loop {
                    skip_whitespace(&mut chars);
                    if chars.peek() == Some(&')') || chars.peek().is_none() {
                        break;
                    }
                    let token = take_while(&mut chars, |c| !c.is_whitespace() && c != ')');
                    match parse_note_token(&token, previous_length) {
                        Ok(parsed) => {
                            previous_length = Some(parsed.length);
                            notes.push(finish_note(stave, parsed, ctx));
                        }
                        Err(msg) => {
                            ctx.sink.report(89, Severity::Major, msg, SourceLocation::default())?;
                        }
                    }
                }
                if chars.peek() == Some(&')') {
                    chars.next();
                }
                let chord = Chord { notes };
                if let Err(msg) = chord.validate() {
                    let number = if msg.contains("too many") { 110 } else if msg.contains("rest") { 113 } else { 123 };
                    ctx.sink.report(number, Severity::Major, msg, SourceLocation::default())?;
                }
                events.push(Event::Chord(chord));
            }
            _ => {
                let token = take_while(&mut chars, |c| !c.is_whitespace() && !"[]{}()\"|".contains(c));
                if token.is_empty() {
                    chars.next();
                    continue;
                }
                match parse_note_token(&token, previous_length) {
                    Ok(parsed) => {
                        previous_length = Some(parsed.length);
                        let scaled_length = MusicLen(plets.scale(parsed.length.0));
                        let mut note = finish_note(stave, parsed, ctx);
                        note.length = scaled_length;
                        events.push(Event::Chord(Chord { notes: vec![note] }));
                    }
                    Err(msg) => {
                        ctx.sink.report(89, Severity::Major, msg, SourceLocation::default())?;
                    }
                }
            }
        }
    }
    Ok(events)
}

/// Parses the `function-name arg arg ...` tail of a `[draw ...]`/
/// `[overdraw ...]` directive into a [`DrawCall`]: quoted tokens are
/// kept as [`DrawValue::Text`], bare tokens that parse as an integer
/// become [`DrawValue::Number`] in points, anything else falls back to
/// text (a named variable or drawing-function reference, resolved
/// later against the draw-subsystem's own symbol table).
fn parse_draw_call(rest: &str) -> DrawCall {
    let mut chars = rest.chars().peekable();
    let mut tokens = Vec::new();
    loop {
        skip_whitespace(&mut chars);
        if chars.peek().is_none() {
            break;
        }
        if chars.peek() == Some(&'"') {
            chars.next();
            let body = take_while(&mut chars, |c| c != '"');
            chars.next();
            tokens.push((body, true));
        } else {
            let tok = take_while(&mut chars, |c| !c.is_whitespace());
            if tok.is_empty() {
                chars.next();
                continue;
            }
            tokens.push((tok, false));
        }
    }
    let mut iter = tokens.into_iter();
    let function_name = iter.next().map(|(t, _)| t).unwrap_or_default();
    let args = iter
        .map(|(text, quoted)| {
            if !quoted {
                if let Ok(points) = text.parse::<i32>() {
                    return DrawValue::Number(Fixed::from_points(points));
                }
            }
            DrawValue::Text(text)
        })
        .collect();
    DrawCall { function_name, args }
}

fn handle_inline_directive(
    stave: &mut Stave,
    directive: &str,
    rest: &str,
    events: &mut Vec<Event>,
    ctx: &mut ParserContext,
) -> Result<(), Abandoned> {
    match directive {
        "slur" | "line" => {
            let style = if directive == "line" { LineStyle::Line } else { LineStyle::Slur };
            let id = slur::open_slur(
                &mut stave.cont,
                &mut ctx.slur_arena,
                style,
                rest,
                crate::model::pitch::SPitch(0),
            );
            let (modifiers, _) = slur::parse_slur_options(rest);
            events.push(Event::Slur(SlurEvent::Start {
                id: id.unwrap_or(SlurId('\0')),
                style,
                modifiers,
            }));
        }
        "endslur" | "endline" => {
            let id = rest.strip_prefix('=').and_then(|s| s.chars().next()).and_then(|c| SlurId::parse(c).ok());
            let closed = slur::close_slur(&mut stave.cont, &mut ctx.slur_arena, id, crate::model::pitch::SPitch(0));
            if !closed {
                ctx.sink.report(171, Severity::Minor, "unexpected end of slur or line - ignored", SourceLocation::default())?;
            }
            events.push(Event::Slur(SlurEvent::Stop { id: id.unwrap_or(SlurId('\0')) }));
        }
        "slurgap" | "linegap" => {
            let id = rest.split('/').find_map(|p| p.strip_prefix('=')).and_then(|s| s.chars().next()).and_then(|c| SlurId::parse(c).ok());
            let text = rest.split('/').find_map(|p| p.strip_prefix("\"")).map(|t| t.trim_end_matches('"').to_string());
            let width_milli = rest
                .split('/')
                .find_map(|p| p.strip_prefix('w'))
                .and_then(|n| n.parse::<i32>().ok())
                .map(|points| points * 1000);
            events.push(Event::Slur(SlurEvent::Gap { id: id.unwrap_or(SlurId('\0')), text, width_milli }));
        }
        "beambreak" | "beamacc" | "beamrit" | "beammove" | "beamslope" => {
            match parse_beam_marker(directive, rest) {
                Ok(Some(marker)) => events.push(Event::Beam(marker)),
                Ok(None) => {}
                Err(msg) => {
                    ctx.sink.report(88, Severity::Major, msg, SourceLocation::default())?;
                }
            }
        }
        "crescendo" | "hairpin<" => {
            events.push(Event::Hairpin(Hairpin::start(HairpinDirection::Crescendo, true)));
        }
        "diminuendo" | "hairpin>" => {
            events.push(Event::Hairpin(Hairpin::start(HairpinDirection::Diminuendo, true)));
        }
        "endhairpin" => {
            if let Some(Event::Hairpin(h)) = events.iter_mut().rev().find(|e| matches!(e, Event::Hairpin(h) if h.open)) {
                h.close();
            }
        }
        "nocheck" => {}
        "draw" | "overdraw" => {
            events.push(Event::Draw(parse_draw_call(rest)));
        }
        // The rest of spec.md §3's closed set of bar-content
        // directives: recognised and recorded as a generic marker
        // event (name plus unparsed argument text) since none of them
        // needs a shape beyond that without a pagination consumer to
        // drive.
        "reset"
        | "ornament"
        | "accentmove"
        | "move" | "rmove" | "smove"
        | "nbar" | "all"
        | "lrepeat" | "rrepeat"
        | "tremolo"
        | "midichange"
        | "footnote"
        | "notes"
        | "tripsw"
        | "bowing"
        | "ties"
        | "olevel" | "ulevel" | "olhere" | "ulhere"
        | "ensure"
        | "newline" | "newpage"
        | "suspend" | "resume"
        | "page" | "pagetopmargin" | "pagebotmargin"
        | "zerocopy"
        | "sgabove" | "sghere" | "sgnext" | "ssabove" | "sshere" | "ssnext"
        | "dotbar"
        | "dotright"
        | "comma" | "tick" | "caesura"
        | "breakbarline" | "unbreakbarline" => {
            events.push(Event::Marker { name: directive.to_string(), args: rest.to_string() });
        }
        _ => {
            ctx.sink.report(
                86,
                Severity::Major,
                format!("unknown stave directive \"{directive}\""),
                SourceLocation::default(),
            )?;
        }
    }
    Ok(())
}

fn skip_whitespace(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    while matches!(chars.peek(), Some(c) if c.is_whitespace()) {
        chars.next();
    }
}

fn take_while(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, pred: impl Fn(char) -> bool) -> String {
    let mut out = String::new();
    while matches!(chars.peek(), Some(&c) if pred(c)) {
        out.push(chars.next().unwrap());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::time::{LEN_QUAVER};

    #[test]
    fn seed_scenario_one_two_bars_four_quavers_each() {
        let mut stave = Stave::new(1).unwrap();
        let mut ctx = ParserContext::new();
        parse_bar_line(&mut stave, "c- d- e- f- | g' a' b' c' |", &mut ctx).unwrap();
        assert_eq!(stave.bars.len(), 2);
        assert_eq!(stave.bars[0].events.len(), 4);
        assert_eq!(stave.bars[1].events.len(), 4);
        for event in &stave.bars[0].events {
            if let Event::Chord(chord) = event {
                assert_eq!(chord.notes[0].length.0, LEN_QUAVER);
            }
        }
    }

    #[test]
    fn chord_parses_multiple_simultaneous_notes() {
        let mut stave = Stave::new(1).unwrap();
        let mut ctx = ParserContext::new();
        parse_bar_line(&mut stave, "(c- e- g-) |", &mut ctx).unwrap();
        let Event::Chord(chord) = &stave.bars[0].events[0] else { panic!("expected chord") };
        assert_eq!(chord.notes.len(), 3);
    }

    #[test]
    fn slur_with_gap_and_text_records_one_start_one_gap_one_stop() {
        let mut stave = Stave::new(1).unwrap();
        let mut ctx = ParserContext::new();
        parse_bar_line(
            &mut stave,
            "[slur/=a] c- d- e- f- [slurgap/=a/\"rit.\"] g- a- [endslur/=a] |",
            &mut ctx,
        )
        .unwrap();
        let slur_events: Vec<_> = stave.bars[0]
            .events
            .iter()
            .filter_map(|e| match e {
                Event::Slur(s) => Some(s),
                _ => None,
            })
            .collect();
        assert_eq!(slur_events.len(), 3);
        assert!(matches!(slur_events[0], SlurEvent::Start { .. }));
        assert!(matches!(slur_events[1], SlurEvent::Gap { text: Some(_), .. }));
        assert!(matches!(slur_events[2], SlurEvent::Stop { .. }));
    }

    #[test]
    fn unmatched_endslur_reports_171() {
        let mut stave = Stave::new(1).unwrap();
        let mut ctx = ParserContext::new();
        parse_bar_line(&mut stave, "[endslur] |", &mut ctx).unwrap();
        assert!(ctx.sink.diagnostics().iter().any(|d| d.number == 171));
    }

    #[test]
    fn unknown_stave_directive_reports_86() {
        let mut stave = Stave::new(1).unwrap();
        let mut ctx = ParserContext::new();
        parse_bar_line(&mut stave, "[bogus] c- |", &mut ctx).unwrap();
        assert!(ctx.sink.diagnostics().iter().any(|d| d.number == 86));
    }

    #[test]
    fn previously_unmodeled_bar_directives_no_longer_report_86() {
        let directives = [
            "reset", "ornament", "accentmove", "move", "rmove", "smove", "nbar", "all",
            "lrepeat", "rrepeat", "tremolo", "midichange", "footnote", "notes", "tripsw",
            "bowing", "ties", "olevel", "ulevel", "olhere", "ulhere", "ensure", "newline",
            "newpage", "suspend", "resume", "page", "pagetopmargin", "pagebotmargin",
            "zerocopy", "sgabove", "sghere", "sgnext", "ssabove", "sshere", "ssnext",
            "dotbar", "dotright", "comma", "tick", "caesura", "breakbarline",
            "unbreakbarline",
        ];
        for directive in directives {
            let mut stave = Stave::new(1).unwrap();
            let mut ctx = ParserContext::new();
            let line = format!("[{directive}] c- |");
            parse_bar_line(&mut stave, &line, &mut ctx).unwrap();
            assert!(
                !ctx.sink.diagnostics().iter().any(|d| d.number == 86),
                "[{directive}] unexpectedly reported catalog-86"
            );
            assert!(stave.bars[0].events.iter().any(|e| matches!(e, Event::Marker { name, .. } if name == directive)));
        }
    }

    #[test]
    fn draw_directive_constructs_a_draw_call_event() {
        let mut stave = Stave::new(1).unwrap();
        let mut ctx = ParserContext::new();
        parse_bar_line(&mut stave, "[draw myfunc 10 \"hello\"] c- |", &mut ctx).unwrap();
        let Event::Draw(call) = &stave.bars[0].events[0] else { panic!("expected a draw call") };
        assert_eq!(call.function_name, "myfunc");
        assert_eq!(call.args.len(), 2);
        assert!(matches!(call.args[0], crate::model::draw::DrawValue::Number(_)));
        assert!(matches!(&call.args[1], crate::model::draw::DrawValue::Text(t) if t == "hello"));
    }

    #[test]
    fn overdraw_directive_is_also_recognised() {
        let mut stave = Stave::new(1).unwrap();
        let mut ctx = ParserContext::new();
        parse_bar_line(&mut stave, "[overdraw myfunc] c- |", &mut ctx).unwrap();
        assert!(matches!(stave.bars[0].events[0], Event::Draw(_)));
    }

    #[test]
    fn triplet_brackets_push_plet_and_endplet_marker_events() {
        let mut stave = Stave::new(1).unwrap();
        let mut ctx = ParserContext::new();
        parse_bar_line(&mut stave, "{3/2 c- d- e- } |", &mut ctx).unwrap();
        let markers: Vec<_> = stave.bars[0]
            .events
            .iter()
            .filter_map(|e| match e {
                Event::Marker { name, args } => Some((name.as_str(), args.as_str())),
                _ => None,
            })
            .collect();
        assert_eq!(markers.first(), Some(&("plet", "3/2")));
        assert_eq!(markers.last(), Some(&("endplet", "")));
    }

    #[test]
    fn seed_scenario_four_key_g_gives_unmarked_f_an_implicit_sharp() {
        use crate::model::key::KeySignature;
        use crate::model::pitch::QuarterTone;

        let mut stave = Stave::new(1).unwrap();
        stave.current_key = KeySignature::Standard { sharps: 1 };
        let mut ctx = ParserContext::new();
        parse_bar_line(&mut stave, "f- |", &mut ctx).unwrap();
        let Event::Chord(chord) = &stave.bars[0].events[0] else { panic!("expected a note") };
        let note = &chord.notes[0];
        assert!(note.accidental.is_none(), "F carries no written accidental");
        assert_eq!(note.sounding, Some(QuarterTone(10 + 2)));
    }

    #[test]
    fn written_accidental_is_remembered_for_the_rest_of_the_bar() {
        use crate::model::key::KeySignature;
        use crate::model::pitch::QuarterTone;

        let mut stave = Stave::new(1).unwrap();
        stave.current_key = KeySignature::Standard { sharps: 0 };
        let mut ctx = ParserContext::new();
        parse_bar_line(&mut stave, "#f- f- |", &mut ctx).unwrap();
        let Event::Chord(first) = &stave.bars[0].events[0] else { panic!("expected a note") };
        let Event::Chord(second) = &stave.bars[0].events[1] else { panic!("expected a note") };
        assert_eq!(first.notes[0].sounding, Some(QuarterTone(12)));
        assert!(second.notes[0].accidental.is_none());
        assert_eq!(second.notes[0].sounding, Some(QuarterTone(12)));
    }

    #[test]
    fn bar_accidental_memory_does_not_cross_a_barline() {
        use crate::model::key::KeySignature;
        use crate::model::pitch::QuarterTone;

        let mut stave = Stave::new(1).unwrap();
        stave.current_key = KeySignature::Standard { sharps: 0 };
        let mut ctx = ParserContext::new();
        parse_bar_line(&mut stave, "#f- | f- |", &mut ctx).unwrap();
        let Event::Chord(second_bar_note) = &stave.bars[1].events[0] else { panic!("expected a note") };
        assert_eq!(second_bar_note.notes[0].sounding, Some(QuarterTone(10)));
    }

    #[test]
    fn seed_scenario_three_transposed_c_is_spelled_as_d() {
        use crate::model::pitch::QuarterTone;

        let mut stave = Stave::new(1).unwrap();
        let mut ctx = ParserContext::with_transpose(4);
        parse_bar_line(&mut stave, "c |", &mut ctx).unwrap();
        let Event::Chord(chord) = &stave.bars[0].events[0] else { panic!("expected a note") };
        let note = &chord.notes[0];
        assert_eq!(note.sounding, Some(QuarterTone(4)));
        assert!(note.accidental.is_none());
        assert_eq!(note.kind, NoteKind::Pitched(SPitch(2)));
    }

    #[test]
    fn transposition_off_a_natural_step_leaves_the_written_letter_unchanged() {
        use crate::model::pitch::QuarterTone;

        let mut stave = Stave::new(1).unwrap();
        let mut ctx = ParserContext::with_transpose(1);
        parse_bar_line(&mut stave, "c |", &mut ctx).unwrap();
        let Event::Chord(chord) = &stave.bars[0].events[0] else { panic!("expected a note") };
        let note = &chord.notes[0];
        assert_eq!(note.kind, NoteKind::Pitched(SPitch(0)));
        assert_eq!(note.sounding, Some(QuarterTone(1)));
    }

    #[test]
    fn triplet_scales_three_quavers_into_a_crotchet_length() {
        let mut stave = Stave::new(1).unwrap();
        let mut ctx = ParserContext::new();
        parse_bar_line(&mut stave, "{3/2 c- d- e- } |", &mut ctx).unwrap();
        let total: i32 = stave.bars[0]
            .events
            .iter()
            .filter_map(|e| match e {
                Event::Chord(c) => Some(c.notes[0].length.0),
                _ => None,
            })
            .sum();
        assert_eq!(total, LEN_QUAVER * 3 * 2 / 3);
    }
}
