//! `pmw_core`: the source-language front end, music IR, and
//! shape-computation layer of a music-notation typesetter.
//!
//! This crate does not render or paginate anything itself. It reads a
//! declarative score-description source into an in-memory IR
//! ([`model`]) and exposes the geometry ([`geometry`]) that a
//! pagination/output backend needs to place that IR on a page. See
//! [`run_pipeline`] for the end-to-end entry point the `pmwc` binary
//! drives.

pub mod arena;
pub mod config;
pub mod context;
pub mod debug;
pub mod diag;
pub mod diag_catalog;
pub mod geometry;
pub mod header;
pub mod lexer;
pub mod model;
pub mod pmwstring;
pub mod stave;
pub mod strfmt;
pub mod transpose;
pub mod tree;

use context::ParserContext;
use diag::Abandoned;
use model::Movement;

/// Parses one complete source file into a sequence of movements.
///
/// This is the library's single public driving function: it owns
/// line assembly, preprocessing/macro expansion, and alternation
/// between the header parser and stave parser as `[stave ...]` /
/// `[endstave]` brackets are seen, exactly as spec.md §2's data-flow
/// diagram describes. It stops before pagination/output, which remain
/// external collaborators (spec.md §1).
pub fn run_pipeline(source: &str, ctx: &mut ParserContext) -> Result<Vec<Movement>, Abandoned> {
    let logical_lines = lexer::LineAssembler::new(source).assemble(&mut ctx.sink)?;
    let lines = lexer::preprocess_lines(&logical_lines, &mut ctx.macros, &mut ctx.sink)?;

    let mut movements = Vec::new();
    let mut current = Movement::new();
    let mut in_stave = false;

    for line in &lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix('[') {
            let body = rest.strip_suffix(']').unwrap_or(rest);
            let mut words = body.splitn(2, char::is_whitespace);
            let keyword = words.next().unwrap_or("");
            let args = words.next().unwrap_or("").trim();
            match keyword {
                "stave" | "staff" => {
                    in_stave = true;
                    if let Ok(number) = args.split_whitespace().next().unwrap_or("").parse::<u32>() {
                        match model::Stave::new(number) {
                            Ok(stave) => {
                                if let Err(msg) = current.add_stave(stave) {
                                    ctx.sink.report(
                                        85,
                                        diag::Severity::Fatal,
                                        msg,
                                        diag::SourceLocation::default(),
                                    )?;
                                }
                            }
                            Err(msg) => {
                                ctx.sink.report(
                                    84,
                                    diag::Severity::Fatal,
                                    msg,
                                    diag::SourceLocation::default(),
                                )?;
                            }
                        }
                    }
                    continue;
                }
                "endstave" | "endstaff" => {
                    in_stave = false;
                    continue;
                }
                "newmovement" => {
                    let next = Movement::continuing_from(&current);
                    movements.push(std::mem::replace(&mut current, next));
                    in_stave = false;
                    continue;
                }
                _ => {
                    if in_stave {
                        stave::dispatch_bracketed(&mut current, keyword, args, ctx)?;
                    } else {
                        header::dispatch(&mut current, keyword, args, ctx)?;
                    }
                    continue;
                }
            }
        }
        if in_stave {
            if let Some(stave) = current.staves.last_mut() {
                stave::parse_bar_line(stave, trimmed, ctx)?;
            }
            continue;
        }
        // Unbracketed header directives per spec.md §6's grammar
        // (`HeaderDir := Name [Args] NL`) — "key G", "time 3/4",
        // "heading ..." and the rest, as opposed to the bracketed
        // `[stave ...]`/`[endstave]` pair that switches `in_stave`.
        let mut words = trimmed.splitn(2, char::is_whitespace);
        let keyword = words.next().unwrap_or("");
        let rest = words.next().unwrap_or("").trim();
        header::dispatch(&mut current, keyword, rest, ctx)?;
    }
    movements.push(current);
    Ok(movements)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_parses_one_stave_two_bars() {
        let source = "[stave 1 treble]\nc- d- e- f- | g' a' b' c' |\n[endstave]\n";
        let mut ctx = ParserContext::new();
        let movements = run_pipeline(source, &mut ctx).unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].staves.len(), 1);
        assert_eq!(movements[0].staves[0].bars.len(), 2);
    }

    #[test]
    fn pipeline_expands_macro_before_parsing() {
        let source = "*define q() c- d- e- f-\n[stave 1]\n&q() | &q() |\n[endstave]\n";
        let mut ctx = ParserContext::new();
        let movements = run_pipeline(source, &mut ctx).unwrap();
        assert_eq!(movements[0].staves[0].bars.len(), 2);
        assert_eq!(movements[0].staves[0].bars[0].events.len(), movements[0].staves[0].bars[1].events.len());
    }

    #[test]
    fn newmovement_starts_a_fresh_movement() {
        let source = "[stave 1]\nc |\n[endstave]\n[newmovement]\n[stave 1]\nd |\n[endstave]\n";
        let mut ctx = ParserContext::new();
        let movements = run_pipeline(source, &mut ctx).unwrap();
        assert_eq!(movements.len(), 2);
    }

    #[test]
    fn newmovement_copies_key_and_time_defaults_forward_but_resets_staves() {
        let source = "key G\ntime 3/4\n[stave 1]\nc |\n[endstave]\n[newmovement]\n[stave 1]\nd |\n[endstave]\n";
        let mut ctx = ParserContext::new();
        let movements = run_pipeline(source, &mut ctx).unwrap();
        assert_eq!(movements.len(), 2);
        assert_eq!(movements[0].default_key, movements[1].default_key);
        assert_eq!(movements[0].default_time, movements[1].default_time);
        assert_eq!(movements[1].staves.len(), 1, "the new movement's own stave table starts fresh");
    }
}
