//! Header directive dispatch: everything that can appear before the
//! first stave body, processed from a sorted, binary-searched table
//! rather than the original's function-pointer array (Design Notes
//! §9's enum + `match` redesign).

use crate::context::ParserContext;
use crate::diag::{Abandoned, Severity, SourceLocation};
use crate::geometry::key_width::override_key;
use crate::geometry::time_width::PrintTimeOverride;
use crate::model::clef::Clef;
use crate::model::key::KeySignature;
use crate::model::movement::{LayoutOp, Movement};
use crate::model::time::TimeSignature;
use crate::pmwstring::read_pmw_string;
use crate::strfmt::Fixed;

/// One recognised header directive name, matched case-insensitively
/// ("key" and "Key" both resolve the same way).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HeaderDirective {
    Key,
    Time,
    Printkey,
    Printtime,
    Makekey,
    Keytranspose,
    Transposedkey,
    Heading,
    Footing,
    Pageheading,
    Pagefooting,
    Lastfooting,
    Stavesizes,
    Stavespacing,
    Sgabove,
    Sghere,
    Sgnext,
    Layout,
}

/// Sorted-by-name table entry, binary-searched by `lookup`.
struct Entry {
    name: &'static str,
    directive: HeaderDirective,
}

const TABLE: &[Entry] = &[
    Entry { name: "Footing", directive: HeaderDirective::Footing },
    Entry { name: "Heading", directive: HeaderDirective::Heading },
    Entry { name: "Key", directive: HeaderDirective::Key },
    Entry { name: "Keytranspose", directive: HeaderDirective::Keytranspose },
    Entry { name: "Lastfooting", directive: HeaderDirective::Lastfooting },
    Entry { name: "Layout", directive: HeaderDirective::Layout },
    Entry { name: "Makekey", directive: HeaderDirective::Makekey },
    Entry { name: "Pagefooting", directive: HeaderDirective::Pagefooting },
    Entry { name: "Pageheading", directive: HeaderDirective::Pageheading },
    Entry { name: "Printkey", directive: HeaderDirective::Printkey },
    Entry { name: "Printtime", directive: HeaderDirective::Printtime },
    Entry { name: "Sgabove", directive: HeaderDirective::Sgabove },
    Entry { name: "Sghere", directive: HeaderDirective::Sghere },
    Entry { name: "Sgnext", directive: HeaderDirective::Sgnext },
    Entry { name: "Stavesizes", directive: HeaderDirective::Stavesizes },
    Entry { name: "Stavespacing", directive: HeaderDirective::Stavespacing },
    Entry { name: "Time", directive: HeaderDirective::Time },
    Entry { name: "Transposedkey", directive: HeaderDirective::Transposedkey },
];

/// Looks up a directive name case-insensitively: source files spell
/// these lowercase ("key G", "time 3/4") while the table is keyed by
/// the capitalised form from spec.md's own directive names.
#[must_use]
pub fn lookup(name: &str) -> Option<HeaderDirective> {
    TABLE
        .binary_search_by(|entry| entry.name.to_ascii_lowercase().cmp(&name.to_ascii_lowercase()))
        .ok()
        .map(|i| TABLE[i].directive)
}

/// Parses a `stave-number value` pair shared by `stavesizes`,
/// `stavespacing`, and the `sgabove`/`sghere`/`sgnext` directives
/// (spec.md §4.2): each takes a list of such pairs on one line.
fn parse_number_pairs(rest: &str) -> Vec<(u32, i32)> {
    let mut out = Vec::new();
    let mut tokens = rest.split_whitespace();
    while let (Some(n), Some(v)) = (tokens.next(), tokens.next()) {
        if let (Ok(n), Ok(v)) = (n.parse::<u32>(), v.parse::<i32>()) {
            out.push((n, v));
        }
    }
    out
}

/// Dispatches one header directive line (already tokenized into a name
/// plus the rest of the line) against the movement under construction.
/// Obsolete directives such as standalone `omitempty` or bracketed
/// `[stavelines <n>]` are accepted with a deprecation warning (catalog
/// entry 170) rather than rejected outright.
pub fn dispatch(
    movement: &mut Movement,
    name: &str,
    rest: &str,
    ctx: &mut ParserContext,
) -> Result<(), Abandoned> {
    let Some(directive) = lookup(name) else {
        ctx.sink.report(
            24,
            Severity::Major,
            format!("unknown header directive \"{name}\""),
            SourceLocation::default(),
        )?;
        return Ok(());
    };
    match directive {
        HeaderDirective::Key => {
            // Per spec.md §8 seed scenario 6: an unsupported spelling
            // reports a major error and leaves the key at C, rather
            // than aborting the parse.
            match KeySignature::parse_name(rest) {
                Ok(KeySignature::Custom { name, accidentals }) => {
                    // A bare `key Xn` resolves against whatever
                    // `makekey` has already filled in for that name.
                    movement.default_key = movement
                        .custom_keys
                        .get(&name)
                        .cloned()
                        .unwrap_or(KeySignature::Custom { name, accidentals });
                }
                Ok(key) => movement.default_key = key,
                Err(msg) => {
                    ctx.sink.report(43, Severity::Major, msg, SourceLocation::default())?;
                    movement.default_key = KeySignature::Standard { sharps: 0 };
                }
            }
        }
        HeaderDirective::Time => match TimeSignature::parse(rest) {
            Ok((ts, _is_letter_form)) => movement.default_time = ts,
            Err(msg) => {
                ctx.sink.report(42, Severity::Fatal, msg, SourceLocation::default())?;
            }
        },
        HeaderDirective::Makekey => {
            // `makekey Xn acc,line acc,line ...` fills a custom key's
            // seven-letter accidental row (spec.md §6's "makekey Xn"
            // encoding: a list of `{accidental, stave-line}` pairs,
            // here flattened to one signed accidental per letter index
            // 0..6 in C,D,E,F,G,A,B order).
            let mut tokens = rest.split_whitespace();
            let Some(custom_name) = tokens.next() else {
                ctx.sink.report(
                    44,
                    Severity::Major,
                    "custom key name expected".to_string(),
                    SourceLocation::default(),
                )?;
                return Ok(());
            };
            match KeySignature::validate_custom_name(custom_name, 26) {
                Ok(_) => {
                    let mut accidentals = [0i8; 7];
                    for (i, tok) in tokens.enumerate().take(7) {
                        if let Ok(v) = tok.parse::<i8>() {
                            accidentals[i] = v;
                        }
                    }
                    movement.custom_keys.insert_or_replace(
                        custom_name.to_ascii_uppercase(),
                        KeySignature::Custom {
                            name: custom_name.to_ascii_uppercase(),
                            accidentals,
                        },
                    );
                }
                Err(msg) => {
                    ctx.sink.report(44, Severity::Major, msg, SourceLocation::default())?;
                }
            }
        }
        HeaderDirective::Keytranspose | HeaderDirective::Transposedkey => {
            // Both register a mapping consulted by `transpose::transpose_key`
            // when a non-zero `-t` is in effect; `keytranspose` maps a
            // custom key name to its transposed target, `transposedkey`
            // is the user-facing alias with the same storage.
            let mut tokens = rest.split_whitespace();
            let (Some(custom_name), Some(target_text)) = (tokens.next(), tokens.next()) else {
                ctx.sink.report(
                    74,
                    Severity::Major,
                    "expected \"<name> <key>\"".to_string(),
                    SourceLocation::default(),
                )?;
                return Ok(());
            };
            match KeySignature::parse_name(target_text) {
                Ok(target) => ctx
                    .transpose_table
                    .register_custom(&custom_name.to_ascii_uppercase(), target),
                Err(msg) => {
                    ctx.sink.report(43, Severity::Major, msg, SourceLocation::default())?;
                }
            }
        }
        HeaderDirective::Printkey => {
            // `printkey <key> <clef> <width-points>`: registers a
            // measured-width substitute for the computed key-signature
            // width (font-metrics loading is an external collaborator
            // per spec.md §1, so the width here is read directly rather
            // than measured from a rendered string).
            let mut tokens = rest.split_whitespace();
            let (Some(key_text), Some(clef_text), Some(width_text)) =
                (tokens.next(), tokens.next(), tokens.next())
            else {
                ctx.sink.report(
                    45,
                    Severity::Major,
                    "expected \"<key> <clef> <width>\"".to_string(),
                    SourceLocation::default(),
                )?;
                return Ok(());
            };
            match (KeySignature::parse_name(key_text), Clef::parse(clef_text), width_text.parse::<i32>()) {
                (Ok(key), Some(clef), Ok(points)) => {
                    movement
                        .printkey_overrides
                        .insert_or_replace(override_key(&key, clef), Fixed::from_points(points));
                }
                _ => {
                    ctx.sink.report(
                        45,
                        Severity::Major,
                        format!("invalid printkey specification \"{rest}\""),
                        SourceLocation::default(),
                    )?;
                }
            }
        }
        HeaderDirective::Printtime => {
            // `printtime <num>/<den> <num-width> <den-width>`.
            let mut tokens = rest.split_whitespace();
            let (Some(ts_text), Some(num_w), Some(den_w)) =
                (tokens.next(), tokens.next(), tokens.next())
            else {
                ctx.sink.report(
                    190,
                    Severity::Major,
                    "expected \"<time> <num-width> <den-width>\"".to_string(),
                    SourceLocation::default(),
                )?;
                return Ok(());
            };
            match (TimeSignature::parse(ts_text), num_w.parse::<i32>(), den_w.parse::<i32>()) {
                (Ok((ts, _)), Ok(num_points), Ok(den_points)) => {
                    movement.printtime_overrides.insert_or_replace(
                        ts.pack().to_string(),
                        PrintTimeOverride {
                            numerator_width: Fixed::from_points(num_points),
                            denominator_width: Fixed::from_points(den_points),
                        },
                    );
                }
                _ => {
                    ctx.sink.report(
                        190,
                        Severity::Major,
                        format!("invalid printtime specification \"{rest}\""),
                        SourceLocation::default(),
                    )?;
                }
            }
        }
        HeaderDirective::Heading
        | HeaderDirective::Footing
        | HeaderDirective::Pageheading
        | HeaderDirective::Pagefooting
        | HeaderDirective::Lastfooting => {
            match read_pmw_string(rest.trim().trim_matches('"')) {
                Ok(s) => {
                    let chain = match directive {
                        HeaderDirective::Heading => &mut movement.headings.heading,
                        HeaderDirective::Footing => &mut movement.headings.footing,
                        HeaderDirective::Pageheading => &mut movement.headings.page_heading,
                        HeaderDirective::Pagefooting => &mut movement.headings.page_footing,
                        HeaderDirective::Lastfooting => &mut movement.headings.last_footing,
                        _ => unreachable!(),
                    };
                    chain.push(s);
                }
                Err(e) => {
                    ctx.sink.report(
                        192,
                        Severity::Minor,
                        format!("invalid heading/footing string: {e:?}"),
                        SourceLocation::default(),
                    )?;
                }
            }
        }
        HeaderDirective::Stavesizes => {
            for (stave_number, magnification_milli) in parse_number_pairs(rest) {
                movement.stave_sizes.push(crate::model::movement::StaveSizing {
                    stave_number,
                    magnification_milli,
                });
            }
        }
        HeaderDirective::Stavespacing => {
            if let Some(first) = rest.split_whitespace().next() {
                if let Ok(milli) = first.parse::<i32>() {
                    movement.stave_spacing_milli = milli;
                }
            }
        }
        HeaderDirective::Sgabove => movement.stave_gaps.above.extend(parse_number_pairs(rest)),
        HeaderDirective::Sghere => movement.stave_gaps.here.extend(parse_number_pairs(rest)),
        HeaderDirective::Sgnext => movement.stave_gaps.next.extend(parse_number_pairs(rest)),
        HeaderDirective::Layout => {
            // Compiles the opcode stream: `barcount N`, `repeatcount N`,
            // `newpage`, space-separated, repeated any number of times
            // on one `layout` line (spec.md §4.2).
            let mut tokens = rest.split_whitespace().peekable();
            while let Some(tok) = tokens.next() {
                match tok.to_ascii_lowercase().as_str() {
                    "barcount" => {
                        if let Some(n) = tokens.next().and_then(|t| t.parse::<u32>().ok()) {
                            movement.layout.push(LayoutOp::BarCount(n));
                        }
                    }
                    "repeatcount" => {
                        if let Some(n) = tokens.next().and_then(|t| t.parse::<u32>().ok()) {
                            movement.layout.push(LayoutOp::RepeatCount(n));
                        }
                    }
                    "newpage" => movement.layout.push(LayoutOp::NewPage),
                    _ => {
                        ctx.sink.report(
                            191,
                            Severity::Minor,
                            format!("unrecognized layout opcode \"{tok}\""),
                            SourceLocation::default(),
                        )?;
                    }
                }
            }
        }
    }
    Ok(())
}
