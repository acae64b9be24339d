//! `[slur]`/`[line]`/`[endslur]`/`[endline]`/`[slurgap]`/`[linegap]`
//! directive reading: option-token parsing into [`SlurModifiers`], and
//! opening/closing slurs against a stave's continuation state.
//!
//! Grounded on `pmw_read_stavedirs.c`'s slur-option scanner; the
//! "most recent active slur matches when no identifier is given" rule
//! is spec.md §4.3's stated fallback.

use crate::arena::Arena;
use crate::model::continuation::ContState;
use crate::model::slur::{LineStyle, Slur, SlurId, SlurModifiers};
use crate::model::pitch::SPitch;

/// Parses the `/`-separated option tokens following `[slur` or
/// `[line` (e.g. `slur/b/w/=a`). An identifier token is any other
/// single alphanumeric token not matched by a known flag.
pub fn parse_slur_options(tail: &str) -> (SlurModifiers, Option<SlurId>) {
    let mut modifiers = SlurModifiers::default();
    let mut id = None;
    for part in tail.split('/').filter(|p| !p.is_empty()) {
        match part {
            "b" | "bu" => modifiers.below = true,
            "a" | "ao" => modifiers.above = true,
            "e" => modifiers.editorial = true,
            "w" => { /* wiggle: geometry-only flag, no model field yet */ }
            "i" => modifiers.dashed = true,
            "ip" => modifiers.dotted = true,
            p if p.starts_with('=') => {
                if let Some(c) = p.chars().nth(1) {
                    id = SlurId::parse(c).ok();
                }
            }
            _ => {}
        }
    }
    (modifiers, id)
}

/// Opens a new slur/line, pushing it into the stave's active chain.
/// Returns the identifier assigned (explicit, or none for an
/// identity-less slur matched by recency on close).
pub fn open_slur(
    cont: &mut ContState,
    arena: &mut Arena<Slur>,
    style: LineStyle,
    tail: &str,
    start: SPitch,
) -> Option<SlurId> {
    let (modifiers, id) = parse_slur_options(tail);
    let slur = Slur {
        id: id.unwrap_or(SlurId('\0')),
        style,
        modifiers,
        start,
        end: start,
        partner: None,
    };
    let handle = arena.insert(slur);
    cont.open_slurs.push(handle);
    id
}

/// Closes a slur: a given identifier matches the most recent open
/// slur carrying it; no identifier matches the single most recently
/// opened slur overall (spec.md §4.3's stated fallback rule).
/// Returns `true` if a match was found and closed.
pub fn close_slur(
    cont: &mut ContState,
    arena: &mut Arena<Slur>,
    id: Option<SlurId>,
    end: SPitch,
) -> bool {
    let position = match id {
        Some(id) => cont
            .open_slurs
            .iter()
            .rposition(|&h| arena.get(h).map(|s| s.id) == Some(id)),
        None => {
            if cont.open_slurs.is_empty() {
                None
            } else {
                Some(cont.open_slurs.len() - 1)
            }
        }
    };
    let Some(position) = position else {
        return false;
    };
    let handle = cont.open_slurs.remove(position);
    if let Some(slur) = arena.get_mut(handle) {
        slur.end = end;
    }
    cont.slur_free.push(handle);
    true
}
