//! Slurs and lines: paired start/stop markers linked by an identifier,
//! plus the continuation state needed to carry a slur across a system
//! break.

use crate::arena::Handle;
use crate::model::pitch::SPitch;

/// A slur/line identifier: required to be a single ASCII alphanumeric
/// character (catalog entry 163), used to pair `[slur X]`/`[endslur X]`
/// markers that may be separated by arbitrarily many bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlurId(pub char);

impl SlurId {
    pub fn parse(c: char) -> Result<Self, String> {
        if !c.is_ascii_alphanumeric() {
            return Err("slur/line identifier must be an ASCII alphanumeric character".into());
        }
        Ok(SlurId(c))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Slur,
    Line,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone)]
pub struct SlurModifiers {
    pub above: bool,
    pub below: bool,
    pub editorial: bool,
    pub dashed: bool,
    pub dotted: bool,
}

impl Default for SlurModifiers {
    fn default() -> Self {
        SlurModifiers {
            above: false,
            below: false,
            editorial: false,
            dashed: false,
            dotted: false,
        }
    }
}

/// A start/stop marker event placed in a bar's event stream.
#[derive(Debug, Clone)]
pub enum SlurEvent {
    Start {
        id: SlurId,
        style: LineStyle,
        modifiers: SlurModifiers,
    },
    Stop {
        id: SlurId,
    },
    Gap {
        id: SlurId,
        text: Option<String>,
        /// The gap's width in thousandths of a point, from a `/w<n>`
        /// option token (e.g. `/w6` records `width_milli=6000`).
        width_milli: Option<i32>,
    },
}

/// The full slur/line record once both ends are known, carrying
/// endpoints and whatever continuation handle chains it to a partner
/// half when broken across a system.
#[derive(Debug, Clone)]
pub struct Slur {
    pub id: SlurId,
    pub style: LineStyle,
    pub modifiers: SlurModifiers,
    pub start: SPitch,
    pub end: SPitch,
    /// Set while the slur is open across a system break; the partner
    /// half lives in the continuation free-list until matched.
    pub partner: Option<Handle<Slur>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slur_id_rejects_non_alphanumeric() {
        assert!(SlurId::parse('#').is_err());
        assert!(SlurId::parse('A').is_ok());
        assert!(SlurId::parse('3').is_ok());
    }
}
