//! `ParserContext`: the single struct that replaces the original's
//! ~200 module globals (Design Notes §9). Owns the diagnostic sink,
//! the macro table, and the run-wide settings (`-t`, `-em`) that would
//! otherwise be free-floating state read by every parsing function.

use crate::arena::Arena;
use crate::diag::Sink;
use crate::lexer::macros::MacroTable;
use crate::model::slur::Slur;
use crate::transpose::TransposeTable;

/// Threaded explicitly through `run_pipeline` and the header/stave
/// dispatchers instead of being read from globals.
pub struct ParserContext {
    pub sink: Sink,
    pub macros: MacroTable,
    /// Requested transposition in quarter-tones (`-t` CLI option),
    /// consulted by [`crate::transpose`].
    pub transpose_quarter_tones: i32,
    /// Registered `keytranspose`/`transposedkey` overrides.
    pub transpose_table: TransposeTable,
    /// Arena owning every slur/line record opened during the parse;
    /// `ContState::open_slurs` holds handles into this arena.
    pub slur_arena: Arena<Slur>,
}

impl ParserContext {
    #[must_use]
    pub fn new() -> Self {
        ParserContext {
            sink: Sink::new(),
            macros: MacroTable::new(),
            transpose_quarter_tones: 0,
            transpose_table: TransposeTable::new(),
            slur_arena: Arena::new(),
        }
    }

    #[must_use]
    pub fn with_transpose(quarter_tones: i32) -> Self {
        let mut ctx = Self::new();
        ctx.transpose_quarter_tones = quarter_tones;
        ctx
    }
}

impl Default for ParserContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_no_transposition() {
        let ctx = ParserContext::new();
        assert_eq!(ctx.transpose_quarter_tones, 0);
    }

    #[test]
    fn with_transpose_sets_requested_value() {
        let ctx = ParserContext::with_transpose(4);
        assert_eq!(ctx.transpose_quarter_tones, 4);
    }
}
