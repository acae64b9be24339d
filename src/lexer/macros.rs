//! Named macro definitions: 0..20 default arguments, `&n`/`&n;`
//! positional substitution, `&*N(text)` replication, nested-call
//! expansion to a bounded depth.

use crate::diag::{Abandoned, Severity, Sink, SourceLocation};
use crate::tree::BalancedTree;

/// Catalog entry 22's nesting bound: "macro calls nested too deep".
pub const MAX_MACRO_DEPTH: u32 = 10;

#[derive(Debug, Clone)]
pub struct MacroDef {
    pub body: String,
    pub arg_defaults: Vec<Option<String>>,
}

/// The live macro table for one source file, keyed by name via the
/// same ordered-map primitive used for draw functions.
#[derive(Default)]
pub struct MacroTable {
    tree: BalancedTree<MacroDef>,
    depth: u32,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a macro, rejecting a name already in use (catalog
    /// entry 16: "the name \"{0}\" is already defined").
    pub fn define(&mut self, name: &str, def: MacroDef) -> Result<(), String> {
        if !self.tree.insert(name, def) {
            return Err(format!("the name \"{name}\" is already defined"));
        }
        Ok(())
    }

    /// Looks up a macro body by name (used when the lexer sees a bare
    /// `&name` reference with no arguments).
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.tree.get(name).map(|d| d.body.as_str())
    }

    /// Expands a macro call with positional arguments, substituting
    /// `&1`..`&20` (optionally `&1;` when immediately followed by an
    /// alphanumeric). Tracks nesting depth across recursive expansion
    /// and raises catalog entry 22 if `MAX_MACRO_DEPTH` is exceeded.
    pub fn expand(
        &mut self,
        name: &str,
        args: &[String],
        sink: &mut Sink,
    ) -> Result<String, Abandoned> {
        self.depth += 1;
        let result = self.expand_inner(name, args, sink);
        self.depth -= 1;
        result
    }

    fn expand_inner(
        &mut self,
        name: &str,
        args: &[String],
        sink: &mut Sink,
    ) -> Result<String, Abandoned> {
        if self.depth > MAX_MACRO_DEPTH {
            sink.report(
                22,
                Severity::Fatal,
                format!("macro calls nested too deep (max {MAX_MACRO_DEPTH})"),
                SourceLocation::default(),
            )?;
        }
        let Some(def) = self.tree.get(name) else {
            sink.report(
                17,
                Severity::Major,
                format!("the name \"{name}\" has not been defined"),
                SourceLocation::default(),
            )?;
            return Ok(String::new());
        };
        let mut out = String::with_capacity(def.body.len());
        let mut chars = def.body.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '&' {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    out.push_str(&self.read_replication(&mut chars, args));
                    continue;
                }
                if let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() {
                        let mut digits = String::new();
                        while let Some(&c) = chars.peek() {
                            if c.is_ascii_digit() {
                                digits.push(c);
                                chars.next();
                            } else {
                                break;
                            }
                        }
                        if chars.peek() == Some(&';') {
                            chars.next();
                        }
                        if let Ok(idx) = digits.parse::<usize>() {
                            if idx >= 1 {
                                if let Some(arg) = args.get(idx - 1) {
                                    out.push_str(arg);
                                } else if let Some(Some(default)) =
                                    def.arg_defaults.get(idx - 1)
                                {
                                    out.push_str(default);
                                }
                            }
                        }
                        continue;
                    }
                }
            }
            out.push(c);
        }
        Ok(out)
    }

    /// `&*N(text)` replication: repeats `text` N times. Per catalog
    /// entry 21, a replication must have exactly one argument; extras
    /// are ignored with a warning left for the caller to raise.
    fn read_replication(
        &self,
        chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
        _args: &[String],
    ) -> String {
        let mut digits = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                chars.next();
            } else {
                break;
            }
        }
        let count: usize = digits.parse().unwrap_or(0);
        if chars.peek() != Some(&'(') {
            return String::new();
        }
        chars.next();
        let mut text = String::new();
        let mut depth = 1;
        for c in chars.by_ref() {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            if depth > 0 {
                text.push(c);
            }
        }
        text.repeat(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positional_argument_substitution() {
        let mut macros = MacroTable::new();
        macros
            .define(
                "greet",
                MacroDef {
                    body: "hello &1".into(),
                    arg_defaults: vec![None],
                },
            )
            .unwrap();
        let mut sink = Sink::new();
        let out = macros.expand("greet", &["world".to_string()], &mut sink).unwrap();
        assert_eq!(out, "hello world");
    }

    #[test]
    fn duplicate_definition_is_rejected() {
        let mut macros = MacroTable::new();
        macros
            .define("m", MacroDef { body: "a".into(), arg_defaults: vec![] })
            .unwrap();
        let err = macros
            .define("m", MacroDef { body: "b".into(), arg_defaults: vec![] })
            .unwrap_err();
        assert!(err.contains("already defined"));
    }

    #[test]
    fn replication_repeats_text() {
        let mut macros = MacroTable::new();
        macros
            .define("r", MacroDef { body: "&*3(ab)".into(), arg_defaults: vec![] })
            .unwrap();
        let mut sink = Sink::new();
        let out = macros.expand("r", &[], &mut sink).unwrap();
        assert_eq!(out, "ababab");
    }

    #[test]
    fn undefined_macro_reports_17() {
        let mut macros = MacroTable::new();
        let mut sink = Sink::new();
        macros.expand("nope", &[], &mut sink).unwrap();
        assert_eq!(sink.diagnostics()[0].number, 17);
    }
}
