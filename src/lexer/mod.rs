//! Character-level reading: physical line assembly, continuation
//! joining, comment stripping, and the token stream handed to the
//! header/stave parsers.
//!
//! Grounded on `read.c`'s `read_nextc`/`next_word` character API, with
//! the char-vector-plus-cursor scanning idiom (position/line/column
//! tracked alongside a `Vec<char>` buffer, `Option<Token>`-returning
//! step methods) carried over from the hand-written lexer style this
//! crate's ancestry uses for its own text-notation front end.

pub mod macros;
pub mod preprocessor;

use crate::diag::{Abandoned, Severity, Sink, SourceLocation};
use macros::MacroTable;
use preprocessor::Preprocessor;

/// A single lexical token. Kept coarse-grained: the header/stave
/// parsers re-derive finer structure (note letters, digits) themselves
/// from `Word`/`Punct` text, matching the original's "mostly
/// character-at-a-time" reading style rather than a fully tokenized
/// front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Word(String),
    Number(String),
    Punct(char),
    QuotedString(String),
    Newline,
    Eof,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

/// Reads source text into logical lines: joins `&&&`-terminated
/// continuations, strips `@`-to-end-of-line comments outside quoted
/// strings, and rejects embedded NUL bytes (catalog entry 2).
pub struct LineAssembler<'a> {
    source: &'a str,
}

impl<'a> LineAssembler<'a> {
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        LineAssembler { source }
    }

    /// Produces the logical lines of the source, continuation-joined
    /// and comment-stripped, with NUL bytes replaced by nothing and a
    /// diagnostic raised for each occurrence.
    pub fn assemble(&self, sink: &mut Sink) -> Result<Vec<String>, Abandoned> {
        let mut logical_lines = Vec::new();
        let mut pending = String::new();
        for (line_no, raw_line) in self.source.lines().enumerate() {
            let mut line = String::with_capacity(raw_line.len());
            let mut in_string = false;
            let mut chars = raw_line.chars().peekable();
            while let Some(c) = chars.next() {
                if c == '\0' {
                    sink.report(
                        2,
                        Severity::Major,
                        "binary zero encountered in input: ignored",
                        SourceLocation {
                            line: Some(line_no + 1),
                            ..Default::default()
                        },
                    )?;
                    continue;
                }
                if c == '"' {
                    in_string = !in_string;
                    line.push(c);
                    continue;
                }
                if c == '@' && !in_string {
                    break;
                }
                line.push(c);
            }
            pending.push_str(&line);
            if pending.ends_with("&&&") {
                pending.truncate(pending.len() - 3);
            } else {
                logical_lines.push(std::mem::take(&mut pending));
            }
        }
        if !pending.is_empty() {
            logical_lines.push(pending);
        }
        Ok(logical_lines)
    }
}

/// Character-at-a-time reader over one logical line, after macro
/// expansion and preprocessing have already been applied.
pub struct Lexer<'a> {
    chars: Vec<char>,
    pos: usize,
    position: Position,
    macros: &'a MacroTable,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(line: &str, macros: &'a MacroTable) -> Self {
        Lexer {
            chars: line.chars().collect(),
            pos: 0,
            position: Position::default(),
            macros,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.position.line += 1;
            self.position.column = 0;
        } else {
            self.position.column += 1;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace() && c != '\n') {
            self.advance();
        }
    }

    /// Reads the next token, expanding a leading `&name` macro call
    /// in-place via the macro table before falling through to normal
    /// tokenization (catalog entry 18 if `&` is not followed by a
    /// recognised name or string repetition).
    pub fn next_token(&mut self, sink: &mut Sink) -> Result<Token, Abandoned> {
        self.skip_whitespace();
        let Some(c) = self.peek() else {
            return Ok(Token::Eof);
        };
        if c == '\n' {
            self.advance();
            return Ok(Token::Newline);
        }
        if c == '"' {
            return self.read_quoted_string(sink);
        }
        if c == '&' {
            return self.expand_macro_reference(sink);
        }
        if c.is_ascii_digit() {
            return Ok(Token::Number(self.read_while(|c| c.is_ascii_digit() || c == '.')));
        }
        if c.is_alphabetic() || c == '_' {
            return Ok(Token::Word(self.read_while(|c| c.is_alphanumeric() || c == '_')));
        }
        self.advance();
        Ok(Token::Punct(c))
    }

    fn read_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let mut out = String::new();
        while matches!(self.peek(), Some(c) if pred(c)) {
            out.push(self.advance().unwrap());
        }
        out
    }

    fn read_quoted_string(&mut self, sink: &mut Sink) -> Result<Token, Abandoned> {
        self.advance(); // opening quote
        let mut out = String::new();
        loop {
            match self.advance() {
                Some('"') => break,
                Some('\\') => {
                    out.push('\\');
                    if let Some(escaped) = self.advance() {
                        out.push(escaped);
                    }
                }
                Some(c) => out.push(c),
                None => {
                    sink.report(
                        65,
                        Severity::Fatal,
                        "unexpected end of file while reading string",
                        SourceLocation {
                            line: Some(self.position.line),
                            column: Some(self.position.column),
                            ..Default::default()
                        },
                    )?;
                    break;
                }
            }
        }
        Ok(Token::QuotedString(out))
    }

    fn expand_macro_reference(&mut self, sink: &mut Sink) -> Result<Token, Abandoned> {
        self.advance(); // '&'
        if self.peek() == Some('&') {
            self.advance();
            return Ok(Token::Punct('&'));
        }
        let name = self.read_while(|c| c.is_alphanumeric() || c == '_');
        if self.peek() == Some(';') {
            self.advance();
        }
        if name.is_empty() {
            sink.report(
                18,
                Severity::Major,
                "macro name or string repetition expected after \"&\"",
                SourceLocation {
                    line: Some(self.position.line),
                    column: Some(self.position.column),
                    ..Default::default()
                },
            )?;
            return Ok(Token::Punct('&'));
        }
        match self.macros.lookup(&name) {
            Some(body) => Ok(Token::Word(body.to_string())),
            None => {
                sink.report(
                    17,
                    Severity::Major,
                    format!("the name \"{name}\" has not been defined"),
                    SourceLocation {
                        line: Some(self.position.line),
                        column: Some(self.position.column),
                        ..Default::default()
                    },
                )?;
                Ok(Token::Word(String::new()))
            }
        }
    }
}

/// Runs the preprocessor and macro expansion over assembled logical
/// lines, returning the lines actually live for tokenization (skip-
/// depth-blanked lines removed).
pub fn preprocess_lines(
    lines: &[String],
    macros: &mut MacroTable,
    sink: &mut Sink,
) -> Result<Vec<String>, Abandoned> {
    let mut pre = Preprocessor::new();
    let mut out = Vec::with_capacity(lines.len());
    for line in lines {
        if let Some(live) = pre.process_line(line, macros, sink)? {
            out.push(live);
        }
    }
    Ok(out)
}
