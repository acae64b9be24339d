//! `PmwString`: the engine's internal rich-text type, and the escape
//! reader that turns a quoted source string into a sequence of 32-bit
//! code units.
//!
//! Grounded on `string.c`. Each code unit packs `{font_id: 8,
//! codepoint: 24}`; fonts above the normal range carry a small-caps bit
//! (see [`FontId::with_small_caps`]) and a handful of codepoints above
//! `MAX_UNICODE` are reserved for non-glyph placeholders (page number,
//! repeat number, escaped underlay separators).

use crate::tree::BalancedTree;
use std::fmt;

/// Unicode code points above this value are never real text; the
/// engine reuses that range for internal placeholders so strings can
/// still flow through a Unicode-only shaping service (mapped in and
/// back out around the call).
pub const MAX_UNICODE: u32 = 0x10_FFFF;

/// Special non-glyph codepoints, placed just above `MAX_UNICODE`.
pub mod special {
    use super::MAX_UNICODE;
    pub const PAGE_NUMBER: u32 = MAX_UNICODE + 1;
    pub const PAGE_NUMBER_ODD: u32 = MAX_UNICODE + 2;
    pub const PAGE_NUMBER_EVEN: u32 = MAX_UNICODE + 3;
    pub const SKIP_ODD_START: u32 = MAX_UNICODE + 4;
    pub const SKIP_EVEN_START: u32 = MAX_UNICODE + 5;
    pub const REPEAT_BAR_NUMBER: u32 = MAX_UNICODE + 6;
    pub const ESCAPED_HYPHEN: u32 = MAX_UNICODE + 7;
    pub const ESCAPED_EQUALS: u32 = MAX_UNICODE + 8;
    pub const ESCAPED_SHARP: u32 = MAX_UNICODE + 9;
    pub const VERTICAL_BAR: u32 = MAX_UNICODE + 10;
}

const SMALL_CAPS_BIT: u8 = 0x80;

/// The eight-bit font identifier packed into each code unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontId(pub u8);

impl FontId {
    pub const ROMAN: FontId = FontId(0);
    pub const ITALIC: FontId = FontId(1);
    pub const BOLD: FontId = FontId(2);
    pub const BOLD_ITALIC: FontId = FontId(3);
    pub const SYMBOL: FontId = FontId(4);
    pub const MUSIC: FontId = FontId(5);
    pub const MUSIC_FULL_SIZE: FontId = FontId(6);

    #[must_use]
    pub fn extra(n: u8) -> FontId {
        FontId(10 + n)
    }

    #[must_use]
    pub fn with_small_caps(self) -> FontId {
        FontId(self.0 | SMALL_CAPS_BIT)
    }

    #[must_use]
    pub fn is_small_caps(self) -> bool {
        self.0 & SMALL_CAPS_BIT != 0
    }

    #[must_use]
    pub fn base(self) -> FontId {
        FontId(self.0 & !SMALL_CAPS_BIT)
    }
}

/// One code unit: `font << 24 | codepoint`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeUnit(pub u32);

impl CodeUnit {
    #[must_use]
    pub fn new(font: FontId, codepoint: u32) -> Self {
        CodeUnit(((font.0 as u32) << 24) | (codepoint & 0x00FF_FFFF))
    }

    #[must_use]
    pub fn font(self) -> FontId {
        FontId((self.0 >> 24) as u8)
    }

    #[must_use]
    pub fn code(self) -> u32 {
        self.0 & 0x00FF_FFFF
    }
}

/// The rich-text string type itself: an ordered sequence of code units.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PmwString {
    pub units: Vec<CodeUnit>,
}

impl PmwString {
    pub fn new() -> Self {
        Self { units: Vec::new() }
    }

    pub fn push(&mut self, unit: CodeUnit) {
        self.units.push(unit);
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl fmt::Display for PmwString {
    /// Debug-renderer form: plain codepoints rendered as chars where
    /// possible, special codepoints rendered as their escape mnemonic,
    /// giving a stable textual form for debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for unit in &self.units {
            let code = unit.code();
            match code {
                special::PAGE_NUMBER => write!(f, "\\p\\")?,
                special::PAGE_NUMBER_ODD => write!(f, "\\po\\")?,
                special::PAGE_NUMBER_EVEN => write!(f, "\\pe\\")?,
                special::REPEAT_BAR_NUMBER => write!(f, "\\r\\")?,
                special::ESCAPED_HYPHEN => write!(f, "\\-")?,
                special::ESCAPED_EQUALS => write!(f, "\\=")?,
                special::ESCAPED_SHARP => write!(f, "\\#")?,
                special::VERTICAL_BAR => write!(f, "\\|")?,
                _ => {
                    if let Some(c) = char::from_u32(code) {
                        write!(f, "{c}")?;
                    } else {
                        write!(f, "\\x{code:x}\\")?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Errors raised while reading a quoted `PmwString` literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringReadError {
    UnexpectedEof,
    UnrecognizedEscape(String),
    MissingClosingQuote,
}

impl fmt::Display for StringReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringReadError::UnexpectedEof => write!(f, "unexpected end of file while reading string"),
            StringReadError::UnrecognizedEscape(s) => write!(f, "unrecognized escape sequence: {s}"),
            StringReadError::MissingClosingQuote => write!(f, "missing closing quote"),
        }
    }
}
impl std::error::Error for StringReadError {}

/// A small table of two-character Latin accent mnemonics (e.g. `\e'\`
/// -> e-acute). Only a representative subset is carried; entries are
/// keyed by (letter, accent).
fn latin_accent(letter: char, accent: char) -> Option<char> {
    let table: &[((char, char), char)] = &[
        (('a', '\''), 'á'), (('a', '`'), 'à'), (('a', '"'), 'ä'), (('a', '^'), 'â'),
        (('e', '\''), 'é'), (('e', '`'), 'è'), (('e', '"'), 'ë'), (('e', '^'), 'ê'),
        (('i', '\''), 'í'), (('i', '`'), 'ì'), (('i', '"'), 'ï'), (('i', '^'), 'î'),
        (('o', '\''), 'ó'), (('o', '`'), 'ò'), (('o', '"'), 'ö'), (('o', '^'), 'ô'),
        (('u', '\''), 'ú'), (('u', '`'), 'ù'), (('u', '"'), 'ü'), (('u', '^'), 'û'),
        (('n', '~'), 'ñ'), (('c', ','), 'ç'),
        (('A', '\''), 'Á'), (('A', '`'), 'À'), (('A', '"'), 'Ä'),
        (('E', '\''), 'É'), (('E', '`'), 'È'), (('E', '"'), 'Ë'),
        (('N', '~'), 'Ñ'), (('C', ','), 'Ç'),
    ];
    table.iter().find(|((l, a), _)| *l == letter && *a == accent).map(|(_, c)| *c)
}

/// A music-font glyph mnemonic from the `\*code\` table.
fn music_mnemonic(m: char) -> Option<u32> {
    Some(match m {
        'b' => 0xE0A2,  // breve notehead
        's' => 0xE0A3,  // semibreve notehead
        'm' => 0xE0A4,  // minim notehead
        'c' | 'Q' | 'q' => 0xE0A5, // crotchet/quaver noteheads (filled)
        '#' => 0xE262,  // sharp
        '$' => 0xE260,  // flat
        '%' => 0xE261,  // natural
        '>' | '<' | 'u' | 'd' | 'l' | 'r' => 0xE1FE, // move-direction arrows share a base glyph
        _ => return None,
    })
}

/// Parses the body of a quoted `PmwString`, given the characters
/// *between* the opening and closing `"` (the caller is responsible for
/// quote detection — that belongs to the lexer). Implements the escape
/// table below.
pub fn read_pmw_string(body: &str) -> Result<PmwString, StringReadError> {
    let mut out = PmwString::new();
    let mut font = FontId::ROMAN;
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                let escape = read_escape(&mut chars, &mut font)?;
                if let Some(code) = escape {
                    out.push(CodeUnit::new(font, code));
                }
            }
            _ => out.push(CodeUnit::new(font, c as u32)),
        }
    }
    Ok(out)
}

fn read_escape(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    font: &mut FontId,
) -> Result<Option<u32>, StringReadError> {
    // Literal single-character escapes with no trailing backslash.
    match chars.peek().copied() {
        Some('"') => {
            chars.next();
            return Ok(Some('"' as u32));
        }
        Some('|') => {
            chars.next();
            return Ok(Some(special::VERTICAL_BAR));
        }
        Some('\\') => {
            chars.next();
            return Ok(Some('\\' as u32));
        }
        Some('-') => {
            chars.next();
            return Ok(Some(special::ESCAPED_HYPHEN));
        }
        Some('=') => {
            chars.next();
            return Ok(Some(special::ESCAPED_EQUALS));
        }
        Some('#') => {
            chars.next();
            return Ok(Some(special::ESCAPED_SHARP));
        }
        Some('@') => {
            chars.next();
            // In-string comment: consume through the next backslash.
            for c in chars.by_ref() {
                if c == '\\' {
                    break;
                }
            }
            return Ok(None);
        }
        _ => {}
    }

    // Collect the escape keyword up to the next '\' or '*' boundary we
    // recognise explicitly below.
    let mut keyword = String::new();
    while let Some(&c) = chars.peek() {
        if c == '\\' || c == '*' {
            break;
        }
        keyword.push(c);
        chars.next();
    }

    match keyword.as_str() {
        "rm" => { chars.next(); *font = FontId::ROMAN; Ok(None) }
        "it" => { chars.next(); *font = FontId::ITALIC; Ok(None) }
        "bf" => { chars.next(); *font = FontId::BOLD; Ok(None) }
        "bi" => { chars.next(); *font = FontId::BOLD_ITALIC; Ok(None) }
        "sy" => { chars.next(); *font = FontId::SYMBOL; Ok(None) }
        "mu" => { chars.next(); *font = FontId::MUSIC; Ok(None) }
        "sc" => { chars.next(); *font = font.with_small_caps(); Ok(None) }
        "p" => { chars.next(); Ok(Some(special::PAGE_NUMBER)) }
        "po" => { chars.next(); Ok(Some(special::PAGE_NUMBER_ODD)) }
        "pe" => { chars.next(); Ok(Some(special::PAGE_NUMBER_EVEN)) }
        "so" => { chars.next(); Ok(Some(special::SKIP_ODD_START)) }
        "se" => { chars.next(); Ok(Some(special::SKIP_EVEN_START)) }
        "r" => { chars.next(); Ok(Some(special::REPEAT_BAR_NUMBER)) }
        "r2" => { chars.next(); Ok(Some(special::REPEAT_BAR_NUMBER)) }
        "c]" => { Ok(Some(0x00A9)) }
        "C]" => { Ok(Some(0x00A9)) }
        "" if chars.peek() == Some(&'*') => {
            chars.next(); // consume '*'
            read_music_glyphs(chars, FontId::MUSIC)
        }
        "s" => {
            chars.next();
            read_symbol_or_accent(chars)
        }
        "x" | "xx1" | "xx2" | "xx3" | "xx4" | "xx5" | "xx6" | "xx7" | "xx8" | "xx9" | "xx10"
        | "xx11" | "xx12" => {
            if keyword == "x" {
                read_hex_or_unicode(chars)
            } else {
                chars.next();
                let n: u8 = keyword[2..].parse().unwrap_or(1);
                *font = FontId::extra(n);
                Ok(None)
            }
        }
        other if other.len() == 1 && other.chars().next().unwrap().is_ascii_alphabetic() => {
            // Single-letter escape: either a Latin accented-letter
            // sequence (`\e'\`) or an "\s"-with-accent artifact.
            let letter = other.chars().next().unwrap();
            if let Some(&accent) = chars.peek() {
                if accent != '\\' {
                    chars.next();
                    if chars.peek() == Some(&'\\') {
                        chars.next();
                    }
                    if let Some(resolved) = latin_accent(letter, accent) {
                        return Ok(Some(resolved as u32));
                    }
                    return Ok(Some(letter as u32));
                }
            }
            chars.next();
            Ok(Some(letter as u32))
        }
        digits if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) => {
            if chars.peek() == Some(&'\\') {
                chars.next();
            }
            digits
                .parse::<u32>()
                .map(Some)
                .map_err(|_| StringReadError::UnrecognizedEscape(digits.to_string()))
        }
        _ => {
            if chars.peek() == Some(&'\\') {
                chars.next();
            }
            Err(StringReadError::UnrecognizedEscape(keyword))
        }
    }
}

fn read_hex_or_unicode(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Result<Option<u32>, StringReadError> {
    if chars.peek() == Some(&'x') {
        chars.next();
        let mut digits = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_ascii_hexdigit() {
                digits.push(c);
                chars.next();
            } else {
                break;
            }
        }
        if chars.peek() == Some(&'\\') {
            chars.next();
        }
        u32::from_str_radix(&digits, 16)
            .map(Some)
            .map_err(|_| StringReadError::UnrecognizedEscape(digits))
    } else {
        let mut digits = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                chars.next();
            } else {
                break;
            }
        }
        if chars.peek() == Some(&'\\') {
            chars.next();
        }
        digits
            .parse::<u32>()
            .map(Some)
            .map_err(|_| StringReadError::UnrecognizedEscape(digits))
    }
}

fn read_symbol_or_accent(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
) -> Result<Option<u32>, StringReadError> {
    // "\s NNN\" = one Symbol-font character by decimal code.
    if chars.peek() == Some(&' ') {
        chars.next();
        let mut digits = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                chars.next();
            } else {
                break;
            }
        }
        if chars.peek() == Some(&'\\') {
            chars.next();
        }
        return digits
            .parse::<u32>()
            .map(Some)
            .map_err(|_| StringReadError::UnrecognizedEscape(digits));
    }
    // Otherwise this is the Open-Question case: "\s" followed directly
    // by an accent-starter or letter is treated as an
    // accented-letter-with-s sequence. Preserved as-is.
    if chars.peek() == Some(&'\\') {
        chars.next();
    }
    Ok(Some('s' as u32))
}

fn read_music_glyphs(
    chars: &mut std::iter::Peekable<std::str::Chars<'_>>,
    font: FontId,
) -> Result<Option<u32>, StringReadError> {
    let mut first = None;
    loop {
        let mnemonic = chars.next().ok_or(StringReadError::UnexpectedEof)?;
        let mut code = if mnemonic.is_ascii_digit() {
            let mut digits = String::from(mnemonic);
            while let Some(&c) = chars.peek() {
                if c.is_ascii_digit() {
                    digits.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            digits.parse::<u32>().unwrap_or(0)
        } else if mnemonic == 'x' {
            let mut digits = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_ascii_hexdigit() {
                    digits.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            u32::from_str_radix(&digits, 16).unwrap_or(0)
        } else {
            music_mnemonic(mnemonic)
                .ok_or_else(|| StringReadError::UnrecognizedEscape(mnemonic.to_string()))?
        };
        if chars.peek() == Some(&'.') {
            chars.next();
            code += 1; // dotted variant: adjacent codepoint in the music font
        }
        if first.is_none() {
            first = Some((font, code));
        }
        match chars.peek() {
            Some('*') => {
                chars.next();
            }
            Some('\\') => {
                chars.next();
                break;
            }
            _ => return Err(StringReadError::MissingClosingQuote),
        }
    }
    Ok(first.map(|(_, c)| c))
}

/// Placement/alignment options trailing a stave string's closing
/// quote, e.g. `"rit."/a/c`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringOptions {
    pub above: bool,
    pub above_override: bool,
    pub below: bool,
    pub below_override: bool,
    pub centre: bool,
    pub centre_between_bars: bool,
    pub end: bool,
    pub track_stave: bool,
    pub at_barline: bool,
    pub boxed: bool,
    pub ring: bool,
    pub rotate_degrees: Option<i32>,
    pub size: Option<u32>,
    pub halfway: bool,
    pub follow_on: bool,
    pub underlay: bool,
    pub overlay: bool,
    pub x_offset: Option<i32>,
    pub y_offset: Option<i32>,
}

/// Parses the `/`-separated trailing options of a stave string.
pub fn parse_string_options(tail: &str) -> StringOptions {
    let mut opts = StringOptions::default();
    for part in tail.split('/').filter(|p| !p.is_empty()) {
        match part {
            "a" => opts.above = true,
            "ao" => { opts.above = true; opts.above_override = true; }
            "b" => opts.below = true,
            "bu" => { opts.below = true; opts.below_override = true; }
            "c" => opts.centre = true,
            "cb" => opts.centre_between_bars = true,
            "e" => opts.end = true,
            "ts" => opts.track_stave = true,
            "bar" => opts.at_barline = true,
            "box" | "rbox" => opts.boxed = true,
            "ring" => opts.ring = true,
            "h" => opts.halfway = true,
            "F" => opts.follow_on = true,
            "ul" => opts.underlay = true,
            "ol" => opts.overlay = true,
            "fb" | "fbu" => opts.underlay = true,
            p if p.starts_with("rot") => {
                opts.rotate_degrees = p[3..].parse().ok();
            }
            p if p.starts_with('s') && p[1..].parse::<u32>().is_ok() => {
                opts.size = p[1..].parse().ok();
            }
            p if p.starts_with('x') => {
                opts.x_offset = p[1..].parse().ok();
            }
            p if p.starts_with('y') => {
                opts.y_offset = p[1..].parse().ok();
            }
            _ => {}
        }
    }
    // `/F` combined with boxed/ring text is a documented conflict: warn
    // and drop follow-on. (Warning emission is the caller's job, since
    // it needs a diagnostic sink; this function only encodes the
    // resulting precedence.)
    if opts.follow_on && (opts.boxed || opts.ring) {
        opts.follow_on = false;
    }
    opts
}


/// Deferred end-of-read reporting for codepoints that could not be
/// mapped by the active font (missing glyph, or out of the font's
/// supported range). Each unique codepoint is recorded once; the
/// warning is emitted at end of reading rather than per-occurrence —
/// matches the reader's deferred-warning behaviour for missing glyphs.
#[derive(Default)]
pub struct MissingGlyphs {
    seen: std::collections::BTreeSet<(u8, u32)>,
}

impl MissingGlyphs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a missing codepoint; returns `true` the first time this
    /// (font, codepoint) pair is seen (callers should only warn then).
    pub fn record(&mut self, font: FontId, codepoint: u32) -> bool {
        self.seen.insert((font.0, codepoint))
    }

    pub fn iter(&self) -> impl Iterator<Item = (FontId, u32)> + '_ {
        self.seen.iter().map(|&(f, c)| (FontId(f), c))
    }
}

/// The font "high tree" lookup: maps very-high Unicode code points into
/// a font-private encoding slot. Backed by
/// [`BalancedTree`] keyed on a decimal string of the source codepoint,
/// matching the original's use of its generic tree for this table.
#[derive(Default)]
pub struct HighCharTable {
    tree: BalancedTree<u32>,
}

impl HighCharTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, source_codepoint: u32, private_slot: u32) {
        self.tree
            .insert_or_replace(source_codepoint.to_string(), private_slot);
    }

    pub fn lookup(&self, source_codepoint: u32) -> Option<u32> {
        self.tree.get(&source_codepoint.to_string()).copied()
    }
}
