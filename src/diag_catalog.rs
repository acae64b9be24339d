//! The numbered diagnostic catalog. A representative, extensible subset
//! of `error.c`'s `error_data` table, covering every diagnostic that
//! this engine's modules and seed scenarios actually raise. Numbers
//! match the classic PMW error numbers so a reader familiar with PMW
//! output recognises them; the catalog is not a closed enum since new
//! directives can always need a new message.

use crate::diag::Severity;

/// One catalog entry: its numeric id, severity, and a `format!`-style
/// template. Arguments are supplied positionally by callers via
/// [`format_message`].
pub struct CatalogEntry {
    pub number: u32,
    pub severity: Severity,
    pub template: &'static str,
}

macro_rules! catalog {
    ($($num:expr => $sev:ident, $text:expr;)*) => {
        pub static CATALOG: &[CatalogEntry] = &[
            $(CatalogEntry { number: $num, severity: Severity::$sev, template: $text },)*
        ];
    };
}

catalog! {
    2  => Major,   "binary zero encountered in input: ignored";
    6  => Major,   "pre-processing directive expected";
    8  => Major,   "{0} expected";
    12 => Major,   "unknown pre-processing directive \"{0}\"";
    14 => Warning, "{0}";
    16 => Major,   "the name \"{0}\" is already defined";
    17 => Major,   "the name \"{0}\" has not been defined";
    18 => Major,   "macro name or string repetition expected after \"&\"";
    21 => Major,   "a &* replication must have only one argument - others ignored";
    22 => Fatal,   "macro calls nested too deep (max {0})";
    24 => Major,   "unknown header directive \"{0}\"";
    33 => Fatal,   "included files too deeply nested (max depth is {0})";
    34 => Major,   "numbers out of order";
    39 => Warning, "\"{0}\" is obsolete and has no effect";
    41 => Fatal,   "cannot halve C or A time signature";
    42 => Fatal,   "invalid time signature";
    43 => Major,   "unsupported key signature";
    44 => Major,   "custom key name X1 or X2 or ... X{0} expected";
    45 => Major,   "invalid printkey specification \"{0}\"";
    46 => Major,   "letter change value {0} is too large for transpose value {1}";
    48 => Major,   "incorrect MIDI {0} number {1} (must be between 1 and {2} inclusive)";
    49 => Major,   "unrecognized MIDI {0} name: \"{1}\"";
    64 => Fatal,   "{0}transposition value ({1}) is too large (max {2})";
    65 => Fatal,   "unexpected end of file while reading string";
    69 => Major,   "unrecognized escape sequence";
    74 => Fatal,   "cannot transpose key signature by quarter tone without KeyTranspose instruction";
    84 => Fatal,   "stave number {0} is too large - maximum is {1}";
    85 => Fatal,   "stave {0} is supplied twice";
    86 => Major,   "unknown stave directive \"{0}\"";
    88 => Major,   "mis-placed beam break '{0}' (does not immediately follow a note)";
    89 => Major,   "unexpected character '{0}'";
    90 => Major,   "mis-matched curly brackets";
    91 => Major,   "can't have both staccato and staccatissimo";
    92 => Major,   "error in note expression or ornament";
    93 => Major,   "follow-on string not permitted here";
    94 => Warning, "hyphen string setting on non-underlay/overlay string ignored";
    95 => Warning, "follow-on ignored for {0}";
    96 => Warning, "/h and /rc or /lc specified - the latter ignored";
    100 => Major,  "wiggly {0} are not supported";
    101 => Major,  "incorrect bar length: too {0} by {1}";
    110 => Fatal,  "too many notes in a chord ({0} maximum)";
    111 => Major,  "accidentals for printing above or below must be on the first note of a chord";
    113 => Major,  "a chord may not contain a rest";
    115 => Fatal,  "cannot handle notes longer than a breve or shorter than a hemidemisemiquaver";
    123 => Major,  "the notes of a chord must all be the same length";
    128 => Warning, "unexpected bar length of {0}\n   On an earlier stave this bar's length is {1}";
    144 => Major,  "attempt to draw slur or line of zero or negative length";
    163 => Major,  "slur/line identifier must be an ASCII alphanumeric character";
    164 => Major,  "octave {0} is out of PMW's range (-3 to 4)";
    170 => Warning, "[stavelines <{0}>] is deprecated; use [stave m/{0}] instead";
    171 => Minor,  "unexpected end of slur or line - ignored";
    173 => Fatal,  "note pitch is not within supported range";
    189 => Major,  "misplaced [tremolo]: {0}";
    190 => Major,  "invalid printtime specification \"{0}\"";
    191 => Minor,  "unrecognized layout opcode \"{0}\"";
    192 => Minor,  "invalid heading/footing string";
}

/// Renders a template with `{n}`-style positional arguments, standing
/// in for `%s`/`%d`-style `vfprintf` substitution.
#[must_use]
pub fn format_message(number: u32, args: &[String]) -> String {
    let template = CATALOG
        .iter()
        .find(|e| e.number == number)
        .map(|e| e.template)
        .unwrap_or("unknown diagnostic");
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '{' {
            let mut digits = String::new();
            while let Some(&d) = chars.peek() {
                if d.is_ascii_digit() {
                    digits.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            if chars.peek() == Some(&'}') {
                chars.next();
                if let Ok(idx) = digits.parse::<usize>() {
                    if let Some(arg) = args.get(idx) {
                        out.push_str(arg);
                        continue;
                    }
                }
            }
            out.push('{');
            out.push_str(&digits);
        } else {
            out.push(c);
        }
    }
    out
}

#[must_use]
pub fn severity_of(number: u32) -> Severity {
    CATALOG
        .iter()
        .find(|e| e.number == number)
        .map(|e| e.severity)
        .unwrap_or(Severity::Major)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_positional_arguments() {
        let msg = format_message(84, &["5".into(), "63".into()]);
        assert_eq!(msg, "stave number 5 is too large - maximum is 63");
    }

    #[test]
    fn unknown_number_has_placeholder_text() {
        let msg = format_message(999_999, &[]);
        assert_eq!(msg, "unknown diagnostic");
    }

    #[test]
    fn severity_lookup_matches_catalog() {
        assert_eq!(severity_of(43), Severity::Major);
        assert_eq!(severity_of(22), Severity::Fatal);
        assert_eq!(severity_of(39), Severity::Warning);
    }
}
