//! Key signatures, including custom `makekey`-defined rows.

use crate::diag::{Abandoned, Severity, Sink, SourceLocation};
use crate::diag_catalog::format_message;

/// The seven standard letter names, used for custom-key row ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

pub const LETTERS: [Letter; 7] = [
    Letter::C,
    Letter::D,
    Letter::E,
    Letter::F,
    Letter::G,
    Letter::A,
    Letter::B,
];

/// One key signature: either a standard circle-of-fifths signature
/// (signed accidental count, negative = flats) or a custom row of
/// per-letter accidentals registered via `makekey Xn`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySignature {
    Standard { sharps: i8 },
    Custom { name: String, accidentals: [i8; 7] },
    NoKey,
}

impl KeySignature {
    #[must_use]
    pub fn standard(sharps: i8) -> Result<Self, String> {
        if !(-7..=7).contains(&sharps) {
            return Err("unsupported key signature".into());
        }
        Ok(KeySignature::Standard { sharps })
    }

    /// Parses a custom key name `X1`..`X{max}`, per directive 44's
    /// bound, validating against the registry's configured maximum.
    pub fn validate_custom_name(name: &str, max: u32) -> Result<u32, String> {
        let n = name
            .strip_prefix('X')
            .and_then(|rest| rest.parse::<u32>().ok())
            .ok_or_else(|| format!("custom key name X1 or X2 or ... X{max} expected"))?;
        if n == 0 || n > max {
            return Err(format!("custom key name X1 or X2 or ... X{max} expected"));
        }
        Ok(n)
    }

    /// Parses the `key`/`printkey` directive body: a letter `A`..`G`
    /// with an optional `#`/`$` accidental and an optional trailing
    /// `m` (minor), `N` for no key, or a custom `X<n>` name. Unsupported
    /// enharmonic spellings (e.g. `B#`, which has no standard major key)
    /// are rejected with "unsupported key signature" (spec.md §8 seed
    /// scenario 6), leaving the caller to fall back to C major.
    pub fn parse_name(text: &str) -> Result<Self, String> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("N") {
            return Ok(KeySignature::NoKey);
        }
        if text.starts_with('X') || text.starts_with('x') {
            return Ok(KeySignature::Custom {
                name: text.to_ascii_uppercase(),
                accidentals: [0; 7],
            });
        }
        let mut chars = text.chars();
        let letter = chars.next().ok_or_else(|| "unsupported key signature".to_string())?;
        let upper_letter = letter.to_ascii_uppercase();
        if !('A'..='G').contains(&upper_letter) {
            return Err("unsupported key signature".into());
        }
        let rest: String = chars.collect();
        let (accidental, minor) = match rest.as_str() {
            "" => (0i8, false),
            "#" => (7, false),
            "$" => (-7, false),
            "m" => (0, true),
            "#m" => (7, true),
            "$m" => (-7, true),
            _ => return Err("unsupported key signature".into()),
        };
        let base = if minor {
            base_minor_sharps(upper_letter)
        } else {
            base_major_sharps(upper_letter)
        };
        let sharps = base + accidental;
        Self::standard(sharps)
    }
}

/// Sharps count for the major key on each natural letter, before any
/// `#`/`$` accidental is applied (e.g. `F` major is one flat, `B`
/// major is five sharps).
fn base_major_sharps(letter: char) -> i8 {
    match letter {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => -1,
        'G' => 1,
        'A' => 3,
        'B' => 5,
        _ => unreachable!("validated to A..G by the caller"),
    }
}

/// Sharps count for the relative-minor key on each natural letter
/// (e.g. `A` minor shares C major's zero sharps, `E` minor shares G
/// major's one sharp).
fn base_minor_sharps(letter: char) -> i8 {
    match letter {
        'A' => 0,
        'B' => 2,
        'C' => -3,
        'D' => -1,
        'E' => 1,
        'F' => -4,
        'G' => -2,
        _ => unreachable!("validated to A..G by the caller"),
    }
}

/// Signals that a key signature cannot be transposed by a quarter-tone
/// without an explicit `KeyTranspose` instruction (catalog entry 74).
pub fn require_key_transpose_for_quarter_tone(
    has_keytranspose: bool,
    sink: &mut Sink,
    location: SourceLocation,
) -> Result<(), Abandoned> {
    if !has_keytranspose {
        let msg = format_message(74, &[]);
        sink.report(74, Severity::Fatal, msg, location)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_key_rejects_out_of_range_sharps() {
        assert!(KeySignature::standard(8).is_err());
        assert!(KeySignature::standard(-7).is_ok());
    }

    #[test]
    fn custom_key_name_parses_and_bounds_checks() {
        assert_eq!(KeySignature::validate_custom_name("X3", 8).unwrap(), 3);
        assert!(KeySignature::validate_custom_name("X9", 8).is_err());
        assert!(KeySignature::validate_custom_name("Y1", 8).is_err());
    }

    #[test]
    fn parse_name_resolves_g_major_to_one_sharp() {
        assert_eq!(KeySignature::parse_name("G").unwrap(), KeySignature::Standard { sharps: 1 });
    }

    #[test]
    fn parse_name_resolves_flat_and_minor_keys() {
        assert_eq!(KeySignature::parse_name("F").unwrap(), KeySignature::Standard { sharps: -1 });
        assert_eq!(KeySignature::parse_name("Em").unwrap(), KeySignature::Standard { sharps: 1 });
        assert_eq!(KeySignature::parse_name("C#").unwrap(), KeySignature::Standard { sharps: 7 });
    }

    #[test]
    fn parse_name_accepts_no_key_and_custom() {
        assert_eq!(KeySignature::parse_name("N").unwrap(), KeySignature::NoKey);
        assert!(matches!(KeySignature::parse_name("X1").unwrap(), KeySignature::Custom { .. }));
    }

    #[test]
    fn parse_name_rejects_unsupported_enharmonic_spelling() {
        let err = KeySignature::parse_name("B#").unwrap_err();
        assert_eq!(err, "unsupported key signature");
    }
}
