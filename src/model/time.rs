//! Time signatures: packed `{multiplier:16, numerator:8, denominator:8}`
//! encoding, and the musical-length unit conversions built on it.

/// `len_crotchet` and its exact multiples/fractions, fixed so that bar
/// arithmetic stays integral for every supported denominator up to 64.
pub const LEN_CROTCHET: i32 = 384;
pub const LEN_SEMIBREVE: i32 = LEN_CROTCHET * 4;
pub const LEN_MINIM: i32 = LEN_CROTCHET * 2;
pub const LEN_QUAVER: i32 = LEN_CROTCHET / 2;
pub const LEN_SEMIQUAVER: i32 = LEN_CROTCHET / 4;
pub const LEN_DEMISEMIQUAVER: i32 = LEN_CROTCHET / 8;
pub const LEN_HEMIDEMISEMIQUAVER: i32 = LEN_CROTCHET / 16;
pub const LEN_BREVE: i32 = LEN_SEMIBREVE * 2;

/// Musical duration in abstract length units (`LEN_CROTCHET`-relative).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct MusicLen(pub i32);

impl MusicLen {
    #[must_use]
    pub fn from_denominator(denominator: u8) -> Option<Self> {
        if denominator == 0 || !denominator.is_power_of_two() {
            return None;
        }
        let units = LEN_SEMIBREVE / denominator as i32;
        Some(MusicLen(units))
    }
}

/// A time signature, stored as the packed bitfield encoding described
/// in spec.md §6: multiplier (for irrational/complex signatures such as
/// `C` or additive ones), numerator, denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSignature {
    pub multiplier: u16,
    pub numerator: u8,
    pub denominator: u8,
}

impl TimeSignature {
    #[must_use]
    pub fn simple(numerator: u8, denominator: u8) -> Self {
        TimeSignature {
            multiplier: 1,
            numerator,
            denominator,
        }
    }

    /// Common time (`C`): 4/4 with multiplier 1, rendered specially by
    /// the debug/printing layer but arithmetically identical to 4/4.
    #[must_use]
    pub fn common() -> Self {
        Self::simple(4, 4)
    }

    /// Alla breve (`A`, "cut time"): 2/2.
    #[must_use]
    pub fn alla_breve() -> Self {
        Self::simple(2, 2)
    }

    #[must_use]
    pub fn pack(self) -> u32 {
        ((self.multiplier as u32) << 16) | ((self.numerator as u32) << 8) | self.denominator as u32
    }

    #[must_use]
    pub fn unpack(packed: u32) -> Self {
        TimeSignature {
            multiplier: (packed >> 16) as u16,
            numerator: ((packed >> 8) & 0xff) as u8,
            denominator: (packed & 0xff) as u8,
        }
    }

    /// Total bar length in `MusicLen` units.
    #[must_use]
    pub fn bar_length(self) -> Option<MusicLen> {
        let unit = MusicLen::from_denominator(self.denominator)?;
        Some(MusicLen(unit.0 * self.numerator as i32 * self.multiplier as i32))
    }

    /// Parses the `time`/`printtime` directive body: `[mul*]num/den`,
    /// or the letter forms `C` (common time) and `A` (alla breve), per
    /// spec.md §4.2 and §6's packed-encoding description. Returns the
    /// signature plus whether it came from a letter form (relevant to
    /// [`Self::halve`]'s "cannot halve C or A" rule).
    pub fn parse(text: &str) -> Result<(Self, bool), String> {
        let text = text.trim();
        if text.eq_ignore_ascii_case("C") {
            return Ok((Self::common(), true));
        }
        if text.eq_ignore_ascii_case("A") {
            return Ok((Self::alla_breve(), true));
        }
        let (multiplier, fraction) = match text.split_once('*') {
            Some((mul, rest)) => (
                mul.trim()
                    .parse::<u16>()
                    .map_err(|_| "invalid time signature".to_string())?,
                rest,
            ),
            None => (1, text),
        };
        let (num, den) = fraction
            .split_once('/')
            .ok_or_else(|| "invalid time signature".to_string())?;
        let numerator = num.trim().parse::<u8>().map_err(|_| "invalid time signature".to_string())?;
        let denominator = den.trim().parse::<u8>().map_err(|_| "invalid time signature".to_string())?;
        let ts = TimeSignature {
            multiplier,
            numerator,
            denominator,
        };
        if ts.bar_length().is_none() {
            return Err("invalid time signature".into());
        }
        Ok((ts, false))
    }

    /// Halving a `C`/`A` time signature is a hard error (catalog entry
    /// 41): those letter forms have no well-defined half.
    pub fn halve(self, is_letter_form: bool) -> Result<Self, String> {
        if is_letter_form {
            return Err("cannot halve C or A time signature".into());
        }
        if self.denominator >= 64 {
            return Err("invalid time signature".into());
        }
        Ok(TimeSignature {
            multiplier: self.multiplier,
            numerator: self.numerator,
            denominator: self.denominator * 2,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_length_divides_evenly_for_all_denominators() {
        for d in [1u8, 2, 4, 8, 16, 32, 64] {
            let ts = TimeSignature::simple(3, d);
            assert!(ts.bar_length().is_some(), "denominator {d} failed");
        }
    }

    #[test]
    fn pack_unpack_roundtrips() {
        let ts = TimeSignature::simple(7, 8);
        assert_eq!(TimeSignature::unpack(ts.pack()), ts);
    }

    #[test]
    fn halving_common_time_is_an_error() {
        assert!(TimeSignature::common().halve(true).is_err());
        assert!(TimeSignature::simple(3, 4).halve(false).is_ok());
    }

    #[test]
    fn parse_reads_plain_fraction() {
        let (ts, is_letter) = TimeSignature::parse("3/4").unwrap();
        assert_eq!(ts, TimeSignature::simple(3, 4));
        assert!(!is_letter);
    }

    #[test]
    fn parse_reads_multiplier_prefix() {
        let (ts, _) = TimeSignature::parse("2*3/8").unwrap();
        assert_eq!(ts, TimeSignature { multiplier: 2, numerator: 3, denominator: 8 });
    }

    #[test]
    fn parse_reads_letter_forms() {
        let (common, is_letter) = TimeSignature::parse("C").unwrap();
        assert_eq!(common, TimeSignature::common());
        assert!(is_letter);
        let (cut, _) = TimeSignature::parse("A").unwrap();
        assert_eq!(cut, TimeSignature::alla_breve());
    }

    #[test]
    fn parse_rejects_a_non_power_of_two_denominator() {
        assert!(TimeSignature::parse("1*1/64").unwrap().0.bar_length().is_some());
        assert!(TimeSignature::parse("3/7").is_err());
    }
}
