//! Beam markers: `[beambreak N]`, `[beamacc]`, `[beamrit]`,
//! `[beammove D]`, `[beamslope D]`. Per spec.md §4.3, actual beaming
//! geometry is out of scope — only the markers are recorded, for a
//! later beaming module to consume.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeamMarker {
    Break { strength: u8 },
    Accelerando,
    Ritardando,
    Move { offset: i32 },
    Slope { offset: i32 },
}

/// Parses a bracketed beam directive's keyword and argument text.
/// Catalog entry 88 ("mis-placed beam break") is the caller's job: a
/// break marker is only valid immediately after a note, which this
/// function has no visibility into.
pub fn parse_beam_marker(keyword: &str, args: &str) -> Result<Option<BeamMarker>, String> {
    match keyword {
        "beambreak" => {
            let strength: u8 = args.trim().parse().unwrap_or(1);
            Ok(Some(BeamMarker::Break { strength }))
        }
        "beamacc" => Ok(Some(BeamMarker::Accelerando)),
        "beamrit" => Ok(Some(BeamMarker::Ritardando)),
        "beammove" => {
            let offset: i32 = args
                .trim()
                .parse()
                .map_err(|_| "beammove expects a numeric offset".to_string())?;
            Ok(Some(BeamMarker::Move { offset }))
        }
        "beamslope" => {
            let offset: i32 = args
                .trim()
                .parse()
                .map_err(|_| "beamslope expects a numeric offset".to_string())?;
            Ok(Some(BeamMarker::Slope { offset }))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn beambreak_defaults_strength_to_one() {
        assert_eq!(
            parse_beam_marker("beambreak", "").unwrap(),
            Some(BeamMarker::Break { strength: 1 })
        );
    }

    #[test]
    fn beammove_parses_numeric_offset() {
        assert_eq!(
            parse_beam_marker("beammove", "-200").unwrap(),
            Some(BeamMarker::Move { offset: -200 })
        );
    }

    #[test]
    fn unrelated_keyword_returns_none() {
        assert_eq!(parse_beam_marker("slur", "").unwrap(), None);
    }

    #[test]
    fn beamslope_rejects_non_numeric_argument() {
        assert!(parse_beam_marker("beamslope", "fast").is_err());
    }
}
