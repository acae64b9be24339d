//! A single stave within a movement: its bars, key/time history, and
//! continuation state.

use crate::model::bar::Bar;
use crate::model::continuation::ContState;
use crate::model::key::KeySignature;
use crate::model::time::TimeSignature;

pub const MAX_STAVE: u32 = 63;

#[derive(Debug)]
pub struct Stave {
    pub number: u32,
    pub bars: Vec<Bar>,
    pub current_key: KeySignature,
    pub current_time: TimeSignature,
    pub cont: ContState,
}

impl Stave {
    pub fn new(number: u32) -> Result<Self, String> {
        if number > MAX_STAVE {
            return Err(format!(
                "stave number {number} is too large - maximum is {MAX_STAVE}"
            ));
        }
        Ok(Stave {
            number,
            bars: Vec::new(),
            current_key: KeySignature::Standard { sharps: 0 },
            current_time: TimeSignature::common(),
            cont: ContState::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stave_number_over_maximum_is_rejected() {
        assert!(Stave::new(64).is_err());
        assert!(Stave::new(63).is_ok());
    }
}
