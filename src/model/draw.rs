//! Draw-subsystem calls embedded in the IR: a minimal interpreted
//! mini-language for custom engraving marks, named variables, and
//! drawing function definitions looked up via `tree::BalancedTree`.

use crate::strfmt::Fixed;

#[derive(Debug, Clone)]
pub enum DrawValue {
    Number(Fixed),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct DrawCall {
    pub function_name: String,
    pub args: Vec<DrawValue>,
}

/// Raised when a draw call references an undefined function or
/// variable name (catalog entry 17) or attempts to draw a
/// zero-or-negative-length slur/line (catalog entry 144).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    UndefinedName(String),
    NonPositiveLength,
}

impl std::fmt::Display for DrawError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawError::UndefinedName(name) => {
                write!(f, "the name \"{name}\" has not been defined")
            }
            DrawError::NonPositiveLength => {
                write!(f, "attempt to draw slur or line of zero or negative length")
            }
        }
    }
}
impl std::error::Error for DrawError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_name_error_formats_with_catalog_text() {
        let err = DrawError::UndefinedName("foo".into());
        assert_eq!(err.to_string(), "the name \"foo\" has not been defined");
    }
}
