//! `.pmwrc` resource-file reader: a `key value` line format, used for
//! site-wide defaults the CLI would otherwise have to repeat on every
//! invocation (font paths, default paper size, default error maximum).
//!
//! Grounded on `main.c`'s rc-file handling (spec.md §6 lists `-norc` as
//! an external CLI concern but leaves the file's own grammar
//! unspecified); the line-reading idiom mirrors `read.c`'s own
//! strip-comment/strip-blank approach rather than pulling in a config
//! crate the teacher never reaches for.

use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceConfig {
    entries: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub line: usize,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}
impl std::error::Error for ConfigError {}

impl ResourceConfig {
    /// Parses `key value` lines, ignoring blank lines and lines whose
    /// first non-blank character is `#`. A key may appear only once;
    /// a later duplicate is a hard error rather than silently
    /// overwriting (mismatched rc files are easier to diagnose than
    /// silently-wrong effective config).
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut entries = BTreeMap::new();
        for (i, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, char::is_whitespace);
            let key = parts.next().unwrap_or("").to_string();
            let value = parts.next().unwrap_or("").trim().to_string();
            if key.is_empty() {
                return Err(ConfigError {
                    line: i + 1,
                    message: "expected a key before any value".into(),
                });
            }
            if entries.insert(key.clone(), value).is_some() {
                return Err(ConfigError {
                    line: i + 1,
                    message: format!("duplicate key \"{key}\""),
                });
            }
        }
        Ok(ResourceConfig { entries })
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn get_or(&self, key: &str, default: &'static str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_key_value_lines_ignoring_comments_and_blanks() {
        let text = "# a comment\n\nfontpath /usr/share/fonts\npapersize a4\n";
        let cfg = ResourceConfig::parse(text).unwrap();
        assert_eq!(cfg.get("fontpath"), Some("/usr/share/fonts"));
        assert_eq!(cfg.get("papersize"), Some("a4"));
        assert_eq!(cfg.len(), 2);
    }

    #[test]
    fn duplicate_key_is_an_error() {
        let text = "papersize a4\npapersize a5\n";
        let err = ResourceConfig::parse(text).unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn missing_lookup_falls_back_to_default() {
        let cfg = ResourceConfig::parse("").unwrap();
        assert_eq!(cfg.get_or("papersize", "a4"), "a4");
    }
}
