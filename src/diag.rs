//! Numbered diagnostics with severity, grounded on `error.c`'s
//! `error_data` table and `error_basic()` dispatch.
//!
//! Four severities (warning/minor/major/fatal), warning suppression
//! after a fixed count, an error-count threshold that escalates further
//! errors to fatal, and a drawing-subsystem unwind path that lets the
//! interpreter print a trace before a fatal error actually stops the run.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Minor,
    Major,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Warning => "warning",
            Severity::Minor => "minor error",
            Severity::Major => "error",
            Severity::Fatal => "fatal error",
        };
        write!(f, "{s}")
    }
}

/// Where a diagnostic was raised: character position during reading, or
/// bar/stave/movement coordinates once layout has started.
#[derive(Debug, Clone, Default)]
pub struct SourceLocation {
    pub line: Option<usize>,
    pub column: Option<usize>,
    pub bar: Option<u32>,
    pub stave: Option<u32>,
    pub movement: Option<u32>,
}

/// A single numbered diagnostic message. The text carries `{0}`-style
/// placeholders filled from `args` rather than C's `vfprintf`.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub number: u32,
    pub severity: Severity,
    pub message: String,
    pub location: SourceLocation,
    /// Set when this diagnostic came from the drawing subsystem: its
    /// severity is downgraded from fatal to major so the drawing
    /// interpreter can unwind and print a stack trace before the
    /// process actually aborts.
    pub draw_unwind: bool,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "** {} [E{:03}]: {}", self.severity, self.number, self.message)?;
        if let (Some(line), _) = (self.location.line, self.location.column) {
            write!(f, " (line {line})")?;
        } else if let Some(bar) = self.location.bar {
            write!(f, " (bar {bar}")?;
            if let Some(stave) = self.location.stave {
                write!(f, " stave {stave}")?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Outcome of abandoning processing: carries the diagnostic that tipped
/// the sink over into `Fatal`.
#[derive(Debug, Clone)]
pub struct Abandoned(pub Diagnostic);

impl fmt::Display for Abandoned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PMW processing abandoned: {}", self.0)
    }
}
impl std::error::Error for Abandoned {}

const DEFAULT_WARNING_LIMIT: u32 = 40;
const DEFAULT_ERROR_MAXIMUM: u32 = 50;

/// Collects diagnostics, tracks counts, and decides when processing
/// must stop. One `Sink` lives for the whole run, owned by
/// [`crate::context::ParserContext`].
pub struct Sink {
    diagnostics: Vec<Diagnostic>,
    warning_count: u32,
    error_count: u32,
    warning_limit: u32,
    error_maximum: u32,
    suppress_warnings: bool,
    suppress_output: bool,
}

impl Default for Sink {
    fn default() -> Self {
        Self {
            diagnostics: Vec::new(),
            warning_count: 0,
            error_count: 0,
            warning_limit: DEFAULT_WARNING_LIMIT,
            error_maximum: DEFAULT_ERROR_MAXIMUM,
            suppress_warnings: false,
            suppress_output: false,
        }
    }
}

impl Sink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches the `-em` command-line option: raise or lower the
    /// error-count threshold that escalates subsequent majors to fatal.
    pub fn set_error_maximum(&mut self, n: u32) {
        self.error_maximum = n;
    }

    pub fn suppress_output(&self) -> bool {
        self.suppress_output
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn warning_count(&self) -> u32 {
        self.warning_count
    }

    pub fn error_count(&self) -> u32 {
        self.error_count
    }

    /// Record one diagnostic. Returns `Err(Abandoned)` once severity
    /// reaches `Fatal` (either directly, or because the error-count
    /// threshold was exceeded) — callers should propagate this with
    /// `?` to unwind out of parsing.
    pub fn report(
        &mut self,
        number: u32,
        mut severity: Severity,
        message: impl Into<String>,
        location: SourceLocation,
    ) -> Result<(), Abandoned> {
        if severity == Severity::Warning {
            self.warning_count += 1;
            if self.suppress_warnings {
                return Ok(());
            }
            if self.warning_count > self.warning_limit {
                self.suppress_warnings = true;
            }
        } else {
            if severity > Severity::Minor {
                self.suppress_output = true;
            }
            if severity < Severity::Fatal {
                self.error_count += 1;
                if self.error_count > self.error_maximum {
                    severity = Severity::Fatal;
                }
            }
        }

        let diagnostic = Diagnostic {
            number,
            severity,
            message: message.into(),
            location,
            draw_unwind: false,
        };
        self.diagnostics.push(diagnostic.clone());

        if severity == Severity::Fatal {
            return Err(Abandoned(diagnostic));
        }
        Ok(())
    }

    /// As [`Sink::report`], but marks the diagnostic so a drawing
    /// interpreter can finish unwinding its stack (printing a trace)
    /// before the caller turns this into a hard stop.
    pub fn report_draw(
        &mut self,
        number: u32,
        message: impl Into<String>,
        location: SourceLocation,
    ) {
        self.error_count += 1;
        self.suppress_output = true;
        let diagnostic = Diagnostic {
            number,
            severity: Severity::Major,
            message: message.into(),
            location,
            draw_unwind: true,
        };
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_suppress_after_limit() {
        let mut sink = Sink::new();
        for _ in 0..45 {
            sink.report(13, Severity::Warning, "noise", SourceLocation::default())
                .unwrap();
        }
        assert_eq!(sink.warning_count(), 45);
        assert_eq!(sink.diagnostics().len(), DEFAULT_WARNING_LIMIT as usize + 1);
    }

    #[test]
    fn major_error_suppresses_output_but_continues() {
        let mut sink = Sink::new();
        sink.report(89, Severity::Major, "unexpected character", SourceLocation::default())
            .unwrap();
        assert!(sink.suppress_output());
        assert_eq!(sink.error_count(), 1);
    }

    #[test]
    fn fatal_error_abandons_processing() {
        let mut sink = Sink::new();
        let result = sink.report(42, Severity::Fatal, "invalid time signature", SourceLocation::default());
        assert!(result.is_err());
    }

    #[test]
    fn too_many_errors_escalate_to_fatal() {
        let mut sink = Sink::new();
        sink.set_error_maximum(2);
        sink.report(1, Severity::Major, "a", SourceLocation::default()).unwrap();
        sink.report(1, Severity::Major, "b", SourceLocation::default()).unwrap();
        let result = sink.report(1, Severity::Major, "c", SourceLocation::default());
        assert!(result.is_err());
    }
}
