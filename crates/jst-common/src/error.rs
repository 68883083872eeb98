//! Error taxonomy for the translation pipeline.
//!
//! Four classes of failure, matching the way a translation can go wrong:
//! the source couldn't be parsed into entries, a rule's `apply` panicked
//! assumptions about its own match, no rule matched an entry (recoverable --
//! collected as a warning, not a hard failure), or the surrounding I/O
//! failed. None of these wrap `thiserror`; each gets a hand-written
//! `Display` and `std::error::Error` impl.

use std::fmt;
use std::path::PathBuf;

use crate::span::Span;

/// A single place translation could not proceed as expected.
#[derive(Debug)]
pub enum TranslateError {
    /// The source cursor or entry parser hit a construct it can't model.
    Parse { message: String, span: Span },
    /// A rule's `apply` returned an inconsistent result (e.g. claimed to
    /// consume more entries than existed in its match).
    Rule { rule_name: String, message: String, span: Span },
    /// Reading or writing a file failed.
    Io { path: PathBuf, source: std::io::Error },
}

impl fmt::Display for TranslateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslateError::Parse { message, span } => {
                write!(f, "parse error at {}..{}: {}", span.start, span.end, message)
            }
            TranslateError::Rule { rule_name, message, span } => {
                write!(
                    f,
                    "rule '{}' failed at {}..{}: {}",
                    rule_name, span.start, span.end, message
                )
            }
            TranslateError::Io { path, source } => {
                write!(f, "io error on '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for TranslateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TranslateError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A recoverable condition: no registered rule consumed this entry, so its
/// source text was copied through verbatim. Collected by the translator as
/// warnings rather than aborting the run.
#[derive(Debug, Clone)]
pub struct NoEditWarning {
    pub span: Span,
    pub text: String,
}

impl fmt::Display for NoEditWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no rule matched at {}..{}, copied verbatim: {:?}",
            self.span.start, self.span.end, self.text
        )
    }
}

/// The comment text inserted the first time a no-edit passthrough happens
/// in a translation unit.
pub const NO_EDIT_MARKER: &str = "# NO EDIT: untranslated source follows";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display() {
        let e = TranslateError::Parse {
            message: "unterminated string".into(),
            span: Span::new(4, 9),
        };
        assert_eq!(e.to_string(), "parse error at 4..9: unterminated string");
    }

    #[test]
    fn rule_error_display_includes_name() {
        let e = TranslateError::Rule {
            rule_name: "ternary_expression".into(),
            message: "child count mismatch".into(),
            span: Span::new(0, 3),
        };
        assert!(e.to_string().contains("ternary_expression"));
    }
}
