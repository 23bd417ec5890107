//! Error types for Runtime Quota.
//!
//! Quota discovery treats most failures as plain absence: a missing file
//! or an unmounted subsystem means "no limit from this source" and is
//! reported as `None` at the public boundary, never as an error. The
//! variants here cover the cases a caller may legitimately want to
//! distinguish, chiefly a system table that exists but violates its
//! documented format. That condition indicates an unexpected kernel or
//! container environment and aborts the scan that hit it, so it is always
//! surfaced as a value rather than logged and swallowed.

use thiserror::Error;

/// Result type alias for Runtime Quota operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A system-provided table did not parse as documented.
    MalformedInput,
    /// Output serialization errors.
    Output,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::MalformedInput => write!(f, "malformed_input"),
            ErrorCategory::Output => write!(f, "output"),
        }
    }
}

/// Unified error type for Runtime Quota.
#[derive(Error, Debug)]
pub enum Error {
    /// A system-provided table violated its documented line format.
    ///
    /// `line` is 1-based. The scan that encountered this line was
    /// abandoned; partial results from earlier lines are discarded.
    #[error("malformed line {line} in {path}")]
    MalformedLine {
        /// File the offending line came from.
        path: String,
        /// 1-based line number within that file.
        line: usize,
    },

    /// Report serialization failed.
    #[error("failed to serialize report")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Shorthand constructor for [`Error::MalformedLine`].
    pub fn malformed(path: impl Into<String>, line: usize) -> Self {
        Error::MalformedLine {
            path: path.into(),
            line,
        }
    }

    /// Category this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::MalformedLine { .. } => ErrorCategory::MalformedInput,
            Error::Serialize(_) => ErrorCategory::Output,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_line_display_names_file_and_line() {
        let err = Error::malformed("/proc/self/mountinfo", 7);
        assert_eq!(err.to_string(), "malformed line 7 in /proc/self/mountinfo");
        assert_eq!(err.category(), ErrorCategory::MalformedInput);
    }

    #[test]
    fn category_display_is_snake_case() {
        assert_eq!(ErrorCategory::MalformedInput.to_string(), "malformed_input");
        assert_eq!(ErrorCategory::Output.to_string(), "output");
    }
}
