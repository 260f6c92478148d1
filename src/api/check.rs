//! Purpose: Provide a stable, serializable check report model.
//! Exports: `CheckReport`, `CheckStatus`, `CheckIssue`, `check_file`, `check_str`.
//! Role: Shared contract for CLI diagnostics and API users.
//! Invariants: Reports are additive-only; no message payload is embedded.
//! Invariants: I/O failures stay errors; semantic violations fold into the report.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::error::{Error, ErrorKind};
use crate::core::parse::parse_lines;
use crate::core::pyramid::EncodedSet;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Invalid,
}

#[derive(Clone, Debug, Serialize)]
pub struct CheckIssue {
    #[serde(skip)]
    pub kind: ErrorKind,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct CheckReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub status: CheckStatus,
    pub lines: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<CheckIssue>,
}

impl CheckIssue {
    fn from_error(err: &Error) -> Self {
        Self {
            kind: err.kind(),
            code: issue_code(err.kind()).to_string(),
            message: err.message().unwrap_or("invalid message").to_string(),
            line: err.line(),
            position: err.position(),
        }
    }
}

impl CheckReport {
    pub fn ok(lines: usize, rows: usize) -> Self {
        Self {
            path: None,
            status: CheckStatus::Ok,
            lines,
            rows: Some(rows),
            issue: None,
        }
    }

    pub fn invalid(lines: usize, issue: CheckIssue) -> Self {
        Self {
            path: None,
            status: CheckStatus::Invalid,
            lines,
            rows: None,
            issue: Some(issue),
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Error kind behind an invalid report, for exit-code derivation.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.issue.as_ref().map(|issue| issue.kind)
    }
}

fn issue_code(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Parse => "parse",
        ErrorKind::Validation => "validation",
        _ => "internal",
    }
}

/// Run the decode pipeline over in-memory text and report the outcome.
pub fn check_str(text: &str) -> CheckReport {
    let lines = text.lines().count();
    match decode_row_count(text) {
        Ok(rows) => CheckReport::ok(lines, rows),
        Err(err) => CheckReport::invalid(lines, CheckIssue::from_error(&err)),
    }
}

/// Read a message file and report whether it decodes.
pub fn check_file(path: impl AsRef<Path>) -> Result<CheckReport, Error> {
    let path = path.as_ref();
    let text = super::read_message(path)?;
    Ok(check_str(&text).with_path(path))
}

fn decode_row_count(text: &str) -> Result<usize, Error> {
    let set = EncodedSet::from_entries(parse_lines(text)?)?;
    Ok(set.decode_words()?.len())
}

#[cfg(test)]
mod tests {
    use super::{CheckStatus, check_file, check_str};
    use crate::core::error::ErrorKind;
    use std::io::Write;

    #[test]
    fn valid_message_reports_ok_with_counts() {
        let report = check_str("1 the\n2 quick\n3 fox\n");
        assert_eq!(report.status, CheckStatus::Ok);
        assert_eq!(report.lines, 3);
        assert_eq!(report.rows, Some(2));
        assert!(report.issue.is_none());
    }

    #[test]
    fn duplicate_position_reports_invalid() {
        let report = check_str("1 a\n1 b\n3 c\n");
        assert_eq!(report.status, CheckStatus::Invalid);
        assert_eq!(report.error_kind(), Some(ErrorKind::Validation));
        let issue = report.issue.expect("issue");
        assert_eq!(issue.code, "validation");
        assert!(issue.message.contains("duplicate"));
    }

    #[test]
    fn malformed_line_reports_invalid_with_line_number() {
        let report = check_str("1 a\nbroken\n3 c\n");
        assert_eq!(report.status, CheckStatus::Invalid);
        assert_eq!(report.error_kind(), Some(ErrorKind::Parse));
        assert_eq!(report.issue.expect("issue").line, Some(2));
    }

    #[test]
    fn check_file_attaches_the_path() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("message.txt");
        let mut file = std::fs::File::create(&path).expect("create");
        writeln!(file, "1 solo").expect("write");

        let report = check_file(&path).expect("report");
        assert_eq!(report.status, CheckStatus::Ok);
        assert_eq!(report.rows, Some(1));
        assert_eq!(report.path.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn missing_file_stays_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = check_file(temp.path().join("absent.txt")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
