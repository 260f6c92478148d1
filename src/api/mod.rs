//! Purpose: Define the stable public Rust API boundary for pyrad.
//! Exports: Decode operations, check reports, and error types used by the CLI and tests.
//! Role: Public, additive-only surface; hides internal parsing modules.
//! Invariants: This module is the only public path to decode primitives.
//! Invariants: File handles are scoped to the read; nothing stays open across calls.

mod check;

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::parse::Entry;
pub use crate::core::pyramid::{EncodedSet, row_ends};
pub use check::{CheckIssue, CheckReport, CheckStatus, check_file, check_str};

/// Decode an encoded message held in memory.
pub fn decode_str(text: &str) -> Result<String, Error> {
    let entries = crate::core::parse::parse_lines(text)?;
    debug!(lines = entries.len(), "parsed message entries");
    let set = EncodedSet::from_entries(entries)?;
    let words = set.decode_words()?;
    debug!(rows = words.len(), "decoded pyramid rows");
    Ok(words.join(" "))
}

/// Read and decode an encoded message file.
pub fn decode_file(path: impl AsRef<Path>) -> Result<String, Error> {
    let path = path.as_ref();
    let text = read_message(path)?;
    debug!(path = %path.display(), bytes = text.len(), "read message file");
    decode_str(&text)
}

pub(crate) fn read_message(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|err| {
        let kind = match err.kind() {
            io::ErrorKind::NotFound => ErrorKind::NotFound,
            io::ErrorKind::PermissionDenied => ErrorKind::Permission,
            _ => ErrorKind::Io,
        };
        Error::new(kind)
            .with_message("failed to read message file")
            .with_path(path)
            .with_source(err)
    })
}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, decode_file, decode_str};
    use std::io::Write;

    #[test]
    fn decode_str_joins_row_end_words() {
        let decoded = decode_str("1 the\n2 quick\n3 fox\n").expect("decode");
        assert_eq!(decoded, "the fox");
    }

    #[test]
    fn decode_file_reads_from_disk() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("message.txt");
        let mut file = std::fs::File::create(&path).expect("create");
        writeln!(file, "1 the").expect("write");
        writeln!(file, "2 quick").expect("write");
        writeln!(file, "3 fox").expect("write");

        let decoded = decode_file(&path).expect("decode");
        assert_eq!(decoded, "the fox");
    }

    #[test]
    fn missing_file_maps_to_not_found() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = decode_file(temp.path().join("absent.txt")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.path().is_some());
    }
}
