//! Purpose: Build the validated encoded set and walk the pyramid rows.
//! Exports: `EncodedSet`, `row_ends`.
//! Role: Owns the decode contract; the only module that knows the row layout.
//! Invariants: A constructed set holds unique positions in `1..=len`.
//! Invariants: The walk fails before reading past the final line.

use std::collections::HashMap;

use crate::core::error::{Error, ErrorKind};
use crate::core::parse::Entry;

/// Validated mapping from position to word for one encoded message.
///
/// Construction enforces the pyramid contract on positions; decoding walks
/// rows of increasing length and collects the word at each row end.
#[derive(Debug)]
pub struct EncodedSet {
    words: HashMap<usize, String>,
    len: usize,
}

impl EncodedSet {
    pub fn from_entries(entries: Vec<Entry>) -> Result<Self, Error> {
        let len = entries.len();
        let mut words = HashMap::with_capacity(len);
        for entry in entries {
            if entry.position < 1 {
                return Err(Error::new(ErrorKind::Validation)
                    .with_message("position must be positive")
                    .with_position(entry.position));
            }
            let position = entry.position as usize;
            if position > len {
                return Err(Error::new(ErrorKind::Validation)
                    .with_message("position exceeds line count")
                    .with_position(entry.position));
            }
            if words.insert(position, entry.word).is_some() {
                return Err(Error::new(ErrorKind::Validation)
                    .with_message("duplicate position")
                    .with_position(entry.position));
            }
        }
        Ok(Self { words, len })
    }

    /// Total number of entries (equal to the input line count).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn word(&self, position: usize) -> Option<&str> {
        self.words.get(&position).map(String::as_str)
    }

    /// Collect the row-end words in row order.
    ///
    /// Row `r` spans `[row_start, row_start + r - 1]`; the walk advances one
    /// row at a time and stops after the row whose end reaches the final
    /// line. A row end past the final line means the line count is not
    /// triangular.
    pub fn decode_words(&self) -> Result<Vec<&str>, Error> {
        let mut decoded = Vec::new();
        let mut row_start = 1usize;
        let mut row_length = 1usize;
        loop {
            let row_end = row_start + row_length - 1;
            if row_end > self.len {
                return Err(Error::new(ErrorKind::Validation)
                    .with_message("line count does not form a complete pyramid")
                    .with_position(row_end as i64));
            }
            // Unique positive positions bounded by len cover 1..=len, so the
            // lookup cannot miss unless construction was bypassed.
            let word = self.word(row_end).ok_or_else(|| {
                Error::new(ErrorKind::Internal)
                    .with_message("validated set is missing a row-end word")
                    .with_position(row_end as i64)
            })?;
            decoded.push(word);
            if row_end >= self.len {
                break;
            }
            row_start = row_end + 1;
            row_length += 1;
        }
        Ok(decoded)
    }

    /// Decode the message: row-end words joined by single spaces.
    pub fn decode(&self) -> Result<String, Error> {
        Ok(self.decode_words()?.join(" "))
    }
}

/// Row-end positions of a pyramid with `rows` rows: 1, 3, 6, 10, ...
pub fn row_ends(rows: usize) -> impl Iterator<Item = usize> {
    (1..=rows).scan(0usize, |end, row| {
        *end += row;
        Some(*end)
    })
}

#[cfg(test)]
mod tests {
    use super::{EncodedSet, row_ends};
    use crate::core::error::ErrorKind;
    use crate::core::parse::{Entry, parse_lines};

    fn set_from(text: &str) -> Result<EncodedSet, crate::core::error::Error> {
        EncodedSet::from_entries(parse_lines(text).expect("parse"))
    }

    #[test]
    fn decodes_two_row_pyramid() {
        let set = set_from("1 the\n2 quick\n3 fox\n").expect("set");
        assert_eq!(set.decode().expect("decode"), "the fox");
    }

    #[test]
    fn decodes_single_entry_message() {
        let set = set_from("1 alone\n").expect("set");
        assert_eq!(set.decode().expect("decode"), "alone");
    }

    #[test]
    fn decodes_out_of_order_input() {
        let set = set_from("3 fox\n1 the\n2 quick\n").expect("set");
        assert_eq!(set.decode().expect("decode"), "the fox");
    }

    #[test]
    fn empty_input_is_not_a_pyramid() {
        let set = EncodedSet::from_entries(Vec::new()).expect("set");
        assert!(set.is_empty());
        let err = set.decode().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn non_triangular_line_count_fails_the_walk() {
        let set = set_from("1 a\n2 b\n3 c\n4 d\n").expect("set");
        let err = set.decode().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(
            err.message()
                .unwrap_or_default()
                .contains("complete pyramid")
        );
    }

    #[test]
    fn duplicate_position_is_rejected() {
        let entries = vec![
            Entry {
                position: 1,
                word: "a".to_string(),
            },
            Entry {
                position: 1,
                word: "b".to_string(),
            },
            Entry {
                position: 3,
                word: "c".to_string(),
            },
        ];
        let err = EncodedSet::from_entries(entries).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.position(), Some(1));
        assert!(err.message().unwrap_or_default().contains("duplicate"));
    }

    #[test]
    fn position_above_line_count_is_rejected() {
        let err = set_from("1 a\n2 b\n9 c\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.position(), Some(9));
        assert!(
            err.message()
                .unwrap_or_default()
                .contains("exceeds line count")
        );
    }

    #[test]
    fn non_positive_positions_are_rejected() {
        let err = set_from("0 a\n2 b\n3 c\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.position(), Some(0));

        let err = set_from("-1 a\n2 b\n3 c\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.position(), Some(-1));
    }

    #[test]
    fn row_ends_follow_triangular_numbers() {
        assert_eq!(row_ends(0).count(), 0);
        assert_eq!(row_ends(5).collect::<Vec<_>>(), vec![1, 3, 6, 10, 15]);
    }

    #[test]
    fn word_lookup_reflects_entries() {
        let set = set_from("1 the\n2 quick\n3 fox\n").expect("set");
        assert_eq!(set.len(), 3);
        assert_eq!(set.word(2), Some("quick"));
        assert_eq!(set.word(4), None);
    }
}
