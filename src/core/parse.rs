//! Purpose: Parse raw message lines into position/word entries.
//! Exports: `Entry`, `parse_line`, `parse_lines`.
//! Role: Parser boundary; isolates line-format details from the pyramid walk.
//! Invariants: Parsing is fail-fast; the first malformed line aborts with its line number.
//! Invariants: Position tokens parse as signed integers so range checks stay a validation concern.

use crate::core::error::{Error, ErrorKind};

/// One `"<position> <word>"` line from an encoded message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry {
    pub position: i64,
    pub word: String,
}

/// Parse a single line. `line_number` is 1-based and only used for diagnostics.
pub fn parse_line(line: &str, line_number: usize) -> Result<Entry, Error> {
    let line = line.trim();
    let Some((position_token, word)) = line.split_once(' ') else {
        return Err(Error::new(ErrorKind::Parse)
            .with_message("line is missing the position/word separator")
            .with_line(line_number));
    };
    let position = position_token.parse::<i64>().map_err(|err| {
        Error::new(ErrorKind::Parse)
            .with_message(format!("position token {position_token:?} is not an integer"))
            .with_line(line_number)
            .with_source(err)
    })?;
    Ok(Entry {
        position,
        word: word.to_string(),
    })
}

/// Parse every line of an encoded message, in order.
pub fn parse_lines(text: &str) -> Result<Vec<Entry>, Error> {
    text.lines()
        .enumerate()
        .map(|(index, line)| parse_line(line, index + 1))
        .collect()
}
