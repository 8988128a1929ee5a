//! A single `offset:id:label` entry of an index stream.

use crate::Error;
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Separator between the fields of a line.
const SEPARATOR: char = ':';

/// Number of fields in a well-formed line.
const FIELDS: usize = 3;

/// A numeric field of a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    /// The segment offset (first field).
    Offset,
    /// The record identifier (second field).
    Id,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Offset => f.write_str("offset"),
            Field::Id => f.write_str("record id"),
        }
    }
}

/// Errors that can occur when parsing a single line, without the context of a stream.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected 3 fields, found {0}")]
    Malformed(usize),
    #[error("invalid {field}: {value:?}")]
    InvalidField { field: Field, value: String },
}

impl ParseError {
    /// Attach the (1-based) line number the error was found on.
    pub fn at(self, line: u64) -> Error {
        match self {
            ParseError::Malformed(fields) => Error::MalformedLine { line, fields },
            ParseError::InvalidField { field, value } => Error::InvalidField { line, field, value },
        }
    }
}

/// One entry of an index stream.
///
/// Rendering a [Record] with [fmt::Display] reproduces the line it was parsed from
/// (including the trailing newline).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Record {
    offset: u64,
    id: u64,
    label: String,
}

impl Record {
    /// Create a new [Record].
    pub fn new(offset: u64, id: u64, label: impl Into<String>) -> Self {
        Self {
            offset,
            id,
            label: label.into(),
        }
    }

    /// Byte offset of the archive segment containing this entry.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Identifier of the indexed entity.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Label of the indexed entity.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Consume the record, returning its label.
    pub fn into_label(self) -> String {
        self.label
    }
}

/// Parse an unsigned decimal field.
///
/// Only ASCII digits are accepted (no sign, no whitespace).
fn parse_field(field: Field, value: &str) -> Result<u64, ParseError> {
    let invalid = || ParseError::InvalidField {
        field,
        value: value.to_string(),
    };
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    value.parse().map_err(|_| invalid())
}

impl FromStr for Record {
    type Err = ParseError;

    /// Parse a line (without its terminator) into a [Record].
    ///
    /// Only the first two separators split fields, so the label may contain colons.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.splitn(FIELDS, SEPARATOR);
        let (Some(offset), Some(id), Some(label)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(ParseError::Malformed(line.splitn(FIELDS, SEPARATOR).count()));
        };
        Ok(Self {
            offset: parse_field(Field::Offset, offset)?,
            id: parse_field(Field::Id, id)?,
            label: label.to_string(),
        })
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}{SEPARATOR}{}{SEPARATOR}{}", self.offset, self.id, self.label)
    }
}
