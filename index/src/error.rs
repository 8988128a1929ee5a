//! Errors returned while building a decoder or decoding an index stream.

use crate::record::Field;
use thiserror::Error;

/// Errors that can occur when decoding an index stream.
///
/// Apart from [Error::EmptyInput], which is returned by constructors, every variant
/// terminates the decode pass that produced it.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no input stream provided")]
    EmptyInput,
    #[error("malformed line {line}: expected 3 fields, found {fields}")]
    MalformedLine { line: u64, fields: usize },
    #[error("invalid {field} on line {line}: {value:?}")]
    InvalidField {
        line: u64,
        field: Field,
        value: String,
    },
    #[error("read error: {0}")]
    Read(#[from] std::io::Error),
    #[error("decode canceled: {0}")]
    Canceled(i32),
}
