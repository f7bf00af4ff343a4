//! Error types for dsvkit.
//!
//! Failures fall into two disjoint kinds:
//!
//! - [`ParseError`]: the byte stream is not well-formed delimiter-separated text
//!   (unterminated quote, stray quote, wrong column count, invalid UTF-8,
//!   empty input where a header is required).
//! - [`SchemaError`]: the text is well-formed but does not fit the record shape
//!   (unknown or missing columns, value coercion failures, unsupported field kinds).
//!
//! [`SchemeError`] reports an invalid dialect at construction time. Every public
//! operation returns the umbrella [`DsvError`], which also carries I/O failures from
//! the underlying reader or writer.
//!
//! Nothing is retried. A lazy decode or encode that fails mid-stream leaves the
//! already-produced prefix valid, but the stream itself must be discarded.

use std::io;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DsvError>;

/// Umbrella error returned by public operations.
#[derive(Error, Debug)]
pub enum DsvError {
    /// Malformed wire format.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Record shape mismatch.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Invalid dialect configuration.
    #[error("invalid scheme: {0}")]
    Scheme(#[from] SchemeError),

    /// Failure reported by the underlying reader or writer.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Dialect registry could not be loaded or a dialect is unknown.
    #[error("configuration error: {0}")]
    Config(String),
}

impl DsvError {
    /// Returns the parse error, if this is one.
    pub fn as_parse(&self) -> Option<&ParseError> {
        match self {
            DsvError::Parse(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the schema error, if this is one.
    pub fn as_schema(&self) -> Option<&SchemaError> {
        match self {
            DsvError::Schema(e) => Some(e),
            _ => None,
        }
    }
}

/// Structural failure while reading delimiter-separated text.
///
/// Record numbers are 1-based and count every record read from the stream,
/// header included.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// End of input inside a quoted field.
    #[error("record {record}: unterminated quoted value")]
    UnterminatedQuote { record: usize },

    /// A quote character inside an unquoted field.
    #[error("record {record}: unexpected quote in non-quoted field")]
    StrayQuote { record: usize },

    /// Something other than a delimiter or line ending after a field.
    #[error("record {record}: expected delimiter or end of line, got {found:?}")]
    UnexpectedCharacter { record: usize, found: char },

    /// Column count differs from the first record and jagged rows are disallowed.
    #[error("record {record}: expected {expected} columns, got {actual}")]
    ColumnCount {
        record: usize,
        expected: usize,
        actual: usize,
    },

    /// The byte stream is not valid UTF-8.
    #[error("invalid UTF-8 sequence at byte offset {offset}")]
    InvalidEncoding { offset: u64 },

    /// A table was requested from an input with no records.
    #[error("expected a header")]
    MissingHeader,
}

/// Mismatch between a record shape and the rows being read or written.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// Field kind cannot be represented in a flat row.
    #[error("field '{field}' has unsupported kind {kind}; only flat scalar and enum fields are allowed")]
    UnsupportedField { field: String, kind: String },

    /// Record shape with no fields.
    #[error("record '{record}' has no fields")]
    EmptySchema { record: String },

    /// Two fields share a name.
    #[error("record '{record}' declares field '{field}' more than once")]
    DuplicateField { record: String, field: String },

    /// Header column that maps to no field.
    #[error("unknown column '{column}'")]
    UnknownColumn { column: String },

    /// Two header columns map to the same field.
    #[error("columns '{first}' and '{second}' both map to field '{field}'")]
    DuplicateColumn {
        field: String,
        first: String,
        second: String,
    },

    /// Required field with no column in the header.
    #[error("missing column for required field '{field}'")]
    MissingColumn { field: String },

    /// Text that does not parse as the field's scalar type.
    #[error("field '{field}': cannot parse '{value}' as {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    /// Non-empty text for a field that can only be null.
    #[error("field '{field}': expected null, got '{value}'")]
    ExpectedNull { field: String, value: String },

    /// Null for a field that cannot hold it.
    #[error("field '{field}': unexpected null for non-nullable {expected}")]
    UnexpectedNull { field: String, expected: String },

    /// Enum text that is neither a member name nor an integer.
    #[error("field '{field}': enum value '{value}' not found in {enum_name}")]
    EnumValueNotFound {
        field: String,
        value: String,
        enum_name: String,
    },

    /// Enum ordinal outside the member range.
    #[error("field '{field}': enum ordinal {ordinal} not found in {enum_name}")]
    EnumOrdinalOutOfRange {
        field: String,
        ordinal: i64,
        enum_name: String,
    },

    /// Value variant does not match the field descriptor.
    #[error("field '{field}': value {found} does not match declared {expected}")]
    TypeMismatch {
        field: String,
        expected: String,
        found: String,
    },

    /// A record produced a different number of values than its schema has fields.
    #[error("record '{record}' produced {actual} values; schema has {expected} fields")]
    ValueCount {
        record: String,
        expected: usize,
        actual: usize,
    },

    /// Field index outside the schema.
    #[error("no field at index {index}")]
    NoSuchField { index: usize },

    /// Writer received a row whose width differs from the first row.
    #[error("row {row} has {actual} columns; expected {expected}")]
    RowWidth {
        row: usize,
        actual: usize,
        expected: usize,
    },

    /// Map-keyed row whose key set differs from the first row.
    #[error("row {row} keys do not match the header keys")]
    KeyMismatch { row: usize },

    /// A row-level error located at its 1-based record number (header = record 1).
    #[error("record {record}: {source}")]
    AtRecord {
        record: usize,
        source: Box<SchemaError>,
    },
}

impl SchemaError {
    /// Locates this error at `record`. An error that is already located keeps its record.
    pub fn at_record(self, record: usize) -> Self {
        match self {
            SchemaError::AtRecord { .. } => self,
            other => SchemaError::AtRecord {
                record,
                source: Box::new(other),
            },
        }
    }

    /// Record number the error was located at, if any.
    pub fn record(&self) -> Option<usize> {
        match self {
            SchemaError::AtRecord { record, .. } => Some(*record),
            _ => None,
        }
    }

    /// The error without its record location.
    pub fn cause(&self) -> &SchemaError {
        match self {
            SchemaError::AtRecord { source, .. } => source,
            other => other,
        }
    }
}

/// Invalid dialect characters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemeError {
    #[error("quote and delimiter must be different characters (both {0:?})")]
    QuoteIsDelimiter(char),

    #[error("quote must not be a line-ending character")]
    QuoteIsLineEnding,

    #[error("delimiter must not be a line-ending character")]
    DelimiterIsLineEnding,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::ColumnCount {
            record: 3,
            expected: 3,
            actual: 2,
        };
        assert_eq!(err.to_string(), "record 3: expected 3 columns, got 2");
    }

    #[test]
    fn test_row_width_display() {
        let err = SchemaError::RowWidth {
            row: 2,
            actual: 4,
            expected: 3,
        };
        assert_eq!(err.to_string(), "row 2 has 4 columns; expected 3");
    }

    #[test]
    fn test_at_record() {
        let err = SchemaError::InvalidValue {
            field: "id".into(),
            value: "x".into(),
            expected: "u32".into(),
        };
        let located = err.clone().at_record(5);
        assert_eq!(located.record(), Some(5));
        assert_eq!(located.cause(), &err);
        assert_eq!(located.to_string(), "record 5: field 'id': cannot parse 'x' as u32");
        assert_eq!(located.clone().at_record(9).record(), Some(5));
        assert_eq!(err.record(), None);
        assert_eq!(err.cause(), &err);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::BrokenPipe, "closed");
        let error: DsvError = io_error.into();
        assert!(matches!(error, DsvError::Io(_)));
        assert!(error.to_string().contains("IO error"));
    }

    #[test]
    fn test_accessors() {
        let error: DsvError = ParseError::MissingHeader.into();
        assert_eq!(error.as_parse(), Some(&ParseError::MissingHeader));
        assert!(error.as_schema().is_none());
    }
}
