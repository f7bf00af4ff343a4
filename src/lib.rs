//! Streaming delimiter-separated values (CSV, TSV, PSV, ...) for flat, typed records.
//!
//! Two layers do the work:
//!
//! - the row codec ([`Parser`], [`Writer`], [`Table`]): a quote-aware tokenizer
//!   and its inverse, configured by a [`Scheme`];
//! - the schema adapter ([`RecordDecoder`], [`RecordEncoder`], [`naming`]): maps
//!   a record's ordered fields onto header columns and back.
//!
//! [`DsvFormat`] composes both into eager (whole collection) and lazy
//! (one record at a time) entry points.
//!
//! # Example
//!
//! ```
//! use dsvkit::{DsvFormat, Parser, Scheme};
//!
//! let table = Parser::new("id|name\n1|ada\n".as_bytes(), Scheme::psv())
//!     .parse_table()
//!     .unwrap();
//! assert_eq!(table.header(), &["id", "name"]);
//! assert_eq!(table.into_records().count(), 1);
//! ```

mod codec;
mod core;
mod error;
mod format;
mod schema;

pub mod prelude;

pub use codec::{MapRow, MemoryRows, Parser, Records, Row, Table, Writer};
pub use crate::core::config::{DialectConfig, DialectRegistry, NamingKind, Settings};
pub use crate::core::scheme::{CARRIAGE_RETURN, LINE_FEED, Scheme, SchemeBuilder};
pub use error::{DsvError, ParseError, Result, SchemaError, SchemeError};
pub use format::{DsvFormat, RecordIter, SequenceEncoder};
pub use schema::naming;
pub use schema::{
    DecodePolicy, DecodedFields, DsvEnum, DsvRecord, EnumDescriptor, FieldDescriptor, FieldKind,
    RecordDecoder, RecordEncoder, Scalar, ScalarType, Schema, SchemaBuilder, Value,
};

/// Decodes comma-separated text into records.
pub fn from_csv_str<T: DsvRecord>(input: &str) -> Result<Vec<T>> {
    DsvFormat::csv().decode_from_str(input)
}

/// Encodes records as comma-separated text, header first.
pub fn to_csv_string<T: DsvRecord>(records: &[T]) -> Result<String> {
    DsvFormat::csv().encode_to_string(records)
}

#[cfg(test)]
mod tests;
