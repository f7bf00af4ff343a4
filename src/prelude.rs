//! Convenient re-exports for common usage.
//!
//! This module provides a single import for the types needed to describe a
//! record and read or write it.
//!
//! # Example
//!
//! ```
//! use dsvkit::prelude::*;
//!
//! let format = DialectRegistry::load_default()
//!     .unwrap()
//!     .resolve(Some("tsv"))
//!     .unwrap()
//!     .format()
//!     .unwrap();
//! let table = format.parse_table("a\tb\n1\t2\n".as_bytes()).unwrap();
//! assert_eq!(table.header(), &["a", "b"]);
//! ```

pub use crate::{
    DecodedFields, DialectRegistry, DsvEnum, DsvError, DsvFormat, DsvRecord, FieldKind, Parser,
    ScalarType, Scheme, Schema, SchemaError, Table, Value, Writer, naming::NamingStrategy,
};
