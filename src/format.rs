//! The format façade: eager and lazy entry points over the codec and the schema adapter.
//!
//! Two lifecycles are exposed:
//!
//! - **Eager** (`decode_from_reader`, `encode_to_writer`, and the string helpers)
//!   takes the stream by value. Decode parses the whole input before returning;
//!   encode writes the header even for an empty slice, flushes, and drops the sink.
//! - **Lazy** (`decode_iter`, `sequence_encoder`, `encode_iter`) leaves the
//!   stream's lifecycle to the caller. Pass `&mut reader` or `&mut writer` to keep
//!   ownership. Records are parsed or written one at a time as the sequence is
//!   pulled or pushed, and the header is only written once the first record arrives.

use std::fmt;
use std::io::{self, Read, Write};
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::debug;

use crate::codec::{Parser, Records, Table, Writer};
use crate::core::scheme::Scheme;
use crate::error::{DsvError, Result};
use crate::schema::naming::{Identity, NamingStrategy};
use crate::schema::{DecodePolicy, DsvRecord, RecordDecoder, RecordEncoder};

/// A configured DSV dialect plus the schema-adapter policies.
///
/// Cheap to clone; the naming strategy is shared.
///
/// # Example
///
/// ```
/// use dsvkit::{DecodedFields, DsvFormat, DsvRecord, Schema, SchemaError, Value};
/// use dsvkit::naming::SnakeCase;
///
/// #[derive(Debug, PartialEq)]
/// struct Visit {
///     user_id: u32,
///     page: String,
/// }
///
/// impl DsvRecord for Visit {
///     fn schema() -> Schema {
///         Schema::builder("Visit").scalar::<u32>("userId").scalar::<String>("page").build()
///     }
///
///     fn to_values(&self) -> Vec<Value> {
///         vec![self.user_id.into(), self.page.clone().into()]
///     }
///
///     fn from_values(mut fields: DecodedFields<'_>) -> Result<Self, SchemaError> {
///         Ok(Visit { user_id: fields.get(0)?, page: fields.get(1)? })
///     }
/// }
///
/// let format = DsvFormat::csv().with_naming_strategy(SnakeCase);
/// let visits = vec![Visit { user_id: 7, page: "/a,b".into() }];
///
/// let text = format.encode_to_string(&visits).unwrap();
/// assert_eq!(text, "user_id,page\n7,\"/a,b\"\n");
/// assert_eq!(format.decode_from_str::<Visit>(&text).unwrap(), visits);
/// ```
#[derive(Clone)]
pub struct DsvFormat {
    scheme: Scheme,
    naming: Arc<dyn NamingStrategy>,
    missing_columns_as_null: bool,
    ignore_unknown_keys: bool,
    enums_by_name: bool,
}

impl fmt::Debug for DsvFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DsvFormat")
            .field("scheme", &self.scheme)
            .field("naming", &self.naming)
            .field("missing_columns_as_null", &self.missing_columns_as_null)
            .field("ignore_unknown_keys", &self.ignore_unknown_keys)
            .field("enums_by_name", &self.enums_by_name)
            .finish()
    }
}

impl Default for DsvFormat {
    fn default() -> Self {
        Self::csv()
    }
}

impl DsvFormat {
    pub fn new(scheme: Scheme) -> Self {
        DsvFormat {
            scheme,
            naming: Arc::new(Identity),
            missing_columns_as_null: false,
            ignore_unknown_keys: false,
            enums_by_name: true,
        }
    }

    pub fn csv() -> Self {
        Self::new(Scheme::csv())
    }

    pub fn tsv() -> Self {
        Self::new(Scheme::tsv())
    }

    pub fn psv() -> Self {
        Self::new(Scheme::psv())
    }

    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_naming_strategy<S: NamingStrategy + 'static>(mut self, naming: S) -> Self {
        self.naming = Arc::new(naming);
        self
    }

    /// Reads required nullable fields that have no column as null.
    pub fn with_missing_columns_as_null(mut self, yes: bool) -> Self {
        self.missing_columns_as_null = yes;
        self
    }

    /// Skips columns that map to no field.
    pub fn with_ignore_unknown_keys(mut self, yes: bool) -> Self {
        self.ignore_unknown_keys = yes;
        self
    }

    /// Writes enum members by name (default) or by ordinal.
    pub fn with_enums_by_name(mut self, yes: bool) -> Self {
        self.enums_by_name = yes;
        self
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    pub fn naming_strategy(&self) -> &dyn NamingStrategy {
        self.naming.as_ref()
    }

    pub fn decode_policy(&self) -> DecodePolicy {
        DecodePolicy {
            missing_columns_as_null: self.missing_columns_as_null,
            ignore_unknown_keys: self.ignore_unknown_keys,
        }
    }

    pub fn enums_by_name(&self) -> bool {
        self.enums_by_name
    }

    /// Row-level parser over `reader` using this format's scheme.
    pub fn parser<R: Read>(&self, reader: R) -> Parser<R> {
        Parser::new(reader, self.scheme)
    }

    /// Row-level writer over `sink` using this format's scheme.
    pub fn writer<W: Write>(&self, sink: W) -> Writer<W> {
        Writer::new(sink, self.scheme)
    }

    pub fn parse_table<R: Read>(&self, reader: R) -> Result<Table<Records<R>>> {
        self.parser(reader).parse_table()
    }

    // Eager

    /// Decodes every record of the input.
    pub fn decode_from_reader<T: DsvRecord, R: Read>(&self, reader: R) -> Result<Vec<T>> {
        self.decode_iter(reader)?.collect()
    }

    pub fn decode_from_str<T: DsvRecord>(&self, input: &str) -> Result<Vec<T>> {
        self.decode_from_reader(input.as_bytes())
    }

    /// Writes the header and every record, then flushes and drops the sink.
    pub fn encode_to_writer<T: DsvRecord, W: Write>(&self, records: &[T], sink: W) -> Result<()> {
        self.encode_all(records, sink)?;
        Ok(())
    }

    pub fn encode_to_string<T: DsvRecord>(&self, records: &[T]) -> Result<String> {
        let bytes = self.encode_all(records, Vec::new())?;
        String::from_utf8(bytes).map_err(|e| DsvError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
    }

    fn encode_all<T: DsvRecord, W: Write>(&self, records: &[T], sink: W) -> Result<W> {
        let encoder = self.record_encoder::<T>()?;
        let mut writer = self.writer(sink);
        writer.write_record(encoder.header())?;
        for record in records {
            writer.write_record(&encoder.encode(record)?)?;
        }
        writer.finish()
    }

    // Lazy

    /// Reads the header and returns a lazy sequence of records.
    ///
    /// Parse and schema errors surface as `Err` items at the row where they
    /// occur; the sequence ends after the first one. Row-level schema errors
    /// are wrapped in [`SchemaError::AtRecord`](crate::SchemaError::AtRecord).
    pub fn decode_iter<T: DsvRecord, R: Read>(&self, reader: R) -> Result<RecordIter<T, R>> {
        let (header, records) = self.parse_table(reader)?.into_parts();
        let decoder = RecordDecoder::new(T::schema(), &header, self.naming_strategy(), self.decode_policy())?;
        Ok(RecordIter {
            decoder,
            records,
            finished: false,
            _record: PhantomData,
        })
    }

    /// Returns an encoder that writes records as they are pushed.
    pub fn sequence_encoder<T: DsvRecord, W: Write>(&self, sink: W) -> Result<SequenceEncoder<T, W>> {
        Ok(SequenceEncoder {
            encoder: self.record_encoder::<T>()?,
            writer: self.writer(sink),
            header_written: false,
            _record: PhantomData,
        })
    }

    /// Writes a sequence of records lazily and hands the flushed sink back.
    ///
    /// Nothing at all is written for an empty sequence.
    pub fn encode_iter<T, W, I>(&self, records: I, sink: W) -> Result<W>
    where
        T: DsvRecord,
        W: Write,
        I: IntoIterator<Item = T>,
    {
        let mut encoder = self.sequence_encoder::<T, W>(sink)?;
        for record in records {
            encoder.push(&record)?;
        }
        encoder.finish()
    }

    fn record_encoder<T: DsvRecord>(&self) -> Result<RecordEncoder> {
        Ok(RecordEncoder::new(T::schema(), self.naming_strategy(), self.enums_by_name)?)
    }
}

/// Lazy, single-pass sequence of decoded records. See [`DsvFormat::decode_iter`].
pub struct RecordIter<T, R> {
    decoder: RecordDecoder,
    records: Records<R>,
    finished: bool,
    _record: PhantomData<fn() -> T>,
}

impl<T, R> RecordIter<T, R> {
    pub fn decoder(&self) -> &RecordDecoder {
        &self.decoder
    }
}

impl<T: DsvRecord, R: Read> Iterator for RecordIter<T, R> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let item = match self.records.next()? {
            Ok(row) => {
                let record = self.records.records_read();
                self.decoder
                    .decode::<T>(row)
                    .map_err(|e| DsvError::from(e.at_record(record)))
            }
            Err(e) => Err(e),
        };
        if item.is_err() {
            self.finished = true;
        }
        Some(item)
    }
}

impl<T: DsvRecord, R: Read> std::iter::FusedIterator for RecordIter<T, R> {}

/// Push-based record writer. See [`DsvFormat::sequence_encoder`].
///
/// The header goes out immediately before the first record. Dropping the
/// encoder without calling [`SequenceEncoder::finish`] skips the final flush.
pub struct SequenceEncoder<T, W: Write> {
    encoder: RecordEncoder,
    writer: Writer<W>,
    header_written: bool,
    _record: PhantomData<fn(&T)>,
}

impl<T: DsvRecord, W: Write> SequenceEncoder<T, W> {
    pub fn push(&mut self, record: &T) -> Result<()> {
        if !self.header_written {
            self.writer.write_record(self.encoder.header())?;
            self.header_written = true;
            debug!(record = self.encoder.schema().record_name(), "wrote header");
        }
        let row = self.encoder.encode(record)?;
        self.writer.write_record(&row)
    }

    pub fn extend<I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        for record in records {
            self.push(&record)?;
        }
        Ok(())
    }

    /// Records written so far, header excluded.
    pub fn records_written(&self) -> usize {
        self.writer.rows_written().saturating_sub(1)
    }

    /// Flushes and hands back the sink.
    pub fn finish(self) -> Result<W> {
        self.writer.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ParseError, SchemaError};
    use crate::schema::{DecodedFields, FieldKind, ScalarType, Schema, Value};

    #[derive(Debug, PartialEq)]
    struct Pair {
        key: String,
        value: Option<i64>,
    }

    impl DsvRecord for Pair {
        fn schema() -> Schema {
            Schema::builder("Pair")
                .field("key", FieldKind::scalar(ScalarType::String))
                .field("value", FieldKind::nullable(ScalarType::I64))
                .build()
        }

        fn to_values(&self) -> Vec<Value> {
            vec![self.key.clone().into(), self.value.into()]
        }

        fn from_values(mut fields: DecodedFields<'_>) -> std::result::Result<Self, SchemaError> {
            Ok(Pair {
                key: fields.get(0)?,
                value: fields.get(1)?,
            })
        }
    }

    fn pairs() -> Vec<Pair> {
        vec![
            Pair {
                key: "a".into(),
                value: Some(1),
            },
            Pair {
                key: "b\"c".into(),
                value: None,
            },
        ]
    }

    #[test]
    fn test_eager_round_trip() {
        let format = DsvFormat::tsv();
        let text = format.encode_to_string(&pairs()).unwrap();
        assert_eq!(text, "key\tvalue\na\t1\n\"b\"\"c\"\t\n");
        assert_eq!(format.decode_from_str::<Pair>(&text).unwrap(), pairs());
    }

    #[test]
    fn test_eager_empty_writes_header() {
        let text = DsvFormat::csv().encode_to_string::<Pair>(&[]).unwrap();
        assert_eq!(text, "key,value\n");
    }

    #[test]
    fn test_lazy_empty_writes_nothing() {
        let sink = DsvFormat::csv()
            .encode_iter(Vec::<Pair>::new(), Vec::new())
            .unwrap();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_lazy_encode_borrowed_sink() {
        let mut sink = Vec::new();
        {
            let mut encoder = DsvFormat::csv().sequence_encoder::<Pair, _>(&mut sink).unwrap();
            encoder.extend(pairs()).unwrap();
            assert_eq!(encoder.records_written(), 2);
            encoder.finish().unwrap();
        }
        assert_eq!(String::from_utf8(sink).unwrap(), "key,value\na,1\n\"b\"\"c\",\n");
    }

    #[test]
    fn test_lazy_decode_is_pull_driven() {
        let input = "key,value\na,1\nb,oops\n";
        let mut records = DsvFormat::csv().decode_iter::<Pair, _>(input.as_bytes()).unwrap();
        assert_eq!(
            records.next().unwrap().unwrap(),
            Pair {
                key: "a".into(),
                value: Some(1)
            }
        );
        let err = records.next().unwrap().unwrap_err();
        let schema = err.as_schema().unwrap();
        assert_eq!(schema.record(), Some(3));
        assert!(matches!(schema.cause(), SchemaError::InvalidValue { .. }));
        assert!(records.next().is_none());
    }

    #[test]
    fn test_decode_empty_input() {
        let err = DsvFormat::csv().decode_from_str::<Pair>("").unwrap_err();
        assert_eq!(err.as_parse(), Some(&ParseError::MissingHeader));
    }

    #[test]
    fn test_header_only() {
        assert!(DsvFormat::csv().decode_from_str::<Pair>("key,value\n").unwrap().is_empty());
    }
}
