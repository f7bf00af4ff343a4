use std::io::Write;

use tracing::trace;

use super::table::{MapRow, Row, Table};
use crate::core::scheme::Scheme;
use crate::error::{Result, SchemaError};

/// Streaming writer of delimiter-separated text.
///
/// A field is quoted only when it contains the delimiter, the quote character
/// or a line-ending character; embedded quotes are doubled. The first record
/// written fixes the column count for the rest of the stream.
///
/// Records are assembled in an internal line buffer and handed to the sink with
/// a single `write_all`, so wrap unbuffered sinks in a `BufWriter` when writing
/// many small records.
pub struct Writer<W: Write> {
    sink: W,
    scheme: Scheme,
    columns: Option<usize>,
    rows_written: usize,
    line: String,
}

impl<W: Write> Writer<W> {
    pub fn new(sink: W, scheme: Scheme) -> Self {
        Writer {
            sink,
            scheme,
            columns: None,
            rows_written: 0,
            line: String::new(),
        }
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    /// Records written so far, header included.
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Writes one record followed by the scheme's line ending.
    pub fn write_record<S: AsRef<str>>(&mut self, record: &[S]) -> Result<()> {
        let row = self.rows_written + 1;
        match self.columns {
            None => self.columns = Some(record.len()),
            Some(expected) if expected != record.len() => {
                return Err(SchemaError::RowWidth {
                    row,
                    actual: record.len(),
                    expected,
                }
                .into());
            }
            Some(_) => {}
        }

        self.line.clear();
        for (i, field) in record.iter().enumerate() {
            if i > 0 {
                self.line.push(self.scheme.delimiter());
            }
            escape_into(&mut self.line, field.as_ref(), &self.scheme);
        }
        self.line.push_str(self.scheme.line_ending());

        self.sink.write_all(self.line.as_bytes())?;
        self.rows_written = row;
        trace!(row, columns = record.len(), "wrote record");
        Ok(())
    }

    /// Writes every record from `rows`.
    pub fn write_rows<I, T, S>(&mut self, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[S]>,
        S: AsRef<str>,
    {
        for row in rows {
            self.write_record(row.as_ref())?;
        }
        Ok(())
    }

    /// Writes a table's header and then drains its rows.
    pub fn write_table<I>(&mut self, table: Table<I>) -> Result<()>
    where
        I: Iterator<Item = Result<Row>>,
    {
        let (header, records) = table.into_parts();
        self.write_record(&header)?;
        for row in records {
            self.write_record(&row?)?;
        }
        Ok(())
    }

    /// Writes rows keyed by column name.
    ///
    /// The header is taken from the first row's keys, in order. Every later row
    /// must carry exactly the same key set; its values are written in header
    /// order. Nothing is written for an empty input.
    pub fn write_maps<I>(&mut self, rows: I) -> Result<()>
    where
        I: IntoIterator<Item = MapRow>,
    {
        let mut rows = rows.into_iter();
        let Some(first) = rows.next() else {
            return Ok(());
        };

        let (header, values): (Vec<String>, Vec<String>) = first.into_iter().unzip();
        self.write_record(&header)?;
        self.write_record(&values)?;

        for map in rows {
            let row = self.rows_written + 1;
            let ordered = reorder(&header, map).ok_or(SchemaError::KeyMismatch { row })?;
            self.write_record(&ordered)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }

    /// Flushes and hands back the sink.
    pub fn finish(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.sink)
    }
}

/// Appends `field` to `out`, quoting it if it contains a special character.
fn escape_into(out: &mut String, field: &str, scheme: &Scheme) {
    if !field.chars().any(|c| scheme.is_special(c)) {
        out.push_str(field);
        return;
    }

    let quote = scheme.quote();
    out.push(quote);
    for c in field.chars() {
        if c == quote {
            out.push(quote);
        }
        out.push(c);
    }
    out.push(quote);
}

/// Returns the values of `map` in `header` order, or `None` if the key sets differ.
fn reorder(header: &[String], mut map: MapRow) -> Option<Row> {
    if map.len() != header.len() {
        return None;
    }
    let mut ordered = Vec::with_capacity(header.len());
    for key in header {
        let pos = map.iter().position(|(k, _)| k == key)?;
        ordered.push(map.swap_remove(pos).1);
    }
    Some(ordered)
}
