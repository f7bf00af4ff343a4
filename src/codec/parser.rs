use std::io::Read;

use tracing::{debug, trace};

use super::table::{Row, Table};
use super::window::CharWindow;
use crate::core::scheme::{CARRIAGE_RETURN, LINE_FEED, Scheme};
use crate::error::{ParseError, Result};

/// Streaming, quote-aware reader of delimiter-separated text.
///
/// The parser pulls fixed-size chunks from the reader on demand and never holds
/// more than the record currently being read. It yields raw rows; column-count
/// checks and the skip-empty-lines policy are applied by [`Records`].
///
/// # Example
///
/// ```
/// use dsvkit::{Parser, Scheme};
///
/// let input = "name,quote\nada,\"said \"\"hi\"\"\"\n";
/// let table = Parser::new(input.as_bytes(), Scheme::csv()).parse_table().unwrap();
/// assert_eq!(table.header(), &["name", "quote"]);
///
/// let rows: Vec<_> = table.into_records().collect::<Result<_, _>>().unwrap();
/// assert_eq!(rows, vec![vec!["ada".to_string(), "said \"hi\"".to_string()]]);
/// ```
pub struct Parser<R> {
    window: CharWindow<R>,
    scheme: Scheme,
    /// Byte position inside the window of the next unread character.
    cursor: usize,
    records_read: usize,
    /// CRs left in an already scanned bare CR run.
    bare_crs: usize,
}

impl<R: Read> Parser<R> {
    pub fn new(reader: R, scheme: Scheme) -> Self {
        Parser {
            window: CharWindow::new(reader),
            scheme,
            cursor: 0,
            records_read: 0,
            bare_crs: 0,
        }
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    /// Number of physical records consumed so far, skipped empty lines included.
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Turns the parser into a lazy sequence of rows.
    pub fn records(self) -> Records<R> {
        Records {
            parser: self,
            expected_columns: None,
            finished: false,
        }
    }

    /// Reads the header row and returns it with the lazy sequence of data rows.
    pub fn parse_table(self) -> Result<Table<Records<R>>> {
        let mut records = self.records();
        let header = match records.next() {
            Some(header) => header?,
            None => return Err(ParseError::MissingHeader.into()),
        };
        debug!(columns = header.len(), "read table header");
        Ok(Table::new(header, records))
    }

    /// Reads one record and its line ending, then drops the consumed text.
    ///
    /// Returns `None` at a clean end of input.
    pub fn read_record(&mut self) -> Result<Option<Row>> {
        if self.peek()?.is_none() {
            return Ok(None);
        }
        self.records_read += 1;

        let mut row = Vec::new();
        loop {
            row.push(self.read_field()?);
            match self.peek()? {
                Some(c) if c == self.scheme.delimiter() => self.advance(c),
                Some(LINE_FEED) | Some(CARRIAGE_RETURN) | None => break,
                Some(found) => {
                    return Err(ParseError::UnexpectedCharacter {
                        record: self.records_read,
                        found,
                    }
                    .into());
                }
            }
        }

        self.read_end_of_line()?;
        self.window.consume(self.cursor);
        self.cursor = 0;
        Ok(Some(row))
    }

    fn read_field(&mut self) -> Result<String> {
        match self.peek()? {
            Some(c) if c == self.scheme.quote() => {
                self.advance(c);
                self.read_quoted_field()
            }
            _ => self.read_unquoted_field(),
        }
    }

    /// Reads up to and including the closing quote. The opening quote is already consumed.
    fn read_quoted_field(&mut self) -> Result<String> {
        let quote = self.scheme.quote();
        let mut field = String::new();
        loop {
            match self.peek()? {
                None => {
                    return Err(ParseError::UnterminatedQuote {
                        record: self.records_read,
                    }
                    .into());
                }
                Some(c) if c == quote => {
                    self.advance(c);
                    // Doubled quote is a literal quote
                    if self.peek()? == Some(quote) {
                        self.advance(quote);
                        field.push(quote);
                    } else {
                        return Ok(field);
                    }
                }
                Some(c) => {
                    self.advance(c);
                    field.push(c);
                }
            }
        }
    }

    fn read_unquoted_field(&mut self) -> Result<String> {
        let mut field = String::new();
        while let Some(c) = self.peek()? {
            if c == self.scheme.delimiter() || c == LINE_FEED || c == CARRIAGE_RETURN {
                break;
            }
            if c == self.scheme.quote() {
                return Err(ParseError::StrayQuote {
                    record: self.records_read,
                }
                .into());
            }
            self.advance(c);
            field.push(c);
        }
        Ok(field)
    }

    /// Consumes one logical line ending: LF, or a run of CRs followed by LF or
    /// end of input. A CR run followed by anything else ends the record at its
    /// first CR, and each remaining CR of the run then ends an empty record.
    fn read_end_of_line(&mut self) -> Result<()> {
        match self.peek()? {
            Some(LINE_FEED) => self.advance(LINE_FEED),
            Some(CARRIAGE_RETURN) if self.bare_crs > 0 => {
                self.bare_crs -= 1;
                self.advance(CARRIAGE_RETURN);
            }
            Some(CARRIAGE_RETURN) => {
                let mut ahead = self.cursor;
                while self.window.char_at(ahead)? == Some(CARRIAGE_RETURN) {
                    ahead += 1;
                }
                match self.window.char_at(ahead)? {
                    Some(LINE_FEED) => self.cursor = ahead + 1,
                    None => self.cursor = ahead,
                    Some(_) => {
                        self.bare_crs = ahead - self.cursor - 1;
                        self.advance(CARRIAGE_RETURN);
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn peek(&mut self) -> Result<Option<char>> {
        self.window.char_at(self.cursor)
    }

    fn advance(&mut self, c: char) {
        self.cursor += c.len_utf8();
    }
}

/// Lazy, single-pass sequence of rows produced by a [`Parser`].
///
/// The first row fixes the expected column count. Later rows that differ are
/// padded or truncated when the scheme allows jagged rows, and rejected
/// otherwise. With `skip_empty_lines`, a row that is a single empty field is
/// dropped before the column check, so a blank line is never padded into a row
/// of empty fields. The sequence ends after the first error.
pub struct Records<R> {
    parser: Parser<R>,
    expected_columns: Option<usize>,
    finished: bool,
}

impl<R: Read> Records<R> {
    /// Column count fixed by the first row, once it has been read.
    pub fn expected_columns(&self) -> Option<usize> {
        self.expected_columns
    }

    /// 1-based number of the last physical record read, header and skipped lines included.
    pub fn records_read(&self) -> usize {
        self.parser.records_read()
    }

    fn pull(&mut self) -> Result<Option<Row>> {
        loop {
            let Some(mut row) = self.parser.read_record()? else {
                return Ok(None);
            };
            let record = self.parser.records_read();

            if self.parser.scheme.skip_empty_lines() && is_blank(&row) {
                trace!(record, "skipped empty line");
                continue;
            }

            match self.expected_columns {
                None => self.expected_columns = Some(row.len()),
                Some(expected) if expected != row.len() => {
                    if !self.parser.scheme.allow_jagged_rows() {
                        return Err(ParseError::ColumnCount {
                            record,
                            expected,
                            actual: row.len(),
                        }
                        .into());
                    }
                    row.resize(expected, String::new());
                }
                Some(_) => {}
            }

            trace!(record, columns = row.len(), "parsed record");
            return Ok(Some(row));
        }
    }
}

impl<R: Read> Iterator for Records<R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.pull() {
            Ok(Some(row)) => Some(Ok(row)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: Read> std::iter::FusedIterator for Records<R> {}

fn is_blank(row: &[String]) -> bool {
    match row {
        [] => true,
        [only] => only.is_empty(),
        _ => false,
    }
}
