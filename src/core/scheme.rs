use crate::error::SchemeError;

/// Line feed. Not configurable.
pub const LINE_FEED: char = '\n';
/// Carriage return. Not configurable.
pub const CARRIAGE_RETURN: char = '\r';

/// The characters and policies that define one DSV dialect.
///
/// A scheme is immutable once built and is shared by the parser, writer and
/// schema adapter of one format instance. Line endings are fixed: the parser
/// accepts LF, CR, CRLF and CR...CRLF, and the writer emits LF or CRLF.
///
/// # Example
///
/// ```
/// use dsvkit::Scheme;
///
/// let scheme = Scheme::builder(';').write_crlf(true).build().unwrap();
/// assert_eq!(scheme.delimiter(), ';');
/// assert_eq!(scheme.quote(), '"');
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Scheme {
    delimiter: char,
    quote: char,
    write_crlf: bool,
    skip_empty_lines: bool,
    allow_jagged_rows: bool,
}

impl Scheme {
    /// Creates a scheme with the given delimiter and default policies.
    pub fn new(delimiter: char) -> Result<Self, SchemeError> {
        Self::builder(delimiter).build()
    }

    /// Starts building a scheme for the given delimiter.
    pub fn builder(delimiter: char) -> SchemeBuilder {
        SchemeBuilder::new(delimiter)
    }

    /// Comma-separated values.
    pub fn csv() -> Self {
        Self::preset(',')
    }

    /// Tab-separated values.
    pub fn tsv() -> Self {
        Self::preset('\t')
    }

    /// Pipe-separated values.
    pub fn psv() -> Self {
        Self::preset('|')
    }

    const fn preset(delimiter: char) -> Self {
        Scheme {
            delimiter,
            quote: '"',
            write_crlf: false,
            skip_empty_lines: false,
            allow_jagged_rows: false,
        }
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    pub fn quote(&self) -> char {
        self.quote
    }

    pub fn write_crlf(&self) -> bool {
        self.write_crlf
    }

    pub fn skip_empty_lines(&self) -> bool {
        self.skip_empty_lines
    }

    pub fn allow_jagged_rows(&self) -> bool {
        self.allow_jagged_rows
    }

    /// Returns a builder seeded with this scheme's settings.
    pub fn to_builder(&self) -> SchemeBuilder {
        SchemeBuilder { scheme: *self }
    }

    /// True if `c` forces a field to be quoted on write.
    pub(crate) fn is_special(&self, c: char) -> bool {
        c == self.delimiter || c == self.quote || c == LINE_FEED || c == CARRIAGE_RETURN
    }

    /// The line ending written after each record.
    pub(crate) fn line_ending(&self) -> &'static str {
        if self.write_crlf { "\r\n" } else { "\n" }
    }
}

/// Builder for [`Scheme`]. Validation happens in [`SchemeBuilder::build`].
#[derive(Debug, Clone, Copy)]
pub struct SchemeBuilder {
    scheme: Scheme,
}

impl SchemeBuilder {
    pub fn new(delimiter: char) -> Self {
        SchemeBuilder {
            scheme: Scheme::preset(delimiter),
        }
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.scheme.delimiter = delimiter;
        self
    }

    pub fn quote(mut self, quote: char) -> Self {
        self.scheme.quote = quote;
        self
    }

    /// Write CRLF instead of LF after each record.
    pub fn write_crlf(mut self, yes: bool) -> Self {
        self.scheme.write_crlf = yes;
        self
    }

    /// Silently drop records with no fields or a single empty field.
    pub fn skip_empty_lines(mut self, yes: bool) -> Self {
        self.scheme.skip_empty_lines = yes;
        self
    }

    /// Pad short rows and truncate long rows to the first record's width.
    pub fn allow_jagged_rows(mut self, yes: bool) -> Self {
        self.scheme.allow_jagged_rows = yes;
        self
    }

    /// Validates that the delimiter, quote and line-ending characters are pairwise distinct.
    pub fn build(self) -> Result<Scheme, SchemeError> {
        let Scheme {
            delimiter, quote, ..
        } = self.scheme;

        if quote == delimiter {
            return Err(SchemeError::QuoteIsDelimiter(quote));
        }
        if quote == LINE_FEED || quote == CARRIAGE_RETURN {
            return Err(SchemeError::QuoteIsLineEnding);
        }
        if delimiter == LINE_FEED || delimiter == CARRIAGE_RETURN {
            return Err(SchemeError::DelimiterIsLineEnding);
        }

        Ok(self.scheme)
    }
}
