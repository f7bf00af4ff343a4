use crate::error::Result;

/// One record: raw, unescaped field text in column order.
pub type Row = Vec<String>;

/// One record keyed by column name, in header order.
pub type MapRow = Vec<(String, String)>;

/// In-memory row source used by [`Table::from_rows`].
pub type MemoryRows = std::iter::Map<std::vec::IntoIter<Row>, fn(Row) -> Result<Row>>;

/// A header row paired with a lazy, single-pass sequence of data rows.
///
/// A table read from a [`Parser`](crate::Parser) borrows the parser's reader;
/// a read failure surfaces as an `Err` item on the next pull.
#[derive(Debug)]
pub struct Table<I> {
    header: Row,
    records: I,
}

impl<I> Table<I>
where
    I: Iterator<Item = Result<Row>>,
{
    pub fn new(header: Row, records: I) -> Self {
        Table { header, records }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Mutable access to the remaining rows, for pulling them one at a time.
    pub fn records(&mut self) -> &mut I {
        &mut self.records
    }

    pub fn into_records(self) -> I {
        self.records
    }

    pub fn into_parts(self) -> (Row, I) {
        (self.header, self.records)
    }

    /// Pairs each remaining row with the header's column names.
    pub fn records_as_maps(self) -> impl Iterator<Item = Result<MapRow>> {
        let Table { header, records } = self;
        records.map(move |row| {
            let row = row?;
            Ok(header.iter().cloned().zip(row).collect())
        })
    }
}

impl Table<MemoryRows> {
    /// Builds a table from rows already in memory.
    pub fn from_rows(header: Row, rows: Vec<Row>) -> Self {
        let ok: fn(Row) -> Result<Row> = Ok;
        Table::new(header, rows.into_iter().map(ok))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: &[&str]) -> Row {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_records_as_maps() {
        let table = Table::from_rows(row(&["id", "name"]), vec![row(&["1", "ada"]), row(&["2", "bob"])]);
        let maps: Vec<MapRow> = table.records_as_maps().collect::<Result<_>>().unwrap();
        assert_eq!(
            maps[1],
            vec![
                ("id".to_string(), "2".to_string()),
                ("name".to_string(), "bob".to_string())
            ]
        );
    }

    #[test]
    fn test_records_are_single_pass() {
        let mut table = Table::from_rows(row(&["a"]), vec![row(&["1"]), row(&["2"])]);
        assert_eq!(table.records().next().unwrap().unwrap(), row(&["1"]));
        let (header, rest) = table.into_parts();
        assert_eq!(header, row(&["a"]));
        assert_eq!(rest.count(), 1);
    }
}
