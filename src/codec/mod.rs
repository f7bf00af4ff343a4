//! Row-level text codec: the quote-aware parser, the writer and the table pairing.

mod parser;
mod table;
mod window;
mod writer;

pub use parser::{Parser, Records};
pub use table::{MapRow, MemoryRows, Row, Table};
pub use writer::Writer;
