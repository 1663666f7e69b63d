//! Spreadsheet boundary.
//!
//! The ledger only needs rows in and rows out; the file format behind them is
//! a codec chosen at construction.

pub mod csv;

pub use self::csv::CsvSheet;

use stocktally_inventory::RawRow;

use crate::error::LedgerError;

/// Row-producing / row-consuming spreadsheet format.
pub trait SheetCodec: Send + Sync {
    /// File extension (without the dot) used for mirror files.
    fn extension(&self) -> &str;

    /// Every row of the first sheet, header included.
    fn read_rows(&self, bytes: &[u8]) -> Result<Vec<RawRow>, LedgerError>;

    /// Encode `rows` (header included) as one sheet.
    fn write_rows(&self, rows: &[RawRow]) -> Result<Vec<u8>, LedgerError>;
}

impl<C> SheetCodec for std::sync::Arc<C>
where
    C: SheetCodec + ?Sized,
{
    fn extension(&self) -> &str {
        (**self).extension()
    }

    fn read_rows(&self, bytes: &[u8]) -> Result<Vec<RawRow>, LedgerError> {
        (**self).read_rows(bytes)
    }

    fn write_rows(&self, rows: &[RawRow]) -> Result<Vec<u8>, LedgerError> {
        (**self).write_rows(rows)
    }
}
