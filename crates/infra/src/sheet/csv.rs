use csv::{ReaderBuilder, WriterBuilder};

use stocktally_inventory::RawRow;

use super::SheetCodec;
use crate::error::LedgerError;

/// Comma-separated sheet. Rows may have differing lengths.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvSheet;

impl SheetCodec for CsvSheet {
    fn extension(&self) -> &str {
        "csv"
    }

    fn read_rows(&self, bytes: &[u8]) -> Result<Vec<RawRow>, LedgerError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);

        let rows = reader
            .records()
            .map(|record| {
                record
                    .map(|r| r.iter().map(str::to_string).collect())
                    .map_err(|e| LedgerError::Sheet(format!("invalid CSV: {e}")))
            })
            .collect::<Result<Vec<RawRow>, _>>()?;
        Ok(rows)
    }

    fn write_rows(&self, rows: &[RawRow]) -> Result<Vec<u8>, LedgerError> {
        let mut writer = WriterBuilder::new().flexible(true).from_writer(Vec::new());
        for row in rows {
            writer
                .write_record(row)
                .map_err(|e| LedgerError::Sheet(format!("failed to encode row: {e}")))?;
        }
        writer
            .into_inner()
            .map_err(|e| LedgerError::Sheet(format!("failed to flush CSV: {}", e.error())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_ragged_rows_without_header_handling() {
        let input = b"Company,Finish,Item No,Quantity\nAcme,Matte,I-100,10\nAcme,Matte\n";
        let rows = CsvSheet.read_rows(input).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0], "Company");
        assert_eq!(rows[1], ["Acme", "Matte", "I-100", "10"]);
        assert_eq!(rows[2].len(), 2);
    }

    #[test]
    fn quotes_fields_containing_commas() {
        let rows = vec![vec!["Acme, Inc".to_string(), "Matte".to_string()]];
        let bytes = CsvSheet.write_rows(&rows).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "\"Acme, Inc\",Matte\n");
    }
}
