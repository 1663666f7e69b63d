//! Whole-corpus CSV export.

use stocktally_inventory::{RawRow, SHEET_HEADER};

use crate::error::LedgerError;
use crate::ledger_store::LedgerStore;
use crate::sheet::{CsvSheet, SheetCodec};

/// Every item of every ledger document as one CSV text.
///
/// Documents are visited in listing order; unreadable ones are skipped with a
/// warning.
pub fn export_all_to_csv<S: LedgerStore>(store: &S) -> Result<String, LedgerError> {
    let mut rows: Vec<RawRow> = vec![SHEET_HEADER.iter().map(|h| h.to_string()).collect()];

    for record in store.list()? {
        match store.get(&record.ledger_path) {
            Ok(company) => rows.extend(company.sheet_rows().map(Vec::from)),
            Err(err) => tracing::warn!("skipping {} in export: {err}", record.name),
        }
    }

    let bytes = CsvSheet.write_rows(&rows)?;
    let csv = String::from_utf8(bytes).map_err(|e| LedgerError::Sheet(e.to_string()))?;

    tracing::info!("CSV export generated ({} item row(s))", rows.len() - 1);
    Ok(csv)
}

#[cfg(test)]
mod tests {
    use super::*;

    use stocktally_inventory::{Company, CompanyMap, Item};
    use tempfile::TempDir;

    use crate::config::StoreConfig;
    use crate::ledger_store::FsLedgerStore;

    #[test]
    fn exports_header_and_all_items() {
        let tmp = TempDir::new().expect("tempdir");
        let store = FsLedgerStore::open(&StoreConfig::new(tmp.path()), "csv").unwrap();

        let mut acme = Company::new("Acme, Inc");
        acme.finish_or_insert("Matte").items.push(Item::new("I-100", 10));
        let mut bolt = Company::new("Bolt");
        bolt.finish_or_insert("HG").items.push(Item::new("1092", 0));
        let companies: CompanyMap = [bolt, acme].into_iter().collect();
        store.put("march", &companies).unwrap();

        let csv = export_all_to_csv(&store).unwrap();
        assert_eq!(
            csv,
            "Company,Finish,Item No,Quantity\n\
             \"Acme, Inc\",Matte,I-100,10\n\
             Bolt,HG,1092,0\n"
        );
    }

    #[test]
    fn empty_store_exports_only_the_header() {
        let tmp = TempDir::new().expect("tempdir");
        let store = FsLedgerStore::open(&StoreConfig::new(tmp.path()), "csv").unwrap();
        assert_eq!(export_all_to_csv(&store).unwrap(), "Company,Finish,Item No,Quantity\n");
    }
}
