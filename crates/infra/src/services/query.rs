//! Cross-document stock queries.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use stocktally_inventory::{Company, Finish, Item, SearchQuery, low_stock};

use crate::error::LedgerError;
use crate::ledger_store::LedgerStore;

/// One item located by a query, with the document it lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockHit {
    pub company: String,
    pub finish: String,
    pub item_no: String,
    pub quantity: i64,
    pub ledger_path: PathBuf,
}

pub type LowStockResult = StockHit;
pub type SearchResult = StockHit;

impl StockHit {
    fn new(company: &Company, finish: &Finish, item: &Item, ledger_path: &Path) -> Self {
        Self {
            company: company.name.clone(),
            finish: finish.name.clone(),
            item_no: item.item_no.clone(),
            quantity: item.quantity,
            ledger_path: ledger_path.to_path_buf(),
        }
    }
}

/// Scans every ledger document to answer stock queries.
///
/// An empty answer is reported as `NoMatches`, never as an empty vector.
#[derive(Debug, Clone)]
pub struct QueryEngine<S> {
    store: S,
}

impl<S> QueryEngine<S>
where
    S: LedgerStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Items with `quantity < threshold` across all documents.
    pub fn low_stock(&self, threshold: i64) -> Result<Vec<LowStockResult>, LedgerError> {
        let hits = self.scan(|company, path, out| {
            out.extend(low_stock(company, threshold).map(|(f, i)| StockHit::new(company, f, i, path)));
        })?;

        if hits.is_empty() {
            return Err(LedgerError::NoMatches(format!(
                "no items found with stock less than {threshold}"
            )));
        }
        Ok(hits)
    }

    /// Token search over finish names and item numbers.
    pub fn search(&self, query: &str) -> Result<Vec<SearchResult>, LedgerError> {
        let parsed = SearchQuery::parse(query)?;

        let hits = self.scan(|company, path, out| {
            out.extend(parsed.filter(company).map(|(f, i)| StockHit::new(company, f, i, path)));
        })?;

        if hits.is_empty() {
            return Err(LedgerError::NoMatches(format!("no items found matching '{query}'")));
        }
        Ok(hits)
    }

    /// Load each listed document in name order and let `collect` pick hits.
    ///
    /// Documents that fail to load are skipped with a warning.
    fn scan<F>(&self, mut collect: F) -> Result<Vec<StockHit>, LedgerError>
    where
        F: FnMut(&Company, &Path, &mut Vec<StockHit>),
    {
        let mut hits = Vec::new();
        for record in self.store.list()? {
            match self.store.get(&record.ledger_path) {
                Ok(company) => collect(&company, &record.ledger_path, &mut hits),
                Err(err) => tracing::warn!("skipping {} during scan: {err}", record.name),
            }
        }
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;

    use stocktally_inventory::CompanyMap;
    use tempfile::TempDir;

    use crate::config::StoreConfig;
    use crate::ledger_store::FsLedgerStore;

    fn setup() -> (TempDir, QueryEngine<Arc<FsLedgerStore>>) {
        let tmp = TempDir::new().expect("tempdir");
        let store = Arc::new(FsLedgerStore::open(&StoreConfig::new(tmp.path()), "csv").unwrap());

        let mut acme = Company::new("Acme");
        let matte = acme.finish_or_insert("Matte");
        matte.items.push(Item::new("I-100", 10));
        matte.items.push(Item::new("I-101", 5));
        acme.finish_or_insert("Gloss").items.push(Item::new("I-200", 3));

        let mut bolt = Company::new("Bolt");
        bolt.finish_or_insert("HG").items.push(Item::new("1092", 40));

        let companies: CompanyMap = [acme, bolt].into_iter().collect();
        store.put("march", &companies).unwrap();
        (tmp, QueryEngine::new(store))
    }

    fn item_nos(hits: &[StockHit]) -> Vec<&str> {
        hits.iter().map(|h| h.item_no.as_str()).collect()
    }

    #[test]
    fn low_stock_returns_items_below_threshold() {
        let (_tmp, engine) = setup();
        let hits = engine.low_stock(6).unwrap();
        assert_eq!(item_nos(&hits), ["I-101", "I-200"]);
        assert_eq!(hits[1].finish, "Gloss");
        assert!(hits[0].ledger_path.ends_with("march_Acme.json"));
    }

    #[test]
    fn low_stock_with_no_hits_is_an_error() {
        let (_tmp, engine) = setup();
        assert!(matches!(engine.low_stock(3), Err(LedgerError::NoMatches(_))));
    }

    #[test]
    fn search_with_two_tokens_is_a_conjunction() {
        let (_tmp, engine) = setup();
        let hits = engine.search("Matte I-100").unwrap();
        assert_eq!(item_nos(&hits), ["I-100"]);
        assert!(matches!(engine.search("Matte I-999"), Err(LedgerError::NoMatches(_))));
    }

    #[test]
    fn search_with_one_token_spans_companies() {
        let (_tmp, engine) = setup();
        assert_eq!(item_nos(&engine.search("hg").unwrap()), ["1092"]);
        assert_eq!(item_nos(&engine.search("i-10").unwrap()), ["I-100", "I-101"]);
    }

    #[test]
    fn empty_query_is_rejected() {
        let (_tmp, engine) = setup();
        assert!(matches!(engine.search("   "), Err(LedgerError::Validation(_))));
    }

    #[test]
    fn unreadable_documents_do_not_abort_a_scan() {
        let (tmp, engine) = setup();
        fs::write(tmp.path().join("processed").join("broken.json"), "{").unwrap();
        assert_eq!(item_nos(&engine.low_stock(6).unwrap()), ["I-101", "I-200"]);
    }
}
