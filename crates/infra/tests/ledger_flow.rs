//! End-to-end flows over a real data directory.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, TimeDelta, Utc};
use tempfile::TempDir;

use stocktally_infra::services::{IngestService, MutationService, QueryEngine, export_all_to_csv};
use stocktally_infra::{
    CsvSheet, FsLedgerStore, LedgerError, LedgerStore, RetentionPolicy, SheetCodec, StoreConfig,
};

const SHEET: &str = "Company,Finish,Item No,Quantity\n\
                     Acme,Matte,I-100,10\n\
                     Acme,Matte,I-101,5\n\
                     Acme,Gloss,I-200,3\n";

const EPOCH_SECS: u64 = 1_700_000_000;

fn set_mtime(path: &Path, secs: u64) {
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
        .unwrap();
}

fn open(tmp: &TempDir) -> (StoreConfig, Arc<FsLedgerStore>) {
    let config = StoreConfig::new(tmp.path().join("data")).with_temp_dir(tmp.path().join("staging"));
    let store = Arc::new(FsLedgerStore::open(&config, CsvSheet.extension()).unwrap());
    (config, store)
}

#[test]
fn ingest_adjust_query_export() {
    let tmp = TempDir::new().unwrap();
    let (config, store) = open(&tmp);

    let ingest = IngestService::new(store.clone(), CsvSheet, config.temp_dir.clone());
    let report = ingest.process_bytes(SHEET.as_bytes(), "march.csv").unwrap();
    assert_eq!(report.documents.len(), 1);
    let ledger = report.documents[0].clone();

    let queries = QueryEngine::new(store.clone());
    let low: Vec<String> = queries
        .low_stock(6)
        .unwrap()
        .into_iter()
        .map(|h| h.item_no)
        .collect();
    assert_eq!(low, ["I-101", "I-200"]);

    let mutations = MutationService::new(store.clone(), CsvSheet);
    mutations.adjust_stock(&ledger, "Matte", "I-101", 10).unwrap();

    let low: Vec<String> = queries
        .low_stock(6)
        .unwrap()
        .into_iter()
        .map(|h| h.item_no)
        .collect();
    assert_eq!(low, ["I-200"]);

    let before = fs::read(&ledger).unwrap();
    let err = mutations.adjust_stock(&ledger, "Gloss", "I-200", -10).unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientStock { .. }));
    assert_eq!(fs::read(&ledger).unwrap(), before);

    let mirror = store.mirror_path(&ledger).unwrap();
    assert!(mirror.ends_with("files/march_Acme.csv"));
    assert!(fs::read_to_string(&mirror).unwrap().contains("Acme,Matte,I-101,15"));

    let csv = export_all_to_csv(&store).unwrap();
    assert!(csv.starts_with("Company,Finish,Item No,Quantity\n"));
    assert_eq!(csv.lines().count(), 4);

    let hits = queries.search("matte i-100").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].quantity, 10);
}

#[test]
fn sweep_keeps_files_exactly_at_the_cutoff() {
    let tmp = TempDir::new().unwrap();
    let (config, store) = open(&tmp);

    let ingest = IngestService::new(store.clone(), CsvSheet, config.temp_dir.clone());
    let report = ingest.process_bytes(SHEET.as_bytes(), "march.csv").unwrap();
    let ledger = report.documents[0].clone();
    let original = report.original_path.clone();

    let policy = RetentionPolicy::days(30);
    let now = DateTime::<Utc>::from_timestamp(EPOCH_SECS as i64, 0).unwrap() + TimeDelta::days(30);

    set_mtime(&ledger, EPOCH_SECS);
    set_mtime(&original, EPOCH_SECS - 1);

    let swept = store.sweep(policy, now).unwrap();
    assert_eq!(swept.removed, vec![original.clone()]);
    assert!(ledger.exists());
    assert!(!original.exists());

    let swept = store.sweep(policy, now + TimeDelta::seconds(1)).unwrap();
    assert_eq!(swept.removed, vec![ledger.clone()]);
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn stores_are_independent() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let (config, store_a) = open(&first);
    let (_, store_b) = open(&second);

    IngestService::new(store_a.clone(), CsvSheet, config.temp_dir.clone())
        .process_bytes(SHEET.as_bytes(), "march.csv")
        .unwrap();

    assert_eq!(store_a.list().unwrap().len(), 1);
    assert!(store_b.list().unwrap().is_empty());
    assert!(matches!(
        QueryEngine::new(store_b).low_stock(100),
        Err(LedgerError::NoMatches(_))
    ));
}
