//! Commands for the desktop shell.
//!
//! Every command returns the success value or a descriptive error string; the
//! shell renders the string as-is.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;

use stocktally_infra::services::{
    self, IngestReport, IngestService, MutationService, QueryEngine,
};
use stocktally_infra::{
    CsvSheet, FsLedgerStore, LedgerError, LedgerStore, RetentionPolicy, SheetCodec, StoreConfig,
    SweepReport,
};
use stocktally_inventory::{Company, StockAdjustment};

use crate::types::{FileInfo, LowStockItem, SearchResult};

type Store = Arc<FsLedgerStore>;

/// Application state shared across commands.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: StoreConfig,
    pub store: Store,
    pub ingest: IngestService<Store, CsvSheet>,
    pub mutations: MutationService<Store, CsvSheet>,
    pub queries: QueryEngine<Store>,
}

impl AppState {
    /// Open the data directory described by `config`, creating it if absent.
    pub fn open(config: StoreConfig) -> Result<Self, LedgerError> {
        let store = Arc::new(FsLedgerStore::open(&config, CsvSheet.extension())?);
        tracing::info!("ledger store opened at {}", config.data_dir().display());

        Ok(Self {
            ingest: IngestService::new(store.clone(), CsvSheet, config.temp_dir.clone()),
            mutations: MutationService::new(store.clone(), CsvSheet),
            queries: QueryEngine::new(store.clone()),
            store,
            config,
        })
    }
}

fn report(op: &str) -> impl Fn(LedgerError) -> String + '_ {
    move |err| {
        tracing::error!("{op} failed: {err}");
        err.to_string()
    }
}

/// List every processed ledger document.
pub fn get_processed_files(state: &AppState) -> Result<Vec<FileInfo>, String> {
    let records = state.store.list().map_err(report("get_processed_files"))?;
    Ok(records.into_iter().map(FileInfo::from).collect())
}

/// Load one company's ledger document.
pub fn get_company_data(path: String, state: &AppState) -> Result<Company, String> {
    state
        .store
        .get(Path::new(&path))
        .map_err(report("get_company_data"))
}

/// Delete originals and ledger documents older than `retention_days`.
pub fn cleanup_old_files(retention_days: u32, state: &AppState) -> Result<SweepReport, String> {
    state
        .store
        .sweep(RetentionPolicy::days(retention_days), Utc::now())
        .map_err(report("cleanup_old_files"))
}

/// Ingest a base64-encoded spreadsheet upload.
pub fn process_excel_file(
    base64_data: String,
    file_name: String,
    state: &AppState,
) -> Result<IngestReport, String> {
    state
        .ingest
        .process_upload(&base64_data, &file_name)
        .map_err(report("process_excel_file"))
}

/// Ingest a spreadsheet already on local disk, keyed by its file name.
pub fn import_file(path: PathBuf, state: &AppState) -> Result<IngestReport, String> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| format!("not a file path: {}", path.display()))?
        .to_string();
    let bytes = fs::read(&path)
        .map_err(|e| LedgerError::io(&path, e))
        .map_err(report("import_file"))?;

    state
        .ingest
        .process_bytes(&bytes, &file_name)
        .map_err(report("import_file"))
}

pub fn cleanup_temp_file(path: String) -> Result<(), String> {
    services::cleanup_temp_file(Path::new(&path)).map_err(report("cleanup_temp_file"))
}

/// Apply a signed quantity change to one item.
///
/// A `MirrorStale` error means the ledger change was committed but the
/// spreadsheet mirror is out of date.
pub fn update_stock(
    path: String,
    finish: String,
    item_no: String,
    change: i64,
    state: &AppState,
) -> Result<StockAdjustment, String> {
    state
        .mutations
        .adjust_stock(Path::new(&path), &finish, &item_no, change)
        .map_err(report("update_stock"))
}

pub fn get_low_stock_items(threshold: i64, state: &AppState) -> Result<Vec<LowStockItem>, String> {
    let hits = state
        .queries
        .low_stock(threshold)
        .map_err(report("get_low_stock_items"))?;
    Ok(hits.into_iter().map(LowStockItem::from).collect())
}

pub fn search_items(query: String, state: &AppState) -> Result<Vec<SearchResult>, String> {
    let hits = state
        .queries
        .search(&query)
        .map_err(report("search_items"))?;
    Ok(hits.into_iter().map(SearchResult::from).collect())
}

pub fn export_all_to_csv(state: &AppState) -> Result<String, String> {
    services::export_all_to_csv(&state.store).map_err(report("export_all_to_csv"))
}
