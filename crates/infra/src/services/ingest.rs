//! Spreadsheet upload ingestion.

use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;
use uuid::Uuid;

use stocktally_core::batch_name;
use stocktally_inventory::{SkippedRow, aggregate};

use crate::error::LedgerError;
use crate::ledger_store::LedgerStore;
use crate::sheet::SheetCodec;

/// What one ingestion wrote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub batch: String,
    pub original_path: PathBuf,
    pub documents: Vec<PathBuf>,
    pub skipped: Vec<SkippedRow>,
}

/// Turns uploaded sheets into ledger documents.
#[derive(Debug, Clone)]
pub struct IngestService<S, C> {
    store: S,
    codec: C,
    temp_dir: PathBuf,
}

impl<S, C> IngestService<S, C>
where
    S: LedgerStore,
    C: SheetCodec,
{
    pub fn new(store: S, codec: C, temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            codec,
            temp_dir: temp_dir.into(),
        }
    }

    /// Ingest a base64-encoded upload.
    pub fn process_upload(&self, encoded: &str, file_name: &str) -> Result<IngestReport, LedgerError> {
        let bytes = BASE64
            .decode(encoded.trim())
            .map_err(|e| LedgerError::Validation(format!("invalid file encoding: {e}")))?;
        self.process_bytes(&bytes, file_name)
    }

    /// Ingest raw upload bytes.
    ///
    /// The original is stored before the ledger documents; if writing the
    /// documents fails the stored original is removed again.
    pub fn process_bytes(&self, bytes: &[u8], file_name: &str) -> Result<IngestReport, LedgerError> {
        if self.store.has_original(file_name)? {
            return Err(LedgerError::AlreadyExists(file_name.to_string()));
        }

        let staged = StagedUpload::write(&self.temp_dir, self.codec.extension(), bytes)?;
        let staged_bytes = fs::read(staged.path()).map_err(|e| LedgerError::io(staged.path(), e))?;
        let rows = self.codec.read_rows(&staged_bytes)?;

        let aggregation = aggregate(&rows)?;
        for skipped in &aggregation.skipped {
            tracing::warn!("{file_name}: skipping row {}: {}", skipped.row, skipped.reason);
        }

        let original_path = self.store.put_original(file_name, bytes)?;

        let batch = batch_name(file_name).to_string();
        let documents = match self.store.put(&batch, &aggregation.companies) {
            Ok(documents) => documents,
            Err(err) => {
                if let Err(cleanup) = self.store.discard_original(file_name) {
                    tracing::error!("failed to discard original {file_name}: {cleanup}");
                }
                return Err(err);
            }
        };

        tracing::info!(
            "ingested {file_name}: {} compan(y/ies), {} row(s) skipped",
            documents.len(),
            aggregation.skipped.len()
        );

        Ok(IngestReport {
            batch,
            original_path,
            documents,
            skipped: aggregation.skipped,
        })
    }
}

/// Delete a temporary file by path.
pub fn cleanup_temp_file(path: &Path) -> Result<(), LedgerError> {
    fs::remove_file(path).map_err(|e| LedgerError::io(path, e))?;
    tracing::info!("temporary file cleaned up: {}", path.display());
    Ok(())
}

/// Upload bytes staged on disk; removed on drop.
struct StagedUpload {
    path: PathBuf,
}

impl StagedUpload {
    fn write(dir: &Path, ext: &str, bytes: &[u8]) -> Result<Self, LedgerError> {
        fs::create_dir_all(dir).map_err(|e| LedgerError::io(dir, e))?;
        let path = dir.join(format!("upload-{}.{ext}", Uuid::now_v7()));
        fs::write(&path, bytes).map_err(|e| LedgerError::io(&path, e))?;
        Ok(Self { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            tracing::warn!("failed to remove staged upload {}: {err}", self.path.display());
        }
    }
}
