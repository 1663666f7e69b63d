use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stocktally_inventory::{Company, CompanyMap};

use super::retention::{RetentionPolicy, SweepReport};
use crate::error::LedgerError;

/// A ledger document as seen by a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Document stem, `{batch}_{company}`.
    pub name: String,
    pub ledger_path: PathBuf,
    /// Expected location of the mirror sheet (may not exist yet).
    pub mirror_path: PathBuf,
    pub last_modified: DateTime<Utc>,
}

/// Repository of ledger documents and their originals.
///
/// Writes of individual documents are atomic (temp file + rename); a batch of
/// documents is not. There is no locking: a single caller is assumed.
pub trait LedgerStore: Send + Sync {
    /// Write one document per company. Stops at the first failing company;
    /// documents written before it are kept.
    fn put(&self, batch: &str, companies: &CompanyMap) -> Result<Vec<PathBuf>, LedgerError>;

    /// Store an uploaded original. Never overwrites.
    fn put_original(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, LedgerError>;

    fn has_original(&self, file_name: &str) -> Result<bool, LedgerError>;

    /// Remove a stored original (ingestion rollback).
    fn discard_original(&self, file_name: &str) -> Result<(), LedgerError>;

    /// All ledger documents, sorted by name.
    fn list(&self) -> Result<Vec<FileRecord>, LedgerError>;

    fn get(&self, ledger_path: &Path) -> Result<Company, LedgerError>;

    /// Overwrite an existing document in place.
    fn replace(&self, ledger_path: &Path, company: &Company) -> Result<(), LedgerError>;

    fn mirror_path(&self, ledger_path: &Path) -> Result<PathBuf, LedgerError>;

    /// Write the mirror sheet of a document, replacing any previous one.
    fn put_mirror(&self, ledger_path: &Path, bytes: &[u8]) -> Result<PathBuf, LedgerError>;

    /// Delete originals and documents last modified before the retention cutoff.
    fn sweep(&self, policy: RetentionPolicy, now: DateTime<Utc>) -> Result<SweepReport, LedgerError>;
}

impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    fn put(&self, batch: &str, companies: &CompanyMap) -> Result<Vec<PathBuf>, LedgerError> {
        (**self).put(batch, companies)
    }

    fn put_original(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, LedgerError> {
        (**self).put_original(file_name, bytes)
    }

    fn has_original(&self, file_name: &str) -> Result<bool, LedgerError> {
        (**self).has_original(file_name)
    }

    fn discard_original(&self, file_name: &str) -> Result<(), LedgerError> {
        (**self).discard_original(file_name)
    }

    fn list(&self) -> Result<Vec<FileRecord>, LedgerError> {
        (**self).list()
    }

    fn get(&self, ledger_path: &Path) -> Result<Company, LedgerError> {
        (**self).get(ledger_path)
    }

    fn replace(&self, ledger_path: &Path, company: &Company) -> Result<(), LedgerError> {
        (**self).replace(ledger_path, company)
    }

    fn mirror_path(&self, ledger_path: &Path) -> Result<PathBuf, LedgerError> {
        (**self).mirror_path(ledger_path)
    }

    fn put_mirror(&self, ledger_path: &Path, bytes: &[u8]) -> Result<PathBuf, LedgerError> {
        (**self).put_mirror(ledger_path, bytes)
    }

    fn sweep(&self, policy: RetentionPolicy, now: DateTime<Utc>) -> Result<SweepReport, LedgerError> {
        (**self).sweep(policy, now)
    }
}
