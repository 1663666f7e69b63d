//! Filesystem-backed ledger store.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use stocktally_core::LedgerKey;
use stocktally_inventory::{Company, CompanyMap};

use super::retention::{self, RetentionPolicy, SweepReport};
use super::r#trait::{FileRecord, LedgerStore};
use crate::config::StoreConfig;
use crate::error::LedgerError;

const DOCUMENT_EXT: &str = "json";

/// Ledger store over `{data_dir}/files` and `{data_dir}/processed`.
#[derive(Debug, Clone)]
pub struct FsLedgerStore {
    originals_dir: PathBuf,
    ledger_dir: PathBuf,
    mirror_ext: String,
}

impl FsLedgerStore {
    /// Open the store, creating both directories if absent.
    ///
    /// `mirror_ext` is the extension (without the dot) of regenerated mirror
    /// sheets, normally the sheet codec's.
    pub fn open(config: &StoreConfig, mirror_ext: impl Into<String>) -> Result<Self, LedgerError> {
        let store = Self {
            originals_dir: config.originals_dir(),
            ledger_dir: config.ledger_dir(),
            mirror_ext: mirror_ext.into(),
        };

        for dir in [&store.originals_dir, &store.ledger_dir] {
            fs::create_dir_all(dir).map_err(|e| LedgerError::io(dir, e))?;
        }
        tracing::debug!("ledger store opened at {}", config.data_dir().display());

        Ok(store)
    }

    pub fn originals_dir(&self) -> &Path {
        &self.originals_dir
    }

    pub fn ledger_dir(&self) -> &Path {
        &self.ledger_dir
    }

    /// Resolve the document path of every company in the batch.
    ///
    /// Fails before anything is written if two companies map to the same file
    /// name, or if a document with that name is already stored.
    fn document_targets<'a>(
        &self,
        batch: &str,
        companies: &'a CompanyMap,
    ) -> Result<Vec<(LedgerKey, PathBuf, &'a Company)>, LedgerError> {
        let mut seen: HashMap<String, String> = HashMap::with_capacity(companies.len());
        let mut targets = Vec::with_capacity(companies.len());

        for company in companies.iter() {
            let key = LedgerKey::new(batch, company.name.as_str())?;
            let file_name = key.document_file_name();

            if let Some(other) = seen.insert(file_name.clone(), company.name.clone()) {
                return Err(LedgerError::AlreadyExists(format!(
                    "{file_name} (companies '{other}' and '{}' share a document name)",
                    company.name
                )));
            }

            let path = self.ledger_dir.join(&file_name);
            if path.try_exists().map_err(|e| LedgerError::io(&path, e))? {
                return Err(LedgerError::AlreadyExists(path.display().to_string()));
            }

            targets.push((key, path, company));
        }

        Ok(targets)
    }

    fn original_path(&self, file_name: &str) -> Result<PathBuf, LedgerError> {
        validate_file_name(file_name)?;
        Ok(self.originals_dir.join(file_name))
    }
}

impl LedgerStore for FsLedgerStore {
    fn put(&self, batch: &str, companies: &CompanyMap) -> Result<Vec<PathBuf>, LedgerError> {
        let targets = self.document_targets(batch, companies)?;
        let mut written = Vec::with_capacity(targets.len());

        for (key, path, company) in targets {
            if let Err(err) = write_document(&path, company) {
                tracing::error!(
                    "failed to write ledger for {key} ({} of {} already written): {err}",
                    written.len(),
                    companies.len()
                );
                return Err(err);
            }

            tracing::info!("ledger document saved: {}", path.display());
            written.push(path);
        }

        Ok(written)
    }

    fn put_original(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, LedgerError> {
        let path = self.original_path(file_name)?;

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::AlreadyExists => LedgerError::AlreadyExists(file_name.to_string()),
                _ => LedgerError::io(&path, e),
            })?;
        file.write_all(bytes)
            .and_then(|_| file.sync_all())
            .map_err(|e| LedgerError::io(&path, e))?;

        tracing::info!("original file saved: {}", path.display());
        Ok(path)
    }

    fn has_original(&self, file_name: &str) -> Result<bool, LedgerError> {
        let path = self.original_path(file_name)?;
        path.try_exists().map_err(|e| LedgerError::io(&path, e))
    }

    fn discard_original(&self, file_name: &str) -> Result<(), LedgerError> {
        let path = self.original_path(file_name)?;
        fs::remove_file(&path).map_err(|e| LedgerError::io(&path, e))?;
        tracing::info!("original file discarded: {}", path.display());
        Ok(())
    }

    fn list(&self) -> Result<Vec<FileRecord>, LedgerError> {
        let entries = fs::read_dir(&self.ledger_dir).map_err(|e| LedgerError::io(&self.ledger_dir, e))?;

        let mut records = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| LedgerError::io(&self.ledger_dir, e))?;
            let ledger_path = entry.path();
            if ledger_path.extension().and_then(|e| e.to_str()) != Some(DOCUMENT_EXT) {
                continue;
            }

            let modified = match entry.metadata().and_then(|m| {
                if m.is_file() {
                    m.modified().map(Some)
                } else {
                    Ok(None)
                }
            }) {
                Ok(Some(modified)) => modified,
                Ok(None) => continue,
                Err(err) => {
                    tracing::warn!("skipping {}: cannot read metadata: {err}", ledger_path.display());
                    continue;
                }
            };

            let Some(name) = ledger_path.file_stem().and_then(|s| s.to_str()) else {
                tracing::warn!("skipping non UTF-8 document name: {}", ledger_path.display());
                continue;
            };

            records.push(FileRecord {
                name: name.to_string(),
                mirror_path: self.mirror_path(&ledger_path)?,
                ledger_path,
                last_modified: DateTime::<Utc>::from(modified),
            });
        }

        records.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(records)
    }

    fn get(&self, ledger_path: &Path) -> Result<Company, LedgerError> {
        let bytes = fs::read(ledger_path).map_err(|e| LedgerError::io(ledger_path, e))?;

        let company: Company =
            serde_json::from_slice(&bytes).map_err(|e| LedgerError::corrupt(ledger_path, e))?;
        company
            .check_invariants()
            .map_err(|e| LedgerError::corrupt(ledger_path, e))?;

        tracing::debug!("ledger document loaded: {}", ledger_path.display());
        Ok(company)
    }

    fn replace(&self, ledger_path: &Path, company: &Company) -> Result<(), LedgerError> {
        write_document(ledger_path, company)?;
        tracing::info!("ledger document updated: {}", ledger_path.display());
        Ok(())
    }

    fn mirror_path(&self, ledger_path: &Path) -> Result<PathBuf, LedgerError> {
        let stem = ledger_path
            .file_stem()
            .ok_or_else(|| LedgerError::Validation(format!("not a ledger document: {}", ledger_path.display())))?;

        let mut file_name = stem.to_os_string();
        file_name.push(".");
        file_name.push(&self.mirror_ext);
        Ok(self.originals_dir.join(file_name))
    }

    fn put_mirror(&self, ledger_path: &Path, bytes: &[u8]) -> Result<PathBuf, LedgerError> {
        let mirror = self.mirror_path(ledger_path)?;
        write_atomic(&mirror, bytes)?;
        tracing::info!("mirror regenerated: {}", mirror.display());
        Ok(mirror)
    }

    fn sweep(&self, policy: RetentionPolicy, now: DateTime<Utc>) -> Result<SweepReport, LedgerError> {
        let mut report = SweepReport {
            cutoff: policy.cutoff(now),
            removed: Vec::new(),
        };

        for dir in [&self.originals_dir, &self.ledger_dir] {
            retention::sweep_dir(dir, policy, now, &mut report, |path| fs::remove_file(path))?;
        }

        tracing::info!(
            "cleanup completed: {} file(s) older than {} removed",
            report.removed.len(),
            report.cutoff.to_rfc3339()
        );
        Ok(report)
    }
}

/// Serialize a company as a 4-space indented document.
pub fn encode_document(company: &Company) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    company.serialize(&mut ser)?;
    Ok(buf)
}

fn write_document(path: &Path, company: &Company) -> Result<(), LedgerError> {
    let bytes = encode_document(company).map_err(|e| LedgerError::io(path, e.into()))?;
    write_atomic(path, &bytes)
}

/// Write to a `.tmp` sibling, fsync, then rename over `path`.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), LedgerError> {
    let mut tmp_name = path.as_os_str().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let result = File::create(&tmp_path)
        .and_then(|mut file| {
            file.write_all(bytes)?;
            file.sync_all()
        })
        .and_then(|_| fs::rename(&tmp_path, path));

    if let Err(err) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(LedgerError::io(path, err));
    }
    Ok(())
}

fn validate_file_name(file_name: &str) -> Result<(), LedgerError> {
    let invalid = file_name.trim().is_empty()
        || file_name == "."
        || file_name == ".."
        || file_name.contains(['/', '\\']);
    if invalid {
        return Err(LedgerError::Validation(format!("invalid file name '{file_name}'")));
    }
    Ok(())
}
