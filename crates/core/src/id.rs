//! Ledger document identity.
//!
//! A ledger document is identified by the batch it was ingested in and the
//! company it describes. The on-disk file name is derived from that pair in one
//! place so the ledger, its mirror, and the listing agree.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Characters that cannot appear in a document file name on common filesystems.
const UNSAFE_FILE_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// `(batch, company)` pair naming one ledger document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerKey {
    batch: String,
    company: String,
}

impl LedgerKey {
    pub fn new(batch: impl Into<String>, company: impl Into<String>) -> Result<Self, DomainError> {
        let batch = batch.into();
        if batch.trim().is_empty() {
            return Err(DomainError::validation("batch name cannot be empty"));
        }
        Ok(Self {
            batch,
            company: company.into(),
        })
    }

    pub fn batch(&self) -> &str {
        &self.batch
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    /// File stem shared by the ledger document and its mirror: `{batch}_{company}`.
    pub fn file_stem(&self) -> String {
        format!(
            "{}_{}",
            sanitize_component(&self.batch),
            sanitize_component(&self.company)
        )
    }

    /// Ledger document file name: `{batch}_{company}.json`.
    pub fn document_file_name(&self) -> String {
        format!("{}.json", self.file_stem())
    }
}

impl core::fmt::Display for LedgerKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.batch, self.company)
    }
}

/// Batch name of an uploaded file: its file name without the final extension.
pub fn batch_name(original_file_name: &str) -> &str {
    match original_file_name.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => original_file_name,
    }
}

fn sanitize_component(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if UNSAFE_FILE_CHARS.contains(&c) || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect()
}
