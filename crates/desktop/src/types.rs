//! Wire shapes handed to the desktop shell.
//!
//! Field names match what the shell's views bind to, including the camelCase
//! keys of search results.

use serde::{Deserialize, Serialize};

use stocktally_infra::FileRecord;
use stocktally_infra::services::StockHit;

/// A processed ledger document as listed in the shell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: String,
    pub path: String,
    pub original_path: String,
    /// RFC 3339 modification time.
    pub last_used: String,
}

impl From<FileRecord> for FileInfo {
    fn from(record: FileRecord) -> Self {
        Self {
            name: record.name,
            path: record.ledger_path.display().to_string(),
            original_path: record.mirror_path.display().to_string(),
            last_used: record.last_modified.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockItem {
    pub company: String,
    pub finish: String,
    pub item_no: String,
    pub quantity: i64,
    pub file_path: String,
}

impl From<StockHit> for LowStockItem {
    fn from(hit: StockHit) -> Self {
        Self {
            company: hit.company,
            finish: hit.finish,
            item_no: hit.item_no,
            quantity: hit.quantity,
            file_path: hit.ledger_path.display().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub company: String,
    pub finish: String,
    pub item_no: String,
    pub quantity: i64,
    pub file_path: String,
}

impl From<StockHit> for SearchResult {
    fn from(hit: StockHit) -> Self {
        Self {
            company: hit.company,
            finish: hit.finish,
            item_no: hit.item_no,
            quantity: hit.quantity,
            file_path: hit.ledger_path.display().to_string(),
        }
    }
}
