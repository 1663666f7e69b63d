//! Errors surfaced by the ledger store and the services built on it.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use stocktally_core::DomainError;

/// Ledger operation error.
///
/// Every public operation either succeeds or returns one of these; there is no
/// fallback value substitution.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error(
        "insufficient stock for {item_no}: have {available}, change of {delta} would go below zero"
    )]
    InsufficientStock {
        item_no: String,
        available: i64,
        delta: i64,
    },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("corrupt ledger document {}: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("no matches: {0}")]
    NoMatches(String),

    #[error("sheet error: {0}")]
    Sheet(String),

    /// The ledger write committed but the mirror could not be regenerated.
    #[error("ledger {} updated but mirror {} is stale: {source}", .ledger.display(), .mirror.display())]
    MirrorStale {
        ledger: PathBuf,
        mirror: PathBuf,
        #[source]
        source: Box<LedgerError>,
    },
}

impl LedgerError {
    /// Wrap an I/O error, mapping a missing file to `NotFound`.
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        let path = path.as_ref();
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.display().to_string()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    pub fn corrupt(path: impl AsRef<Path>, reason: impl ToString) -> Self {
        Self::Corrupt {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }
}

impl From<DomainError> for LedgerError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) | DomainError::InvariantViolation(msg) => {
                Self::Validation(msg)
            }
            DomainError::NotFound(what) => Self::NotFound(what),
            DomainError::InsufficientStock {
                item_no,
                available,
                delta,
            } => Self::InsufficientStock {
                item_no,
                available,
                delta,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_maps_to_not_found() {
        let err = LedgerError::io("/tmp/x.json", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, LedgerError::NotFound(p) if p.ends_with("x.json")));

        let err = LedgerError::io("/tmp/x.json", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, LedgerError::Io { .. }));
    }

    #[test]
    fn domain_errors_keep_their_kind() {
        let err: LedgerError = DomainError::insufficient_stock("I-1", 2, -3).into();
        assert!(matches!(
            err,
            LedgerError::InsufficientStock { available: 2, delta: -3, .. }
        ));
        let err: LedgerError = DomainError::not_found("finish 'Matte'").into();
        assert_eq!(err.to_string(), "not found: finish 'Matte'");
    }
}
