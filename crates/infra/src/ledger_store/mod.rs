//! Durable ledger documents.
//!
//! One JSON document per `(batch, company)` lives in the ledger directory; the
//! originals directory holds uploaded files and the regenerated mirror sheets.

pub mod fs;
pub mod retention;
pub mod r#trait;

pub use fs::FsLedgerStore;
pub use retention::{RetentionPolicy, SweepReport};
pub use r#trait::{FileRecord, LedgerStore};
