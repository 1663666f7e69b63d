//! Infrastructure layer: ledger files, sheet codecs, configuration, and the
//! services built on them.

pub mod config;
pub mod error;
pub mod ledger_store;
pub mod services;
pub mod sheet;

pub use config::StoreConfig;
pub use error::LedgerError;
pub use ledger_store::{FileRecord, FsLedgerStore, LedgerStore, RetentionPolicy, SweepReport};
pub use sheet::{CsvSheet, SheetCodec};
