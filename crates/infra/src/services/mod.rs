//! Operations composed over the ledger store.

pub mod export;
pub mod ingest;
pub mod mutation;
pub mod query;

pub use export::export_all_to_csv;
pub use ingest::{IngestReport, IngestService, cleanup_temp_file};
pub use mutation::MutationService;
pub use query::{LowStockResult, QueryEngine, SearchResult, StockHit};
