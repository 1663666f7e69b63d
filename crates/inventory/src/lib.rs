//! Inventory ledger domain.
//!
//! This crate contains the Company → Finish → Item model and the rules that act
//! on it, implemented purely as deterministic domain logic (no IO, no storage).

pub mod ledger;
pub mod query;
pub mod rows;

pub use ledger::{Company, Finish, Item, SHEET_HEADER, StockAdjustment};
pub use query::{SearchQuery, low_stock};
pub use rows::{Aggregation, CompanyMap, RawRow, SkipReason, SkippedRow, aggregate};
