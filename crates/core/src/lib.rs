//! `stocktally-core` — shared building blocks.
//!
//! This crate contains **pure** primitives (no filesystem, no serialization
//! formats): the domain error model and the ledger document key.

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{LedgerKey, batch_name};
