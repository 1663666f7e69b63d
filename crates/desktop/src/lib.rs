//! `stocktally-desktop`
//!
//! **Responsibility:** the operation surface consumed by the desktop shell.
//!
//! This crate provides:
//! - `AppState`, wiring one ledger store into the ingestion, mutation and
//!   query services
//! - command functions returning `Result<T, String>` for the shell
//! - wire shapes matching what the shell renders
//!
//! The shell itself is out of scope; `main.rs` drives the same commands from
//! the command line.

pub mod commands;
pub mod types;

pub use commands::AppState;
pub use types::{FileInfo, LowStockItem, SearchResult};
