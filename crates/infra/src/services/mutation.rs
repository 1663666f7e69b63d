//! Stock adjustment against a stored ledger document.

use std::path::Path;

use stocktally_inventory::{RawRow, SHEET_HEADER, StockAdjustment};

use crate::error::LedgerError;
use crate::ledger_store::LedgerStore;
use crate::sheet::SheetCodec;

/// Applies quantity deltas and keeps the mirror sheet in step.
#[derive(Debug, Clone)]
pub struct MutationService<S, C> {
    store: S,
    codec: C,
}

impl<S, C> MutationService<S, C>
where
    S: LedgerStore,
    C: SheetCodec,
{
    pub fn new(store: S, codec: C) -> Self {
        Self { store, codec }
    }

    /// Add `delta` (possibly negative) to one item's quantity.
    ///
    /// Order of effects:
    /// 1) the ledger document is rewritten (durable step)
    /// 2) the mirror sheet is regenerated from the updated document
    ///
    /// A rejected adjustment writes nothing. A failed mirror write leaves the
    /// ledger update in place and is reported as `MirrorStale`.
    pub fn adjust_stock(
        &self,
        ledger_path: &Path,
        finish: &str,
        item_no: &str,
        delta: i64,
    ) -> Result<StockAdjustment, LedgerError> {
        let mut company = self.store.get(ledger_path)?;

        let adjustment = company.adjust_stock(finish, item_no, delta)?;
        self.store.replace(ledger_path, &company)?;

        tracing::info!(
            "stock adjusted: {} / {} / {} {} -> {} (delta {delta})",
            adjustment.company,
            adjustment.finish,
            adjustment.item_no,
            adjustment.previous,
            adjustment.quantity
        );

        let mut rows: Vec<RawRow> = Vec::with_capacity(company.item_count() + 1);
        rows.push(SHEET_HEADER.iter().map(|h| h.to_string()).collect());
        rows.extend(company.sheet_rows().map(Vec::from));

        let mirrored = self
            .codec
            .write_rows(&rows)
            .and_then(|bytes| self.store.put_mirror(ledger_path, &bytes));

        if let Err(err) = mirrored {
            let mirror = self.store.mirror_path(ledger_path)?;
            tracing::error!("mirror {} is stale: {err}", mirror.display());
            return Err(LedgerError::MirrorStale {
                ledger: ledger_path.to_path_buf(),
                mirror,
                source: Box::new(err),
            });
        }

        Ok(adjustment)
    }
}
