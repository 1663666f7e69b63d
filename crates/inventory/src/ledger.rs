use serde::{Deserialize, Serialize};

use stocktally_core::{DomainError, DomainResult};

/// Header row of every tabular view of a ledger (mirror sheets and exports).
pub const SHEET_HEADER: [&str; 4] = ["Company", "Finish", "Item No", "Quantity"];

/// A stocked item inside a finish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub item_no: String,
    pub quantity: i64,
    #[serde(default)]
    pub alternates: Vec<String>,
}

impl Item {
    pub fn new(item_no: impl Into<String>, quantity: i64) -> Self {
        Self {
            item_no: item_no.into(),
            quantity,
            alternates: Vec::new(),
        }
    }
}

/// A named grouping of items under a company (e.g. a surface treatment).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finish {
    pub name: String,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Finish {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
        }
    }

    /// First item with this exact item number.
    pub fn item(&self, item_no: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.item_no == item_no)
    }

    fn item_mut(&mut self, item_no: &str) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.item_no == item_no)
    }
}

/// Root of one ledger document.
///
/// Serialized as `{"company": ..., "finishes": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    #[serde(rename = "company")]
    pub name: String,
    #[serde(default)]
    pub finishes: Vec<Finish>,
}

/// Outcome of a successful stock adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdjustment {
    pub company: String,
    pub finish: String,
    pub item_no: String,
    pub previous: i64,
    pub quantity: i64,
}

impl Company {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            finishes: Vec::new(),
        }
    }

    /// Finish with this exact name.
    pub fn finish(&self, name: &str) -> Option<&Finish> {
        self.finishes.iter().find(|f| f.name == name)
    }

    /// Finish with this exact name, appended (empty) if absent.
    pub fn finish_or_insert(&mut self, name: &str) -> &mut Finish {
        let idx = match self.finishes.iter().position(|f| f.name == name) {
            Some(idx) => idx,
            None => {
                self.finishes.push(Finish::new(name));
                self.finishes.len() - 1
            }
        };
        &mut self.finishes[idx]
    }

    /// Every `(finish, item)` pair in document order.
    pub fn items(&self) -> impl Iterator<Item = (&Finish, &Item)> {
        self.finishes
            .iter()
            .flat_map(|f| f.items.iter().map(move |i| (f, i)))
    }

    pub fn item_count(&self) -> usize {
        self.finishes.iter().map(|f| f.items.len()).sum()
    }

    /// Apply a signed delta to one item.
    ///
    /// The first finish named `finish` is searched for the first item numbered
    /// `item_no`. Nothing changes unless the resulting quantity is non-negative.
    pub fn adjust_stock(
        &mut self,
        finish: &str,
        item_no: &str,
        delta: i64,
    ) -> DomainResult<StockAdjustment> {
        let company = self.name.clone();
        let finish_entry = self
            .finishes
            .iter_mut()
            .find(|f| f.name == finish)
            .ok_or_else(|| DomainError::not_found(format!("finish '{finish}' in {company}")))?;

        let item = finish_entry
            .item_mut(item_no)
            .ok_or_else(|| DomainError::not_found(format!("item '{item_no}' in finish '{finish}'")))?;

        let previous = item.quantity;
        let quantity = previous
            .checked_add(delta)
            .ok_or_else(|| DomainError::validation(format!("quantity overflow for {item_no}")))?;
        if quantity < 0 {
            return Err(DomainError::insufficient_stock(item_no, previous, delta));
        }
        item.quantity = quantity;

        Ok(StockAdjustment {
            company,
            finish: finish.to_string(),
            item_no: item_no.to_string(),
            previous,
            quantity,
        })
    }

    /// Check invariants that every stored company must hold.
    pub fn check_invariants(&self) -> DomainResult<()> {
        for (finish, item) in self.items() {
            if item.quantity < 0 {
                return Err(DomainError::invariant(format!(
                    "negative quantity {} for {} in finish '{}'",
                    item.quantity, item.item_no, finish.name
                )));
            }
        }
        Ok(())
    }

    /// Tabular rows `[company, finish, item_no, quantity]`, one per item, header excluded.
    pub fn sheet_rows(&self) -> impl Iterator<Item = [String; 4]> + '_ {
        self.items().map(|(finish, item)| {
            [
                self.name.clone(),
                finish.name.clone(),
                item.item_no.clone(),
                item.quantity.to_string(),
            ]
        })
    }
}
