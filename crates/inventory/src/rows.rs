//! Row aggregation: flat sheet rows into per-company ledgers.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use stocktally_core::{DomainError, DomainResult};

use crate::ledger::{Company, Item};

/// One sheet row, positional: company, finish, item number, quantity.
pub type RawRow = Vec<String>;

/// Minimum number of fields a data row must carry.
const ROW_FIELDS: usize = 4;

/// Companies keyed by name, iterated in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyMap {
    companies: Vec<Company>,
    index: HashMap<String, usize>,
}

impl CompanyMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Company> {
        self.index.get(name).map(|&idx| &self.companies[idx])
    }

    /// Company with this name, created (with no finishes) if absent.
    pub fn get_or_insert(&mut self, name: &str) -> &mut Company {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                self.companies.push(Company::new(name));
                let idx = self.companies.len() - 1;
                self.index.insert(name.to_string(), idx);
                idx
            }
        };
        &mut self.companies[idx]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Company> {
        self.companies.iter()
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }

    pub fn into_companies(self) -> Vec<Company> {
        self.companies
    }
}

impl FromIterator<Company> for CompanyMap {
    fn from_iter<T: IntoIterator<Item = Company>>(iter: T) -> Self {
        let mut map = CompanyMap::new();
        for company in iter {
            let name = company.name.clone();
            *map.get_or_insert(&name) = company;
        }
        map
    }
}

/// Why a data row was left out of an aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    MissingColumns { found: usize },
    InvalidQuantity { text: String },
    NegativeQuantity { quantity: i64 },
}

impl core::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SkipReason::MissingColumns { found } => {
                write!(f, "insufficient columns ({found} of {ROW_FIELDS})")
            }
            SkipReason::InvalidQuantity { text } => write!(f, "invalid quantity '{text}'"),
            SkipReason::NegativeQuantity { quantity } => {
                write!(f, "negative quantity {quantity}")
            }
        }
    }
}

/// A dropped row, numbered as it appears in the sheet (header is row 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    pub row: usize,
    pub reason: SkipReason,
}

/// Result of folding a sheet into ledgers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    pub companies: CompanyMap,
    pub skipped: Vec<SkippedRow>,
}

/// Aggregate sheet rows into companies.
///
/// The first row is the header and is never read. Malformed data rows are
/// dropped and reported in `skipped`; every valid row appends a new item, even
/// when the same `(finish, item_no)` was already seen.
pub fn aggregate(rows: &[RawRow]) -> DomainResult<Aggregation> {
    if rows.len() < 2 {
        return Err(DomainError::validation("file contains no data rows"));
    }

    let aggregation = rows
        .iter()
        .enumerate()
        .skip(1)
        .fold(Aggregation::default(), |mut acc, (idx, row)| {
            match parse_row(row) {
                Ok((company, finish, item)) => acc
                    .companies
                    .get_or_insert(company)
                    .finish_or_insert(finish)
                    .items
                    .push(item),
                Err(reason) => acc.skipped.push(SkippedRow {
                    row: idx + 1,
                    reason,
                }),
            }
            acc
        });

    Ok(aggregation)
}

fn parse_row(row: &[String]) -> Result<(&str, &str, Item), SkipReason> {
    if row.len() < ROW_FIELDS {
        return Err(SkipReason::MissingColumns { found: row.len() });
    }

    let quantity_text = row[3].trim();
    let quantity: i64 = quantity_text
        .parse()
        .map_err(|_| SkipReason::InvalidQuantity {
            text: row[3].clone(),
        })?;
    if quantity < 0 {
        return Err(SkipReason::NegativeQuantity { quantity });
    }

    Ok((&row[0], &row[1], Item::new(row[2].as_str(), quantity)))
}
