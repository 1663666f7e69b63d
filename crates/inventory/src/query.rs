//! Item-level filters used by the stock queries.

use stocktally_core::{DomainError, DomainResult};

use crate::ledger::{Company, Finish, Item};

/// Parsed token search.
///
/// Matching is case-insensitive substring containment. Tokens are stored
/// lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    /// One token: matches the finish name or the item number.
    Any(String),
    /// Two or more tokens: the first filters finish names, the second item
    /// numbers, both must match. Further tokens are ignored.
    FinishAndItem { finish: String, item_no: String },
}

impl SearchQuery {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let mut tokens = raw.split_whitespace().map(str::to_lowercase);
        let first = tokens
            .next()
            .ok_or_else(|| DomainError::validation("search query is empty"))?;

        Ok(match tokens.next() {
            Some(second) => SearchQuery::FinishAndItem {
                finish: first,
                item_no: second,
            },
            None => SearchQuery::Any(first),
        })
    }

    pub fn matches(&self, finish: &Finish, item: &Item) -> bool {
        match self {
            SearchQuery::Any(token) => {
                contains_ci(&finish.name, token) || contains_ci(&item.item_no, token)
            }
            SearchQuery::FinishAndItem {
                finish: finish_token,
                item_no,
            } => contains_ci(&finish.name, finish_token) && contains_ci(&item.item_no, item_no),
        }
    }

    /// Items of `company` matching this query, in document order.
    pub fn filter<'a>(&'a self, company: &'a Company) -> impl Iterator<Item = (&'a Finish, &'a Item)> {
        company.items().filter(move |(f, i)| self.matches(f, i))
    }
}

/// Items of `company` whose quantity is strictly below `threshold`.
pub fn low_stock(company: &Company, threshold: i64) -> impl Iterator<Item = (&Finish, &Item)> {
    company.items().filter(move |(_, i)| i.quantity < threshold)
}

fn contains_ci(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}
