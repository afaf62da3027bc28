//! Defines how transactions are filtered, sorted and paged by
//! [TransactionStore::find_all](super::TransactionStore::find_all).

use std::{cmp::Ordering, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use super::core::{Category, Transaction, TransactionType, UnknownVariant};

/// The number of transactions in a page when a request does not specify a limit.
pub const DEFAULT_LIMIT: usize = 20;

/// The field to sort transactions by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    /// Sort chronologically by creation time.
    #[default]
    CreatedAt,
    /// Sort numerically by amount.
    Amount,
    /// Sort alphabetically by title.
    Title,
}

impl SortBy {
    /// Every sort field.
    pub const ALL: [SortBy; 3] = [SortBy::CreatedAt, SortBy::Amount, SortBy::Title];

    /// The name used for this field in query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            SortBy::CreatedAt => "createdAt",
            SortBy::Amount => "amount",
            SortBy::Title => "title",
        }
    }

    /// Compare two transactions by this field in ascending order.
    pub fn compare(self, a: &Transaction, b: &Transaction) -> Ordering {
        match self {
            SortBy::CreatedAt => a.created_at.cmp(&b.created_at),
            SortBy::Amount => a.amount.total_cmp(&b.amount),
            SortBy::Title => compare_titles(&a.title, &b.title),
        }
    }
}

impl Display for SortBy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortBy::ALL
            .into_iter()
            .find(|sort_by| sort_by.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("sort field", s))
    }
}

/// Titles compare case-insensitively first so that "apple" sorts next to "Apple".
/// Ties fall back to byte order to keep the ordering total.
fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// The order to sort transactions in a [TransactionQuery].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    /// Sort in order of increasing value.
    #[serde(rename = "asc")]
    Ascending,
    /// Sort in order of decreasing value.
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl SortOrder {
    /// Every sort order.
    pub const ALL: [SortOrder; 2] = [SortOrder::Ascending, SortOrder::Descending];

    /// The name used for this order in query strings.
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }

    /// Flip an ascending `ordering` if this order is descending.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOrder::ALL
            .into_iter()
            .find(|sort_order| sort_order.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("sort order", s))
    }
}

/// Defines how transactions should be fetched from
/// [TransactionStore::find_all](super::TransactionStore::find_all).
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionQuery {
    /// Only include transactions of this type.
    pub transaction_type: Option<TransactionType>,
    /// Only include transactions in this category.
    pub category: Option<Category>,
    /// The field to sort by.
    pub sort_by: SortBy,
    /// The direction to sort in.
    pub sort_order: SortOrder,
    /// Selects up to `limit` transactions.
    pub limit: usize,
    /// Skip this many transactions from the start of the sorted list.
    pub offset: usize,
}

impl Default for TransactionQuery {
    fn default() -> Self {
        Self {
            transaction_type: None,
            category: None,
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl TransactionQuery {
    /// Whether `transaction` passes the type and category filters.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.transaction_type
            .is_none_or(|transaction_type| transaction.transaction_type == transaction_type)
            && self
                .category
                .is_none_or(|category| transaction.category == category)
    }
}

/// One page of the transactions selected by a [TransactionQuery].
#[derive(Debug, PartialEq)]
pub struct TransactionPage<'a> {
    /// The transactions in the page, in sorted order.
    pub transactions: Vec<&'a Transaction>,
    /// The number of transactions that matched the filters before paging.
    pub total: usize,
}
