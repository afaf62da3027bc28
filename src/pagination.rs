//! This modules defines the common functionality for paging data.

use serde::{Deserialize, Serialize};

/// The config for pagination
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationConfig {
    /// The number of items per page when not specified in a request.
    pub default_limit: usize,
    /// The largest number of items a request may ask for in one page.
    pub max_limit: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
        }
    }
}

/// Describes where a page sits within the full, filtered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// The number of items before paging was applied.
    pub total: usize,
    /// The requested page size.
    pub limit: usize,
    /// The number of items skipped before this page.
    pub offset: usize,
    /// Whether there are items after this page.
    pub has_more: bool,
}

impl PaginationMeta {
    /// Describe the page `[offset, offset + limit)` out of `total` items.
    pub fn new(total: usize, limit: usize, offset: usize) -> Self {
        Self {
            total,
            limit,
            offset,
            has_more: offset.saturating_add(limit) < total,
        }
    }
}
