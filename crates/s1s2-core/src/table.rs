//! Fixed-size pagination over risk rows.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::dataset::RiskRow;

/// Rows per table page.
pub const TABLE_PAGE_SIZE: usize = 10;

/// One page of the data grid.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TablePage {
    /// Zero-based page index after clamping.
    pub page: usize,
    pub page_count: usize,
    pub total_rows: usize,
    /// Index of the first row on this page within the dataset.
    pub first_row: usize,
    pub rows: Vec<RiskRow>,
}

impl TablePage {
    /// Slice `rows` into the requested page. Pages past the end clamp to the
    /// last page; an empty dataset yields a single empty page.
    #[must_use]
    pub fn paginate(rows: &[RiskRow], page: usize) -> Self {
        let page_count = rows.len().div_ceil(TABLE_PAGE_SIZE).max(1);
        let page = page.min(page_count - 1);
        let first_row = page * TABLE_PAGE_SIZE;
        let end = (first_row + TABLE_PAGE_SIZE).min(rows.len());
        Self {
            page,
            page_count,
            total_rows: rows.len(),
            first_row,
            rows: rows.get(first_row..end).unwrap_or_default().to_vec(),
        }
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 0
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page + 1 < self.page_count
    }
}
