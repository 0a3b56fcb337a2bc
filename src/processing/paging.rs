//! Raw-record paging over a [`Dataset`], five records at a time.

use crate::types::{Dataset, TripRecord};

/// Records per page.
pub const PAGE_SIZE: usize = 5;

/// Up to [`PAGE_SIZE`] records starting at `offset`.
///
/// Returns fewer records near the end and an empty slice at or past the end; never panics.
pub fn page(dataset: &Dataset, offset: usize) -> &[TripRecord] {
    let records = dataset.records.as_slice();
    let start = offset.min(records.len());
    let end = offset.saturating_add(PAGE_SIZE).min(records.len());
    &records[start..end]
}

/// Offset of the page after the one at `offset`.
pub fn next_offset(offset: usize) -> usize {
    offset.saturating_add(PAGE_SIZE)
}
