//! Record filtering for [`crate::types::Dataset`].

use crate::types::{Dataset, FilterSpec, TripRecord};

/// Returns a new [`Dataset`] containing only records for which `predicate` returns `true`.
///
/// This is a convenience wrapper around [`Dataset::filter_records`].
pub fn filter<F>(dataset: &Dataset, predicate: F) -> Dataset
where
    F: FnMut(&TripRecord) -> bool,
{
    dataset.filter_records(predicate)
}

/// Apply the month and day predicates of `spec`.
///
/// Both predicates are applied when both are set. Record order is preserved and the input is
/// left untouched. `spec.city` does not take part in the predicate.
pub fn apply(dataset: &Dataset, spec: &FilterSpec) -> Dataset {
    if let Some(city) = dataset.city.filter(|c| *c != spec.city) {
        tracing::debug!(
            dataset_city = city.name(),
            filter_city = spec.city.name(),
            "filter spec names a different city than the dataset"
        );
    }
    let out = dataset.filter_records(|r| spec.matches(r));
    tracing::debug!(
        month = %spec.month,
        day = %spec.day,
        before = dataset.row_count(),
        after = out.row_count(),
        "applied filter"
    );
    out
}
