//! Counting and reduction helpers shared by the statistics groups.
//!
//! Tie-break rule: when several values share the highest count, the smallest value in the
//! key's `Ord` order wins. Counts are kept in a [`BTreeMap`] so iteration is ascending and the
//! first key to reach the maximum is the answer.

use std::collections::BTreeMap;

use serde::Serialize;

/// A value together with the number of records carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tally<T> {
    pub value: T,
    pub count: usize,
}

impl<T> Tally<T> {
    pub fn new(value: T, count: usize) -> Self {
        Self { value, count }
    }

    /// Convert the value, keeping the count.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Tally<U> {
        Tally {
            value: f(self.value),
            count: self.count,
        }
    }
}

/// Count occurrences of each value, in ascending value order.
pub fn counts<K, I>(values: I) -> BTreeMap<K, usize>
where
    K: Ord,
    I: IntoIterator<Item = K>,
{
    let mut map = BTreeMap::new();
    for v in values {
        *map.entry(v).or_insert(0) += 1;
    }
    map
}

/// Most frequent value; ties go to the smallest value. `None` for an empty input.
pub fn mode<K, I>(values: I) -> Option<Tally<K>>
where
    K: Ord,
    I: IntoIterator<Item = K>,
{
    let mut best: Option<Tally<K>> = None;
    for (value, count) in counts(values) {
        // Strictly greater: an equal count later in ascending order never replaces.
        if best.as_ref().is_none_or(|b| count > b.count) {
            best = Some(Tally::new(value, count));
        }
    }
    best
}

/// Every distinct value with its count, highest count first; equal counts in ascending value order.
pub fn value_counts<K, I>(values: I) -> Vec<Tally<K>>
where
    K: Ord,
    I: IntoIterator<Item = K>,
{
    let mut out: Vec<Tally<K>> = counts(values)
        .into_iter()
        .map(|(value, count)| Tally::new(value, count))
        .collect();
    // Stable sort keeps the ascending value order inside each count.
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

/// Sum of `values`; `0.0` for an empty input.
pub fn sum<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    values.into_iter().sum()
}

/// Arithmetic mean of `values`; `None` for an empty input.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (total, n) = values
        .into_iter()
        .fold((0.0_f64, 0_usize), |(t, n), v| (t + v, n + 1));
    (n > 0).then(|| total / n as f64)
}
