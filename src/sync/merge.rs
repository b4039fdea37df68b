//! Combining the two category listings into one canonical set.

use super::models::{CanonicalRecord, CategoryResult};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub struct MergeOutcome {
    pub records: HashMap<u64, CanonicalRecord>,
    /// Ids present in the high precedence category.
    pub high_precedence_ids: HashSet<u64>,
}

impl MergeOutcome {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Union of `low` and `high` keyed by id.
///
/// On collision the listing from `high` is kept. A record is flagged as now
/// playing iff its id appears in `high`.
pub fn merge(low: CategoryResult, high: CategoryResult) -> MergeOutcome {
    let high_precedence_ids: HashSet<u64> = high.keys().copied().collect();

    let mut records: HashMap<u64, CanonicalRecord> = low
        .into_iter()
        .filter(|(id, _)| !high_precedence_ids.contains(id))
        .map(|(id, listing)| (id, CanonicalRecord::from_listing(listing, false)))
        .collect();
    records.extend(
        high.into_iter()
            .map(|(id, listing)| (id, CanonicalRecord::from_listing(listing, true))),
    );

    MergeOutcome {
        records,
        high_precedence_ids,
    }
}
