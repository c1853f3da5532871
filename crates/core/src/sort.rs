//! Sorter: a strict total order over asset records.
//!
//! The requested direction flips only the primary key. Ties always fall back
//! to the full path ascending, so two distinct paths never compare equal and
//! repeated rebuilds see the same order.

use crate::metadata::MetadataProvider;
use crate::models::{AssetRecord, SortDirection, SortKey};
use std::cmp::Ordering;

pub fn compare_records(
    a: &AssetRecord,
    b: &AssetRecord,
    key: SortKey,
    direction: SortDirection,
) -> Ordering {
    direction
        .apply(key.compare(a, b))
        .then_with(|| a.path.cmp(&b.path))
}

pub fn sort_records(records: &mut [AssetRecord], key: SortKey, direction: SortDirection) {
    records.sort_by(|a, b| compare_records(a, b, key, direction));
}

/// Sorts `paths`, looking up each creation time once.
pub fn sort_paths<P, I, S>(paths: I, key: SortKey, direction: SortDirection, meta: &P) -> Vec<String>
where
    P: MetadataProvider + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut records: Vec<AssetRecord> = paths
        .into_iter()
        .map(|p| {
            let path = p.as_ref();
            let created = match key {
                SortKey::CreationTime => meta.creation_time(path),
                SortKey::Name => None,
            };
            AssetRecord::new(path, created)
        })
        .collect();
    sort_records(&mut records, key, direction);
    records.into_iter().map(|r| r.path).collect()
}
