//! Time-window filter: keep paths created strictly after the range's cutoff.

use crate::metadata::MetadataProvider;
use crate::models::{AssetRecord, TimeRange};
use chrono::{DateTime, Utc};

/// Paths from `paths` whose creation time is strictly after
/// `range.reference_instant(now)`, in input order.
pub fn filter_newer<P, I, S>(paths: I, range: TimeRange, now: DateTime<Utc>, meta: &P) -> Vec<String>
where
    P: MetadataProvider + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let reference = range.reference_instant(now);
    filter_newer_than(paths, reference, meta)
        .into_iter()
        .map(|r| r.path)
        .collect()
}

/// Same as [`filter_newer`] with an explicit cutoff. Returns the looked-up
/// records so the sorter does not stat every file a second time.
pub fn filter_newer_than<P, I, S>(paths: I, reference: DateTime<Utc>, meta: &P) -> Vec<AssetRecord>
where
    P: MetadataProvider + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    paths
        .into_iter()
        .map(|p| {
            let path = p.as_ref();
            AssetRecord::new(path, meta.creation_time(path))
        })
        .filter(|record| record.is_newer_than(reference))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::StaticMetadata;
    use chrono::{Duration, TimeZone};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn keeps_strictly_newer_in_input_order() {
        let meta = StaticMetadata::new()
            .with("a/b.png", Some(at(100)))
            .with("a/c.png", Some(at(200)))
            .with("d.png", Some(at(50)))
            .with("edge.png", Some(at(75)));
        let kept = filter_newer_than(meta.all_paths(), at(75), &meta);
        let paths: Vec<_> = kept.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["a/b.png", "a/c.png"]);
    }

    #[test]
    fn missing_metadata_is_excluded() {
        let meta = StaticMetadata::new()
            .with("gone.png", None)
            .with("new.png", Some(at(10)));
        let kept = filter_newer_than(["gone.png", "new.png", "never-seen.png"], at(0), &meta);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].path, "new.png");
    }

    #[test]
    fn empty_input_is_empty_output() {
        let meta = StaticMetadata::new();
        let kept = filter_newer(Vec::<String>::new(), TimeRange::SinceLastWeek, at(0), &meta);
        assert!(kept.is_empty());
    }

    #[test]
    fn window_is_relative_to_now() {
        let now = at(1_000_000);
        let meta = StaticMetadata::new()
            .with("twenty_minutes.png", Some(now - Duration::minutes(20)))
            .with("two_hours.png", Some(now - Duration::hours(2)))
            .with("three_days.png", Some(now - Duration::days(3)))
            .with("month.png", Some(now - Duration::days(30)));
        let all = meta.all_paths();

        assert_eq!(
            filter_newer(&all, TimeRange::Last30Minutes, now, &meta),
            vec!["twenty_minutes.png"]
        );
        assert_eq!(
            filter_newer(&all, TimeRange::Last24Hours, now, &meta),
            vec!["twenty_minutes.png", "two_hours.png"]
        );
        assert_eq!(
            filter_newer(&all, TimeRange::SinceLastWeek, now, &meta),
            vec!["twenty_minutes.png", "two_hours.png", "three_days.png"]
        );
    }
}
