use crate::error::BrowserError;
use crate::metadata::file_name;
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A path together with its creation time, if the lookup succeeded.
///
/// `None` orders before every real instant, so a file whose metadata vanished
/// sorts as the oldest entry and never passes a "newer than" check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub path: String,
    pub created: Option<DateTime<Utc>>,
}

impl AssetRecord {
    pub fn new(path: impl Into<String>, created: Option<DateTime<Utc>>) -> Self {
        Self {
            path: path.into(),
            created,
        }
    }

    pub fn name(&self) -> &str {
        file_name(&self.path)
    }

    pub fn is_newer_than(&self, reference: DateTime<Utc>) -> bool {
        self.created.map(|c| c > reference).unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    Last30Minutes,
    #[default]
    Last24Hours,
    /// Fixed one-day offset from "now", not calendar midnight.
    SinceYesterday,
    SinceLastWeek,
    /// Local calendar midnight of the current day.
    Today,
}

impl TimeRange {
    pub const ALL: [TimeRange; 5] = [
        TimeRange::Last30Minutes,
        TimeRange::Last24Hours,
        TimeRange::SinceYesterday,
        TimeRange::SinceLastWeek,
        TimeRange::Today,
    ];

    /// Cutoff instant for this range, using the local time zone for
    /// calendar-based variants.
    pub fn reference_instant(self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.reference_instant_in(now, &Local)
    }

    pub fn reference_instant_in<Tz: TimeZone>(self, now: DateTime<Utc>, tz: &Tz) -> DateTime<Utc> {
        match self {
            TimeRange::Last30Minutes => now - Duration::minutes(30),
            TimeRange::Last24Hours => now - Duration::hours(24),
            TimeRange::SinceYesterday => now - Duration::days(1),
            TimeRange::SinceLastWeek => now - Duration::days(7),
            TimeRange::Today => {
                let local_day = now.with_timezone(tz).date_naive();
                local_day
                    .and_hms_opt(0, 0, 0)
                    .and_then(|midnight| tz.from_local_datetime(&midnight).earliest())
                    .map(|midnight| midnight.with_timezone(&Utc))
                    // midnight can fall in a DST gap; fall back to the fixed offset
                    .unwrap_or(now - Duration::days(1))
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TimeRange::Last30Minutes => "last30_minutes",
            TimeRange::Last24Hours => "last24_hours",
            TimeRange::SinceYesterday => "since_yesterday",
            TimeRange::SinceLastWeek => "since_last_week",
            TimeRange::Today => "today",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeRange::Last30Minutes => "Last 30 minutes",
            TimeRange::Last24Hours => "Last 24 hours",
            TimeRange::SinceYesterday => "Since yesterday",
            TimeRange::SinceLastWeek => "Since last week",
            TimeRange::Today => "Today",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    CreationTime,
    Name,
}

impl SortKey {
    pub const ALL: [SortKey; 2] = [SortKey::CreationTime, SortKey::Name];

    /// Primary-key comparison only. Direction and tie-break are applied by
    /// the sorter.
    pub fn compare(self, a: &AssetRecord, b: &AssetRecord) -> Ordering {
        match self {
            SortKey::CreationTime => a.created.cmp(&b.created),
            SortKey::Name => a.name().cmp(b.name()),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SortKey::CreationTime => "creation_time",
            SortKey::Name => "name",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::CreationTime => "Creation time",
            SortKey::Name => "Name",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub const ALL: [SortDirection; 2] = [SortDirection::Ascending, SortDirection::Descending];

    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SortDirection::Ascending => "ascending",
            SortDirection::Descending => "descending",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortDirection::Ascending => "Ascending",
            SortDirection::Descending => "Descending",
        }
    }
}

fn canonical(value: &str) -> String {
    value.trim().to_ascii_lowercase().replace('-', "_")
}

impl FromStr for TimeRange {
    type Err = BrowserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = canonical(s);
        TimeRange::ALL
            .into_iter()
            .find(|r| r.name() == wanted)
            .ok_or_else(|| BrowserError::UnknownValue {
                kind: "time range",
                value: s.to_string(),
            })
    }
}

impl FromStr for SortKey {
    type Err = BrowserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = canonical(s);
        SortKey::ALL
            .into_iter()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| BrowserError::UnknownValue {
                kind: "sort key",
                value: s.to_string(),
            })
    }
}

impl FromStr for SortDirection {
    type Err = BrowserError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match canonical(s).as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(BrowserError::UnknownValue {
                kind: "sort direction",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
