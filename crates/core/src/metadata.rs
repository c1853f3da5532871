//! The boundary to the host: enumerate known paths and look up creation times.

use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Supplies the path universe and per-path creation times.
///
/// `creation_time` returning `None` means the lookup failed (the file vanished
/// or cannot be stat'ed). That is never an error for the pipeline.
pub trait MetadataProvider {
    fn all_paths(&self) -> Vec<String>;
    fn creation_time(&self, path: &str) -> Option<DateTime<Utc>>;
}

impl<P: MetadataProvider + ?Sized> MetadataProvider for &P {
    fn all_paths(&self) -> Vec<String> {
        (**self).all_paths()
    }

    fn creation_time(&self, path: &str) -> Option<DateTime<Utc>> {
        (**self).creation_time(path)
    }
}

impl<P: MetadataProvider + ?Sized> MetadataProvider for Box<P> {
    fn all_paths(&self) -> Vec<String> {
        (**self).all_paths()
    }

    fn creation_time(&self, path: &str) -> Option<DateTime<Utc>> {
        (**self).creation_time(path)
    }
}

/// In-memory provider. Enumeration order is insertion order.
#[derive(Debug, Clone, Default)]
pub struct StaticMetadata {
    order: Vec<String>,
    times: HashMap<String, Option<DateTime<Utc>>>,
}

impl StaticMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, created: Option<DateTime<Utc>>) -> Self {
        self.insert(path, created);
        self
    }

    pub fn insert(&mut self, path: &str, created: Option<DateTime<Utc>>) {
        if self.times.insert(path.to_string(), created).is_none() {
            self.order.push(path.to_string());
        }
    }

    pub fn remove(&mut self, path: &str) {
        if self.times.remove(path).is_some() {
            self.order.retain(|p| p != path);
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl MetadataProvider for StaticMetadata {
    fn all_paths(&self) -> Vec<String> {
        self.order.clone()
    }

    fn creation_time(&self, path: &str) -> Option<DateTime<Utc>> {
        self.times.get(path).copied().flatten()
    }
}

pub fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Non-empty path segments, splitting on either separator.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(is_separator).filter(|s| !s.is_empty())
}

/// Canonical `/`-joined form, or `None` for paths with no segments.
/// Segment text is never altered, so surrounding spaces stay part of a name.
pub fn normalize_path(path: &str) -> Option<String> {
    let joined = segments(path).collect::<Vec<_>>().join("/");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

/// Final path segment (file name with extension).
pub fn file_name(path: &str) -> &str {
    path.trim_end_matches(is_separator)
        .rsplit(is_separator)
        .next()
        .unwrap_or(path)
}
