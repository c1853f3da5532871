//! The orchestrating object: owns the selected view settings, the current
//! tree and its expansion state, and rebuilds them in one step.

use crate::clock::{Clock, SystemClock};
use crate::config::ViewConfig;
use crate::expansion::{self, ExpansionState};
use crate::filter::filter_newer_than;
use crate::metadata::MetadataProvider;
use crate::models::{AssetRecord, SortDirection, SortKey, TimeRange};
use crate::search;
use crate::sort::sort_records;
use crate::tree::{AssetTree, NodeId, Row};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Counts from the most recent rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshSummary {
    pub now: DateTime<Utc>,
    pub reference: DateTime<Utc>,
    pub enumerated: usize,
    pub kept: usize,
    pub leaves: usize,
    pub expanded_restored: usize,
}

/// `build(sort(filter(all_paths)))` for one set of selections.
pub fn build_tree<P>(
    meta: &P,
    range: TimeRange,
    key: SortKey,
    direction: SortDirection,
    now: DateTime<Utc>,
) -> AssetTree
where
    P: MetadataProvider + ?Sized,
{
    build_with_records(meta, range, key, direction, now).0
}

/// The tree, the number of enumerated paths, and the records that passed the
/// filter in sorted order.
fn build_with_records<P>(
    meta: &P,
    range: TimeRange,
    key: SortKey,
    direction: SortDirection,
    now: DateTime<Utc>,
) -> (AssetTree, usize, Vec<AssetRecord>)
where
    P: MetadataProvider + ?Sized,
{
    let all = meta.all_paths();
    let mut records = filter_newer_than(&all, range.reference_instant(now), meta);
    sort_records(&mut records, key, direction);
    let tree = AssetTree::build(records.iter().map(|r| r.path.as_str()));
    (tree, all.len(), records)
}

pub struct AssetBrowser<P, C = SystemClock> {
    provider: P,
    clock: C,
    view: ViewConfig,
    tree: AssetTree,
    expanded: ExpansionState,
    /// Creation times seen by the last refresh, by payload path.
    created: HashMap<String, DateTime<Utc>>,
    last_refresh: Option<RefreshSummary>,
}

impl<P: MetadataProvider> AssetBrowser<P, SystemClock> {
    pub fn new(provider: P, view: ViewConfig) -> Self {
        Self::with_clock(provider, SystemClock, view)
    }
}

impl<P: MetadataProvider, C: Clock> AssetBrowser<P, C> {
    /// Creates the browser and runs the first refresh.
    pub fn with_clock(provider: P, clock: C, view: ViewConfig) -> Self {
        let mut browser = Self {
            provider,
            clock,
            view,
            tree: AssetTree::new(),
            expanded: ExpansionState::new(),
            created: HashMap::new(),
            last_refresh: None,
        };
        browser.refresh();
        browser
    }

    /// Re-enumerates, filters, sorts and rebuilds the tree, carrying the
    /// expansion state over from the previous tree.
    pub fn refresh(&mut self) -> &RefreshSummary {
        let now = self.clock.now();
        let previous = expansion::capture(&self.tree);

        let (mut tree, enumerated, records) = build_with_records(
            &self.provider,
            self.view.time_range,
            self.view.sort_key,
            self.view.sort_direction,
            now,
        );
        let expanded_restored = expansion::apply(&mut tree, &previous);

        let kept = records.len();
        self.tree = tree;
        self.expanded = expansion::capture(&self.tree);
        self.created = records
            .into_iter()
            .filter_map(|r| Some((r.path, r.created?)))
            .collect();

        let summary = RefreshSummary {
            now,
            reference: self.view.time_range.reference_instant(now),
            enumerated,
            kept,
            leaves: self.tree.leaf_count(),
            expanded_restored,
        };
        debug!(
            enumerated = summary.enumerated,
            kept = summary.kept,
            leaves = summary.leaves,
            expanded_restored = summary.expanded_restored,
            range = self.view.time_range.name(),
            "refreshed asset tree"
        );
        self.last_refresh.insert(summary)
    }

    /// Changes the time window. Rebuilds only if the value changed.
    pub fn set_time_range(&mut self, range: TimeRange) -> bool {
        if self.view.time_range == range {
            return false;
        }
        self.view.time_range = range;
        self.refresh();
        true
    }

    /// Changes the sort. Rebuilds only if either value changed.
    pub fn set_sort(&mut self, key: SortKey, direction: SortDirection) -> bool {
        if self.view.sort_key == key && self.view.sort_direction == direction {
            return false;
        }
        self.view.sort_key = key;
        self.view.sort_direction = direction;
        self.refresh();
        true
    }

    /// Sets the live search query. Never rebuilds.
    pub fn set_search(&mut self, query: impl Into<String>) {
        self.view.search = query.into();
    }

    pub fn search(&self) -> &str {
        &self.view.search
    }

    pub fn view(&self) -> &ViewConfig {
        &self.view
    }

    pub fn tree(&self) -> &AssetTree {
        &self.tree
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expanded
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn last_refresh(&self) -> Option<&RefreshSummary> {
        self.last_refresh.as_ref()
    }

    /// Rows to draw, with the current search applied.
    pub fn rows(&self) -> Vec<Row> {
        search::visible_rows(&self.tree, &self.view.search)
    }

    /// Path a leaf stands for, for host actions like reveal or drag.
    pub fn payload_path(&self, id: NodeId) -> Option<&str> {
        self.tree.payload_path(id)
    }

    /// Creation time of a leaf as read by the last refresh. Not looked up
    /// again, so it always agrees with the filter that admitted the leaf.
    pub fn created_at(&self, id: NodeId) -> Option<DateTime<Utc>> {
        let path = self.tree.payload_path(id)?;
        self.created.get(path).copied()
    }

    pub fn toggle(&mut self, id: NodeId) -> Option<bool> {
        let result = self.tree.toggle(id);
        self.sync_expansion();
        result
    }

    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) -> bool {
        let changed = self.tree.set_expanded(id, expanded);
        self.sync_expansion();
        changed
    }

    /// Expands the directory with full path `key`.
    pub fn expand_dir(&mut self, key: &str) -> bool {
        match self.tree.find_dir(key) {
            Some(id) => self.set_expanded(id, true),
            None => false,
        }
    }

    pub fn collapse_dir(&mut self, key: &str) -> bool {
        match self.tree.find_dir(key) {
            Some(id) => self.set_expanded(id, false),
            None => false,
        }
    }

    pub fn expand_all(&mut self) {
        self.tree.expand_all();
        self.sync_expansion();
    }

    pub fn collapse_all(&mut self) {
        self.tree.collapse_all();
        self.sync_expansion();
    }

    /// Opens every directory above `path` and returns its leaf.
    pub fn reveal(&mut self, path: &str) -> Option<NodeId> {
        let leaf = self.tree.reveal(path);
        self.sync_expansion();
        leaf
    }

    fn sync_expansion(&mut self) {
        self.expanded = expansion::capture(&self.tree);
    }
}
