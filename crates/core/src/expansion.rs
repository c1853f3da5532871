//! Carries expand/collapse state across tree rebuilds.
//!
//! Node ids are reassigned on every build, so expanded directories are
//! remembered by their full path instead.

use crate::metadata::normalize_path;
use crate::tree::AssetTree;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

/// Stable identity of a directory node: its normalized full path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ExpansionKey(String);

impl ExpansionKey {
    /// Separators are normalized the same way tree keys are.
    pub fn new(key: impl AsRef<str>) -> Self {
        Self(normalize_path(key.as_ref()).unwrap_or_default())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExpansionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ExpansionKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ExpansionKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ExpansionKey {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<ExpansionKey> for String {
    fn from(key: ExpansionKey) -> Self {
        key.0
    }
}

/// Set of expanded directories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionState {
    keys: BTreeSet<ExpansionKey>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(&ExpansionKey::from(key))
    }

    pub fn insert(&mut self, key: impl Into<ExpansionKey>) -> bool {
        self.keys.insert(key.into())
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.keys.remove(&ExpansionKey::from(key))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExpansionKey> {
        self.keys.iter()
    }
}

impl FromIterator<ExpansionKey> for ExpansionState {
    fn from_iter<T: IntoIterator<Item = ExpansionKey>>(iter: T) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

/// Keys of every expanded directory in `tree`.
pub fn capture(tree: &AssetTree) -> ExpansionState {
    tree.dirs()
        .filter(|node| node.is_expanded())
        .map(|node| ExpansionKey::new(&node.key))
        .collect()
}

/// Expands the directories of `tree` named in `state` and collapses the rest.
///
/// Keys with no matching directory are ignored. Returns how many keys were
/// applied.
pub fn apply(tree: &mut AssetTree, state: &ExpansionState) -> usize {
    let targets: Vec<_> = tree
        .dirs()
        .map(|node| (node.id, state.keys.contains(node.key.as_str())))
        .collect();

    let mut applied = 0;
    for (id, expanded) in targets {
        tree.set_expanded(id, expanded);
        if expanded {
            applied += 1;
        }
    }

    let dropped = state.len() - applied;
    if dropped > 0 {
        debug!(dropped, "expanded directories no longer present");
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_reads_expanded_dirs_only() {
        let mut tree = AssetTree::build(["src/textures/a.png", "src/models/b.fbx", "c.png"]);
        assert!(capture(&tree).is_empty());

        tree.expand(tree.find_dir("src/textures").unwrap());
        let state = capture(&tree);
        assert_eq!(state.len(), 1);
        assert!(state.contains("src/textures"));
        assert!(!state.contains("src"));
    }

    #[test]
    fn apply_restores_by_path_not_id() {
        let mut before = AssetTree::build(["src/textures/a.png", "src/models/b.fbx"]);
        before.expand(before.find_dir("src").unwrap());
        before.expand(before.find_dir("src/textures").unwrap());
        let state = capture(&before);

        // Reverse order: ids differ, paths do not.
        let mut after = AssetTree::build(["src/models/b.fbx", "src/textures/a.png"]);
        assert_ne!(
            before.find_dir("src/textures"),
            after.find_dir("src/textures")
        );
        assert_eq!(apply(&mut after, &state), 2);
        assert!(after.is_expanded(after.find_dir("src").unwrap()));
        assert!(after.is_expanded(after.find_dir("src/textures").unwrap()));
        assert!(!after.is_expanded(after.find_dir("src/models").unwrap()));
    }

    #[test]
    fn vanished_dirs_are_dropped_silently() {
        let mut before = AssetTree::build(["src/textures/a.png", "src/b.png"]);
        before.expand(before.find_dir("src/textures").unwrap());
        let state = capture(&before);

        let mut after = AssetTree::build(["src/b.png"]);
        assert_eq!(apply(&mut after, &state), 0);
        assert!(capture(&after).is_empty());
    }

    #[test]
    fn new_dirs_start_collapsed() {
        let mut tree = AssetTree::build(["fresh/a.png"]);
        let state: ExpansionState = [ExpansionKey::from("old")].into_iter().collect();
        apply(&mut tree, &state);
        assert!(!tree.is_expanded(tree.find_dir("fresh").unwrap()));
    }

    #[test]
    fn apply_collapses_dirs_missing_from_state() {
        let mut tree = AssetTree::build(["a/b.png", "c/d.png"]);
        tree.expand_all();
        let mut state = ExpansionState::new();
        state.insert("c");
        apply(&mut tree, &state);
        assert!(!tree.is_expanded(tree.find_dir("a").unwrap()));
        assert!(tree.is_expanded(tree.find_dir("c").unwrap()));
    }

    #[test]
    fn keys_normalize_separators() {
        assert_eq!(ExpansionKey::from("src\\textures\\"), ExpansionKey::new("src/textures"));
        assert_eq!(ExpansionKey::new("src\\textures"), ExpansionKey::new("src/textures"));
        assert_eq!(ExpansionKey::new("/src//textures/").as_str(), "src/textures");
        let mut state = ExpansionState::new();
        state.insert("src\\textures");
        assert!(state.contains("src/textures"));
        assert!(state.remove("src/textures"));
        assert!(state.is_empty());
    }

    #[test]
    fn deserialized_keys_match_tree_keys() {
        let state: ExpansionState =
            serde_json::from_str(r#"{"keys":["src\\textures","src/"]}"#).unwrap();
        assert!(state.contains("src/textures"));
        assert!(state.contains("src"));

        let mut tree = AssetTree::build(["src/textures/a.png", "src/b.png"]);
        assert_eq!(apply(&mut tree, &state), 2);
        assert!(tree.is_expanded(tree.find_dir("src/textures").unwrap()));

        let json = serde_json::to_string(&capture(&tree)).unwrap();
        assert_eq!(json, r#"{"keys":["src","src/textures"]}"#);
    }
}
