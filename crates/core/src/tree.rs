//! Path tree built from a flat, already-sorted list of asset paths.
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Ids are assigned in
//! build order and are only meaningful within one tree; anything that must
//! survive a rebuild uses the node's key (its full path from the root).

use crate::metadata::{normalize_path, segments};
use std::collections::HashMap;
use std::fmt;
use tracing::trace;

/// Index of a node in its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Collapsed,
    Expanded,
    /// File node, cannot be expanded
    Leaf,
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub id: NodeId,
    /// Display name: the last path segment.
    pub name: String,
    /// Normalized full path from the root. Empty for the root.
    pub key: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub state: NodeState,
    /// Path as given to the builder. `None` for directories and the root.
    pub payload_path: Option<String>,
    /// Root is -1 so its children sit at depth 0.
    pub depth: i32,
}

impl TreeNode {
    pub fn is_leaf(&self) -> bool {
        self.state == NodeState::Leaf
    }

    pub fn is_dir(&self) -> bool {
        !self.is_leaf()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_expanded(&self) -> bool {
        self.state == NodeState::Expanded
    }
}

/// One display row: a node and its indent level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    pub id: NodeId,
    pub depth: i32,
}

#[derive(Debug, Clone)]
pub struct AssetTree {
    nodes: Vec<TreeNode>,
    dirs: HashMap<String, NodeId>,
    leaves: HashMap<String, NodeId>,
}

impl Default for AssetTree {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetTree {
    /// A tree holding only the invisible root.
    pub fn new() -> Self {
        let root = TreeNode {
            id: NodeId(0),
            name: String::new(),
            key: String::new(),
            parent: None,
            children: Vec::new(),
            state: NodeState::Expanded,
            payload_path: None,
            depth: -1,
        };
        Self {
            nodes: vec![root],
            dirs: HashMap::new(),
            leaves: HashMap::new(),
        }
    }

    /// Builds the hierarchy for `sorted_paths`.
    ///
    /// Siblings keep the order in which their first path appears in the
    /// input. Directory nodes are created once per prefix. Duplicate paths
    /// (after separator normalization) and paths with no segments are skipped.
    pub fn build<I, S>(sorted_paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tree = Self::new();
        for raw in sorted_paths {
            tree.insert(raw.as_ref());
        }
        tree
    }

    /// Adds one leaf and any missing ancestor directories. Returns `None` when
    /// the path was skipped.
    pub fn insert(&mut self, raw: &str) -> Option<NodeId> {
        let Some(key) = normalize_path(raw) else {
            trace!(path = raw, "skipping empty path");
            return None;
        };
        if self.leaves.contains_key(&key) {
            trace!(path = raw, "skipping duplicate path");
            return None;
        }

        let parts: Vec<&str> = segments(&key).collect();
        let (leaf_name, dir_parts) = parts.split_last()?;

        let mut parent = self.root_id();
        let mut prefix = String::new();
        for part in dir_parts {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(part);
            parent = match self.dirs.get(&prefix) {
                Some(&id) => id,
                None => {
                    let id = self.push_node(part, &prefix, parent, NodeState::Collapsed, None);
                    self.dirs.insert(prefix.clone(), id);
                    id
                }
            };
        }

        let leaf_name = leaf_name.to_string();
        let id = self.push_node(
            &leaf_name,
            &key,
            parent,
            NodeState::Leaf,
            Some(raw.to_string()),
        );
        self.leaves.insert(key, id);
        Some(id)
    }

    fn push_node(
        &mut self,
        name: &str,
        key: &str,
        parent: NodeId,
        state: NodeState,
        payload_path: Option<String>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let depth = self.nodes[parent.0].depth + 1;
        self.nodes.push(TreeNode {
            id,
            name: name.to_string(),
            key: key.to_string(),
            parent: Some(parent),
            children: Vec::new(),
            state,
            payload_path,
            depth,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    pub fn root(&self) -> &TreeNode {
        &self.nodes[0]
    }

    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        self.nodes.get_mut(id.0)
    }

    /// All nodes in build order, root first.
    pub fn nodes(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter()
    }

    /// Number of nodes including the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    /// True when the root has no children.
    pub fn is_empty(&self) -> bool {
        self.root().children.is_empty()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn depth(&self, id: NodeId) -> Option<i32> {
        self.get(id).map(|n| n.depth)
    }

    /// Directory node for a full path prefix such as `src/textures`.
    pub fn find_dir(&self, key: &str) -> Option<NodeId> {
        normalize_path(key).and_then(|k| self.dirs.get(&k).copied())
    }

    /// Leaf node for an asset path.
    pub fn find_leaf(&self, path: &str) -> Option<NodeId> {
        normalize_path(path).and_then(|k| self.leaves.get(&k).copied())
    }

    /// Directory nodes, excluding the root.
    pub fn dirs(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter().filter(|n| n.is_dir() && !n.is_root())
    }

    /// Node ids from the root down to `id`, inclusive.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self.get(id).map(|n| n.id);
        while let Some(node_id) = current {
            chain.push(node_id);
            current = self.get(node_id).and_then(|n| n.parent);
        }
        chain.reverse();
        chain
    }

    /// Leaves in depth-first, left-to-right order.
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.leaves.len());
        self.collect_leaves(self.root_id(), &mut out);
        out
    }

    fn collect_leaves(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for &child in self.children(id) {
            match self.get(child) {
                Some(node) if node.is_leaf() => out.push(child),
                Some(_) => self.collect_leaves(child, out),
                None => {}
            }
        }
    }

    /// Payload paths of [`Self::leaves`].
    pub fn leaf_paths(&self) -> Vec<&str> {
        self.leaves()
            .into_iter()
            .filter_map(|id| self.get(id).and_then(|n| n.payload_path.as_deref()))
            .collect()
    }

    pub fn payload_path(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| n.payload_path.as_deref())
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.get(id).map(|n| n.is_expanded()).unwrap_or(false)
    }

    /// Sets the expansion flag of a directory. Leaves and the root are left
    /// alone. Returns whether the node was a directory.
    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) -> bool {
        match self.get_mut(id) {
            Some(node) if node.is_dir() && node.parent.is_some() => {
                node.state = if expanded {
                    NodeState::Expanded
                } else {
                    NodeState::Collapsed
                };
                true
            }
            _ => false,
        }
    }

    pub fn expand(&mut self, id: NodeId) -> bool {
        self.set_expanded(id, true)
    }

    pub fn collapse(&mut self, id: NodeId) -> bool {
        self.set_expanded(id, false)
    }

    /// Flips a directory's expansion. Returns the new state, or `None` for
    /// leaves and the root.
    pub fn toggle(&mut self, id: NodeId) -> Option<bool> {
        let node = self.get(id)?;
        if node.is_leaf() || node.is_root() {
            return None;
        }
        let expanded = !node.is_expanded();
        self.set_expanded(id, expanded);
        Some(expanded)
    }

    pub fn expand_all(&mut self) {
        self.set_all(true);
    }

    pub fn collapse_all(&mut self) {
        self.set_all(false);
    }

    fn set_all(&mut self, expanded: bool) {
        let ids: Vec<NodeId> = self.dirs.values().copied().collect();
        for id in ids {
            self.set_expanded(id, expanded);
        }
    }

    /// Expands every directory above the leaf for `path` so it becomes
    /// visible. Returns the leaf id.
    pub fn reveal(&mut self, path: &str) -> Option<NodeId> {
        let leaf = self.find_leaf(path)?;
        for id in self.ancestors(leaf) {
            if id != leaf {
                self.expand(id);
            }
        }
        Some(leaf)
    }

    /// Rows a renderer should draw: every child of the root, and the children
    /// of each expanded directory, in tree order.
    pub fn visible_rows(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        self.collect_visible(self.root_id(), &mut rows);
        rows
    }

    fn collect_visible(&self, id: NodeId, rows: &mut Vec<Row>) {
        for &child in self.children(id) {
            let Some(node) = self.get(child) else {
                continue;
            };
            rows.push(Row {
                id: child,
                depth: node.depth,
            });
            if node.is_expanded() {
                self.collect_visible(child, rows);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tree: &AssetTree, ids: &[NodeId]) -> Vec<String> {
        ids.iter()
            .map(|id| tree.get(*id).unwrap().name.clone())
            .collect()
    }

    #[test]
    fn empty_input_gives_bare_root() {
        let tree = AssetTree::build(Vec::<String>::new());
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.root().depth, -1);
        assert!(tree.visible_rows().is_empty());
    }

    #[test]
    fn groups_by_prefix_in_given_order() {
        let tree = AssetTree::build(["a/c.png", "a/b.png"]);
        let root_children = tree.children(tree.root_id()).to_vec();
        assert_eq!(names(&tree, &root_children), vec!["a"]);

        let a = tree.find_dir("a").unwrap();
        assert_eq!(names(&tree, tree.children(a)), vec!["c.png", "b.png"]);
        assert_eq!(tree.depth(a), Some(0));
        assert_eq!(tree.depth(tree.children(a)[0]), Some(1));
    }

    #[test]
    fn directories_are_never_duplicated() {
        let tree = AssetTree::build([
            "src/textures/wood.png",
            "src/models/chair.fbx",
            "src/textures/stone.png",
            "readme.md",
        ]);
        assert_eq!(tree.dirs().count(), 3);
        let src = tree.find_dir("src").unwrap();
        assert_eq!(names(&tree, tree.children(src)), vec!["textures", "models"]);
        let textures = tree.find_dir("src/textures").unwrap();
        assert_eq!(names(&tree, tree.children(textures)), vec!["wood.png", "stone.png"]);
        let root_children = tree.children(tree.root_id()).to_vec();
        assert_eq!(names(&tree, &root_children), vec!["src", "readme.md"]);
    }

    #[test]
    fn leaf_order_matches_input_when_grouped() {
        let input = ["a/c.png", "a/b.png", "b/x/1.png", "b/y.png", "top.png"];
        let tree = AssetTree::build(input);
        assert_eq!(tree.leaf_paths(), input.to_vec());
        assert_eq!(tree.leaf_count(), input.len());
    }

    #[test]
    fn interleaved_paths_group_under_first_seen_directory() {
        let tree = AssetTree::build(["a/x.png", "b.png", "a/y.png"]);
        assert_eq!(tree.leaf_paths(), vec!["a/x.png", "a/y.png", "b.png"]);
    }

    #[test]
    fn duplicates_and_empty_paths_are_skipped() {
        let tree = AssetTree::build(["a/b.png", "", "/", "a\\b.png", "a/b.png", "c.png"]);
        assert_eq!(tree.leaf_paths(), vec!["a/b.png", "c.png"]);
        assert_eq!(tree.leaf_count(), 2);
    }

    #[test]
    fn names_differing_only_in_spaces_are_distinct_leaves() {
        let tree = AssetTree::build(["x.png", "x.png ", " x.png"]);
        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(tree.leaf_paths(), vec!["x.png", "x.png ", " x.png"]);
    }

    #[test]
    fn file_and_directory_with_same_path_are_distinct_nodes() {
        let tree = AssetTree::build(["data", "data/table.csv"]);
        let root_children = tree.children(tree.root_id()).to_vec();
        assert_eq!(names(&tree, &root_children), vec!["data", "data"]);
        assert!(tree.find_leaf("data").is_some());
        assert!(tree.find_dir("data").is_some());
        assert_ne!(tree.find_leaf("data"), tree.find_dir("data"));
        assert_eq!(tree.leaf_paths(), vec!["data", "data/table.csv"]);
    }

    #[test]
    fn payload_keeps_the_raw_spelling() {
        let tree = AssetTree::build(["Assets\\Textures\\wood.png"]);
        let leaf = tree.find_leaf("Assets/Textures/wood.png").unwrap();
        assert_eq!(tree.payload_path(leaf), Some("Assets\\Textures\\wood.png"));
        assert_eq!(tree.get(leaf).unwrap().key, "Assets/Textures/wood.png");
        let dir = tree.find_dir("Assets/Textures").unwrap();
        assert_eq!(tree.payload_path(dir), None);
    }

    #[test]
    fn build_is_deterministic() {
        let input = ["x/1.png", "y/2.png", "x/z/3.png"];
        let a = AssetTree::build(input);
        let b = AssetTree::build(input);
        let shape = |t: &AssetTree| {
            t.nodes()
                .map(|n| (n.id, n.key.clone(), n.children.clone(), n.depth))
                .collect::<Vec<_>>()
        };
        assert_eq!(shape(&a), shape(&b));
    }

    #[test]
    fn visible_rows_follow_expansion() {
        let mut tree = AssetTree::build(["a/b/c.png", "a/d.png", "e.png"]);
        let rows = |t: &AssetTree| {
            t.visible_rows()
                .iter()
                .map(|r| (t.get(r.id).unwrap().name.clone(), r.depth))
                .collect::<Vec<_>>()
        };
        assert_eq!(rows(&tree), vec![(String::from("a"), 0), (String::from("e.png"), 0)]);

        let a = tree.find_dir("a").unwrap();
        assert_eq!(tree.toggle(a), Some(true));
        assert_eq!(
            rows(&tree),
            vec![
                (String::from("a"), 0),
                (String::from("b"), 1),
                (String::from("d.png"), 1),
                (String::from("e.png"), 0)
            ]
        );

        tree.expand_all();
        assert_eq!(rows(&tree).len(), 5);
        tree.collapse_all();
        assert_eq!(rows(&tree).len(), 2);
    }

    #[test]
    fn leaves_and_root_cannot_be_toggled() {
        let mut tree = AssetTree::build(["a/b.png"]);
        let leaf = tree.find_leaf("a/b.png").unwrap();
        assert_eq!(tree.toggle(leaf), None);
        assert_eq!(tree.toggle(tree.root_id()), None);
        assert!(!tree.expand(leaf));
        assert!(tree.root().is_expanded());
    }

    #[test]
    fn reveal_expands_ancestors_only() {
        let mut tree = AssetTree::build(["a/b/c.png", "a/x/y.png"]);
        let leaf = tree.reveal("a/b/c.png").unwrap();
        assert_eq!(tree.payload_path(leaf), Some("a/b/c.png"));
        assert!(tree.is_expanded(tree.find_dir("a").unwrap()));
        assert!(tree.is_expanded(tree.find_dir("a/b").unwrap()));
        assert!(!tree.is_expanded(tree.find_dir("a/x").unwrap()));
        assert!(tree.reveal("missing.png").is_none());
    }

    #[test]
    fn ancestors_run_root_to_node() {
        let tree = AssetTree::build(["a/b/c.png"]);
        let leaf = tree.find_leaf("a/b/c.png").unwrap();
        let chain = tree.ancestors(leaf);
        assert_eq!(chain.first(), Some(&tree.root_id()));
        assert_eq!(chain.last(), Some(&leaf));
        assert_eq!(chain.len(), 4);
    }
}
