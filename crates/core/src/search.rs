//! Render-time name search. Never mutates the tree or its expansion state.

use crate::tree::{AssetTree, NodeId, Row};

/// True if `query` is empty or is a case-sensitive substring of the name of
/// `id` or of any of its descendants.
pub fn matches(tree: &AssetTree, id: NodeId, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let Some(node) = tree.get(id) else {
        return false;
    };
    (!node.is_root() && node.name.contains(query))
        || node
            .children
            .iter()
            .any(|&child| matches(tree, child, query))
}

/// [`matches`] for every node at once, indexed by `NodeId.0`.
///
/// Children always have larger ids than their parent, so one reverse pass
/// settles each subtree before its parent is visited.
pub fn match_flags(tree: &AssetTree, query: &str) -> Vec<bool> {
    let mut flags = vec![query.is_empty(); tree.node_count()];
    if query.is_empty() {
        return flags;
    }
    let nodes: Vec<_> = tree.nodes().collect();
    for node in nodes.iter().rev() {
        let own = !node.is_root() && node.name.contains(query);
        flags[node.id.0] = own || node.children.iter().any(|c| flags[c.0]);
    }
    flags
}

/// Rows to draw for `query`.
///
/// With an empty query this is [`AssetTree::visible_rows`]. Otherwise only
/// matching nodes are listed and every directory on the way to a match is
/// drawn open regardless of its stored state, so clearing the query restores
/// the previous view exactly.
pub fn visible_rows(tree: &AssetTree, query: &str) -> Vec<Row> {
    if query.is_empty() {
        return tree.visible_rows();
    }
    let flags = match_flags(tree, query);
    let mut rows = Vec::new();
    collect_matching(tree, tree.root_id(), &flags, &mut rows);
    rows
}

fn collect_matching(tree: &AssetTree, id: NodeId, flags: &[bool], rows: &mut Vec<Row>) {
    for &child in tree.children(id) {
        if !flags[child.0] {
            continue;
        }
        let Some(node) = tree.get(child) else {
            continue;
        };
        rows.push(Row {
            id: child,
            depth: node.depth,
        });
        collect_matching(tree, child, flags, rows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expansion;

    fn row_names(tree: &AssetTree, rows: &[Row]) -> Vec<String> {
        rows.iter()
            .map(|r| tree.get(r.id).unwrap().name.clone())
            .collect()
    }

    fn sample() -> AssetTree {
        AssetTree::build([
            "src/textures/wood.png",
            "src/textures/Stone.png",
            "src/models/chair.fbx",
            "docs/readme.md",
        ])
    }

    #[test]
    fn empty_query_matches_everything() {
        let tree = sample();
        assert!(tree.nodes().all(|n| matches(&tree, n.id, "")));
    }

    #[test]
    fn directory_matches_through_descendants() {
        let tree = sample();
        let src = tree.find_dir("src").unwrap();
        let docs = tree.find_dir("docs").unwrap();
        assert!(matches(&tree, src, "wood"));
        assert!(!matches(&tree, docs, "wood"));
        assert!(matches(&tree, docs, "doc"));
    }

    #[test]
    fn search_is_case_sensitive() {
        let tree = sample();
        let stone = tree.find_leaf("src/textures/Stone.png").unwrap();
        assert!(matches(&tree, stone, "Stone"));
        assert!(!matches(&tree, stone, "stone"));
    }

    #[test]
    fn flags_agree_with_matches() {
        let tree = sample();
        for query in ["", "png", "chair", "src", "nothing", "e"] {
            let flags = match_flags(&tree, query);
            for node in tree.nodes() {
                assert_eq!(flags[node.id.0], matches(&tree, node.id, query), "{query}");
            }
        }
    }

    #[test]
    fn rows_open_the_path_to_matches() {
        let tree = sample();
        let rows = visible_rows(&tree, "wood");
        assert_eq!(row_names(&tree, &rows), vec!["src", "textures", "wood.png"]);
        assert_eq!(rows.iter().map(|r| r.depth).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn no_match_gives_no_rows() {
        let tree = sample();
        assert!(visible_rows(&tree, "zzz").is_empty());
    }

    #[test]
    fn clearing_the_query_restores_the_view() {
        let mut tree = sample();
        tree.expand(tree.find_dir("docs").unwrap());
        let before_rows = visible_rows(&tree, "");
        let before_state = expansion::capture(&tree);

        let searched = visible_rows(&tree, "chair");
        assert_eq!(row_names(&tree, &searched), vec!["src", "models", "chair.fbx"]);

        assert_eq!(visible_rows(&tree, ""), before_rows);
        assert_eq!(expansion::capture(&tree), before_state);
    }
}
