#![allow(dead_code)]

use pagetree::model::{FlatNode, ModuleKind, Node, NodeId, PageItem, PageNode};
use pagetree::tree;
use std::collections::HashMap;

pub fn page(id: &str, name: &str, children: Vec<PageNode>) -> PageNode {
    Node::new(id, PageItem::page(name)).with_children(children)
}

pub fn section(id: &str, name: &str, children: Vec<PageNode>) -> PageNode {
    Node::new(id, PageItem::section(name)).with_children(children)
}

pub fn module(id: &str, name: &str, kind: ModuleKind) -> PageNode {
    Node::new(id, PageItem::module(name, kind))
}

/// Builds a tree and fixes up `parent_id`/`depth` the way a load would.
pub fn normalized(roots: Vec<PageNode>) -> Vec<PageNode> {
    tree::rebuild(&tree::flatten(&roots))
}

/// A small site:
///
/// ```text
/// home
///   hero
///     intro (text)
///     gallery (gallery)
///   news
/// about
///   team
/// ```
pub fn sample_site() -> Vec<PageNode> {
    normalized(vec![
        page(
            "home",
            "Home",
            vec![
                section(
                    "hero",
                    "Hero",
                    vec![
                        module("intro", "Intro", ModuleKind::Text),
                        module("gallery", "Gallery", ModuleKind::Gallery),
                    ],
                ),
                section("news", "News", vec![]),
            ],
        ),
        page("about", "About", vec![section("team", "Team", vec![])]),
    ])
}

pub fn ids(nodes: &[PageNode]) -> Vec<String> {
    nodes.iter().map(|n| n.id.to_string()).collect()
}

pub fn child_ids(roots: &[PageNode], id: &str) -> Vec<String> {
    tree::find(roots, &NodeId::from(id))
        .map(|node| ids(&node.children))
        .unwrap_or_default()
}

/// Every id of the tree, in pre-order.
pub fn all_ids(roots: &[PageNode]) -> Vec<String> {
    tree::flatten(roots)
        .iter()
        .map(|n| n.id.to_string())
        .collect()
}

/// Checks that each flat entry's depth matches its parent chain and that
/// parents come before their children.
pub fn assert_depths_consistent<T>(flat: &[FlatNode<T>]) {
    let mut seen: HashMap<&NodeId, usize> = HashMap::new();
    for entry in flat {
        match &entry.parent_id {
            None => assert_eq!(entry.depth, 0, "root {} has depth {}", entry.id, entry.depth),
            Some(parent_id) => {
                let parent_depth = seen
                    .get(parent_id)
                    .unwrap_or_else(|| panic!("{} listed before its parent", entry.id));
                assert_eq!(entry.depth, parent_depth + 1, "depth of {}", entry.id);
            }
        }
        seen.insert(&entry.id, entry.depth);
    }
}
