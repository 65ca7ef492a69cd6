use crate::errors::{TreeError, TreeResult};
use crate::model::{Nestable, Node, NodeId};
use std::collections::HashSet;
use tracing::instrument;

pub fn find<'a, T>(tree: &'a [Node<T>], id: &NodeId) -> Option<&'a Node<T>> {
    for node in tree {
        if &node.id == id {
            return Some(node);
        }
        if let Some(found) = find(&node.children, id) {
            return Some(found);
        }
    }
    None
}

pub fn find_mut<'a, T>(tree: &'a mut [Node<T>], id: &NodeId) -> Option<&'a mut Node<T>> {
    for node in tree {
        if &node.id == id {
            return Some(node);
        }
        if let Some(found) = find_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

pub fn contains<T>(tree: &[Node<T>], id: &NodeId) -> bool {
    find(tree, id).is_some()
}

/// Total number of nodes in the tree.
pub fn count_nodes<T>(tree: &[Node<T>]) -> usize {
    tree.iter()
        .map(|node| 1 + count_nodes(&node.children))
        .sum()
}

/// Number of descendants (not only direct children) of `id`; 0 when the id
/// is unknown.
#[instrument(level = "trace", skip(tree))]
pub fn child_count<T>(tree: &[Node<T>], id: &NodeId) -> usize {
    find(tree, id)
        .map(|node| count_nodes(&node.children))
        .unwrap_or(0)
}

/// True when `id` sits somewhere below `ancestor_id`.
pub fn is_descendant<T>(tree: &[Node<T>], ancestor_id: &NodeId, id: &NodeId) -> bool {
    find(tree, ancestor_id)
        .map(|ancestor| contains(&ancestor.children, id))
        .unwrap_or(false)
}

/// Copy of `tree` without `id` and its subtree.
#[instrument(level = "trace", skip(tree))]
pub fn remove_item<T: Clone>(tree: &[Node<T>], id: &NodeId) -> Vec<Node<T>> {
    tree.iter()
        .filter(|node| &node.id != id)
        .map(|node| Node {
            id: node.id.clone(),
            parent_id: node.parent_id.clone(),
            depth: node.depth,
            children: remove_item(&node.children, id),
            data: node.data.clone(),
        })
        .collect()
}

/// Copy of `tree` with `child` appended to the children of `parent_id`.
///
/// The inserted subtree gets its `parent_id` and depths rewritten. An
/// unknown `parent_id` leaves the tree unchanged.
#[instrument(level = "trace", skip(tree, child))]
pub fn insert_as_child<T: Clone>(
    tree: &[Node<T>],
    parent_id: &NodeId,
    child: Node<T>,
) -> Vec<Node<T>> {
    let mut result = tree.to_vec();
    if let Some((parent, depth)) = find_mut_at_depth(&mut result, parent_id, 0) {
        let mut child = child;
        relink(&mut child, Some(parent.id.clone()), depth + 1);
        parent.children.push(child);
    }
    result
}

// Depth comes from the position, not from the stored field.
fn find_mut_at_depth<'a, T>(
    tree: &'a mut [Node<T>],
    id: &NodeId,
    depth: usize,
) -> Option<(&'a mut Node<T>, usize)> {
    for node in tree {
        if &node.id == id {
            return Some((node, depth));
        }
        if let Some(found) = find_mut_at_depth(&mut node.children, id, depth + 1) {
            return Some(found);
        }
    }
    None
}

fn relink<T>(node: &mut Node<T>, parent_id: Option<NodeId>, depth: usize) {
    node.parent_id = parent_id;
    node.depth = depth;
    let id = node.id.clone();
    for child in &mut node.children {
        relink(child, Some(id.clone()), depth + 1);
    }
}

/// Moves the element at `from` so that it ends up at index `to`, shifting
/// the elements in between. Out-of-range indices leave the list untouched.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || to >= items.len() || from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiblingShift {
    Up,
    Down,
}

/// Copy of `tree` with `id` swapped with its previous or next sibling.
/// Returns `None` when there is no sibling in that direction.
pub fn shift_among_siblings<T: Clone>(
    tree: &[Node<T>],
    id: &NodeId,
    shift: SiblingShift,
) -> Option<Vec<Node<T>>> {
    let mut result = tree.to_vec();
    if shift_in(&mut result, id, shift) {
        Some(result)
    } else {
        None
    }
}

fn shift_in<T>(siblings: &mut Vec<Node<T>>, id: &NodeId, shift: SiblingShift) -> bool {
    if let Some(index) = siblings.iter().position(|node| &node.id == id) {
        let target = match shift {
            SiblingShift::Up => index.checked_sub(1),
            SiblingShift::Down => Some(index + 1).filter(|&next| next < siblings.len()),
        };
        return match target {
            Some(target) => {
                siblings.swap(index, target);
                true
            }
            None => false,
        };
    }
    siblings
        .iter_mut()
        .any(|node| shift_in(&mut node.children, id, shift))
}

/// Checks every structural invariant of the tree: unique ids, consistent
/// `parent_id`/`depth`, and no children under nodes that refuse them.
pub fn validate<T: Nestable>(tree: &[Node<T>]) -> TreeResult<()> {
    let mut seen = HashSet::new();
    validate_level(tree, None, 0, &mut seen)
}

fn validate_level<'a, T: Nestable>(
    nodes: &'a [Node<T>],
    parent: Option<&'a Node<T>>,
    depth: usize,
    seen: &mut HashSet<&'a NodeId>,
) -> TreeResult<()> {
    for node in nodes {
        if !seen.insert(&node.id) {
            return Err(TreeError::DuplicateId(node.id.clone()));
        }
        if node.depth != depth {
            return Err(TreeError::DepthMismatch {
                id: node.id.clone(),
                expected: depth,
                found: node.depth,
            });
        }
        let expected_parent = parent.map(|p| &p.id);
        if node.parent_id.as_ref() != expected_parent {
            return Err(TreeError::DanglingParent {
                id: node.id.clone(),
                parent_id: node
                    .parent_id
                    .clone()
                    .unwrap_or_else(|| NodeId::from("<none>")),
            });
        }
        if !node.children.is_empty() && !node.data.accepts_children() {
            return Err(TreeError::ChildrenNotAllowed(node.id.clone()));
        }
        validate_level(&node.children, Some(node), depth + 1, seen)?;
    }
    Ok(())
}
