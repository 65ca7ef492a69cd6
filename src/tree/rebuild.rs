use crate::errors::{TreeError, TreeResult};
use crate::model::{FlatNode, Node, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{instrument, warn};

/// What `rebuild_with` does with entries that cannot be placed in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrphanPolicy {
    /// Leave them out of the rebuilt tree.
    #[default]
    Drop,
    /// Fail with the first problem found.
    Reject,
}

struct Assembly<T> {
    roots: Vec<Node<T>>,
    problems: Vec<TreeError>,
}

/// Rebuilds the nested tree from a flat list.
///
/// Entries with a `parent_id` of `None` become roots; every other entry is
/// appended to its parent's children, in list order. Entries whose parent is
/// missing, that repeat an earlier id, or that hang off a cycle are dropped
/// together with everything below them.
#[instrument(level = "trace", skip_all, fields(entries = flat.len()))]
pub fn rebuild<T: Clone>(flat: &[FlatNode<T>]) -> Vec<Node<T>> {
    let assembly = assemble(flat);
    for problem in &assembly.problems {
        warn!("dropping entry from rebuilt tree: {}", problem);
    }
    assembly.roots
}

/// Same as [`rebuild`] but fails instead of dropping entries.
#[instrument(level = "trace", skip_all, fields(entries = flat.len()))]
pub fn try_rebuild<T: Clone>(flat: &[FlatNode<T>]) -> TreeResult<Vec<Node<T>>> {
    let mut assembly = assemble(flat);
    if assembly.problems.is_empty() {
        Ok(assembly.roots)
    } else {
        Err(assembly.problems.swap_remove(0))
    }
}

pub fn rebuild_with<T: Clone>(
    flat: &[FlatNode<T>],
    policy: OrphanPolicy,
) -> TreeResult<Vec<Node<T>>> {
    match policy {
        OrphanPolicy::Drop => Ok(rebuild(flat)),
        OrphanPolicy::Reject => try_rebuild(flat),
    }
}

fn assemble<T: Clone>(flat: &[FlatNode<T>]) -> Assembly<T> {
    let mut positions: HashMap<&NodeId, usize> = HashMap::with_capacity(flat.len());
    for (index, entry) in flat.iter().enumerate() {
        positions.entry(&entry.id).or_insert(index);
    }

    let mut problems = Vec::new();
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); flat.len()];
    let mut roots = Vec::new();

    for (index, entry) in flat.iter().enumerate() {
        if positions[&entry.id] != index {
            problems.push(TreeError::DuplicateId(entry.id.clone()));
            continue;
        }
        match &entry.parent_id {
            None => roots.push(index),
            Some(parent_id) => match positions.get(parent_id) {
                Some(&parent_index) => children[parent_index].push(index),
                None => problems.push(TreeError::DanglingParent {
                    id: entry.id.clone(),
                    parent_id: parent_id.clone(),
                }),
            },
        }
    }

    let mut placed = vec![false; flat.len()];
    let tree = roots
        .iter()
        .map(|&index| build(flat, &children, &mut placed, index, None, 0))
        .collect();

    // Anything still unplaced either sits below a dangling/duplicate entry
    // (already reported) or is caught in a parent cycle.
    let reported: Vec<&NodeId> = problems
        .iter()
        .filter_map(|problem| match problem {
            TreeError::DanglingParent { id, .. } | TreeError::DuplicateId(id) => Some(id),
            _ => None,
        })
        .collect();
    let mut unreachable = Vec::new();
    for (index, entry) in flat.iter().enumerate() {
        if !placed[index]
            && positions[&entry.id] == index
            && !reported.contains(&&entry.id)
            && !below_reported(flat, &positions, index, &reported)
        {
            unreachable.push(TreeError::Unreachable {
                id: entry.id.clone(),
            });
        }
    }
    problems.extend(unreachable);

    Assembly {
        roots: tree,
        problems,
    }
}

fn build<T: Clone>(
    flat: &[FlatNode<T>],
    children: &[Vec<usize>],
    placed: &mut [bool],
    index: usize,
    parent_id: Option<&NodeId>,
    depth: usize,
) -> Node<T> {
    placed[index] = true;
    let entry = &flat[index];
    let kids = children[index]
        .iter()
        .map(|&child| build(flat, children, placed, child, Some(&entry.id), depth + 1))
        .collect();

    Node {
        id: entry.id.clone(),
        parent_id: parent_id.cloned(),
        depth,
        children: kids,
        data: entry.data.clone(),
    }
}

/// Walks the parent chain of `index` looking for an already reported entry.
fn below_reported<T>(
    flat: &[FlatNode<T>],
    positions: &HashMap<&NodeId, usize>,
    index: usize,
    reported: &[&NodeId],
) -> bool {
    let mut seen = vec![false; flat.len()];
    let mut current = index;
    loop {
        if seen[current] {
            return false;
        }
        seen[current] = true;
        let Some(parent_id) = &flat[current].parent_id else {
            return false;
        };
        if reported.contains(&parent_id) {
            return true;
        }
        match positions.get(parent_id) {
            Some(&parent_index) => current = parent_index,
            None => return false,
        }
    }
}
