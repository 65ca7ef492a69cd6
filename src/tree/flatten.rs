use crate::model::{FlatNode, Node, NodeId};
use tracing::instrument;

/// Pre-order linearization of `tree`.
///
/// Each node is immediately followed by its whole subtree, children in their
/// original order. `depth` and `parent_id` of the output are computed from
/// the position in `tree`; whatever the input nodes carried is ignored.
#[instrument(level = "trace", skip_all, fields(roots = tree.len()))]
pub fn flatten<T: Clone>(tree: &[Node<T>]) -> Vec<FlatNode<T>> {
    let mut flat = Vec::new();
    flatten_into(tree, None, 0, &mut flat);
    flat
}

fn flatten_into<T: Clone>(
    nodes: &[Node<T>],
    parent_id: Option<&NodeId>,
    depth: usize,
    out: &mut Vec<FlatNode<T>>,
) {
    for node in nodes {
        out.push(FlatNode {
            id: node.id.clone(),
            parent_id: parent_id.cloned(),
            depth,
            data: node.data.clone(),
        });
        flatten_into(&node.children, Some(&node.id), depth + 1, out);
    }
}
