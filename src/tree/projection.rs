use crate::model::{FlatNode, NodeId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

pub const DEFAULT_INDENTATION_THRESHOLD: i32 = 20;
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Placement used when nesting is requested but nothing sits above the
/// drop point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RootFallback {
    /// Move the dragged node to the root level.
    #[default]
    Promote,
    /// Leave the dragged node where it is.
    Keep,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionConfig {
    /// Horizontal offset that must be exceeded, in either direction, before
    /// the depth changes.
    pub threshold: i32,
    pub max_depth: usize,
    pub root_fallback: RootFallback,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_INDENTATION_THRESHOLD,
            max_depth: DEFAULT_MAX_DEPTH,
            root_fallback: RootFallback::default(),
        }
    }
}

/// Where a dragged node would land if dropped now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Projection {
    pub depth: usize,
    pub parent_id: Option<NodeId>,
}

impl Projection {
    pub fn root() -> Self {
        Self {
            depth: 0,
            parent_id: None,
        }
    }
}

/// Computes the depth and parent `active_id` would adopt when dropped on
/// `over_id` after moving `offset` pixels sideways.
///
/// Returns `None` when `active_id` is not in `flat`. Within the threshold
/// the active node keeps its placement. Past it on the right, the node nests
/// under the row just above the drop point: the `over` row, or the row above
/// the active one when hovering over itself. Past it on the left, the node
/// moves up one level to its grandparent.
#[instrument(level = "trace", skip(flat, config))]
pub fn project<T>(
    flat: &[FlatNode<T>],
    active_id: &NodeId,
    over_id: &NodeId,
    offset: i32,
    config: &ProjectionConfig,
) -> Option<Projection> {
    let active_index = flat.iter().position(|node| &node.id == active_id)?;
    let active = &flat[active_index];
    let current = Projection {
        depth: active.depth,
        parent_id: active.parent_id.clone(),
    };

    let projection = if offset > config.threshold {
        let anchor = flat
            .iter()
            .position(|node| &node.id == over_id)
            .filter(|&index| index != active_index)
            .or_else(|| active_index.checked_sub(1))
            .map(|index| &flat[index]);

        match anchor {
            Some(anchor) => nest_under(flat, anchor, config.max_depth),
            None => match config.root_fallback {
                RootFallback::Promote => Projection::root(),
                RootFallback::Keep => current,
            },
        }
    } else if offset < config.threshold.saturating_neg() {
        let grandparent = active
            .parent_id
            .as_ref()
            .and_then(|parent_id| lookup(flat, parent_id))
            .and_then(|parent| parent.parent_id.clone());
        Projection {
            depth: active.depth.saturating_sub(1),
            parent_id: grandparent,
        }
    } else {
        current
    };

    Some(projection)
}

/// Nests under `anchor`, climbing its ancestors while that would exceed
/// `max_depth`.
fn nest_under<T>(flat: &[FlatNode<T>], anchor: &FlatNode<T>, max_depth: usize) -> Projection {
    let mut candidate = Some(anchor);
    while let Some(node) = candidate {
        if node.depth < max_depth {
            return Projection {
                depth: node.depth + 1,
                parent_id: Some(node.id.clone()),
            };
        }
        candidate = node
            .parent_id
            .as_ref()
            .and_then(|parent_id| lookup(flat, parent_id));
    }
    Projection::root()
}

fn lookup<'a, T>(flat: &'a [FlatNode<T>], id: &NodeId) -> Option<&'a FlatNode<T>> {
    flat.iter().find(|node| &node.id == id)
}
