//! Drag gesture state machine.
//!
//! `Idle → Dragging → (dropped | cancelled) → Idle`. The machine only
//! remembers the gesture in flight; the committed tree stays with the
//! caller and is handed in when the pointer is released.

use crate::errors::{TreeError, TreeResult};
use crate::model::{FlatNode, Nestable, Node, NodeId};
use crate::tree::{
    self, find, is_descendant, move_item, project, OrphanPolicy, Projection, ProjectionConfig,
};
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DragConfig {
    pub projection: ProjectionConfig,
    pub orphans: OrphanPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        active_id: NodeId,
        /// Row under the pointer; `None` while hovering outside the rows.
        over_id: Option<NodeId>,
        /// Horizontal distance from the drag origin, in pixels.
        offset: i32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome<T> {
    /// The reordered tree, ready to be persisted.
    Committed(Vec<Node<T>>),
    /// The drop target was invalid; the tree is unchanged.
    Rejected(TreeError),
    /// Released without a target, or the dragged node vanished.
    Cancelled,
}

impl DragState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, DragState::Dragging { .. })
    }

    pub fn active_id(&self) -> Option<&NodeId> {
        match self {
            DragState::Dragging { active_id, .. } => Some(active_id),
            DragState::Idle => None,
        }
    }

    pub fn over_id(&self) -> Option<&NodeId> {
        match self {
            DragState::Dragging { over_id, .. } => over_id.as_ref(),
            DragState::Idle => None,
        }
    }

    /// Starts a gesture on `active_id`. Ignored while another gesture is in
    /// flight; returns whether a new gesture started.
    pub fn start(&mut self, active_id: NodeId) -> bool {
        if self.is_dragging() {
            return false;
        }
        debug!(%active_id, "drag started");
        *self = DragState::Dragging {
            over_id: Some(active_id.clone()),
            active_id,
            offset: 0,
        };
        true
    }

    /// Records a pointer move. No effect when idle.
    pub fn update(&mut self, over: Option<NodeId>, new_offset: i32) {
        if let DragState::Dragging {
            over_id, offset, ..
        } = self
        {
            *over_id = over;
            *offset = new_offset;
        }
    }

    pub fn cancel(&mut self) {
        if self.is_dragging() {
            debug!("drag cancelled");
        }
        *self = DragState::Idle;
    }

    /// Live projection of the gesture for display. Never touches the tree.
    pub fn preview<T>(&self, flat: &[FlatNode<T>], config: &ProjectionConfig) -> Option<Projection> {
        match self {
            DragState::Dragging {
                active_id,
                over_id: Some(over_id),
                offset,
            } => project(flat, active_id, over_id, *offset, config),
            _ => None,
        }
    }

    /// Ends the gesture and resolves the drop against `tree`. The machine is
    /// back to `Idle` afterwards whatever the outcome.
    pub fn finish<T: Nestable + Clone>(
        &mut self,
        tree: &[Node<T>],
        config: &DragConfig,
    ) -> DropOutcome<T> {
        self.finish_among(tree, &tree::flatten(tree), config)
    }

    /// Like `finish`, but projects against `rows`, the rows the user
    /// actually sees. Rows left out (collapsed or hidden subtrees) are
    /// never picked as the new parent.
    pub fn finish_among<T: Nestable + Clone>(
        &mut self,
        tree: &[Node<T>],
        rows: &[FlatNode<T>],
        config: &DragConfig,
    ) -> DropOutcome<T> {
        let DragState::Dragging {
            active_id,
            over_id,
            offset,
        } = std::mem::take(self)
        else {
            return DropOutcome::Cancelled;
        };
        let Some(over_id) = over_id else {
            debug!(%active_id, "dropped outside any row");
            return DropOutcome::Cancelled;
        };

        let outcome = project(rows, &active_id, &over_id, offset, &config.projection)
            .ok_or_else(|| TreeError::NodeNotFound(active_id.clone()))
            .and_then(|projection| {
                commit_projection(tree, &active_id, &over_id, projection, config.orphans)
            });
        match outcome {
            Ok(reordered) => {
                debug!(%active_id, %over_id, offset, "drop committed");
                DropOutcome::Committed(reordered)
            }
            Err(TreeError::NodeNotFound(missing)) => {
                debug!(%missing, "drop cancelled, node vanished");
                DropOutcome::Cancelled
            }
            Err(reason) => {
                debug!(%active_id, %over_id, %reason, "drop rejected");
                DropOutcome::Rejected(reason)
            }
        }
    }
}

/// Applies a drop of `active_id` onto `over_id` and returns the reordered
/// tree.
///
/// The projected parent must accept children and must not be the dragged
/// node or one of its descendants. The dragged entry moves to the `over`
/// position of the flat list, takes the projected placement, and the tree is
/// rebuilt; its descendants follow it through their `parent_id`.
#[instrument(level = "trace", skip(tree, config))]
pub fn commit_drop<T: Nestable + Clone>(
    tree: &[Node<T>],
    active_id: &NodeId,
    over_id: &NodeId,
    offset: i32,
    config: &DragConfig,
) -> TreeResult<Vec<Node<T>>> {
    let projection = project(
        &tree::flatten(tree),
        active_id,
        over_id,
        offset,
        &config.projection,
    )
    .ok_or_else(|| TreeError::NodeNotFound(active_id.clone()))?;
    commit_projection(tree, active_id, over_id, projection, config.orphans)
}

/// Moves `active_id` to the `over` position and gives it the already
/// computed `projection`, after checking the new parent.
pub fn commit_projection<T: Nestable + Clone>(
    tree: &[Node<T>],
    active_id: &NodeId,
    over_id: &NodeId,
    projection: Projection,
    orphans: OrphanPolicy,
) -> TreeResult<Vec<Node<T>>> {
    let mut flat = tree::flatten(tree);

    if let Some(parent_id) = &projection.parent_id {
        if parent_id == active_id || is_descendant(tree, active_id, parent_id) {
            return Err(TreeError::CycleDetected {
                id: active_id.clone(),
                parent_id: parent_id.clone(),
            });
        }
        let parent =
            find(tree, parent_id).ok_or_else(|| TreeError::NodeNotFound(parent_id.clone()))?;
        if !parent.data.accepts_children() {
            return Err(TreeError::ChildrenNotAllowed(parent_id.clone()));
        }
    }

    let from = flat
        .iter()
        .position(|node| &node.id == active_id)
        .ok_or_else(|| TreeError::NodeNotFound(active_id.clone()))?;
    let to = flat
        .iter()
        .position(|node| &node.id == over_id)
        .ok_or_else(|| TreeError::NodeNotFound(over_id.clone()))?;
    move_item(&mut flat, from, to);

    let moved = &mut flat[to];
    moved.parent_id = projection.parent_id;
    moved.depth = projection.depth;

    tree::rebuild_with(&flat, orphans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModuleKind, PageItem};
    use crate::tree::flatten;

    fn id(raw: &str) -> NodeId {
        NodeId::from(raw)
    }

    fn ids<T>(nodes: &[Node<T>]) -> Vec<String> {
        nodes.iter().map(|n| n.id.to_string()).collect()
    }

    // 1 → [2], 3
    fn scenario_tree() -> Vec<Node<PageItem>> {
        tree::rebuild(&flatten(&[
            Node::new("1", PageItem::page("Home"))
                .with_children(vec![Node::new("2", PageItem::section("Hero"))]),
            Node::new("3", PageItem::section("Footer")),
        ]))
    }

    #[test]
    fn test_start_sets_active_and_over() {
        let mut drag = DragState::default();

        assert!(drag.start(id("3")));

        assert_eq!(
            drag,
            DragState::Dragging {
                active_id: id("3"),
                over_id: Some(id("3")),
                offset: 0,
            }
        );
    }

    #[test]
    fn test_second_start_is_ignored() {
        let mut drag = DragState::default();
        drag.start(id("1"));

        assert!(!drag.start(id("2")));
        assert_eq!(drag.active_id(), Some(&id("1")));
    }

    #[test]
    fn test_update_while_idle_does_nothing() {
        let mut drag = DragState::default();
        drag.update(Some(id("1")), 50);
        assert_eq!(drag, DragState::Idle);
    }

    #[test]
    fn test_preview_does_not_touch_tree() {
        let tree = scenario_tree();
        let flat = flatten(&tree);
        let mut drag = DragState::default();
        drag.start(id("3"));
        drag.update(Some(id("2")), 25);

        let preview = drag.preview(&flat, &ProjectionConfig::default());

        assert_eq!(
            preview,
            Some(Projection {
                depth: 2,
                parent_id: Some(id("2")),
            })
        );
        assert_eq!(tree, scenario_tree());
    }

    #[test]
    fn test_drop_nests_under_target() {
        let tree = scenario_tree();
        let mut drag = DragState::default();
        drag.start(id("3"));
        drag.update(Some(id("2")), 25);

        let DropOutcome::Committed(reordered) = drag.finish(&tree, &DragConfig::default()) else {
            panic!("expected a committed drop");
        };

        assert_eq!(drag, DragState::Idle);
        assert_eq!(ids(&reordered), vec!["1"]);
        assert_eq!(ids(&reordered[0].children), vec!["2"]);
        let moved = &reordered[0].children[0].children[0];
        assert_eq!(moved.id, id("3"));
        assert_eq!(moved.depth, 2);
        assert_eq!(moved.parent_id, Some(id("2")));
    }

    #[test]
    fn test_drop_reorders_within_level() {
        let tree = scenario_tree();
        let mut drag = DragState::default();
        drag.start(id("3"));
        drag.update(Some(id("1")), 4);

        let outcome = drag.finish(&tree, &DragConfig::default());

        let DropOutcome::Committed(reordered) = outcome else {
            panic!("expected a committed drop");
        };
        assert_eq!(ids(&reordered), vec!["3", "1"]);
        assert_eq!(ids(&reordered[1].children), vec!["2"]);
    }

    #[test]
    fn test_drop_carries_subtree_along() {
        let tree = scenario_tree();
        let mut drag = DragState::default();
        drag.start(id("1"));
        drag.update(Some(id("3")), 0);

        let DropOutcome::Committed(reordered) = drag.finish(&tree, &DragConfig::default()) else {
            panic!("expected a committed drop");
        };

        assert_eq!(ids(&reordered), vec!["3", "1"]);
        assert_eq!(ids(&reordered[1].children), vec!["2"]);
    }

    #[test]
    fn test_drop_under_module_is_rejected() {
        let tree = tree::insert_as_child(
            &scenario_tree(),
            &id("2"),
            Node::new("m", PageItem::module("Intro", ModuleKind::Text)),
        );
        let mut drag = DragState::default();
        drag.start(id("3"));
        drag.update(Some(id("m")), 40);

        assert_eq!(
            drag.finish(&tree, &DragConfig::default()),
            DropOutcome::Rejected(TreeError::ChildrenNotAllowed(id("m")))
        );
        assert_eq!(drag, DragState::Idle);
    }

    #[test]
    fn test_drop_under_own_descendant_is_rejected() {
        let tree = scenario_tree();
        let mut drag = DragState::default();
        drag.start(id("1"));
        drag.update(Some(id("2")), 40);

        assert_eq!(
            drag.finish(&tree, &DragConfig::default()),
            DropOutcome::Rejected(TreeError::CycleDetected {
                id: id("1"),
                parent_id: id("2"),
            })
        );
    }

    #[test]
    fn test_drop_outside_rows_cancels() {
        let tree = scenario_tree();
        let mut drag = DragState::default();
        drag.start(id("3"));
        drag.update(None, 40);

        assert_eq!(drag.finish(&tree, &DragConfig::default()), DropOutcome::Cancelled);
        assert_eq!(drag, DragState::Idle);
    }

    #[test]
    fn test_drop_of_vanished_node_cancels() {
        let tree = scenario_tree();
        let mut drag = DragState::default();
        drag.start(id("ghost"));

        assert_eq!(drag.finish(&tree, &DragConfig::default()), DropOutcome::Cancelled);
    }

    #[test]
    fn test_finish_among_ignores_rows_left_out() {
        // 1 → [2], 3; row 2 is not shown
        let tree = scenario_tree();
        let rows: Vec<_> = flatten(&tree)
            .into_iter()
            .filter(|row| row.id != id("2"))
            .collect();
        let mut drag = DragState::default();
        drag.start(id("3"));
        drag.update(Some(id("3")), 30);

        let DropOutcome::Committed(reordered) =
            drag.finish_among(&tree, &rows, &DragConfig::default())
        else {
            panic!("expected the drop to commit");
        };

        assert_eq!(ids(&reordered[0].children), vec!["2", "3"]);
        assert_eq!(find(&reordered, &id("3")).map(|n| n.depth), Some(1));
    }

    #[test]
    fn test_cancel_returns_to_idle() {
        let mut drag = DragState::default();
        drag.start(id("1"));
        drag.update(Some(id("3")), -40);

        drag.cancel();

        assert_eq!(drag, DragState::Idle);
        assert!(!drag.is_dragging());
    }
}
