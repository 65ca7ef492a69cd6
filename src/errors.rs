use crate::model::NodeId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("Node with ID {0} not found")]
    NodeNotFound(NodeId),

    #[error("Node {id} references missing parent {parent_id}")]
    DanglingParent { id: NodeId, parent_id: NodeId },

    #[error("Node {id} is not reachable from any root (cycle in parent references)")]
    Unreachable { id: NodeId },

    #[error("Duplicate node ID {0}")]
    DuplicateId(NodeId),

    #[error("Node {0} does not accept children")]
    ChildrenNotAllowed(NodeId),

    #[error("Moving {id} under {parent_id} would make it its own ancestor")]
    CycleDetected { id: NodeId, parent_id: NodeId },

    #[error("Node {id} has depth {found}, expected {expected}")]
    DepthMismatch {
        id: NodeId,
        expected: usize,
        found: usize,
    },
}

pub type TreeResult<T> = Result<T, TreeError>;
