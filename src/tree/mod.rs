//! Tree projection: conversions between the nested tree and its flat,
//! depth-annotated form, plus the drag projection computed on that form.
//!
//! Apart from `find_mut` and `move_item`, every function here borrows its
//! input and returns a new value.

mod flatten;
mod ops;
mod projection;
mod rebuild;

pub use flatten::flatten;
pub use ops::{
    child_count, contains, count_nodes, find, find_mut, insert_as_child, is_descendant,
    move_item, remove_item, shift_among_siblings, validate, SiblingShift,
};
pub use projection::{
    project, Projection, ProjectionConfig, RootFallback, DEFAULT_INDENTATION_THRESHOLD,
    DEFAULT_MAX_DEPTH,
};
pub use rebuild::{rebuild, rebuild_with, try_rebuild, OrphanPolicy};
