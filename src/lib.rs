pub mod app;
pub mod config;
pub mod drag;
pub mod errors;
pub mod logging;
pub mod model;
pub mod store;
pub mod tree;
pub mod ui;

// Internal modules
pub mod actions;
pub mod event;

// Re-export commonly used types
pub use app::{AppMode, AppState};
pub use config::AppConfig;
pub use drag::{commit_drop, DragConfig, DragState, DropOutcome};
pub use errors::{TreeError, TreeResult};
pub use model::{FlatNode, ItemKind, ModuleKind, Nestable, Node, NodeId, PageItem, PageNode};
pub use store::{DocumentFormat, JsonFileStore, StoreError, TreeStore};
