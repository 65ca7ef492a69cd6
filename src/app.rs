use crate::config::AppConfig;
use crate::drag::DragState;
use crate::model::{FlatNode, NodeId, PageItem, PageNode};
use crate::store::JsonFileStore;
use crate::tree;

#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Normal,
    Editing { buffer: String, cursor_pos: usize },
    Help,
}

pub struct AppState {
    pub running: bool,
    pub mode: AppMode,
    pub tree: Vec<PageNode>,
    pub selected: Option<NodeId>,
    pub config: AppConfig,
    pub store: Option<JsonFileStore>,
    pub is_dirty: bool,

    // Drag gesture in flight and the column it started from
    pub drag: DragState,
    pub drag_origin_column: u16,

    // Viewport state
    pub viewport_top: usize,
    pub terminal_height: u16,

    // Undo/Redo history
    pub history: Vec<Vec<PageNode>>,
    pub history_index: usize,

    // Message for status line
    pub message: Option<String>,

    // Tree as last loaded or saved; the dirty flag compares against it
    saved_tree: Vec<PageNode>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        Self {
            running: true,
            mode: AppMode::Normal,
            tree: Vec::new(),
            selected: None,
            config,
            store: None,
            is_dirty: false,
            drag: DragState::Idle,
            drag_origin_column: 0,
            viewport_top: 0,
            terminal_height: 24,
            history: Vec::new(),
            history_index: 0,
            message: None,
            saved_tree: Vec::new(),
        }
    }

    /// Replaces the tree wholesale, e.g. after loading, and selects the first
    /// row.
    pub fn load_tree(&mut self, tree: Vec<PageNode>) {
        self.tree = tree;
        self.selected = self.tree.first().map(|node| node.id.clone());
        self.history.clear();
        self.history_index = 0;
        self.mark_saved();
    }

    /// Records the current tree as the one on disk.
    pub fn mark_saved(&mut self) {
        self.saved_tree = self.tree.clone();
        self.is_dirty = false;
    }

    fn refresh_dirty(&mut self) {
        self.is_dirty = self.tree != self.saved_tree;
    }

    /// Installs a modified tree. Returns `false` when nothing changed, in
    /// which case history and the dirty flag are left alone.
    pub fn apply(&mut self, tree: Vec<PageNode>) -> bool {
        if tree == self.tree {
            return false;
        }
        self.push_history();
        self.tree = tree;
        self.refresh_dirty();
        self.repair_selection();
        true
    }

    /// Snapshots the current tree before a change and drops any redo states.
    pub fn push_history(&mut self) {
        self.history.truncate(self.history_index);
        self.history.push(self.tree.clone());
        self.history_index = self.history.len();

        if self.history.len() > self.config.max_undo_steps {
            self.history.remove(0);
            self.history_index -= 1;
        }
    }

    pub fn undo(&mut self) -> bool {
        if self.history_index == 0 {
            return false;
        }
        if self.history_index == self.history.len() {
            // Keep the latest state around so it can be redone.
            self.history.push(self.tree.clone());
        }
        self.history_index -= 1;
        self.tree = self.history[self.history_index].clone();
        self.refresh_dirty();
        self.repair_selection();
        true
    }

    pub fn redo(&mut self) -> bool {
        if self.history_index + 1 >= self.history.len() {
            return false;
        }
        self.history_index += 1;
        self.tree = self.history[self.history_index].clone();
        self.refresh_dirty();
        self.repair_selection();
        true
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn selected_node(&self) -> Option<&PageNode> {
        self.selected
            .as_ref()
            .and_then(|id| tree::find(&self.tree, id))
    }

    /// Rows of the outline in display order. Hidden nodes and everything
    /// below them are left out unless `show_hidden` is set.
    pub fn visible_rows(&self) -> Vec<FlatNode<PageItem>> {
        let flat = tree::flatten(&self.tree);
        if self.config.show_hidden {
            return flat;
        }

        let mut rows = Vec::with_capacity(flat.len());
        let mut hidden_below: Option<usize> = None;
        for row in flat {
            if let Some(depth) = hidden_below {
                if row.depth > depth {
                    continue;
                }
                hidden_below = None;
            }
            if !row.data.is_visible {
                hidden_below = Some(row.depth);
                continue;
            }
            rows.push(row);
        }
        rows
    }

    pub fn selected_row(&self) -> Option<usize> {
        let selected = self.selected.as_ref()?;
        self.visible_rows()
            .iter()
            .position(|row| &row.id == selected)
    }

    /// Number of outline rows that fit above the status line.
    pub fn outline_height(&self) -> usize {
        self.terminal_height.saturating_sub(1) as usize
    }

    /// Node drawn on the given screen row, if any.
    pub fn row_at(&self, screen_row: u16) -> Option<NodeId> {
        if screen_row as usize >= self.outline_height() {
            return None;
        }
        self.visible_rows()
            .into_iter()
            .nth(self.viewport_top + screen_row as usize)
            .map(|row| row.id)
    }

    pub fn ensure_selected_visible(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        let height = self.outline_height().max(1);
        if row < self.viewport_top {
            self.viewport_top = row;
        } else if row >= self.viewport_top + height {
            self.viewport_top = row + 1 - height;
        }
    }

    // Falls back to the first row when the selected node is gone.
    fn repair_selection(&mut self) {
        let still_there = self
            .selected
            .as_ref()
            .is_some_and(|id| tree::contains(&self.tree, id));
        if !still_there {
            self.selected = self.tree.first().map(|node| node.id.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Node;

    fn create_test_app() -> AppState {
        let mut app = AppState::new(AppConfig::default());
        app.load_tree(tree::rebuild(&tree::flatten(&[
            Node::new("home", PageItem::page("Home"))
                .with_children(vec![Node::new("hero", PageItem::section("Hero"))]),
            Node::new("about", PageItem::page("About")),
        ])));
        app
    }

    fn renamed(app: &AppState, name: &str) -> Vec<PageNode> {
        let mut tree = app.tree.clone();
        tree[0].data.name = name.to_string();
        tree
    }

    #[test]
    fn test_load_selects_first_row() {
        let app = create_test_app();

        assert_eq!(app.selected, Some(NodeId::from("home")));
        assert!(!app.is_dirty);
    }

    #[test]
    fn test_apply_unchanged_tree_is_noop() {
        let mut app = create_test_app();

        assert!(!app.apply(app.tree.clone()));
        assert!(app.history.is_empty());
        assert!(!app.is_dirty);
    }

    #[test]
    fn test_undo_redo() {
        let mut app = create_test_app();

        let first = renamed(&app, "Modified");
        assert!(app.apply(first));
        let second = renamed(&app, "Modified2");
        assert!(app.apply(second));
        assert_eq!(app.tree[0].data.name, "Modified2");

        assert!(app.undo());
        assert_eq!(app.tree[0].data.name, "Modified");
        assert!(app.undo());
        assert_eq!(app.tree[0].data.name, "Home");
        assert!(!app.undo());

        assert!(app.redo());
        assert_eq!(app.tree[0].data.name, "Modified");
        assert!(app.redo());
        assert_eq!(app.tree[0].data.name, "Modified2");
        assert!(!app.redo());
    }

    #[test]
    fn test_undo_back_to_saved_tree_is_clean() {
        let mut app = create_test_app();

        let first = renamed(&app, "Modified");
        app.apply(first);
        assert!(app.is_dirty);

        app.undo();
        assert!(!app.is_dirty);
        app.redo();
        assert!(app.is_dirty);

        app.mark_saved();
        app.undo();
        assert!(app.is_dirty);
        app.redo();
        assert!(!app.is_dirty);
    }

    #[test]
    fn test_new_change_discards_redo() {
        let mut app = create_test_app();
        let first = renamed(&app, "One");
        app.apply(first);
        app.undo();

        let other = renamed(&app, "Other");
        app.apply(other);

        assert!(!app.redo());
        assert_eq!(app.tree[0].data.name, "Other");
    }

    #[test]
    fn test_history_is_bounded() {
        let mut app = create_test_app();
        app.config.max_undo_steps = 2;

        for step in 0..5 {
            let next = renamed(&app, &format!("step {}", step));
            app.apply(next);
        }

        assert_eq!(app.history.len(), 2);
        assert!(app.undo());
        assert!(app.undo());
        assert!(!app.undo());
        assert_eq!(app.tree[0].data.name, "step 2");
    }

    #[test]
    fn test_hidden_rows_skip_subtree() {
        let mut app = create_test_app();
        app.tree[0].data.is_visible = false;

        assert_eq!(app.visible_rows().len(), 3);

        app.config.show_hidden = false;
        let rows: Vec<String> = app.visible_rows().iter().map(|r| r.id.to_string()).collect();
        assert_eq!(rows, vec!["about"]);
    }

    #[test]
    fn test_row_at_honours_viewport() {
        let mut app = create_test_app();
        app.terminal_height = 3;

        assert_eq!(app.row_at(0), Some(NodeId::from("home")));
        assert_eq!(app.row_at(1), Some(NodeId::from("hero")));
        // last line belongs to the status bar
        assert_eq!(app.row_at(2), None);

        app.viewport_top = 1;
        assert_eq!(app.row_at(1), Some(NodeId::from("about")));
    }

    #[test]
    fn test_selection_repaired_after_removal() {
        let mut app = create_test_app();
        app.selected = Some(NodeId::from("hero"));

        let pruned = tree::remove_item(&app.tree, &NodeId::from("hero"));
        app.apply(pruned);

        assert_eq!(app.selected, Some(NodeId::from("home")));
    }
}
