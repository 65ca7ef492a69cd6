use crate::app::AppState;
use crate::model::{ModuleKind, Nestable, Node, NodeId, PageItem, PageNode};
use crate::tree::{self, SiblingShift};
use crate::{drag, errors::TreeError};
use anyhow::Result;
use tracing::debug;

use super::editing::start_rename;
use super::file;

/// Installs `tree` as the committed tree and saves it when auto-save is on.
pub fn commit(app: &mut AppState, tree: Vec<PageNode>, message: &str) -> Result<()> {
    if !app.apply(tree) {
        return Ok(());
    }
    app.set_message(message);
    if app.config.auto_save && app.store.is_some() {
        file::save(app)?;
    }
    Ok(())
}

fn fresh_id(tree: &[PageNode], prefix: &str) -> NodeId {
    let mut n = tree::count_nodes(tree) + 1;
    loop {
        let candidate = NodeId::new(format!("{}-{}", prefix, n));
        if !tree::contains(tree, &candidate) {
            return candidate;
        }
        n += 1;
    }
}

fn rejection_message(err: &TreeError) -> String {
    match err {
        TreeError::ChildrenNotAllowed(_) => "Modules cannot contain other items".to_string(),
        TreeError::CycleDetected { .. } => "Cannot move an item into itself".to_string(),
        other => other.to_string(),
    }
}

pub fn toggle_visibility(app: &mut AppState) -> Result<()> {
    let Some(selected) = app.selected.clone() else {
        return Ok(());
    };
    let mut toggled = app.tree.clone();
    let Some(node) = tree::find_mut(&mut toggled, &selected) else {
        return Ok(());
    };
    node.data.is_visible = !node.data.is_visible;
    let message = if node.data.is_visible {
        "Shown"
    } else {
        "Hidden"
    };
    commit(app, toggled, message)
}

pub fn delete(app: &mut AppState) -> Result<()> {
    let Some(selected) = app.selected.clone() else {
        return Ok(());
    };

    let index = app.selected_row().unwrap_or(0);
    let pruned = tree::remove_item(&app.tree, &selected);
    commit(app, pruned, "Deleted")?;

    // Select the row that took the deleted one's place, or the one above.
    let rows = app.visible_rows();
    app.selected = rows
        .get(index)
        .or_else(|| rows.last())
        .map(|row| row.id.clone());
    app.ensure_selected_visible();
    Ok(())
}

pub fn insert_page(app: &mut AppState) -> Result<()> {
    let id = fresh_id(&app.tree, "page");
    let mut grown = app.tree.clone();
    grown.push(Node::new(id.clone(), PageItem::page("New page")));
    commit(app, grown, "Page added")?;
    app.selected = Some(id);
    app.ensure_selected_visible();
    start_rename(app);
    Ok(())
}

fn insert_child(app: &mut AppState, prefix: &str, item: PageItem) -> Result<()> {
    let Some(parent) = app.selected_node() else {
        app.set_message("Select a page or section first");
        return Ok(());
    };
    if !parent.data.accepts_children() {
        app.set_message("Modules cannot contain other items");
        return Ok(());
    }
    if parent.depth + 1 > app.config.max_depth {
        app.set_message(format!("Maximum depth of {} reached", app.config.max_depth));
        return Ok(());
    }

    let parent_id = parent.id.clone();
    let id = fresh_id(&app.tree, prefix);
    let grown = tree::insert_as_child(&app.tree, &parent_id, Node::new(id.clone(), item));
    commit(app, grown, "Added")?;
    app.selected = Some(id);
    app.ensure_selected_visible();
    start_rename(app);
    Ok(())
}

pub fn insert_section(app: &mut AppState) -> Result<()> {
    insert_child(app, "section", PageItem::section("New section"))
}

pub fn insert_module(app: &mut AppState, kind: ModuleKind) -> Result<()> {
    let name = format!("New {} module", kind.label());
    insert_child(app, "module", PageItem::module(name, kind))
}

pub fn move_up(app: &mut AppState) -> Result<()> {
    shift(app, SiblingShift::Up)
}

pub fn move_down(app: &mut AppState) -> Result<()> {
    shift(app, SiblingShift::Down)
}

fn shift(app: &mut AppState, direction: SiblingShift) -> Result<()> {
    let Some(selected) = app.selected.clone() else {
        return Ok(());
    };
    match tree::shift_among_siblings(&app.tree, &selected, direction) {
        Some(shifted) => {
            commit(app, shifted, "Moved")?;
            app.ensure_selected_visible();
        }
        None => app.set_message("Cannot move further"),
    }
    Ok(())
}

/// Nests the selected node as the last child of its previous sibling.
pub fn indent(app: &mut AppState) -> Result<()> {
    let Some(node) = app.selected_node() else {
        return Ok(());
    };
    let siblings = match &node.parent_id {
        Some(parent_id) => match tree::find(&app.tree, parent_id) {
            Some(parent) => parent.children.as_slice(),
            None => return Ok(()),
        },
        None => app.tree.as_slice(),
    };
    let index = siblings
        .iter()
        .position(|sibling| sibling.id == node.id)
        .unwrap_or(0);
    let Some(new_parent) = index.checked_sub(1).map(|i| &siblings[i]) else {
        app.set_message("Nothing above to nest under");
        return Ok(());
    };
    if !new_parent.data.accepts_children() {
        app.set_message("Modules cannot contain other items");
        return Ok(());
    }
    if new_parent.depth + 1 > app.config.max_depth {
        app.set_message(format!("Maximum depth of {} reached", app.config.max_depth));
        return Ok(());
    }

    let moved = node.clone();
    let new_parent_id = new_parent.id.clone();
    debug!(id = %moved.id, parent = %new_parent_id, "indent");
    let pruned = tree::remove_item(&app.tree, &moved.id);
    let nested = tree::insert_as_child(&pruned, &new_parent_id, moved);
    commit(app, nested, "Indented")
}

/// Moves the selected node one level up, the same way dragging it left past
/// the threshold would.
pub fn outdent(app: &mut AppState) -> Result<()> {
    let Some(selected) = app.selected.clone() else {
        return Ok(());
    };
    if app.selected_node().is_some_and(|node| node.parent_id.is_none()) {
        app.set_message("Already at the top level");
        return Ok(());
    }

    let config = app.config.drag();
    let offset = config.projection.threshold.saturating_neg().saturating_sub(1);
    match drag::commit_drop(&app.tree, &selected, &selected, offset, &config) {
        Ok(outdented) => commit(app, outdented, "Outdented"),
        Err(err) => {
            app.set_message(rejection_message(&err));
            Ok(())
        }
    }
}

pub(crate) fn drop_rejected_message(err: &TreeError) -> String {
    format!("Drop rejected: {}", rejection_message(err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn create_test_app() -> AppState {
        let mut app = AppState::new(AppConfig::default());
        app.load_tree(tree::rebuild(&tree::flatten(&[
            Node::new("home", PageItem::page("Home")).with_children(vec![
                Node::new("hero", PageItem::section("Hero"))
                    .with_children(vec![Node::new("intro", PageItem::module("Intro", ModuleKind::Text))]),
                Node::new("body", PageItem::section("Body")),
            ]),
            Node::new("about", PageItem::page("About")),
        ])));
        app
    }

    fn select(app: &mut AppState, id: &str) {
        app.selected = Some(NodeId::from(id));
    }

    fn child_ids(app: &AppState, id: &str) -> Vec<String> {
        tree::find(&app.tree, &NodeId::from(id))
            .map(|node| node.children.iter().map(|c| c.id.to_string()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_toggle_visibility() {
        let mut app = create_test_app();
        select(&mut app, "hero");

        toggle_visibility(&mut app).unwrap();

        assert!(!app.selected_node().unwrap().data.is_visible);
        assert!(app.is_dirty);
        toggle_visibility(&mut app).unwrap();
        assert!(app.selected_node().unwrap().data.is_visible);
    }

    #[test]
    fn test_delete_removes_subtree_and_moves_selection() {
        let mut app = create_test_app();
        select(&mut app, "hero");

        delete(&mut app).unwrap();

        assert_eq!(child_ids(&app, "home"), vec!["body"]);
        assert!(!tree::contains(&app.tree, &NodeId::from("intro")));
        assert_eq!(app.selected, Some(NodeId::from("body")));
    }

    #[test]
    fn test_delete_last_row_selects_previous() {
        let mut app = create_test_app();
        select(&mut app, "about");

        delete(&mut app).unwrap();

        assert_eq!(app.selected, Some(NodeId::from("body")));
    }

    #[test]
    fn test_insert_section_under_page() {
        let mut app = create_test_app();
        select(&mut app, "about");

        insert_section(&mut app).unwrap();

        let about = tree::find(&app.tree, &NodeId::from("about")).unwrap();
        assert_eq!(about.children.len(), 1);
        assert_eq!(about.children[0].depth, 1);
        assert_eq!(app.selected.as_ref(), Some(&about.children[0].id));
        assert!(matches!(app.mode, crate::app::AppMode::Editing { .. }));
    }

    #[test]
    fn test_insert_under_module_is_refused() {
        let mut app = create_test_app();
        select(&mut app, "intro");

        insert_module(&mut app, ModuleKind::Gallery).unwrap();

        assert!(child_ids(&app, "intro").is_empty());
        assert!(!app.is_dirty);
        assert!(app.message.is_some());
    }

    #[test]
    fn test_move_down_swaps_siblings() {
        let mut app = create_test_app();
        select(&mut app, "hero");

        move_down(&mut app).unwrap();
        assert_eq!(child_ids(&app, "home"), vec!["body", "hero"]);

        move_down(&mut app).unwrap();
        assert_eq!(app.message.as_deref(), Some("Cannot move further"));
    }

    #[test]
    fn test_indent_under_previous_sibling() {
        let mut app = create_test_app();
        select(&mut app, "body");

        indent(&mut app).unwrap();

        assert_eq!(child_ids(&app, "hero"), vec!["intro", "body"]);
        let body = app.selected_node().unwrap();
        assert_eq!(body.depth, 2);
        assert_eq!(body.parent_id, Some(NodeId::from("hero")));
    }

    #[test]
    fn test_indent_first_child_is_refused() {
        let mut app = create_test_app();
        select(&mut app, "hero");

        indent(&mut app).unwrap();

        assert_eq!(child_ids(&app, "home"), vec!["hero", "body"]);
        assert!(!app.is_dirty);
    }

    #[test]
    fn test_outdent_moves_to_grandparent() {
        let mut app = create_test_app();
        select(&mut app, "intro");

        outdent(&mut app).unwrap();

        assert_eq!(child_ids(&app, "home"), vec!["hero", "intro", "body"]);
        let intro = app.selected_node().unwrap();
        assert_eq!(intro.depth, 1);
        assert!(tree::validate(&app.tree).is_ok());
    }

    #[test]
    fn test_outdent_with_extreme_threshold() {
        let mut app = create_test_app();
        app.config.threshold = i32::MAX;
        select(&mut app, "body");

        outdent(&mut app).unwrap();

        assert_eq!(app.tree.len(), 3);
        assert_eq!(app.selected_node().map(|node| node.depth), Some(0));
    }

    #[test]
    fn test_outdent_root_is_refused() {
        let mut app = create_test_app();
        select(&mut app, "home");

        outdent(&mut app).unwrap();

        assert!(!app.is_dirty);
        assert_eq!(app.message.as_deref(), Some("Already at the top level"));
    }
}
