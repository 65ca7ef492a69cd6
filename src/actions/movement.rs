use crate::app::AppState;
use crate::model::NodeId;

fn select_row(app: &mut AppState, pick: impl FnOnce(usize, Option<usize>) -> Option<usize>) {
    let rows = app.visible_rows();
    if rows.is_empty() {
        app.selected = None;
        return;
    }
    let current = app
        .selected
        .as_ref()
        .and_then(|id| rows.iter().position(|row| &row.id == id));
    if let Some(index) = pick(rows.len(), current) {
        if let Some(row) = rows.get(index) {
            app.selected = Some(row.id.clone());
        }
    }
    app.ensure_selected_visible();
}

pub fn select_up(app: &mut AppState) {
    select_row(app, |_, current| match current {
        Some(index) => Some(index.saturating_sub(1)),
        None => Some(0),
    });
}

pub fn select_down(app: &mut AppState) {
    select_row(app, |len, current| match current {
        Some(index) => Some((index + 1).min(len - 1)),
        None => Some(0),
    });
}

pub fn select_top(app: &mut AppState) {
    select_row(app, |_, _| Some(0));
}

pub fn select_bottom(app: &mut AppState) {
    select_row(app, |len, _| Some(len - 1));
}

pub fn select_parent(app: &mut AppState) {
    let parent: Option<NodeId> = app.selected_node().and_then(|node| node.parent_id.clone());
    match parent {
        Some(parent_id) => {
            app.selected = Some(parent_id);
            app.ensure_selected_visible();
        }
        None => app.set_message("Already at the top level"),
    }
}
