//! Mouse drag handling: turns terminal cells into the pointer coordinates
//! the drag machine expects.

use crate::app::{AppMode, AppState};
use crate::drag::DropOutcome;
use anyhow::Result;

use super::node::{commit, drop_rejected_message};

/// Horizontal pointer offset in pixels for the given mouse column.
pub fn offset_for(app: &AppState, column: u16) -> i32 {
    (i32::from(column) - i32::from(app.drag_origin_column))
        .saturating_mul(app.config.column_width_px)
}

pub fn begin_drag(app: &mut AppState, row: u16, column: u16) {
    if app.mode != AppMode::Normal {
        return;
    }
    let Some(id) = app.row_at(row) else {
        return;
    };
    if app.drag.start(id.clone()) {
        app.drag_origin_column = column;
        app.selected = Some(id);
    }
}

pub fn drag_to(app: &mut AppState, row: u16, column: u16) {
    if !app.drag.is_dragging() {
        return;
    }
    let over = app.row_at(row);
    let offset = offset_for(app, column);
    app.drag.update(over, offset);
}

pub fn finish_drag(app: &mut AppState) -> Result<()> {
    if !app.drag.is_dragging() {
        return Ok(());
    }
    let config = app.config.drag();
    let rows = app.visible_rows();
    match app.drag.finish_among(&app.tree, &rows, &config) {
        DropOutcome::Committed(reordered) => commit(app, reordered, "Moved")?,
        DropOutcome::Rejected(reason) => app.set_message(drop_rejected_message(&reason)),
        DropOutcome::Cancelled => app.set_message("Drag cancelled"),
    }
    app.ensure_selected_visible();
    Ok(())
}

pub fn cancel_drag(app: &mut AppState) {
    if app.drag.is_dragging() {
        app.drag.cancel();
        app.set_message("Drag cancelled");
    }
}
