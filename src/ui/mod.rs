mod constants;
mod help;
mod outline;
mod status_line;

use crate::app::{AppMode, AppState};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

pub use help::HelpRenderer;
pub use outline::{outline_rows, outline_text, row_label, OutlineRenderer, OutlineRow, RowRole};
pub use status_line::StatusLineRenderer;

pub fn render(frame: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());

    match app.mode {
        AppMode::Help => HelpRenderer::render(frame, chunks[0]),
        _ => OutlineRenderer::render(frame, app, chunks[0]),
    }

    StatusLineRenderer::render(frame, app, chunks[1]);
}
