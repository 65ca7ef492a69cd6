use crate::app::{AppMode, AppState};
use crate::tree;
use crate::ui::constants::{APP_NAME, CURSOR_INDICATOR, STATUS_DRAG_PREFIX, STATUS_EDIT_PREFIX};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Paragraph,
    Frame,
};

// Status line renderer
pub struct StatusLineRenderer;

impl StatusLineRenderer {
    pub fn render(frame: &mut Frame, app: &AppState, area: Rect) {
        let (content, style) = Self::content_and_style(app, area.width);
        frame.render_widget(Paragraph::new(content).style(style), area);
    }

    pub fn content_and_style(app: &AppState, width: u16) -> (String, Style) {
        match &app.mode {
            AppMode::Normal if app.drag.is_dragging() => Self::render_drag(app),
            AppMode::Normal => Self::render_normal_mode(app),
            AppMode::Editing { buffer, cursor_pos } => {
                Self::render_edit_mode(buffer, *cursor_pos, width)
            }
            AppMode::Help => Self::render_help_mode(),
        }
    }

    fn render_normal_mode(app: &AppState) -> (String, Style) {
        if let Some(ref msg) = app.message {
            let style = Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD);
            return (msg.clone(), style);
        }

        let file = app
            .store
            .as_ref()
            .map(|store| store.path().display().to_string())
            .unwrap_or_else(|| "[no file]".to_string());
        let dirty = if app.is_dirty { " *" } else { "" };
        let content = format!(
            "{} | {} nodes | {}{}",
            APP_NAME,
            tree::count_nodes(&app.tree),
            file,
            dirty
        );
        (content, Style::default().fg(Color::Gray).bg(Color::Black))
    }

    fn render_drag(app: &AppState) -> (String, Style) {
        let rows = app.visible_rows();
        let target = match app.drag.preview(&rows, &app.config.projection()) {
            Some(projection) => {
                let parent = projection
                    .parent_id
                    .as_ref()
                    .and_then(|id| tree::find(&app.tree, id))
                    .map(|node| node.data.name.clone())
                    .unwrap_or_else(|| "top level".to_string());
                format!("depth {} under {}", projection.depth, parent)
            }
            None => "outside the outline, release to cancel".to_string(),
        };
        let name = app
            .drag
            .active_id()
            .and_then(|id| tree::find(&app.tree, id))
            .map(|node| node.data.name.as_str())
            .unwrap_or("?");

        let content = format!("{}{} -> {} (Esc cancels)", STATUS_DRAG_PREFIX, name, target);
        let style = Style::default()
            .fg(Color::Black)
            .bg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        (content, style)
    }

    fn render_edit_mode(buffer: &str, cursor_pos: usize, width: u16) -> (String, Style) {
        let chars: Vec<char> = buffer.chars().collect();

        // Keep the cursor in view when the name is longer than the line
        let available = width.saturating_sub(STATUS_EDIT_PREFIX.len() as u16 + 1) as usize;
        let start = if cursor_pos > available.saturating_sub(10) {
            cursor_pos.saturating_sub(available / 2)
        } else {
            0
        };
        let end = (start + available).min(chars.len());
        let cursor = cursor_pos.clamp(start, end) - start;

        let visible = &chars[start.min(end)..end];
        let mut display = String::from(STATUS_EDIT_PREFIX);
        display.extend(&visible[..cursor]);
        display.push(CURSOR_INDICATOR);
        display.extend(&visible[cursor..]);

        let style = Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        (display, style)
    }

    fn render_help_mode() -> (String, Style) {
        let style = Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        (String::from("Press ESC or q to close help"), style)
    }
}
