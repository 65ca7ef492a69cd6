use crate::app::AppState;
use crate::model::{NodeId, PageItem, PageNode};
use crate::tree;
use crate::ui::constants::row;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowRole {
    Plain,
    Selected,
    /// The node being dragged, drawn at its projected depth.
    Dragged,
    /// The row under the pointer during a drag.
    Over,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutlineRow {
    pub id: NodeId,
    pub depth: usize,
    pub label: String,
    pub hidden: bool,
    pub role: RowRole,
}

/// `Name [kind]`, followed by the hidden marker and the number of
/// descendants when there are any.
pub fn row_label(item: &PageItem, descendants: usize) -> String {
    let mut label = format!("{} [{}]", item.name, item.kind.label());
    if !item.is_visible {
        label.push_str(row::HIDDEN_MARKER);
    }
    if descendants > 0 {
        label.push_str(row::DESCENDANTS_PREFIX);
        label.push_str(&descendants.to_string());
    }
    label
}

/// Rows as currently displayed, with the drag preview applied.
pub fn outline_rows(app: &AppState) -> Vec<OutlineRow> {
    let rows = app.visible_rows();
    let preview = app.drag.preview(&rows, &app.config.projection());
    let active = app.drag.active_id();
    let over = app.drag.over_id();

    rows.into_iter()
        .map(|flat| {
            let is_active = active == Some(&flat.id);
            let role = if is_active {
                RowRole::Dragged
            } else if app.drag.is_dragging() && over == Some(&flat.id) {
                RowRole::Over
            } else if app.selected.as_ref() == Some(&flat.id) {
                RowRole::Selected
            } else {
                RowRole::Plain
            };
            let depth = match (&preview, is_active) {
                (Some(projection), true) => projection.depth,
                _ => flat.depth,
            };
            OutlineRow {
                label: row_label(&flat.data, tree::child_count(&app.tree, &flat.id)),
                hidden: !flat.data.is_visible,
                id: flat.id,
                depth,
                role,
            }
        })
        .collect()
}

/// Plain-text outline, one line per node, indented by depth.
pub fn outline_text(tree: &[PageNode], indent_width: usize) -> String {
    tree::flatten(tree)
        .iter()
        .map(|flat| {
            let label = row_label(&flat.data, tree::child_count(tree, &flat.id));
            format!("{}{}", " ".repeat(flat.depth * indent_width), label)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Cuts `text` so that it occupies at most `max_width` terminal columns.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > max_width {
            break;
        }
        width += w;
        out.push(c);
    }
    out
}

pub struct OutlineRenderer;

impl OutlineRenderer {
    pub fn render(frame: &mut Frame, app: &AppState, area: Rect) {
        let rows = outline_rows(app);
        if rows.is_empty() {
            let hint = Paragraph::new("Empty tree. Press P to add a page, ? for help.")
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(hint, area);
            return;
        }

        let indent = app.config.indent_width as usize;
        let lines: Vec<Line> = rows
            .iter()
            .skip(app.viewport_top)
            .take(area.height as usize)
            .map(|row| Self::build_line(row, indent, area.width as usize))
            .collect();

        frame.render_widget(Paragraph::new(lines), area);
    }

    fn build_line(outline_row: &OutlineRow, indent: usize, width: usize) -> Line<'static> {
        let marker = match outline_row.role {
            RowRole::Selected => row::SELECTED_MARKER,
            RowRole::Dragged => row::DRAGGED_MARKER,
            RowRole::Plain | RowRole::Over => row::PLAIN_MARKER,
        };
        let text = format!(
            "{}{}{}",
            marker,
            " ".repeat(outline_row.depth * indent),
            outline_row.label
        );

        let mut style = match outline_row.role {
            RowRole::Plain => Style::default(),
            RowRole::Selected => Style::default().add_modifier(Modifier::REVERSED),
            RowRole::Dragged => Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            RowRole::Over => Style::default().bg(Color::DarkGray),
        };
        if outline_row.hidden {
            style = style.add_modifier(Modifier::DIM | Modifier::ITALIC);
        }

        Line::from(Span::styled(truncate_to_width(&text, width), style))
    }
}
