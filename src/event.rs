use crate::actions::Action;
use crate::app::{AppMode, AppState};
use crate::model::ModuleKind;
use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use std::time::Duration;

const SCROLL_STEP: isize = 3;

pub fn handle_events(app: &mut AppState) -> Result<Option<Action>> {
    if event::poll(Duration::from_millis(10))? {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                return Ok(handle_key_event(app, key));
            }
            Event::Mouse(mouse) => return Ok(handle_mouse_event(app, mouse)),
            Event::Resize(_, height) => {
                app.terminal_height = height;
                app.ensure_selected_visible();
            }
            _ => {}
        }
    }
    Ok(None)
}

pub fn handle_key_event(app: &AppState, key: KeyEvent) -> Option<Action> {
    match &app.mode {
        AppMode::Normal if app.drag.is_dragging() => handle_dragging(key),
        AppMode::Normal => handle_normal_mode(key),
        AppMode::Editing { .. } => handle_editing_mode(key),
        AppMode::Help => handle_help_mode(key),
    }
}

pub fn handle_mouse_event(app: &AppState, mouse: MouseEvent) -> Option<Action> {
    if !matches!(app.mode, AppMode::Normal) {
        return None;
    }
    let (row, column) = (mouse.row, mouse.column);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(Action::BeginDrag { row, column }),
        MouseEventKind::Drag(MouseButton::Left) => Some(Action::DragTo { row, column }),
        MouseEventKind::Up(MouseButton::Left) => Some(Action::Drop),
        MouseEventKind::ScrollDown => Some(Action::Scroll(SCROLL_STEP)),
        MouseEventKind::ScrollUp => Some(Action::Scroll(-SCROLL_STEP)),
        _ => None,
    }
}

// Only cancelling makes sense while the mouse button is held.
fn handle_dragging(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc => Some(Action::CancelDrag),
        _ => None,
    }
}

fn handle_normal_mode(key: KeyEvent) -> Option<Action> {
    use KeyCode::*;

    match (key.code, key.modifiers) {
        // Quit
        (Char('q'), KeyModifiers::NONE) => Some(Action::Quit),
        (Char('Q'), KeyModifiers::SHIFT) => Some(Action::ForceQuit),
        (Char('c'), KeyModifiers::CONTROL) => Some(Action::Quit),

        // Reordering (must come before plain arrow handling)
        (Char('J'), KeyModifiers::SHIFT) | (Down, KeyModifiers::ALT) => Some(Action::MoveDown),
        (Char('K'), KeyModifiers::SHIFT) | (Up, KeyModifiers::ALT) => Some(Action::MoveUp),
        (Tab, KeyModifiers::NONE) | (Char('>'), _) => Some(Action::Indent),
        (BackTab, _) | (Char('<'), _) => Some(Action::Outdent),

        // Movement
        (Char('j'), KeyModifiers::NONE) | (Down, _) => Some(Action::SelectDown),
        (Char('k'), KeyModifiers::NONE) | (Up, _) => Some(Action::SelectUp),
        (Char('h'), KeyModifiers::NONE) | (Left, _) => Some(Action::SelectParent),
        (Char('g'), KeyModifiers::NONE) | (Home, _) => Some(Action::SelectTop),
        (Char('G'), KeyModifiers::SHIFT) | (End, _) => Some(Action::SelectBottom),

        // Structure
        (Char('P'), KeyModifiers::SHIFT) => Some(Action::InsertPage),
        (Char('a'), KeyModifiers::NONE) => Some(Action::InsertSection),
        (Char(digit @ '1'..='9'), KeyModifiers::NONE) => {
            let index = digit as usize - '1' as usize;
            ModuleKind::ALL.get(index).copied().map(Action::InsertModule)
        }
        (Char('d'), KeyModifiers::NONE) | (Delete, _) => Some(Action::Delete),
        (Char(' '), KeyModifiers::NONE) | (Char('v'), KeyModifiers::NONE) => {
            Some(Action::ToggleVisibility)
        }

        // Editing
        (Char('e'), KeyModifiers::NONE) | (Enter, KeyModifiers::NONE) => Some(Action::Rename),

        // File operations
        (Char('s'), KeyModifiers::NONE) => Some(Action::Save),

        // Undo/Redo
        (Char('u'), KeyModifiers::NONE) => Some(Action::Undo),
        (Char('r'), KeyModifiers::CONTROL) => Some(Action::Redo),

        // Help
        (Char('?'), _) => Some(Action::ShowHelp),

        _ => None,
    }
}

fn handle_editing_mode(key: KeyEvent) -> Option<Action> {
    use KeyCode::*;

    match (key.code, key.modifiers) {
        (Esc, _) => Some(Action::CancelEdit),
        (Enter, _) => Some(Action::ConfirmEdit),

        // Deletion
        (Backspace, KeyModifiers::CONTROL) | (Backspace, KeyModifiers::ALT) => {
            Some(Action::DeleteWordBackward)
        }
        (Char('w'), KeyModifiers::CONTROL) => Some(Action::DeleteWordBackward),
        (Backspace, _) => Some(Action::Backspace),
        (Delete, _) => Some(Action::DeleteChar),

        // Cursor
        (Left, _) => Some(Action::MoveCursorLeft),
        (Right, _) => Some(Action::MoveCursorRight),
        (Home, _) | (Char('a'), KeyModifiers::CONTROL) => Some(Action::MoveCursorHome),
        (End, _) | (Char('e'), KeyModifiers::CONTROL) => Some(Action::MoveCursorEnd),

        (Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => Some(Action::TypeChar(c)),

        _ => None,
    }
}

fn handle_help_mode(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => Some(Action::CloseHelp),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::model::NodeId;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_normal_mode_keys() {
        let app = AppState::new(AppConfig::default());

        assert_eq!(
            handle_key_event(&app, key(KeyCode::Char('j'), KeyModifiers::NONE)),
            Some(Action::SelectDown)
        );
        assert_eq!(
            handle_key_event(&app, key(KeyCode::Char('J'), KeyModifiers::SHIFT)),
            Some(Action::MoveDown)
        );
        assert_eq!(
            handle_key_event(&app, key(KeyCode::Tab, KeyModifiers::NONE)),
            Some(Action::Indent)
        );
        assert_eq!(
            handle_key_event(&app, key(KeyCode::Char('3'), KeyModifiers::NONE)),
            Some(Action::InsertModule(ModuleKind::Article))
        );
    }

    #[test]
    fn test_escape_cancels_drag_in_flight() {
        let mut app = AppState::new(AppConfig::default());
        app.drag.start(NodeId::from("home"));

        assert_eq!(
            handle_key_event(&app, key(KeyCode::Esc, KeyModifiers::NONE)),
            Some(Action::CancelDrag)
        );
        assert_eq!(
            handle_key_event(&app, key(KeyCode::Char('d'), KeyModifiers::NONE)),
            None
        );
    }

    #[test]
    fn test_editing_mode_types_text() {
        let mut app = AppState::new(AppConfig::default());
        app.mode = AppMode::Editing {
            buffer: String::new(),
            cursor_pos: 0,
        };

        assert_eq!(
            handle_key_event(&app, key(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(Action::TypeChar('q'))
        );
        assert_eq!(
            handle_key_event(&app, key(KeyCode::Backspace, KeyModifiers::NONE)),
            Some(Action::Backspace)
        );
    }

    #[test]
    fn test_mouse_maps_to_drag_actions() {
        let app = AppState::new(AppConfig::default());

        assert_eq!(
            handle_mouse_event(&app, mouse(MouseEventKind::Down(MouseButton::Left), 4, 2)),
            Some(Action::BeginDrag { row: 2, column: 4 })
        );
        assert_eq!(
            handle_mouse_event(&app, mouse(MouseEventKind::Drag(MouseButton::Left), 9, 0)),
            Some(Action::DragTo { row: 0, column: 9 })
        );
        assert_eq!(
            handle_mouse_event(&app, mouse(MouseEventKind::Up(MouseButton::Left), 9, 0)),
            Some(Action::Drop)
        );
        assert_eq!(
            handle_mouse_event(&app, mouse(MouseEventKind::Down(MouseButton::Right), 9, 0)),
            None
        );
    }
}
