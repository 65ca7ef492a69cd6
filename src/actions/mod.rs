mod drag;
mod editing;
mod file;
mod help;
mod history;
mod movement;
mod node;

use crate::app::AppState;
use crate::model::ModuleKind;
use anyhow::Result;

// Re-export all public functions from submodules
pub use drag::*;
pub use editing::*;
pub use file::*;
pub use help::*;
pub use history::*;
pub use movement::*;
pub use node::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Application control
    Quit,
    ForceQuit,

    // Movement
    SelectUp,
    SelectDown,
    SelectTop,
    SelectBottom,
    SelectParent,

    // Structure
    InsertPage,
    InsertSection,
    InsertModule(ModuleKind),
    Delete,
    ToggleVisibility,
    MoveUp,
    MoveDown,
    Indent,
    Outdent,

    // Mouse drag
    BeginDrag { row: u16, column: u16 },
    DragTo { row: u16, column: u16 },
    Drop,
    CancelDrag,
    Scroll(isize),

    // Editing
    Rename,
    TypeChar(char),
    Backspace,
    DeleteChar,
    MoveCursorLeft,
    MoveCursorRight,
    MoveCursorHome,
    MoveCursorEnd,
    DeleteWordBackward,
    ConfirmEdit,
    CancelEdit,

    // File operations
    Save,

    // Undo/Redo
    Undo,
    Redo,

    // Help
    ShowHelp,
    CloseHelp,
}

pub fn execute_action(action: Action, app: &mut AppState) -> Result<()> {
    match action {
        Action::Quit => {
            if app.is_dirty {
                app.set_message("Unsaved changes! Press Shift+Q to force quit or 's' to save");
            } else {
                app.running = false;
            }
        }
        Action::ForceQuit => {
            app.running = false;
        }

        // Movement actions
        Action::SelectUp => movement::select_up(app),
        Action::SelectDown => movement::select_down(app),
        Action::SelectTop => movement::select_top(app),
        Action::SelectBottom => movement::select_bottom(app),
        Action::SelectParent => movement::select_parent(app),

        // Structure
        Action::InsertPage => node::insert_page(app)?,
        Action::InsertSection => node::insert_section(app)?,
        Action::InsertModule(kind) => node::insert_module(app, kind)?,
        Action::Delete => node::delete(app)?,
        Action::ToggleVisibility => node::toggle_visibility(app)?,
        Action::MoveUp => node::move_up(app)?,
        Action::MoveDown => node::move_down(app)?,
        Action::Indent => node::indent(app)?,
        Action::Outdent => node::outdent(app)?,

        // Mouse drag
        Action::BeginDrag { row, column } => drag::begin_drag(app, row, column),
        Action::DragTo { row, column } => drag::drag_to(app, row, column),
        Action::Drop => drag::finish_drag(app)?,
        Action::CancelDrag => drag::cancel_drag(app),
        Action::Scroll(delta) => {
            let last = app.visible_rows().len().saturating_sub(1);
            app.viewport_top = app.viewport_top.saturating_add_signed(delta).min(last);
        }

        // Editing
        Action::Rename => editing::start_rename(app),
        Action::TypeChar(c) => editing::type_char(app, c),
        Action::Backspace => editing::backspace(app),
        Action::DeleteChar => editing::delete_char(app),
        Action::MoveCursorLeft => editing::move_cursor_left(app),
        Action::MoveCursorRight => editing::move_cursor_right(app),
        Action::MoveCursorHome => editing::move_cursor_home(app),
        Action::MoveCursorEnd => editing::move_cursor_end(app),
        Action::DeleteWordBackward => editing::delete_word_backward(app),
        Action::ConfirmEdit => editing::confirm_edit(app),
        Action::CancelEdit => editing::cancel_edit(app),

        // File operations
        Action::Save => file::save(app)?,

        // Undo/Redo
        Action::Undo => history::undo(app),
        Action::Redo => history::redo(app),

        // Help
        Action::ShowHelp => help::show_help(app),
        Action::CloseHelp => help::close_help(app),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::model::{Node, PageItem};

    fn create_test_app() -> AppState {
        let mut app = AppState::new(AppConfig::default());
        app.load_tree(vec![
            Node::new("home", PageItem::page("Home")),
            Node::new("about", PageItem::page("About")),
        ]);
        app
    }

    #[test]
    fn test_quit_refused_when_dirty() {
        let mut app = create_test_app();
        app.is_dirty = true;

        execute_action(Action::Quit, &mut app).unwrap();
        assert!(app.running);

        execute_action(Action::ForceQuit, &mut app).unwrap();
        assert!(!app.running);
    }

    #[test]
    fn test_quit_when_clean() {
        let mut app = create_test_app();

        execute_action(Action::Quit, &mut app).unwrap();

        assert!(!app.running);
    }

    #[test]
    fn test_quit_allowed_after_undoing_every_change() {
        let mut app = create_test_app();

        execute_action(Action::MoveDown, &mut app).unwrap();
        execute_action(Action::Quit, &mut app).unwrap();
        assert!(app.running);

        execute_action(Action::Undo, &mut app).unwrap();
        execute_action(Action::Quit, &mut app).unwrap();
        assert!(!app.running);
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut app = create_test_app();

        execute_action(Action::Scroll(5), &mut app).unwrap();
        assert_eq!(app.viewport_top, 1);

        execute_action(Action::Scroll(-3), &mut app).unwrap();
        assert_eq!(app.viewport_top, 0);
    }
}
