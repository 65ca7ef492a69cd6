use crate::app::{AppMode, AppState};
use crate::tree;

// `cursor_pos` counts characters, not bytes.
fn byte_index(buffer: &str, cursor_pos: usize) -> usize {
    buffer
        .char_indices()
        .nth(cursor_pos)
        .map(|(index, _)| index)
        .unwrap_or(buffer.len())
}

pub fn start_rename(app: &mut AppState) {
    if let Some(node) = app.selected_node() {
        let buffer = node.data.name.clone();
        let cursor_pos = buffer.chars().count();
        app.mode = AppMode::Editing { buffer, cursor_pos };
    }
}

pub fn type_char(app: &mut AppState, c: char) {
    if let AppMode::Editing { buffer, cursor_pos } = &mut app.mode {
        let at = byte_index(buffer, *cursor_pos);
        buffer.insert(at, c);
        *cursor_pos += 1;
    }
}

pub fn backspace(app: &mut AppState) {
    if let AppMode::Editing { buffer, cursor_pos } = &mut app.mode {
        if *cursor_pos > 0 {
            *cursor_pos -= 1;
            let at = byte_index(buffer, *cursor_pos);
            buffer.remove(at);
        }
    }
}

pub fn delete_char(app: &mut AppState) {
    if let AppMode::Editing { buffer, cursor_pos } = &mut app.mode {
        if *cursor_pos < buffer.chars().count() {
            let at = byte_index(buffer, *cursor_pos);
            buffer.remove(at);
        }
    }
}

pub fn move_cursor_left(app: &mut AppState) {
    if let AppMode::Editing { cursor_pos, .. } = &mut app.mode {
        *cursor_pos = cursor_pos.saturating_sub(1);
    }
}

pub fn move_cursor_right(app: &mut AppState) {
    if let AppMode::Editing { buffer, cursor_pos } = &mut app.mode {
        if *cursor_pos < buffer.chars().count() {
            *cursor_pos += 1;
        }
    }
}

pub fn move_cursor_home(app: &mut AppState) {
    if let AppMode::Editing { cursor_pos, .. } = &mut app.mode {
        *cursor_pos = 0;
    }
}

pub fn move_cursor_end(app: &mut AppState) {
    if let AppMode::Editing { buffer, cursor_pos } = &mut app.mode {
        *cursor_pos = buffer.chars().count();
    }
}

pub fn delete_word_backward(app: &mut AppState) {
    if let AppMode::Editing { buffer, cursor_pos } = &mut app.mode {
        let chars: Vec<char> = buffer.chars().collect();
        let end = *cursor_pos;
        let mut start = end;

        while start > 0 && chars[start - 1] == ' ' {
            start -= 1;
        }
        while start > 0 && chars[start - 1] != ' ' {
            start -= 1;
        }

        let (from, to) = (byte_index(buffer, start), byte_index(buffer, end));
        buffer.replace_range(from..to, "");
        *cursor_pos = start;
    }
}

pub fn confirm_edit(app: &mut AppState) {
    let new_name = if let AppMode::Editing { buffer, .. } = &app.mode {
        buffer.trim().to_string()
    } else {
        return;
    };
    app.mode = AppMode::Normal;

    if new_name.is_empty() {
        app.set_message("Name cannot be empty");
        return;
    }
    let Some(selected) = app.selected.clone() else {
        return;
    };

    let mut renamed = app.tree.clone();
    if let Some(node) = tree::find_mut(&mut renamed, &selected) {
        node.data.name = new_name;
    }
    app.apply(renamed);
}

pub fn cancel_edit(app: &mut AppState) {
    app.mode = AppMode::Normal;
}
