// Constants for rendering
pub const CURSOR_INDICATOR: char = '▌';
pub const STATUS_EDIT_PREFIX: &str = "Rename: ";
pub const STATUS_DRAG_PREFIX: &str = "Drag: ";
pub const APP_NAME: &str = "pagetree";

// Outline row decorations
pub mod row {
    pub const HIDDEN_MARKER: &str = " ~hidden";
    pub const DESCENDANTS_PREFIX: &str = " +";
    pub const SELECTED_MARKER: &str = "> ";
    pub const DRAGGED_MARKER: &str = "» ";
    pub const PLAIN_MARKER: &str = "  ";
}
