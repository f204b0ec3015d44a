//! Editor buffer with caret and selection
//!
//! `EditorBuffer` is the text model behind the editor widget. Toolbar actions
//! mutate it directly; the egui host mirrors its selection into the
//! `TextEdit` state whenever `take_cursor_changed()` reports a change.
//!
//! All offsets are byte offsets that always sit on UTF-8 character
//! boundaries. Selections are kept normalized (`start <= end`).

use crate::string_utils::{
    byte_index_to_char_index, ceil_char_boundary, char_distance, char_index_to_byte_index,
    floor_char_boundary, line_end, line_start, offset_for_column,
};
use log::debug;

/// Number of lines moved by PageUp / PageDown.
const PAGE_LINES: usize = 20;

/// Keys that can be simulated on the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKey {
    Up,
    Down,
    Left,
    Right,
    LineStart,
    LineEnd,
    Top,
    Bottom,
    PageUp,
    PageDown,
    Tab,
    SelectLine,
    SelectAll,
}

impl EditorKey {
    /// All keys offered by the special key dialog.
    pub fn all() -> &'static [EditorKey] {
        &[
            EditorKey::Tab,
            EditorKey::Up,
            EditorKey::Down,
            EditorKey::Left,
            EditorKey::Right,
            EditorKey::LineStart,
            EditorKey::LineEnd,
            EditorKey::PageUp,
            EditorKey::PageDown,
            EditorKey::Top,
            EditorKey::Bottom,
            EditorKey::SelectLine,
            EditorKey::SelectAll,
        ]
    }

    /// Label for dialogs.
    pub fn label(&self) -> &'static str {
        match self {
            EditorKey::Up => "Arrow Up",
            EditorKey::Down => "Arrow Down",
            EditorKey::Left => "Arrow Left",
            EditorKey::Right => "Arrow Right",
            EditorKey::LineStart => "Home",
            EditorKey::LineEnd => "End",
            EditorKey::Top => "Jump to top",
            EditorKey::Bottom => "Jump to bottom",
            EditorKey::PageUp => "Page Up",
            EditorKey::PageDown => "Page Down",
            EditorKey::Tab => "Tab",
            EditorKey::SelectLine => "Select line",
            EditorKey::SelectAll => "Select all",
        }
    }
}

/// Hook invoked after a single newline was inserted through the buffer.
pub type NewlineHook = fn(&mut EditorBuffer);

/// Text buffer with a selection, as manipulated by toolbar actions.
#[derive(Debug, Clone, Default)]
pub struct EditorBuffer {
    text: String,
    selection: (usize, usize),
    /// Nesting depth of `with_auto_format_disabled` calls
    auto_format_suspended: u32,
    newline_hook: Option<NewlineHook>,
    focus_requested: bool,
    cursor_changed: bool,
}

impl EditorBuffer {
    /// Create a buffer with the caret at the start of `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Install the auto-format hook run after typed or inserted newlines.
    #[must_use]
    pub fn with_newline_hook(mut self, hook: NewlineHook) -> Self {
        self.newline_hook = Some(hook);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Mutable access for the egui `TextEdit`, which edits the string in place.
    pub fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }

    /// Replace the whole text and put the caret at the start.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.set_cursor(0);
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Selection
    // ─────────────────────────────────────────────────────────────────────────

    /// Current selection as `(start, end)` byte offsets, `start <= end`.
    pub fn selection(&self) -> (usize, usize) {
        self.selection
    }

    pub fn selection_start(&self) -> usize {
        self.selection.0
    }

    pub fn selection_end(&self) -> usize {
        self.selection.1
    }

    pub fn has_selection(&self) -> bool {
        self.selection.0 != self.selection.1
    }

    /// Selected text (empty when there is only a caret).
    pub fn selected_text(&self) -> &str {
        &self.text[self.selection.0..self.selection.1]
    }

    /// Set the selection; offsets are clamped, snapped and ordered.
    pub fn set_selection(&mut self, a: usize, b: usize) {
        let a = floor_char_boundary(&self.text, a);
        let b = floor_char_boundary(&self.text, b);
        self.selection = (a.min(b), a.max(b));
        self.cursor_changed = true;
    }

    /// Collapse the selection to a caret at `pos`.
    pub fn set_cursor(&mut self, pos: usize) {
        self.set_selection(pos, pos);
    }

    /// Selection in char indices, for the egui host.
    pub fn char_selection(&self) -> (usize, usize) {
        (
            byte_index_to_char_index(&self.text, self.selection.0),
            byte_index_to_char_index(&self.text, self.selection.1),
        )
    }

    /// Update the selection from egui char indices without flagging a change.
    pub fn sync_char_selection(&mut self, a: usize, b: usize) {
        let a = char_index_to_byte_index(&self.text, a);
        let b = char_index_to_byte_index(&self.text, b);
        self.selection = (a.min(b), a.max(b));
    }

    /// Returns true once after the selection was changed programmatically.
    pub fn take_cursor_changed(&mut self) -> bool {
        std::mem::take(&mut self.cursor_changed)
    }

    /// Ask the host to focus the editor widget.
    pub fn request_focus(&mut self) {
        self.focus_requested = true;
    }

    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Editing
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert `s` at `pos`. A caret at `pos` ends up after the inserted text.
    pub fn insert(&mut self, pos: usize, s: &str) {
        self.replace(pos, pos, s);
    }

    /// Replace `[start, end)` with `s`, shifting the selection.
    ///
    /// Selection points before the range stay put, points after it move by
    /// the length delta, and points inside it (or at an insertion point)
    /// move to the end of the replacement. The start of a non-empty replaced
    /// range keeps its selection point.
    pub fn replace(&mut self, start: usize, end: usize, s: &str) {
        self.splice(start, end, s);
        self.run_newline_hook(s);
    }

    /// Replace the selection with `s` and place the caret after it.
    pub fn insert_or_replace_text_on_cursor(&mut self, s: &str) {
        let (start, end) = self.selection;
        self.splice(start, end, s);
        self.set_cursor(start + s.len());
        self.run_newline_hook(s);
    }

    fn splice(&mut self, start: usize, end: usize, s: &str) {
        let (lo, hi) = (start.min(end), start.max(end));
        let start = floor_char_boundary(&self.text, lo);
        let end = ceil_char_boundary(&self.text, hi);
        self.text.replace_range(start..end, s);

        let new_end = start + s.len();
        let shift = |p: usize| -> usize {
            if p < start || (p == start && end > start) {
                p
            } else if p > end {
                p - (end - start) + s.len()
            } else {
                new_end
            }
        };
        let (a, b) = (shift(self.selection.0), shift(self.selection.1));
        self.selection = (a.min(b), a.max(b));
        self.cursor_changed = true;
    }

    fn run_newline_hook(&mut self, inserted: &str) {
        if inserted == "\n" && self.is_auto_format_enabled() {
            if let Some(hook) = self.newline_hook {
                hook(self);
            }
        }
    }

    /// Delete `[start, end)`.
    pub fn delete(&mut self, start: usize, end: usize) {
        self.replace(start, end, "");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Auto-format
    // ─────────────────────────────────────────────────────────────────────────

    pub fn is_auto_format_enabled(&self) -> bool {
        self.auto_format_suspended == 0
    }

    /// Run `f` with list auto-formatting suspended.
    pub fn with_auto_format_disabled<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.auto_format_suspended += 1;
        let result = f(self);
        self.auto_format_suspended -= 1;
        result
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lines
    // ─────────────────────────────────────────────────────────────────────────

    pub fn line_start(&self, pos: usize) -> usize {
        line_start(&self.text, pos)
    }

    pub fn line_end(&self, pos: usize) -> usize {
        line_end(&self.text, pos)
    }

    /// Bounds of all lines touched by the selection, excluding the final newline.
    pub fn selected_lines(&self) -> (usize, usize) {
        (
            self.line_start(self.selection.0),
            self.line_end(self.selection.1),
        )
    }

    /// Text of the line containing `pos`.
    pub fn line_at(&self, pos: usize) -> &str {
        &self.text[self.line_start(pos)..self.line_end(pos)]
    }

    /// Expand the selection to whole lines; returns the previous selection start.
    pub fn set_selection_expand_whole_lines(&mut self) -> usize {
        let original = self.selection.0;
        let (start, end) = self.selected_lines();
        self.set_selection(start, end);
        original
    }

    pub fn move_cursor_to_end_of_line(&mut self, offset: usize) {
        let pos = self.line_end(self.selection.1) + offset;
        self.set_cursor(pos);
    }

    pub fn move_cursor_to_begin_of_line(&mut self, offset: usize) {
        let pos = self.line_start(self.selection.0) + offset;
        self.set_cursor(pos);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Key simulation
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply the effect of pressing `key` in the editor.
    pub fn simulate_key_press(&mut self, key: EditorKey) {
        debug!("Simulating key press: {:?}", key);
        match key {
            EditorKey::Up => self.move_vertically(1, true),
            EditorKey::Down => self.move_vertically(1, false),
            EditorKey::PageUp => self.move_vertically(PAGE_LINES, true),
            EditorKey::PageDown => self.move_vertically(PAGE_LINES, false),
            EditorKey::Left => {
                let pos = if self.has_selection() {
                    self.selection.0
                } else {
                    floor_char_boundary(&self.text, self.selection.0.saturating_sub(1))
                };
                self.set_cursor(pos);
            }
            EditorKey::Right => {
                let pos = if self.has_selection() {
                    self.selection.1
                } else {
                    ceil_char_boundary(&self.text, self.selection.1 + 1)
                };
                self.set_cursor(pos);
            }
            EditorKey::LineStart => self.move_cursor_to_begin_of_line(0),
            EditorKey::LineEnd => self.move_cursor_to_end_of_line(0),
            EditorKey::Top => self.set_cursor(0),
            EditorKey::Bottom => self.set_cursor(self.text.len()),
            EditorKey::Tab => self.insert_or_replace_text_on_cursor("\t"),
            EditorKey::SelectLine => {
                let (start, end) = self.selected_lines();
                self.set_selection(start, end);
            }
            EditorKey::SelectAll => self.set_selection(0, self.text.len()),
        }
    }

    /// Move the caret `lines` lines up or down, keeping the column.
    fn move_vertically(&mut self, lines: usize, up: bool) {
        let mut pos = if up {
            self.selection.0
        } else {
            self.selection.1
        };
        let column = char_distance(&self.text, self.line_start(pos), pos);

        for _ in 0..lines {
            let start = self.line_start(pos);
            let end = self.line_end(pos);
            if up {
                if start == 0 {
                    pos = 0;
                    break;
                }
                let prev_start = self.line_start(start - 1);
                pos = offset_for_column(&self.text, prev_start, start - 1, column);
            } else {
                if end == self.text.len() {
                    pos = end;
                    break;
                }
                let next_start = end + 1;
                let next_end = self.line_end(next_start);
                pos = offset_for_column(&self.text, next_start, next_end, column);
            }
        }
        self.set_cursor(pos);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_with_cursor(text: &str, cursor: usize) -> EditorBuffer {
        let mut buffer = EditorBuffer::new(text);
        buffer.set_cursor(cursor);
        buffer
    }

    #[test]
    fn test_insert_at_caret_moves_caret() {
        let mut buffer = buffer_with_cursor("Hello", 5);
        buffer.insert(5, " world");
        assert_eq!(buffer.text(), "Hello world");
        assert_eq!(buffer.selection(), (11, 11));
    }

    #[test]
    fn test_insert_before_selection_shifts_it() {
        let mut buffer = EditorBuffer::new("abc def");
        buffer.set_selection(4, 7);
        buffer.insert(0, ">> ");
        assert_eq!(buffer.selection(), (7, 10));
        assert_eq!(buffer.selected_text(), "def");
    }

    #[test]
    fn test_insert_at_selection_start_then_end_wraps() {
        let mut buffer = EditorBuffer::new("say hi");
        buffer.set_selection(4, 6);
        buffer.insert(buffer.selection_start(), "**");
        assert_eq!(buffer.selection(), (6, 8));
        buffer.insert(buffer.selection_end(), "**");
        assert_eq!(buffer.text(), "say **hi**");
        assert_eq!(buffer.selection(), (6, 10));
    }

    #[test]
    fn test_replace_selection_on_cursor() {
        let mut buffer = EditorBuffer::new("one two three");
        buffer.set_selection(4, 7);
        buffer.insert_or_replace_text_on_cursor("2");
        assert_eq!(buffer.text(), "one 2 three");
        assert_eq!(buffer.selection(), (5, 5));
    }

    #[test]
    fn test_selection_snaps_to_char_boundary() {
        let mut buffer = EditorBuffer::new("på");
        buffer.set_selection(2, 100);
        assert_eq!(buffer.selection(), (1, 3));
    }

    #[test]
    fn test_char_selection_roundtrip() {
        let mut buffer = EditorBuffer::new("æøå abc");
        buffer.sync_char_selection(4, 2);
        assert_eq!(buffer.selection(), (4, 7));
        assert_eq!(buffer.char_selection(), (2, 4));
        assert!(!buffer.take_cursor_changed());
    }

    #[test]
    fn test_expand_whole_lines_returns_original_start() {
        let mut buffer = EditorBuffer::new("first\nsecond line\nthird");
        buffer.set_selection(8, 20);
        let original = buffer.set_selection_expand_whole_lines();
        assert_eq!(original, 8);
        assert_eq!(buffer.selected_text(), "second line\nthird");
    }

    #[test]
    fn test_move_to_line_bounds() {
        let mut buffer = buffer_with_cursor("ab\ncdef\ng", 4);
        buffer.move_cursor_to_end_of_line(0);
        assert_eq!(buffer.selection(), (7, 7));
        buffer.move_cursor_to_begin_of_line(0);
        assert_eq!(buffer.selection(), (3, 3));
    }

    #[test]
    fn test_key_up_keeps_column() {
        let mut buffer = buffer_with_cursor("abcdef\nxy\nlonger line", 14);
        buffer.simulate_key_press(EditorKey::Up);
        // Column 4 does not exist on "xy", caret clamps to its end
        assert_eq!(buffer.selection(), (9, 9));
        buffer.simulate_key_press(EditorKey::Up);
        assert_eq!(buffer.selection(), (2, 2));
        buffer.simulate_key_press(EditorKey::Up);
        assert_eq!(buffer.selection(), (0, 0));
    }

    #[test]
    fn test_key_down_and_bottom() {
        let mut buffer = buffer_with_cursor("abc\ndefg\nh", 2);
        buffer.simulate_key_press(EditorKey::Down);
        assert_eq!(buffer.selection(), (6, 6));
        buffer.simulate_key_press(EditorKey::Down);
        assert_eq!(buffer.selection(), (10, 10));
        buffer.simulate_key_press(EditorKey::Down);
        assert_eq!(buffer.selection(), (10, 10));
        buffer.simulate_key_press(EditorKey::Top);
        assert_eq!(buffer.selection(), (0, 0));
    }

    #[test]
    fn test_key_tab_and_select() {
        let mut buffer = buffer_with_cursor("a\nbc", 2);
        buffer.simulate_key_press(EditorKey::Tab);
        assert_eq!(buffer.text(), "a\n\tbc");
        buffer.simulate_key_press(EditorKey::SelectLine);
        assert_eq!(buffer.selected_text(), "\tbc");
        buffer.simulate_key_press(EditorKey::SelectAll);
        assert_eq!(buffer.selection(), (0, 5));
    }

    #[test]
    fn test_newline_hook_runs_unless_suspended() {
        fn mark(buffer: &mut EditorBuffer) {
            let pos = buffer.selection_end();
            buffer.with_auto_format_disabled(|b| b.insert(pos, "> "));
        }

        let mut buffer = buffer_with_cursor("x", 1).with_newline_hook(mark);
        buffer.insert_or_replace_text_on_cursor("\n");
        assert_eq!(buffer.text(), "x\n> ");

        buffer.with_auto_format_disabled(|b| b.insert_or_replace_text_on_cursor("\n"));
        assert_eq!(buffer.text(), "x\n> \n");
        assert!(buffer.is_auto_format_enabled());
    }

    #[test]
    fn test_focus_request_is_taken_once() {
        let mut buffer = EditorBuffer::new("");
        buffer.request_focus();
        assert!(buffer.take_focus_request());
        assert!(!buffer.take_focus_request());
    }
}
