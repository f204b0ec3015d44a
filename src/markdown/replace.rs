//! Regex replace action
//!
//! Applies a prefix pattern list (see [`super::patterns`]) to every line
//! touched by the selection.

use super::patterns::ReplacePattern;
use crate::editor::EditorBuffer;
use log::debug;

/// Apply the first matching pattern to each selected line.
///
/// Edits go through the buffer one at a time from the last line upwards, so
/// the selection shifts with them. A selection that started at the first
/// line's start stays anchored there. Returns true if any line changed.
pub fn run_regex_replace_action(buffer: &mut EditorBuffer, patterns: &[ReplacePattern]) -> bool {
    let (sel_start, sel_end) = buffer.selection();
    let (lines_start, lines_end) = buffer.selected_lines();

    let mut edits = Vec::new();
    let mut line_pos = lines_start;
    for line in buffer.text()[lines_start..lines_end].split('\n') {
        let edit = patterns.iter().find_map(|p| p.edit_for(line));
        if let Some((start, end, replacement)) = edit {
            if line[start..end] != replacement {
                edits.push((line_pos + start, line_pos + end, replacement));
            }
        }
        line_pos += line.len() + 1;
    }

    if edits.is_empty() {
        return false;
    }

    for (start, end, replacement) in edits.iter().rev() {
        buffer.replace(*start, *end, replacement);
    }

    if sel_start != sel_end && sel_start == lines_start {
        let end = buffer.selection_end();
        buffer.set_selection(lines_start, end);
    }

    debug!("Regex replace: {} line(s) changed", edits.len());
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::patterns::{
        replace_with_unordered_list_prefix_or_remove_prefix, set_or_unset_heading_with_level,
        toggle_quote,
    };

    #[test]
    fn test_caret_line_only() {
        let mut buffer = EditorBuffer::new("one\ntwo\nthree");
        buffer.set_cursor(5);
        assert!(run_regex_replace_action(&mut buffer, &toggle_quote()));
        assert_eq!(buffer.text(), "one\n> two\nthree");
        assert_eq!(buffer.selection(), (7, 7));
    }

    #[test]
    fn test_all_selected_lines() {
        let mut buffer = EditorBuffer::new("one\ntwo\nthree");
        buffer.set_selection(1, 9);
        run_regex_replace_action(&mut buffer, &replace_with_unordered_list_prefix_or_remove_prefix("-"));
        assert_eq!(buffer.text(), "- one\n- two\n- three");
        assert_eq!(buffer.selection(), (3, 15));
    }

    #[test]
    fn test_selection_from_line_start_stays_anchored() {
        let mut buffer = EditorBuffer::new("a\nb");
        buffer.set_selection(0, 3);
        run_regex_replace_action(&mut buffer, &toggle_quote());
        assert_eq!(buffer.text(), "> a\n> b");
        assert_eq!(buffer.selection(), (0, 7));
    }

    #[test]
    fn test_heading_toggle_off_moves_caret_back() {
        let mut buffer = EditorBuffer::new("## Title");
        buffer.set_cursor(5);
        run_regex_replace_action(&mut buffer, &set_or_unset_heading_with_level(2));
        assert_eq!(buffer.text(), "Title");
        assert_eq!(buffer.selection(), (2, 2));
    }

    #[test]
    fn test_empty_document() {
        let mut buffer = EditorBuffer::new("");
        assert!(run_regex_replace_action(&mut buffer, &set_or_unset_heading_with_level(1)));
        assert_eq!(buffer.text(), "# ");
        assert_eq!(buffer.selection(), (2, 2));
    }
}
