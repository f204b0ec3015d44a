//! Inline formatting on the editor buffer
//!
//! Toggles a pair of literal delimiters (`**`, `_`, `~~`, `` ` ``) around the
//! selection, and inserts literal block markup such as horizontal rules.

use crate::editor::EditorBuffer;
use log::debug;

/// Literal inserted by the horizontal line action.
pub const HORIZONTAL_RULE: &str = "----\n";

/// Toggle `delimiter` around the selection.
///
/// - Selection starts and ends with the delimiter: unwrap it.
/// - Selection is directly surrounded by the delimiter: remove the surrounding pair.
/// - Otherwise wrap the selection, keeping the inner text selected.
///
/// With only a caret, the pair is inserted and the caret placed between.
pub fn run_inline_action(buffer: &mut EditorBuffer, delimiter: &str) {
    let (start, end) = buffer.selection();
    let d = delimiter.len();

    if start == end {
        buffer.insert(start, &format!("{delimiter}{delimiter}"));
        buffer.set_cursor(start + d);
        debug!("Inline '{}': inserted empty pair at {}", delimiter, start);
        return;
    }

    let text = buffer.text();
    let selected = &text[start..end];

    if selected.len() >= 2 * d && selected.starts_with(delimiter) && selected.ends_with(delimiter) {
        let inner = selected[d..selected.len() - d].to_string();
        buffer.replace(start, end, &inner);
        buffer.set_selection(start, start + inner.len());
        debug!("Inline '{}': unwrapped selection", delimiter);
        return;
    }

    if text[..start].ends_with(delimiter) && text[end..].starts_with(delimiter) {
        let inner = selected.to_string();
        buffer.replace(start - d, end + d, &inner);
        buffer.set_selection(start - d, start - d + inner.len());
        debug!("Inline '{}': removed surrounding pair", delimiter);
        return;
    }

    buffer.insert(start, delimiter);
    buffer.insert(end + d, delimiter);
    buffer.set_selection(start + d, end + d);
    debug!("Inline '{}': wrapped {}..{}", delimiter, start, end);
}

/// Insert a horizontal rule on its own line before the selection.
///
/// Selected text is kept and stays selected after the rule.
pub fn insert_horizontal_rule(buffer: &mut EditorBuffer) {
    let (start, end) = buffer.selection();
    let snippet = if start == buffer.line_start(start) {
        HORIZONTAL_RULE.to_string()
    } else {
        format!("\n{HORIZONTAL_RULE}")
    };
    buffer.insert(start, &snippet);
    buffer.set_selection(start + snippet.len(), end + snippet.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(text: &str, start: usize, end: usize) -> EditorBuffer {
        let mut buffer = EditorBuffer::new(text);
        buffer.set_selection(start, end);
        buffer
    }

    #[test]
    fn test_wrap_selection() {
        let mut b = buffer("make bold here", 5, 9);
        run_inline_action(&mut b, "**");
        assert_eq!(b.text(), "make **bold** here");
        assert_eq!(b.selected_text(), "bold");
    }

    #[test]
    fn test_unwrap_selection_including_delimiters() {
        let mut b = buffer("make **bold** here", 5, 13);
        run_inline_action(&mut b, "**");
        assert_eq!(b.text(), "make bold here");
        assert_eq!(b.selected_text(), "bold");
    }

    #[test]
    fn test_remove_surrounding_delimiters() {
        let mut b = buffer("a ~~gone~~ b", 4, 8);
        run_inline_action(&mut b, "~~");
        assert_eq!(b.text(), "a gone b");
        assert_eq!(b.selected_text(), "gone");
    }

    #[test]
    fn test_empty_selection_inserts_pair() {
        let mut b = buffer("code: ", 6, 6);
        run_inline_action(&mut b, "`");
        assert_eq!(b.text(), "code: ``");
        assert_eq!(b.selection(), (7, 7));
    }

    #[test]
    fn test_wrap_multibyte_selection() {
        let mut b = buffer("før etter", 0, 4);
        run_inline_action(&mut b, "_");
        assert_eq!(b.text(), "_før_ etter");
        assert_eq!(b.selected_text(), "før");
    }

    #[test]
    fn test_single_delimiter_is_not_unwrapped() {
        // A lone "_" selected is wrapped, not treated as an empty pair
        let mut b = buffer("x _ y", 2, 3);
        run_inline_action(&mut b, "_");
        assert_eq!(b.text(), "x ___ y");
    }

    #[test]
    fn test_horizontal_rule() {
        let mut b = buffer("", 0, 0);
        insert_horizontal_rule(&mut b);
        assert_eq!(b.text(), "----\n");
        assert_eq!(b.selection(), (5, 5));

        let mut b = buffer("text", 4, 4);
        insert_horizontal_rule(&mut b);
        assert_eq!(b.text(), "text\n----\n");
    }

    #[test]
    fn test_horizontal_rule_keeps_selected_text() {
        let mut b = buffer("keep this text", 0, 9);
        insert_horizontal_rule(&mut b);
        assert_eq!(b.text(), "----\nkeep this text");
        assert_eq!(b.selected_text(), "keep this");

        let mut b = buffer("intro keep", 6, 10);
        insert_horizontal_rule(&mut b);
        assert_eq!(b.text(), "intro \n----\nkeep");
        assert_eq!(b.selected_text(), "keep");
    }
}
