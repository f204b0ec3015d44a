//! List continuation on Enter
//!
//! Installed as the buffer's newline hook: after a newline is inserted at
//! the end of a list item, the next line receives the same kind of prefix.
//! Pressing Enter on an empty item removes the prefix and ends the list.

use super::patterns::{
    prefix_checked_list, prefix_ordered_list, prefix_quote, prefix_unchecked_list,
    prefix_unordered_list,
};
use crate::editor::EditorBuffer;
use log::debug;

/// Prefix that continues the list item on `line`, and the byte length of
/// the item's own prefix.
pub fn list_continuation(line: &str) -> Option<(usize, String)> {
    for re in [prefix_checked_list(), prefix_unchecked_list()] {
        if let Some(caps) = re.captures(line) {
            let marker = &caps[3];
            return Some((caps[0].len(), format!("{}{} [ ] ", &caps[1], marker)));
        }
    }

    if let Some(caps) = prefix_ordered_list().captures(line) {
        let next = caps[3].parse::<u64>().map(|n| n + 1).unwrap_or(1);
        return Some((caps[0].len(), format!("{}{}{} ", &caps[1], next, &caps[4])));
    }

    if let Some(caps) = prefix_unordered_list().captures(line) {
        return Some((caps[0].len(), format!("{}{} ", &caps[1], &caps[3])));
    }

    prefix_quote()
        .find(line)
        .map(|m| (m.end(), m.as_str().to_string()))
}

/// Newline hook: continue or end the list item above the caret.
pub fn continue_list_on_newline(buffer: &mut EditorBuffer) {
    let caret = buffer.selection_end();
    if caret == 0 || !buffer.text()[..caret].ends_with('\n') {
        return;
    }

    let prev_end = caret - 1;
    let prev_start = buffer.line_start(prev_end);
    let prev_line = &buffer.text()[prev_start..prev_end];

    let Some((prefix_len, continuation)) = list_continuation(prev_line) else {
        return;
    };

    buffer.with_auto_format_disabled(|b| {
        if prefix_len == prev_end - prev_start {
            debug!("Auto-format: empty list item ends the list");
            b.delete(prev_start, prev_end);
        } else {
            b.insert(caret, &continuation);
        }
    });
}
