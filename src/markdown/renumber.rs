//! Ordered list renumbering
//!
//! After a list prefix is toggled, the list block around the caret is
//! renumbered so each indentation level counts up from its first item.

use super::patterns::{
    prefix_checked_list, prefix_ordered_list, prefix_unchecked_list, prefix_unordered_list,
};
use crate::editor::EditorBuffer;
use log::debug;

#[derive(Debug, PartialEq)]
enum LineKind {
    /// Ordered item: indent width, number, byte range of the number in the line
    Ordered {
        indent: usize,
        number: u64,
        digits: (usize, usize),
    },
    /// Unordered or check list item with its indent width
    Bullet { indent: usize },
    /// Indented text inside an item
    Continuation,
    /// Blank or top-level plain line
    Outside,
}

fn classify(line: &str) -> LineKind {
    if let Some(caps) = prefix_ordered_list().captures(line) {
        if let (Some(indent), Some(digits)) = (caps.get(1), caps.get(3)) {
            if let Ok(number) = digits.as_str().parse() {
                return LineKind::Ordered {
                    indent: indent.as_str().len(),
                    number,
                    digits: (digits.start(), digits.end()),
                };
            }
        }
    }

    for re in [prefix_checked_list(), prefix_unchecked_list(), prefix_unordered_list()] {
        if let Some(caps) = re.captures(line) {
            return LineKind::Bullet {
                indent: caps[1].len(),
            };
        }
    }

    if !line.trim().is_empty() && line.starts_with(char::is_whitespace) {
        LineKind::Continuation
    } else {
        LineKind::Outside
    }
}

/// Renumber the contiguous list block containing the caret.
///
/// The first ordered item of every indentation level keeps its number and
/// the following items at that level count up. Deeper levels restart; a
/// bullet item at a level interrupts that level's numbering. Returns true
/// if any number changed.
pub fn renumber_ordered_list(buffer: &mut EditorBuffer) -> bool {
    let text = buffer.text();
    let caret = buffer.selection_start();

    // Collect (line start offset, line) for the whole text
    let mut lines = Vec::new();
    let mut pos = 0;
    for line in text.split('\n') {
        lines.push((pos, line));
        pos += line.len() + 1;
    }
    let Some(current) = lines.iter().rposition(|(start, _)| *start <= caret) else {
        return false;
    };
    if classify(lines[current].1) == LineKind::Outside {
        return false;
    }

    let mut first = current;
    while first > 0 && classify(lines[first - 1].1) != LineKind::Outside {
        first -= 1;
    }
    let mut last = current;
    while last + 1 < lines.len() && classify(lines[last + 1].1) != LineKind::Outside {
        last += 1;
    }

    // Stack of (indent, next number for that level)
    let mut levels: Vec<(usize, Option<u64>)> = Vec::new();
    let mut edits = Vec::new();

    for &(line_start, line) in &lines[first..=last] {
        match classify(line) {
            LineKind::Ordered {
                indent,
                number,
                digits,
            } => {
                while levels.last().is_some_and(|(i, _)| *i > indent) {
                    levels.pop();
                }
                let expected = match levels.last_mut() {
                    Some((i, next)) if *i == indent => {
                        let expected = next.unwrap_or(number);
                        *next = Some(expected + 1);
                        expected
                    }
                    _ => {
                        levels.push((indent, Some(number + 1)));
                        number
                    }
                };
                if expected != number {
                    edits.push((
                        line_start + digits.0,
                        line_start + digits.1,
                        expected.to_string(),
                    ));
                }
            }
            LineKind::Bullet { indent } => {
                while levels.last().is_some_and(|(i, _)| *i > indent) {
                    levels.pop();
                }
                match levels.last_mut() {
                    Some((i, next)) if *i == indent => *next = None,
                    _ => levels.push((indent, None)),
                }
            }
            LineKind::Continuation | LineKind::Outside => {}
        }
    }

    if edits.is_empty() {
        return false;
    }
    for (start, end, number) in edits.iter().rev() {
        buffer.replace(*start, *end, number);
    }
    debug!("Renumbered {} ordered list item(s)", edits.len());
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renumber(text: &str, caret: usize) -> String {
        let mut buffer = EditorBuffer::new(text);
        buffer.set_cursor(caret);
        renumber_ordered_list(&mut buffer);
        buffer.text().to_string()
    }

    #[test]
    fn test_counts_up_from_first_item() {
        assert_eq!(renumber("1. a\n1. b\n1. c", 0), "1. a\n2. b\n3. c");
        assert_eq!(renumber("3. a\n1. b", 6), "3. a\n4. b");
    }

    #[test]
    fn test_nested_levels() {
        let text = "1. a\n   1. x\n   5. y\n1. b";
        assert_eq!(renumber(text, 0), "1. a\n   1. x\n   2. y\n2. b");
    }

    #[test]
    fn test_blank_line_ends_block() {
        let text = "1. a\n1. b\n\n1. c";
        assert_eq!(renumber(text, 0), "1. a\n2. b\n\n1. c");
    }

    #[test]
    fn test_continuation_lines_inside_block() {
        let text = "1. a\n   more\n1. b";
        assert_eq!(renumber(text, 0), "1. a\n   more\n2. b");
    }

    #[test]
    fn test_caret_outside_list() {
        let mut buffer = EditorBuffer::new("text\n1. a\n1. b");
        assert!(!renumber_ordered_list(&mut buffer));
    }

    #[test]
    fn test_selection_shifts_with_wider_numbers() {
        let text = (0..10).map(|_| "1. x").collect::<Vec<_>>().join("\n");
        let mut buffer = EditorBuffer::new(text.clone());
        buffer.set_cursor(text.len());
        assert!(renumber_ordered_list(&mut buffer));
        assert!(buffer.text().ends_with("\n10. x"));
        assert_eq!(buffer.selection_end(), buffer.len());
    }
}
