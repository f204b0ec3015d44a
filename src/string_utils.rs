//! UTF-8 safe string and line utilities
//!
//! The editor buffer stores byte offsets, egui reports char indices, and the
//! regex engine works on bytes. These helpers keep all three consistent and
//! never slice in the middle of a multi-byte character.

// ─────────────────────────────────────────────────────────────────────────────
// Character Boundary Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Returns the largest char boundary that is `<= index`, clamped to the length.
#[inline]
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Returns the smallest char boundary that is `>= index`, clamped to the length.
#[inline]
pub fn ceil_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i < s.len() && !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

// ─────────────────────────────────────────────────────────────────────────────
// Index Conversion Utilities
// ─────────────────────────────────────────────────────────────────────────────

/// Convert a character index (as used by egui cursors) to a byte index.
///
/// Returns the string length if `char_index` is beyond the string.
pub fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Convert a byte index to a character index.
///
/// A byte index inside a multi-byte character counts up to that character.
pub fn byte_index_to_char_index(s: &str, byte_index: usize) -> usize {
    let byte_index = floor_char_boundary(s, byte_index);
    s[..byte_index].chars().count()
}

// ─────────────────────────────────────────────────────────────────────────────
// Line Boundaries
// ─────────────────────────────────────────────────────────────────────────────

/// Byte offset where the line containing `pos` starts.
pub fn line_start(s: &str, pos: usize) -> usize {
    let pos = floor_char_boundary(s, pos);
    s[..pos].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

/// Byte offset of the newline ending the line containing `pos`
/// (or the text length on the last line).
pub fn line_end(s: &str, pos: usize) -> usize {
    let pos = floor_char_boundary(s, pos);
    s[pos..].find('\n').map(|i| pos + i).unwrap_or(s.len())
}

/// Number of characters between `from` and `to`, both byte offsets.
pub fn char_distance(s: &str, from: usize, to: usize) -> usize {
    let from = floor_char_boundary(s, from);
    let to = floor_char_boundary(s, to);
    if from >= to {
        return 0;
    }
    s[from..to].chars().count()
}

/// Byte offset `column` characters into the line `[start, end)`, stopping at `end`.
pub fn offset_for_column(s: &str, start: usize, end: usize, column: usize) -> usize {
    let start = floor_char_boundary(s, start);
    let end = floor_char_boundary(s, end).max(start);
    s[start..end]
        .char_indices()
        .nth(column)
        .map(|(i, _)| start + i)
        .unwrap_or(end)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
