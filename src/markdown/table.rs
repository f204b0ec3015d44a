//! Table row snippets

/// Smallest and largest column count offered by the table dialog.
pub const MIN_TABLE_COLUMNS: usize = 1;
pub const MAX_TABLE_COLUMNS: usize = 20;

/// Build an empty table row of `cols` cells.
///
/// The row is `cols - 1` repetitions of `"  | "`. With `header`, a separator
/// row of `cols` `---` cells joined by `|` follows on the next line. When
/// the current line is empty the snippet starts with a newline. Zero
/// columns give an empty snippet.
pub fn table_row_snippet(cols: usize, header: bool, current_line_empty: bool) -> String {
    let mut snippet = String::new();
    if cols == 0 {
        return snippet;
    }
    if current_line_empty {
        snippet.push('\n');
    }

    snippet.push_str(&"  | ".repeat(cols.saturating_sub(1)));

    if header {
        snippet.push('\n');
        snippet.push_str(&vec!["---"; cols].join("|"));
    }
    snippet
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_columns_with_header() {
        let snippet = table_row_snippet(3, true, false);
        assert_eq!(snippet, "  |   | \n---|---|---");
        let separator = snippet.lines().nth(1).unwrap();
        assert_eq!(separator.matches('|').count(), 2);
    }

    #[test]
    fn test_empty_line_gets_leading_newline() {
        assert_eq!(table_row_snippet(2, false, true), "\n  | ");
        assert!(!table_row_snippet(2, false, false).starts_with('\n'));
    }

    #[test]
    fn test_single_and_zero_columns() {
        assert_eq!(table_row_snippet(1, false, false), "");
        assert_eq!(table_row_snippet(1, true, false), "\n---");
        assert_eq!(table_row_snippet(0, true, false), "");
        assert_eq!(table_row_snippet(0, false, true), "");
    }
}
