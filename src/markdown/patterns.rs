//! Line-prefix patterns for Markdown toolbar actions
//!
//! Each toolbar action that toggles a line prefix (headings, quotes, lists)
//! is expressed as an ordered list of [`ReplacePattern`]s. For every line the
//! first pattern that matches is applied, which is how a single button can
//! add, remove, or convert a prefix depending on what the line already has.

use regex::Regex;
use std::sync::OnceLock;

// ─────────────────────────────────────────────────────────────────────────────
// Prefix Patterns
// ─────────────────────────────────────────────────────────────────────────────

fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("built-in pattern must compile"))
}

/// `1. ` / `2) `; group 1 indent, group 3 number, group 4 delimiter.
pub fn prefix_ordered_list() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^(\s*)((\d+)([.)])\s)")
}

/// ATX heading; group 1 indent, group 2 the hashes plus one whitespace.
pub fn prefix_atx_heading() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^(\s{0,3})(#{1,6}\s)")
}

pub fn prefix_quote() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^(>\s)")
}

/// `- [x] `; group 1 indent, group 3 list marker.
pub fn prefix_checked_list() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^(\s*)(([-*+])\s\[[xX]\]\s)")
}

/// `- [ ] `; group 1 indent, group 3 list marker.
pub fn prefix_unchecked_list() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^(\s*)(([-*+])\s\[\s\]\s)")
}

/// `- `; group 1 indent, group 3 list marker.
pub fn prefix_unordered_list() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^(\s*)(([-*+])\s)")
}

pub fn prefix_leading_space() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    cached(&RE, r"^(\s*)")
}

// ─────────────────────────────────────────────────────────────────────────────
// Replace Pattern
// ─────────────────────────────────────────────────────────────────────────────

/// A search regex and the replacement applied to its first match on a line.
///
/// Replacements use the `regex` crate template syntax (`${1}`).
#[derive(Debug, Clone)]
pub struct ReplacePattern {
    search: Regex,
    replacement: String,
}

impl ReplacePattern {
    pub fn new(search: &Regex, replacement: impl Into<String>) -> Self {
        Self {
            search: search.clone(),
            replacement: replacement.into(),
        }
    }

    /// Build a pattern from a source string generated at runtime.
    fn compile(pattern: &str, replacement: impl Into<String>) -> Self {
        Self {
            search: Regex::new(pattern).expect("generated pattern must compile"),
            replacement: replacement.into(),
        }
    }

    /// If the pattern matches `line`, the byte range of the first match and
    /// the text that replaces it.
    pub fn edit_for(&self, line: &str) -> Option<(usize, usize, String)> {
        let caps = self.search.captures(line)?;
        let whole = caps.get(0)?;
        let mut replaced = String::new();
        caps.expand(&self.replacement, &mut replaced);
        Some((whole.start(), whole.end(), replaced))
    }

    /// Apply the pattern to a line, returning the rewritten line on a match.
    pub fn apply(&self, line: &str) -> Option<String> {
        self.edit_for(line).map(|(start, end, replaced)| {
            format!("{}{}{}", &line[..start], replaced, &line[end..])
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Generators
// ─────────────────────────────────────────────────────────────────────────────

/// Remove a `> ` prefix, or add one.
pub fn toggle_quote() -> Vec<ReplacePattern> {
    vec![
        ReplacePattern::new(prefix_quote(), ""),
        ReplacePattern::compile("^", "> "),
    ]
}

/// Toggle a heading of `level`: the same level is removed, other heading
/// levels and other prefixes are replaced, plain lines gain the heading.
pub fn set_or_unset_heading_with_level(level: usize) -> Vec<ReplacePattern> {
    let level = level.clamp(1, 6);
    let heading = format!("{} ", "#".repeat(level));
    let with_indent = format!("${{1}}{}", heading);

    vec![
        ReplacePattern::compile(&format!(r"^(\s{{0,3}})#{{{}}}\s", level), "${1}"),
        ReplacePattern::new(prefix_atx_heading(), with_indent.clone()),
        ReplacePattern::new(prefix_ordered_list(), with_indent.clone()),
        ReplacePattern::new(prefix_checked_list(), with_indent.clone()),
        ReplacePattern::new(prefix_unchecked_list(), with_indent.clone()),
        ReplacePattern::new(prefix_unordered_list(), with_indent.clone()),
        ReplacePattern::new(prefix_quote(), heading),
        ReplacePattern::new(prefix_leading_space(), with_indent),
    ]
}

/// Toggle an unordered list item using `list_char` as the marker.
pub fn replace_with_unordered_list_prefix_or_remove_prefix(list_char: &str) -> Vec<ReplacePattern> {
    let item = format!("${{1}}{} ", list_char);

    vec![
        ReplacePattern::new(prefix_checked_list(), item.clone()),
        ReplacePattern::new(prefix_unchecked_list(), item.clone()),
        ReplacePattern::compile(&format!(r"^(\s*){}\s", regex::escape(list_char)), "${1}"),
        ReplacePattern::new(prefix_ordered_list(), item.clone()),
        ReplacePattern::new(prefix_unordered_list(), item.clone()),
        ReplacePattern::new(prefix_leading_space(), item),
    ]
}

/// Flip a check list item between checked and unchecked; other lines become
/// unchecked items.
pub fn toggle_to_checked_or_unchecked_list_prefix(list_char: &str) -> Vec<ReplacePattern> {
    let unchecked = format!("${{1}}{} [ ] ", list_char);
    let checked = format!("${{1}}{} [x] ", list_char);

    vec![
        ReplacePattern::new(prefix_unchecked_list(), checked),
        ReplacePattern::new(prefix_checked_list(), unchecked.clone()),
        ReplacePattern::new(prefix_ordered_list(), unchecked.clone()),
        ReplacePattern::new(prefix_unordered_list(), unchecked.clone()),
        ReplacePattern::new(prefix_leading_space(), unchecked),
    ]
}

/// Toggle an ordered list item. New items are numbered `1.`; renumbering
/// fixes the sequence afterwards.
pub fn replace_with_ordered_list_prefix_or_remove_prefix() -> Vec<ReplacePattern> {
    let item = "${1}1. ";

    vec![
        ReplacePattern::new(prefix_ordered_list(), "${1}"),
        ReplacePattern::new(prefix_checked_list(), item),
        ReplacePattern::new(prefix_unchecked_list(), item),
        ReplacePattern::new(prefix_unordered_list(), item),
        ReplacePattern::new(prefix_leading_space(), item),
    ]
}

/// Indent non-empty lines by `width` spaces.
pub fn indent_lines(width: usize) -> Vec<ReplacePattern> {
    vec![ReplacePattern::compile("^(.)", format!("{}${{1}}", " ".repeat(width)))]
}

/// Remove one tab or up to `width` leading spaces.
pub fn deindent_lines(width: usize) -> Vec<ReplacePattern> {
    vec![ReplacePattern::compile(
        &format!(r"^(\t| {{1,{}}})", width.max(1)),
        "",
    )]
}

/// Apply the first matching pattern of `patterns` to a single line.
pub fn apply_first(patterns: &[ReplacePattern], line: &str) -> Option<String> {
    patterns.iter().find_map(|p| p.apply(line))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(patterns: &[ReplacePattern], line: &str) -> String {
        apply_first(patterns, line).unwrap_or_else(|| line.to_string())
    }

    #[test]
    fn test_quote_toggle() {
        let patterns = toggle_quote();
        assert_eq!(run(&patterns, "text"), "> text");
        assert_eq!(run(&patterns, "> text"), "text");
    }

    #[test]
    fn test_heading_set_and_unset() {
        let h2 = set_or_unset_heading_with_level(2);
        assert_eq!(run(&h2, "Title"), "## Title");
        assert_eq!(run(&h2, "## Title"), "Title");
        assert_eq!(run(&h2, "# Title"), "## Title");
        assert_eq!(run(&h2, "### Title"), "## Title");
        assert_eq!(run(&h2, "  ## Title"), "  Title");
    }

    #[test]
    fn test_heading_replaces_other_prefixes() {
        let h1 = set_or_unset_heading_with_level(1);
        assert_eq!(run(&h1, "- item"), "# item");
        assert_eq!(run(&h1, "3. item"), "# item");
        assert_eq!(run(&h1, "- [x] done"), "# done");
        assert_eq!(run(&h1, "> quoted"), "# quoted");
    }

    #[test]
    fn test_unordered_list() {
        let dash = replace_with_unordered_list_prefix_or_remove_prefix("-");
        assert_eq!(run(&dash, "item"), "- item");
        assert_eq!(run(&dash, "- item"), "item");
        assert_eq!(run(&dash, "  - nested"), "  nested");
        assert_eq!(run(&dash, "* other"), "- other");
        assert_eq!(run(&dash, "1. first"), "- first");
        assert_eq!(run(&dash, "- [ ] task"), "- task");

        let star = replace_with_unordered_list_prefix_or_remove_prefix("*");
        assert_eq!(run(&star, "* item"), "item");
        assert_eq!(run(&star, "- item"), "* item");
    }

    #[test]
    fn test_checkbox_list() {
        let patterns = toggle_to_checked_or_unchecked_list_prefix("-");
        assert_eq!(run(&patterns, "task"), "- [ ] task");
        assert_eq!(run(&patterns, "- [ ] task"), "- [x] task");
        assert_eq!(run(&patterns, "- [X] task"), "- [ ] task");
        assert_eq!(run(&patterns, "* task"), "- [ ] task");
        assert_eq!(run(&patterns, "  2. task"), "  - [ ] task");
    }

    #[test]
    fn test_ordered_list() {
        let patterns = replace_with_ordered_list_prefix_or_remove_prefix();
        assert_eq!(run(&patterns, "step"), "1. step");
        assert_eq!(run(&patterns, "4. step"), "step");
        assert_eq!(run(&patterns, "2) step"), "step");
        assert_eq!(run(&patterns, "- step"), "1. step");
    }

    #[test]
    fn test_indent_and_deindent() {
        assert_eq!(run(&indent_lines(4), "text"), "    text");
        assert!(apply_first(&indent_lines(4), "").is_none());
        assert_eq!(run(&deindent_lines(4), "      text"), "  text");
        assert_eq!(run(&deindent_lines(4), "\t text"), " text");
        assert_eq!(run(&deindent_lines(2), " x"), "x");
        assert!(apply_first(&deindent_lines(4), "flush").is_none());
    }

    #[test]
    fn test_edit_for_reports_match_range() {
        let patterns = set_or_unset_heading_with_level(3);
        let (start, end, replaced) = patterns[1].edit_for("# Title").unwrap();
        assert_eq!((start, end), (0, 2));
        assert_eq!(replaced, "### ");
    }

    #[test]
    fn test_heading_pattern_groups() {
        let caps = prefix_atx_heading().captures("### Deep").unwrap();
        assert_eq!(&caps[2], "### ");
        assert!(prefix_atx_heading().captures("#NoSpace").is_none());
        assert!(prefix_atx_heading().captures("####### seven").is_none());
    }
}
