//! ATX heading extraction for the heading picker

use super::patterns::prefix_atx_heading;
use std::collections::BTreeSet;

/// A heading found in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingEntry {
    /// Number of `#` characters (1-6)
    pub level: usize,
    pub title: String,
    /// Byte offset of the heading line's start
    pub offset: usize,
    /// Zero-based line number
    pub line: usize,
}

/// Heading level of `line`, if it is an ATX heading.
pub fn heading_level(line: &str) -> Option<usize> {
    prefix_atx_heading()
        .captures(line)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str().trim_end().len())
}

/// All ATX headings of `text`, skipping fenced code blocks.
pub fn collect_headings(text: &str) -> Vec<HeadingEntry> {
    let mut headings = Vec::new();
    let mut in_fence = false;
    let mut offset = 0;

    for (line_no, line) in text.split('\n').enumerate() {
        let line_offset = offset;
        offset += line.len() + 1;

        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }

        if let Some(caps) = prefix_atx_heading().captures(line) {
            let level = caps[2].trim_end().len();
            let title = line[caps[0].len()..].trim().trim_end_matches('#').trim_end();
            headings.push(HeadingEntry {
                level,
                title: title.to_string(),
                offset: line_offset,
                line: line_no,
            });
        }
    }
    headings
}

/// Headings whose level is not in `disabled`.
pub fn filter_headings<'a>(
    headings: &'a [HeadingEntry],
    disabled: &'a BTreeSet<usize>,
) -> impl Iterator<Item = &'a HeadingEntry> + 'a {
    headings.iter().filter(move |h| !disabled.contains(&h.level))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level() {
        assert_eq!(heading_level("# One"), Some(1));
        assert_eq!(heading_level("   ### Three"), Some(3));
        assert_eq!(heading_level("    # code"), None);
        assert_eq!(heading_level("#hashtag"), None);
        assert_eq!(heading_level("text"), None);
    }

    #[test]
    fn test_collect_skips_code_fences() {
        let text = "# Top\ntext\n```\n# not a heading\n```\n## Sub ##\n";
        let headings = collect_headings(text);
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].title, "Top");
        assert_eq!(headings[0].offset, 0);
        assert_eq!(headings[1].level, 2);
        assert_eq!(headings[1].title, "Sub");
        assert_eq!(headings[1].line, 5);
        assert_eq!(headings[1].offset, 35);
    }

    #[test]
    fn test_filter_disabled_levels() {
        let headings = collect_headings("# a\n## b\n### c");
        let disabled: BTreeSet<usize> = [2].into_iter().collect();
        let titles: Vec<_> = filter_headings(&headings, &disabled)
            .map(|h| h.title.as_str())
            .collect();
        assert_eq!(titles, vec!["a", "c"]);
    }
}
