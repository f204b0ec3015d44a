//! Markdown link detection
//!
//! Finds `[text](target)` links and bare web URLs on a line so the open-link
//! action can tell what lies under the caret.

use regex::Regex;
use std::sync::OnceLock;

/// `[text](target)`; group 1 text, group 2 target.
fn markdown_link_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([^\]]*)\]\(([^)]+)\)").expect("valid link regex"))
}

fn web_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("valid url regex"))
}

fn bare_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"https?://[^\s/$.?#][^\s)\]>]*").expect("valid bare url regex")
    })
}

/// A Markdown link within a line. Offsets are byte offsets into the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkMatch<'a> {
    pub start: usize,
    pub end: usize,
    pub text: &'a str,
    pub target: &'a str,
}

impl LinkMatch<'_> {
    /// True if `cursor` lies in `[start, end)`.
    pub fn contains(&self, cursor: usize) -> bool {
        self.start <= cursor && cursor < self.end
    }
}

/// All Markdown links on `line`, left to right.
pub fn links_in_line(line: &str) -> impl Iterator<Item = LinkMatch<'_>> + '_ {
    markdown_link_regex().captures_iter(line).filter_map(|caps| {
        let whole = caps.get(0)?;
        Some(LinkMatch {
            start: whole.start(),
            end: whole.end(),
            text: caps.get(1).map_or("", |m| m.as_str()),
            target: caps.get(2)?.as_str(),
        })
    })
}

/// The first link whose span contains `cursor`.
pub fn link_at(line: &str, cursor: usize) -> Option<LinkMatch<'_>> {
    links_in_line(line).find(|link| link.contains(cursor))
}

/// True if the whole `target` is an http(s) URL.
pub fn is_web_url(target: &str) -> bool {
    web_url_regex().is_match(target)
}

/// Bare web URL on `line` whose span contains `cursor` (end inclusive, so a
/// caret right after the URL still finds it).
pub fn url_at(line: &str, cursor: usize) -> Option<&str> {
    bare_url_regex()
        .find_iter(line)
        .find(|m| m.start() <= cursor && cursor <= m.end())
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_in_line() {
        let line = "see [one](a.md) and [](http://x.org/p)";
        let links: Vec<_> = links_in_line(line).collect();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].text, "one");
        assert_eq!(links[0].target, "a.md");
        assert_eq!((links[0].start, links[0].end), (4, 15));
        assert_eq!(links[1].text, "");
        assert_eq!(links[1].target, "http://x.org/p");
    }

    #[test]
    fn test_link_at_span_bounds() {
        let line = "x [t](u) y";
        assert!(link_at(line, 1).is_none());
        assert_eq!(link_at(line, 2).map(|l| l.target), Some("u"));
        assert_eq!(link_at(line, 7).map(|l| l.target), Some("u"));
        assert!(link_at(line, 8).is_none());
    }

    #[test]
    fn test_is_web_url() {
        assert!(is_web_url("http://example.com"));
        assert!(is_web_url("https://example.com/a?b=c#d"));
        assert!(!is_web_url("ftp://example.com"));
        assert!(!is_web_url("notes/todo.md"));
        assert!(!is_web_url("http://exa mple.com"));
        assert!(!is_web_url("see http://example.com"));
    }

    #[test]
    fn test_url_at() {
        let line = "visit https://rust-lang.org now";
        assert_eq!(url_at(line, 10), Some("https://rust-lang.org"));
        assert_eq!(url_at(line, 27), Some("https://rust-lang.org"));
        assert_eq!(url_at(line, 2), None);
        assert_eq!(url_at("(https://a.io)", 3), Some("https://a.io"));
    }
}
