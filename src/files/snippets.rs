//! Text snippets
//!
//! Snippets are `.md` / `.txt` files in a user-chosen folder. Inserting one
//! expands a few placeholders first.

use crate::error::{Error, Result};
use chrono::{DateTime, Local};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const SNIPPET_EXTENSIONS: &[&str] = &["md", "txt"];

/// Marker removed on insertion; the caret is placed where it was.
pub const CURSOR_PLACEHOLDER: &str = "{{cursor}}";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    /// Path relative to the snippet folder, without extension
    pub name: String,
    pub path: PathBuf,
}

/// Snippet files in `dir` and its direct subfolders, sorted by name.
/// Hidden files and folders are skipped.
pub fn list_snippets(dir: &Path) -> Result<Vec<Snippet>> {
    if !dir.is_dir() {
        return Err(Error::SnippetDirNotFound(dir.to_path_buf()));
    }

    let mut snippets: Vec<Snippet> = WalkDir::new(dir)
        .max_depth(2)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0 || !entry.file_name().to_string_lossy().starts_with('.')
        })
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| SNIPPET_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        })
        .map(|entry| {
            let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path());
            let name = relative
                .with_extension("")
                .to_string_lossy()
                .replace('\\', "/");
            Snippet {
                name,
                path: entry.path().to_path_buf(),
            }
        })
        .collect();

    snippets.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    debug!("Found {} snippet(s) in {}", snippets.len(), dir.display());
    Ok(snippets)
}

/// Read a snippet file.
pub fn load_snippet(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace `{{date}}`, `{{time}}` and `{{title}}` in `text`.
pub fn expand_snippet(text: &str, title: &str, now: DateTime<Local>) -> String {
    text.replace("{{date}}", &now.format("%Y-%m-%d").to_string())
        .replace("{{time}}", &now.format("%H:%M").to_string())
        .replace("{{title}}", title)
}

/// Format `now` with a user-supplied chrono format; `None` if it is invalid.
pub fn format_date_time(format: &str, now: DateTime<Local>) -> Option<String> {
    use std::fmt::Write;

    let mut formatted = String::new();
    write!(formatted, "{}", now.format(format)).ok()?;
    Some(formatted)
}

/// Remove the first cursor placeholder, returning its byte offset.
pub fn take_cursor_placeholder(text: &str) -> (String, Option<usize>) {
    match text.find(CURSOR_PLACEHOLDER) {
        Some(idx) => (text.replacen(CURSOR_PLACEHOLDER, "", 1), Some(idx)),
        None => (text.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    #[test]
    fn test_format_date_time() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).unwrap();
        assert_eq!(format_date_time("%d.%m.%Y", now).as_deref(), Some("09.03.2024"));
        assert_eq!(format_date_time("%Q", now), None);
    }

    #[test]
    fn test_list_snippets() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Meeting.md"), "# {{title}}").unwrap();
        fs::write(dir.path().join("sig.txt"), "Bye").unwrap();
        fs::write(dir.path().join("image.png"), [0u8; 4]).unwrap();
        fs::write(dir.path().join(".hidden.md"), "x").unwrap();
        fs::create_dir(dir.path().join("work")).unwrap();
        fs::write(dir.path().join("work/standup.md"), "y").unwrap();
        fs::create_dir_all(dir.path().join("a/b")).unwrap();
        fs::write(dir.path().join("a/b/too-deep.md"), "z").unwrap();

        let names: Vec<_> = list_snippets(dir.path())
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Meeting", "sig", "work/standup"]);
    }

    #[test]
    fn test_missing_dir() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            list_snippets(&missing),
            Err(Error::SnippetDirNotFound(p)) if p == missing
        ));
    }

    #[test]
    fn test_expand_placeholders() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 0).unwrap();
        let text = "# {{title}}\n{{date}} {{time}}";
        assert_eq!(expand_snippet(text, "Notes", now), "# Notes\n2024-03-09 07:05");
    }

    #[test]
    fn test_cursor_placeholder() {
        assert_eq!(
            take_cursor_placeholder("a{{cursor}}b"),
            ("ab".to_string(), Some(1))
        );
        assert_eq!(take_cursor_placeholder("ab"), ("ab".to_string(), None));
    }

    #[test]
    fn test_load_snippet_error_names_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.md");
        assert!(matches!(load_snippet(&path), Err(Error::FileRead { .. })));
    }
}
