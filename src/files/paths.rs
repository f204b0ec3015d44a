//! Link target resolution
//!
//! Turns the target of a Markdown link into a filesystem path relative to
//! the document that contains it, and decides whether that path can be
//! opened as a (possibly new) document.

use std::borrow::Cow;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Resolve a link `target` against `base_dir`.
///
/// The target is trimmed, `<...>` brackets and a `#fragment` are dropped,
/// percent escapes are decoded and a leading `~/` expands to the home
/// directory. Relative targets are joined to `base_dir`; the result is
/// normalized lexically (`.` and `..` removed).
pub fn make_absolute(target: &str, base_dir: &Path) -> PathBuf {
    let mut target = target.trim();
    if let Some(inner) = target.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
        target = inner.trim();
    }
    if let Some(idx) = target.find('#') {
        target = &target[..idx];
    }
    let decoded = percent_decode(target);

    let path = match decoded.strip_prefix("~/").zip(dirs::home_dir()) {
        Some((rest, home)) => home.join(rest),
        None => PathBuf::from(&decoded),
    };

    if path.is_absolute() {
        normalize(&path)
    } else {
        normalize(&base_dir.join(path))
    }
}

/// True if `path` exists, or its nearest existing ancestor is a writable
/// directory in which it could be created.
pub fn can_create(path: &Path) -> bool {
    if path.exists() {
        return true;
    }
    let mut ancestor = path.parent();
    while let Some(dir) = ancestor {
        if let Ok(meta) = fs::metadata(dir) {
            return meta.is_dir() && !meta.permissions().readonly();
        }
        ancestor = dir.parent();
    }
    false
}

/// Shortest path from `base` (a directory) to `path`, for inserted links.
///
/// Falls back to `path` itself when the two share no common root.
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    let path = normalize(path);
    let base = normalize(base);

    let path_parts: Vec<Component> = path.components().collect();
    let base_parts: Vec<Component> = base.components().collect();
    let common = path_parts
        .iter()
        .zip(&base_parts)
        .take_while(|(a, b)| a == b)
        .count();

    if common == 0 {
        return path;
    }

    let mut relative = PathBuf::new();
    for _ in common..base_parts.len() {
        relative.push("..");
    }
    for part in &path_parts[common..] {
        relative.push(part.as_os_str());
    }
    relative
}

/// Remove `.` and resolve `..` without touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Decode `%XX` escapes; targets that do not decode to UTF-8 are kept as written.
fn percent_decode(s: &str) -> String {
    urlencoding::decode(s)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_make_absolute_relative() {
        let base = Path::new("/notes/projects");
        assert_eq!(
            make_absolute("todo.md", base),
            PathBuf::from("/notes/projects/todo.md")
        );
        assert_eq!(
            make_absolute("../inbox/today.md", base),
            PathBuf::from("/notes/inbox/today.md")
        );
        assert_eq!(
            make_absolute("./sub/./a.md", base),
            PathBuf::from("/notes/projects/sub/a.md")
        );
    }

    #[test]
    fn test_make_absolute_cleans_target() {
        let base = Path::new("/notes");
        assert_eq!(
            make_absolute(" <my%20file.md> ", base),
            PathBuf::from("/notes/my file.md")
        );
        assert_eq!(
            make_absolute("guide.md#install", base),
            PathBuf::from("/notes/guide.md")
        );
        assert_eq!(make_absolute("/abs/x.md", base), PathBuf::from("/abs/x.md"));
    }

    #[test]
    fn test_percent_decode() {
        assert_eq!(percent_decode("a%20b"), "a b");
        assert_eq!(percent_decode("caf%C3%A9"), "café");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
        assert_eq!(percent_decode("bad%FF.md"), "bad%FF.md");
    }

    #[test]
    fn test_can_create() {
        let dir = TempDir::new().unwrap();
        let existing = dir.path().join("exists.md");
        fs::write(&existing, "x").unwrap();

        assert!(can_create(&existing));
        assert!(can_create(&dir.path().join("new.md")));
        assert!(can_create(&dir.path().join("deep/er/new.md")));
        // A regular file cannot be a parent directory
        assert!(!can_create(&existing.join("child.md")));
    }

    #[test]
    fn test_relative_to() {
        assert_eq!(
            relative_to(Path::new("/notes/img/a.png"), Path::new("/notes/projects")),
            PathBuf::from("../img/a.png")
        );
        assert_eq!(
            relative_to(Path::new("/notes/a.md"), Path::new("/notes")),
            PathBuf::from("a.md")
        );
    }
}
