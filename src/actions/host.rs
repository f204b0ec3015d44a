//! Interfaces between the action handlers and their host
//!
//! The handlers only see an [`ActionContext`]: the editor buffer plus the
//! settings, dialog and navigation services the host provides. Dialogs are
//! requested here and answered later with a [`DialogResult`], which the
//! host hands back to the dispatcher.

use crate::editor::{EditorBuffer, EditorKey};
use crate::files::Snippet;
use crate::markdown::HeadingEntry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Document-level settings read by the handlers.
pub trait DocumentSettings {
    /// Marker for new unordered list items (`-`, `*` or `+`).
    fn unordered_list_char(&self) -> &str;

    /// Number of spaces used by indent and deindent.
    fn indent_size(&self) -> usize;

    /// chrono format string used for quick date insertion.
    fn date_format(&self) -> &str;

    fn snippet_dir(&self) -> Option<&Path>;

    /// Renumber ordered lists after the ordered list action.
    fn renumber_ordered_lists(&self) -> bool {
        true
    }
}

/// Kind of link inserted by the insert-link dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkKind {
    Link,
    Image,
    Audio,
}

impl LinkKind {
    pub fn title(&self) -> &'static str {
        match self {
            LinkKind::Link => "Insert Link",
            LinkKind::Image => "Insert Image",
            LinkKind::Audio => "Insert Audio",
        }
    }

    /// Markdown for a link of this kind.
    pub fn format(&self, title: &str, target: &str) -> String {
        // Targets with spaces need angle brackets to stay one token
        let target = if target.contains(' ') {
            format!("<{}>", target)
        } else {
            target.to_string()
        };
        match self {
            LinkKind::Image => format!("![{}]({})", title, target),
            LinkKind::Link | LinkKind::Audio => format!("[{}]({})", title, target),
        }
    }
}

/// Modal prompts the handlers can open.
pub trait DialogFactory {
    /// Ask for a column count; `header` preselects the header row option.
    fn show_insert_table_row_dialog(&mut self, header: bool);

    /// Heading picker. Levels in `disabled_levels` start hidden.
    fn show_headline_dialog(&mut self, headings: Vec<HeadingEntry>, disabled_levels: BTreeSet<usize>);

    /// Ask for a link title and target; `title` prefills the title.
    fn show_insert_link_dialog(&mut self, kind: LinkKind, title: String);

    fn show_date_time_dialog(&mut self);

    fn show_special_key_dialog(&mut self);

    fn show_snippet_dialog(&mut self, snippets: Vec<Snippet>);
}

/// Navigation out of the current document.
pub trait Navigator {
    fn open_url(&mut self, url: &str);

    /// Open (or create) another document.
    fn open_document(&mut self, path: &Path);
}

/// Everything one dispatch may touch.
pub struct ActionContext<'a> {
    pub editor: &'a mut EditorBuffer,
    /// Path of the edited document; `None` for unsaved documents
    pub document_path: Option<&'a Path>,
    pub settings: &'a dyn DocumentSettings,
    pub dialogs: &'a mut dyn DialogFactory,
    pub navigator: &'a mut dyn Navigator,
}

impl ActionContext<'_> {
    /// Folder containing the document.
    pub fn document_dir(&self) -> Option<&Path> {
        self.document_path.and_then(Path::parent)
    }

    /// File stem of the document, used as `{{title}}`.
    pub fn document_title(&self) -> String {
        self.document_path
            .and_then(Path::file_stem)
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Answer of a dialog opened through [`DialogFactory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogResult {
    InsertTableRow { cols: usize, header: bool },
    /// A heading was picked; `offset` is the start of its line
    JumpToHeading { offset: usize },
    /// A level was shown or hidden in the heading picker
    HeadingLevelToggled { level: usize, disabled: bool },
    InsertLink {
        kind: LinkKind,
        title: String,
        target: String,
    },
    InsertDateTime { format: String },
    SpecialKey(EditorKey),
    InsertSnippet { path: PathBuf },
}
