//! Recording fakes of the host services for action tests

use super::host::{ActionContext, DialogFactory, DocumentSettings, LinkKind, Navigator};
use crate::editor::EditorBuffer;
use crate::files::Snippet;
use crate::markdown::{continue_list_on_newline, HeadingEntry};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub struct TestSettings {
    pub list_char: String,
    pub indent: usize,
    pub date_format: String,
    pub snippet_dir: Option<PathBuf>,
    pub renumber: bool,
}

impl Default for TestSettings {
    fn default() -> Self {
        Self {
            list_char: "-".into(),
            indent: 2,
            date_format: "%Y-%m-%d".into(),
            snippet_dir: None,
            renumber: true,
        }
    }
}

impl DocumentSettings for TestSettings {
    fn unordered_list_char(&self) -> &str {
        &self.list_char
    }

    fn indent_size(&self) -> usize {
        self.indent
    }

    fn date_format(&self) -> &str {
        &self.date_format
    }

    fn snippet_dir(&self) -> Option<&Path> {
        self.snippet_dir.as_deref()
    }

    fn renumber_ordered_lists(&self) -> bool {
        self.renumber
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogCall {
    TableRow { header: bool },
    Headline { titles: Vec<String>, disabled: Vec<usize> },
    InsertLink(LinkKind, String),
    DateTime,
    SpecialKey,
    Snippets(Vec<String>),
}

#[derive(Default)]
pub struct RecordingDialogs {
    pub calls: Vec<DialogCall>,
}

impl DialogFactory for RecordingDialogs {
    fn show_insert_table_row_dialog(&mut self, header: bool) {
        self.calls.push(DialogCall::TableRow { header });
    }

    fn show_headline_dialog(&mut self, headings: Vec<HeadingEntry>, disabled_levels: BTreeSet<usize>) {
        self.calls.push(DialogCall::Headline {
            titles: headings.into_iter().map(|h| h.title).collect(),
            disabled: disabled_levels.into_iter().collect(),
        });
    }

    fn show_insert_link_dialog(&mut self, kind: LinkKind, title: String) {
        self.calls.push(DialogCall::InsertLink(kind, title));
    }

    fn show_date_time_dialog(&mut self) {
        self.calls.push(DialogCall::DateTime);
    }

    fn show_special_key_dialog(&mut self) {
        self.calls.push(DialogCall::SpecialKey);
    }

    fn show_snippet_dialog(&mut self, snippets: Vec<Snippet>) {
        self.calls
            .push(DialogCall::Snippets(snippets.into_iter().map(|s| s.name).collect()));
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    pub urls: Vec<String>,
    pub documents: Vec<PathBuf>,
}

impl Navigator for RecordingNavigator {
    fn open_url(&mut self, url: &str) {
        self.urls.push(url.to_string());
    }

    fn open_document(&mut self, path: &Path) {
        self.documents.push(path.to_path_buf());
    }
}

/// A buffer plus fakes, handing out an [`ActionContext`] per dispatch.
pub struct Harness {
    pub buffer: EditorBuffer,
    pub document: Option<PathBuf>,
    pub settings: TestSettings,
    pub dialogs: RecordingDialogs,
    pub navigator: RecordingNavigator,
}

impl Harness {
    pub fn new(text: &str, caret: usize) -> Self {
        let mut buffer = EditorBuffer::new(text).with_newline_hook(continue_list_on_newline);
        buffer.set_cursor(caret);
        Self {
            buffer,
            document: None,
            settings: TestSettings::default(),
            dialogs: RecordingDialogs::default(),
            navigator: RecordingNavigator::default(),
        }
    }

    pub fn cx(&mut self) -> ActionContext<'_> {
        ActionContext {
            editor: &mut self.buffer,
            document_path: self.document.as_deref(),
            settings: &self.settings,
            dialogs: &mut self.dialogs,
            navigator: &mut self.navigator,
        }
    }
}
