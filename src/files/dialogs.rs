//! Native file dialog integration using the rfd crate
//!
//! Used for opening and saving documents, browsing for link targets from
//! the insert-link dialog, and choosing the snippet folder.

use crate::actions::LinkKind;
use rfd::FileDialog;
use std::path::{Path, PathBuf};

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown", "mdown", "mkd", "mkdn"];
const TEXT_EXTENSIONS: &[&str] = &["txt", "text"];
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg", "bmp"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "ogg", "oga", "wav", "m4a", "flac", "opus"];

/// Native picker for a document to open.
pub fn open_file_dialog(initial_dir: Option<&Path>) -> Option<PathBuf> {
    let mut dialog = FileDialog::new()
        .set_title("Open Document")
        .add_filter("Markdown Files", MARKDOWN_EXTENSIONS)
        .add_filter("Text Files", TEXT_EXTENSIONS)
        .add_filter("All Files", &["*"]);

    if let Some(dir) = initial_dir {
        dialog = dialog.set_directory(dir);
    }

    dialog.pick_file()
}

/// Native save dialog. Returns `None` if cancelled.
pub fn save_file_dialog(initial_dir: Option<&Path>, default_name: Option<&str>) -> Option<PathBuf> {
    let mut dialog = FileDialog::new()
        .set_title("Save Document")
        .add_filter("Markdown Files", MARKDOWN_EXTENSIONS)
        .add_filter("Text Files", TEXT_EXTENSIONS)
        .add_filter("All Files", &["*"]);

    if let Some(dir) = initial_dir {
        dialog = dialog.set_directory(dir);
    }

    if let Some(name) = default_name {
        dialog = dialog.set_file_name(name);
    }

    dialog.save_file()
}

/// Pick a link target, filtered by the kind of link being inserted.
pub fn pick_link_target_dialog(kind: LinkKind, initial_dir: Option<&Path>) -> Option<PathBuf> {
    let (title, name, extensions) = match kind {
        LinkKind::Link => ("Link to File", "Markdown Files", MARKDOWN_EXTENSIONS),
        LinkKind::Image => ("Insert Image", "Images", IMAGE_EXTENSIONS),
        LinkKind::Audio => ("Insert Audio", "Audio", AUDIO_EXTENSIONS),
    };

    let mut dialog = FileDialog::new()
        .set_title(title)
        .add_filter(name, extensions)
        .add_filter("All Files", &["*"]);

    if let Some(dir) = initial_dir {
        dialog = dialog.set_directory(dir);
    }

    dialog.pick_file()
}

/// Pick the folder snippets are loaded from.
pub fn pick_folder_dialog(initial_dir: Option<&Path>) -> Option<PathBuf> {
    let mut dialog = FileDialog::new().set_title("Choose Snippet Folder");

    if let Some(dir) = initial_dir {
        dialog = dialog.set_directory(dir);
    }

    dialog.pick_folder()
}
