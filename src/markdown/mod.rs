//! Markdown text transformations behind the toolbar actions
//!
//! Everything here works on plain text or on an [`EditorBuffer`](crate::editor::EditorBuffer);
//! nothing depends on egui.
//!
//! # Example
//! ```ignore
//! use crate::editor::EditorBuffer;
//! use crate::markdown::{run_regex_replace_action, set_or_unset_heading_with_level};
//!
//! let mut buffer = EditorBuffer::new("Title");
//! run_regex_replace_action(&mut buffer, &set_or_unset_heading_with_level(2));
//! assert_eq!(buffer.text(), "## Title");
//! ```

mod autoformat;
mod headings;
mod inline;
pub mod links;
pub mod patterns;
mod renumber;
mod replace;
mod table;

pub use autoformat::continue_list_on_newline;
pub use headings::{collect_headings, filter_headings, heading_level, HeadingEntry};
pub use inline::{insert_horizontal_rule, run_inline_action};
pub use patterns::{
    deindent_lines, indent_lines, replace_with_ordered_list_prefix_or_remove_prefix,
    replace_with_unordered_list_prefix_or_remove_prefix, set_or_unset_heading_with_level,
    toggle_quote, toggle_to_checked_or_unchecked_list_prefix, ReplacePattern,
};
pub use renumber::renumber_ordered_list;
pub use replace::run_regex_replace_action;
pub use table::{table_row_snippet, MAX_TABLE_COLUMNS, MIN_TABLE_COLUMNS};
