//! File operations module for markbar
//!
//! Native file dialogs, resolution of link targets to paths, and snippet
//! files.

pub mod dialogs;
pub mod paths;
pub mod snippets;

pub use paths::{can_create, make_absolute, relative_to};
pub use snippets::{
    expand_snippet, format_date_time, list_snippets, load_snippet, take_cursor_placeholder, Snippet,
};
