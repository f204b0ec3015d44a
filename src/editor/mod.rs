//! Editor module for markbar
//!
//! The text model edited by the toolbar actions and by the egui widget.

mod buffer;

pub use buffer::{EditorBuffer, EditorKey};
