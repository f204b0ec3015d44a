//! Toolbar actions
//!
//! Button identifiers, the Markdown dispatcher, the shared actions it falls
//! back to, and the host interfaces they talk through. None of this depends
//! on egui; the UI layer implements [`DialogFactory`] and [`Navigator`].

mod common;
mod host;
mod items;
mod markdown;

#[cfg(test)]
pub(crate) mod testing;

pub use host::{
    ActionContext, DialogFactory, DialogResult, DocumentSettings, LinkKind, Navigator,
};
pub use items::{ActionId, ActionItem, ActionLayout, DisplayMode};
pub use markdown::MarkdownActions;
