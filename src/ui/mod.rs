//! UI components for markbar
//!
//! The ribbon, the action dialogs, and the settings panel.

mod dialogs;
mod ribbon;
mod settings;

pub use dialogs::{DialogResponse, UiDialogs};
pub use ribbon::{Ribbon, RibbonAction, RibbonContext};
pub use settings::SettingsPanel;
