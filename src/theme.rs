//! Theme management for markbar
//!
//! Maps the `Theme` setting to egui `Visuals`. `System` follows the dark
//! mode flag eframe derives from the platform at startup.

use crate::config::Theme;
use eframe::egui::{Context, Visuals};
use log::{debug, info};

#[derive(Debug, Clone)]
pub struct ThemeManager {
    current_theme: Theme,
    needs_apply: bool,
    /// Platform dark mode seen before any visuals were applied
    system_dark_mode: Option<bool>,
}

impl ThemeManager {
    pub fn new(theme: Theme) -> Self {
        info!("ThemeManager initialized with theme: {:?}", theme);
        Self {
            current_theme: theme,
            needs_apply: true,
            system_dark_mode: None,
        }
    }

    pub fn current_theme(&self) -> Theme {
        self.current_theme
    }

    /// Set the theme; takes effect on the next `apply_if_needed`.
    pub fn set_theme(&mut self, theme: Theme) {
        if self.current_theme != theme {
            info!("Theme changed from {:?} to {:?}", self.current_theme, theme);
            self.current_theme = theme;
            self.needs_apply = true;
        }
    }

    /// Light -> Dark -> System -> Light. Returns the new theme.
    pub fn cycle(&mut self) -> Theme {
        let new_theme = match self.current_theme {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::System,
            Theme::System => Theme::Light,
        };
        self.set_theme(new_theme);
        new_theme
    }

    pub fn needs_apply(&self) -> bool {
        self.needs_apply
    }

    /// Apply the theme if it changed since the last call.
    pub fn apply_if_needed(&mut self, ctx: &Context) -> bool {
        if !self.needs_apply() {
            return false;
        }
        let system_dark = *self
            .system_dark_mode
            .get_or_insert_with(|| ctx.style().visuals.dark_mode);
        ctx.set_visuals(visuals_for(self.current_theme, system_dark));
        self.needs_apply = false;
        debug!("Applied theme: {:?}", self.current_theme);
        true
    }
}

/// Visuals for `theme`, resolving `System` with `system_dark`.
pub fn visuals_for(theme: Theme, system_dark: bool) -> Visuals {
    let dark = match theme {
        Theme::Light => false,
        Theme::Dark => true,
        Theme::System => system_dark,
    };
    if dark {
        Visuals::dark()
    } else {
        Visuals::light()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_manager_set_theme() {
        let mut manager = ThemeManager::new(Theme::Light);
        assert!(manager.needs_apply());

        manager.needs_apply = false;
        manager.set_theme(Theme::Light);
        assert!(!manager.needs_apply());

        manager.set_theme(Theme::Dark);
        assert_eq!(manager.current_theme(), Theme::Dark);
        assert!(manager.needs_apply());
    }

    #[test]
    fn test_theme_manager_cycle() {
        let mut manager = ThemeManager::new(Theme::Light);
        assert_eq!(manager.cycle(), Theme::Dark);
        assert_eq!(manager.cycle(), Theme::System);
        assert_eq!(manager.cycle(), Theme::Light);
    }

    #[test]
    fn test_visuals_for_system_follows_platform() {
        assert!(visuals_for(Theme::System, true).dark_mode);
        assert!(!visuals_for(Theme::System, false).dark_mode);
        assert!(visuals_for(Theme::Dark, false).dark_mode);
        assert!(!visuals_for(Theme::Light, true).dark_mode);
    }
}
