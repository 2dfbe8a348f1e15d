//! Installer color palette (owo-colors stylesheet)

use owo_colors::Style;

/// Styles for each kind of installer line. Plain by default.
#[derive(Default, Clone)]
pub struct Styles {
    /// `✓` completed steps
    pub success: Style,
    /// `⚠` non-fatal service manager failures and privilege hints
    pub warning: Style,
    /// `ℹ` skips, detected architecture, next-step hints
    pub info: Style,
    /// `→` step in progress
    pub step: Style,
    /// Plan summary keys
    pub key: Style,
    /// Installer banner
    pub banner: Style,
}

impl Styles {
    /// Switch every style to its terminal color.
    pub fn colorize(&mut self) {
        self.success = Style::new().green();
        self.warning = Style::new().yellow();
        self.info = Style::new().blue();
        self.step = Style::new().cyan();
        self.key = Style::new().dimmed();
        self.banner = Style::new().bold().cyan();
    }
}
