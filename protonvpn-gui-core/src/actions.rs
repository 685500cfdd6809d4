//! Application-level actions
//!
//! The GUI registers one `gio::SimpleAction` per variant under the `app.`
//! prefix and forwards activations to the controller.

/// Global application action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppAction {
    /// Quit the application
    Quit,
    /// Log out and return to the login window
    Logout,
    /// Show the About dialog
    About,
    /// Generate a log bundle and open its folder
    GetLogs,
}

impl AppAction {
    /// Every action, in registration order
    pub const ALL: [Self; 4] = [Self::Quit, Self::Logout, Self::About, Self::GetLogs];

    /// Action name without the `app.` prefix
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Quit => "quit",
            Self::Logout => "logout",
            Self::About => "about",
            Self::GetLogs => "get-logs",
        }
    }

    /// Fully qualified name for menus and accelerators
    #[must_use]
    pub fn detailed_name(self) -> String {
        format!("app.{}", self.name())
    }

    /// Default keyboard accelerators
    #[must_use]
    pub const fn accelerators(self) -> &'static [&'static str] {
        match self {
            Self::Quit => &["<Control>q"],
            Self::Logout | Self::About | Self::GetLogs => &[],
        }
    }

    /// Menu label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Quit => "Quit",
            Self::Logout => "Logout",
            Self::About => "About",
            Self::GetLogs => "Get logs",
        }
    }

}
