//! Toolkit seam used by the application controller
//!
//! The controller never touches widgets. Everything it needs from the GUI
//! (windows, dialogs, the tray indicator, quitting the main loop) goes through
//! [`Shell`], which the GTK crate implements and tests replace with fakes.

use std::fmt;
use std::rc::Rc;

/// User-facing text: a translatable template with `{}` placeholders
///
/// The shell translates [`template`](Self::template) first and fills the
/// arguments in afterwards, so catalogs only ever see the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiText {
    template: &'static str,
    args: Vec<String>,
}

impl UiText {
    /// Text without arguments
    #[must_use]
    pub const fn new(template: &'static str) -> Self {
        Self {
            template,
            args: Vec::new(),
        }
    }

    /// Appends the value for the next placeholder
    #[must_use]
    pub fn with_arg(mut self, arg: impl fmt::Display) -> Self {
        self.args.push(arg.to_string());
        self
    }

    /// Untranslated template
    #[must_use]
    pub const fn template(&self) -> &'static str {
        self.template
    }

    /// Placeholder values, left to right
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Fills the placeholders of the untranslated template
    #[must_use]
    pub fn render(&self) -> String {
        let mut pieces = self.template.split("{}");
        let mut out = pieces.next().unwrap_or_default().to_string();
        let mut args = self.args.iter();
        for piece in pieces {
            match args.next() {
                Some(arg) => out.push_str(arg),
                None => out.push_str("{}"),
            }
            out.push_str(piece);
        }
        out
    }
}

impl From<&'static str> for UiText {
    fn from(template: &'static str) -> Self {
        Self::new(template)
    }
}

impl fmt::Display for UiText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// A message dialog whose content can be replaced while it is open
pub trait Notice {
    /// Replaces the title and body text in place
    fn update_content(&self, title: &str, description: &UiText);

    /// Closes the dialog; closing twice is a no-op
    fn close(&self);
}

/// Confirmation dialogs the controller may ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// Quit while a VPN connection is active
    Quit,
    /// Log out while a VPN connection is active
    Logout,
}

impl Confirmation {
    /// Dialog heading
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Quit => "Quit ProtonVPN",
            Self::Logout => "Log out",
        }
    }

    /// Dialog body
    #[must_use]
    pub const fn body(self) -> &'static str {
        match self {
            Self::Quit => {
                "Quitting the application will disconnect the active VPN connection.\n\n\
                 Do you want to continue?"
            }
            Self::Logout => {
                "Logging out of the application will disconnect the active VPN connection.\n\n\
                 Do you want to continue?"
            }
        }
    }

    /// Label of the affirmative button
    #[must_use]
    pub const fn confirm_label(self) -> &'static str {
        match self {
            Self::Quit => "Quit",
            Self::Logout => "Log out",
        }
    }
}

/// Windows that release resources before the application logs out
pub trait ShutdownAware {
    /// Stops timers and pending work owned by the window
    fn prepare_for_app_shutdown(&self);
}

/// Windows that know how to close themselves cleanly
pub trait GracefulClose {
    /// Closes the window as part of a logout
    fn close_for_logout(&self);
}

/// An application window as seen by the controller
///
/// Optional behaviour is exposed through capability queries; windows that
/// lack a capability return `None` and are handled generically.
pub trait AppWindow {
    /// Window title, for logging
    fn title(&self) -> String;

    /// Shutdown preparation capability
    fn shutdown_aware(&self) -> Option<&dyn ShutdownAware> {
        None
    }

    /// Graceful close capability
    fn graceful_close(&self) -> Option<&dyn GracefulClose> {
        None
    }

    /// Destroys the window unconditionally
    fn destroy(&self);
}

/// GUI operations the controller depends on
pub trait Shell {
    /// Message dialog handle
    type Notice: Notice + 'static;
    /// Tray indicator handle, kept alive by the controller
    type Indicator: 'static;

    /// Returns true when the application has a window open
    fn has_active_window(&self) -> bool;

    /// Brings the active window to the front
    fn present_active_window(&self);

    /// Shows the login window; `on_authenticated` runs after a successful login
    fn show_login(&self, on_authenticated: Rc<dyn Fn()>);

    /// Shows the dashboard window
    fn show_dashboard(&self);

    /// Shows a message dialog
    fn show_message(&self, title: &str, description: &UiText) -> Self::Notice;

    /// Asks for confirmation; `respond` receives true on the affirmative answer
    fn confirm(&self, confirmation: Confirmation, respond: Box<dyn FnOnce(bool)>);

    /// Shows the About dialog
    fn show_about(&self);

    /// Snapshot of the open application windows
    fn windows(&self) -> Vec<Rc<dyn AppWindow>>;

    /// Creates the tray indicator, `None` when unavailable
    fn create_indicator(&self) -> Option<Self::Indicator>;

    /// Stops the main loop
    fn quit(&self);
}
