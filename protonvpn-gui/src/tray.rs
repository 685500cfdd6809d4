//! System tray indicator (StatusNotifierItem via `ksni`)
//!
//! The tray service runs on its own thread. Menu clicks are sent as
//! [`TrayMessage`]s over a channel that the GTK thread polls, so nothing
//! here touches widgets.

use protonvpn_gui_core::AppAction;
use protonvpn_gui_core::app::APP_ID;
use std::sync::mpsc::Sender;

use crate::i18n::i18n;

/// Name of the thread running the tray service
const TRAY_THREAD_NAME: &str = "pvpn-tray";

/// A click in the tray menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayMessage {
    /// Bring up the main window
    Show,
    /// Generate the log bundle
    GetLogs,
    /// Show the About dialog
    About,
    /// Quit the application
    Quit,
}

impl TrayMessage {
    /// Application action behind the message; `Show` maps to activation
    #[must_use]
    pub const fn action(self) -> Option<AppAction> {
        match self {
            Self::Show => None,
            Self::GetLogs => Some(AppAction::GetLogs),
            Self::About => Some(AppAction::About),
            Self::Quit => Some(AppAction::Quit),
        }
    }
}

struct ProtonTray {
    sender: Sender<TrayMessage>,
}

impl ProtonTray {
    fn send(&self, message: TrayMessage) {
        if self.sender.send(message).is_err() {
            tracing::debug!(?message, "Tray message dropped, application is shutting down");
        }
    }

    fn item(label: &str, message: TrayMessage) -> ksni::MenuItem<Self> {
        ksni::menu::StandardItem {
            label: label.to_string(),
            activate: Box::new(move |tray: &mut Self| tray.send(message)),
            ..Default::default()
        }
        .into()
    }
}

impl ksni::Tray for ProtonTray {
    fn id(&self) -> String {
        APP_ID.to_string()
    }

    fn title(&self) -> String {
        "ProtonVPN".to_string()
    }

    fn icon_name(&self) -> String {
        "network-vpn".to_string()
    }

    fn activate(&mut self, _x: i32, _y: i32) {
        self.send(TrayMessage::Show);
    }

    fn menu(&self) -> Vec<ksni::MenuItem<Self>> {
        vec![
            Self::item(&i18n("Show"), TrayMessage::Show),
            ksni::MenuItem::Separator,
            Self::item(&i18n("Get logs"), TrayMessage::GetLogs),
            Self::item(&i18n("About"), TrayMessage::About),
            ksni::MenuItem::Separator,
            Self::item(&i18n("Quit"), TrayMessage::Quit),
        ]
    }
}

/// Running tray indicator; dropping it removes the icon
pub struct TrayIndicator {
    handle: ksni::Handle<ProtonTray>,
}

impl TrayIndicator {
    /// Starts the tray service
    ///
    /// Returns `None` when the service thread cannot be spawned.
    pub fn spawn(sender: Sender<TrayMessage>) -> Option<Self> {
        let service = ksni::TrayService::new(ProtonTray { sender });
        let handle = service.handle();

        let spawned = std::thread::Builder::new()
            .name(TRAY_THREAD_NAME.to_string())
            .spawn(move || {
                if let Err(e) = service.run() {
                    tracing::warn!(error = %e, "Tray service stopped");
                }
            });

        match spawned {
            Ok(_) => {
                tracing::info!("Tray indicator started");
                Some(Self { handle })
            }
            Err(e) => {
                tracing::warn!(%e, "Failed to start tray indicator");
                None
            }
        }
    }
}

impl Drop for TrayIndicator {
    fn drop(&mut self) {
        self.handle.shutdown();
    }
}
