//! GTK implementation of the controller's [`Shell`] seam

use gtk4::gio;
use gtk4::prelude::*;
use libadwaita as adw;
use protonvpn_gui_core::app::{AppWindow, Confirmation, Shell, UiText};
use protonvpn_gui_core::{AppSettings, TaskFactory, VpnBackend};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::dialogs::{MessageDialog, present_confirmation, show_about_dialog};
use crate::window::{DashboardWindow, LoginWindow};

#[cfg(feature = "tray")]
use crate::tray::{TrayIndicator, TrayMessage};
#[cfg(feature = "tray")]
use std::sync::mpsc::Sender;

/// A window opened by the shell together with its controller handle
struct OpenWindow {
    window: gtk4::Window,
    handle: Rc<dyn AppWindow>,
}

/// Windows, dialogs and the tray on top of an `adw::Application`
pub struct GtkShell {
    app: adw::Application,
    backend: Arc<dyn VpnBackend>,
    tasks: TaskFactory,
    settings: Rc<AppSettings>,
    windows: RefCell<Vec<OpenWindow>>,
    hold: RefCell<Option<gio::ApplicationHoldGuard>>,
    #[cfg(feature = "tray")]
    tray_sender: Option<Sender<TrayMessage>>,
}

impl GtkShell {
    /// Creates a shell for `app`
    pub fn new(
        app: &adw::Application,
        backend: Arc<dyn VpnBackend>,
        tasks: TaskFactory,
        settings: Rc<AppSettings>,
    ) -> Self {
        Self {
            app: app.clone(),
            backend,
            tasks,
            settings,
            windows: RefCell::new(Vec::new()),
            hold: RefCell::new(None),
            #[cfg(feature = "tray")]
            tray_sender: None,
        }
    }

    /// Routes tray menu clicks to `sender`
    #[cfg(feature = "tray")]
    #[must_use]
    pub fn with_tray(mut self, sender: Sender<TrayMessage>) -> Self {
        self.tray_sender = Some(sender);
        self
    }

    fn parent(&self) -> Option<gtk4::Window> {
        self.app.active_window()
    }

    fn register(&self, window: &adw::ApplicationWindow, handle: Rc<dyn AppWindow>) {
        self.prune_closed();
        self.windows.borrow_mut().push(OpenWindow {
            window: window.clone().upcast(),
            handle,
        });
    }

    /// Forgets windows GTK has already removed from the application
    fn prune_closed(&self) {
        self.windows
            .borrow_mut()
            .retain(|open| open.window.application().is_some());
    }

    #[cfg(feature = "tray")]
    fn spawn_indicator(&self) -> Option<TrayIndicator> {
        let sender = self.tray_sender.clone()?;
        let indicator = TrayIndicator::spawn(sender)?;
        // The tray can bring windows back, so closing the last one must not
        // end the process.
        *self.hold.borrow_mut() = Some(self.app.hold());
        Some(indicator)
    }

    #[cfg(not(feature = "tray"))]
    fn spawn_indicator(&self) -> Option<()> {
        tracing::debug!("Built without tray support");
        None
    }
}

impl Shell for GtkShell {
    type Notice = MessageDialog;
    #[cfg(feature = "tray")]
    type Indicator = TrayIndicator;
    #[cfg(not(feature = "tray"))]
    type Indicator = ();

    fn has_active_window(&self) -> bool {
        self.app.active_window().is_some()
    }

    fn present_active_window(&self) {
        if let Some(window) = self.app.active_window() {
            window.present();
        }
    }

    fn show_login(&self, on_authenticated: Rc<dyn Fn()>) {
        let window = LoginWindow::new(
            &self.app,
            Arc::clone(&self.backend),
            self.tasks.clone(),
            on_authenticated,
        );
        self.register(window.gtk_window(), window.clone());
        window.present();
    }

    fn show_dashboard(&self) {
        let window = DashboardWindow::new(
            &self.app,
            Arc::clone(&self.backend),
            self.tasks.clone(),
            self.settings.network.effective_refresh_interval_secs(),
        );
        self.register(window.gtk_window(), window.clone());
        window.present();
    }

    fn show_message(&self, title: &str, description: &UiText) -> Self::Notice {
        let dialog = MessageDialog::new(self.parent().as_ref(), title, description);
        dialog.present();
        dialog
    }

    fn confirm(&self, confirmation: Confirmation, respond: Box<dyn FnOnce(bool)>) {
        present_confirmation(self.parent().as_ref(), confirmation, respond);
    }

    fn show_about(&self) {
        show_about_dialog(self.parent().as_ref());
    }

    fn windows(&self) -> Vec<Rc<dyn AppWindow>> {
        self.prune_closed();
        self.windows
            .borrow()
            .iter()
            .map(|open| Rc::clone(&open.handle))
            .collect()
    }

    fn create_indicator(&self) -> Option<Self::Indicator> {
        if !self.settings.ui.enable_tray_icon {
            tracing::debug!("Tray icon disabled in settings");
            return None;
        }
        self.spawn_indicator()
    }

    fn quit(&self) {
        self.hold.borrow_mut().take();
        self.app.quit();
    }
}
