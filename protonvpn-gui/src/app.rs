//! GTK4 application setup
//!
//! Builds the [`AppController`] on `startup`, registers the global actions and
//! forwards `activate` to it. The controller lives until `shutdown`.

use gtk4::prelude::*;
use gtk4::{gio, glib};
use libadwaita as adw;
use protonvpn_gui_core::app::{APP_ID, AppPhase};
use protonvpn_gui_core::config::ColorScheme;
use protonvpn_gui_core::{
    AppAction, AppController, AppSettings, ConfigManager, NetworkManagerBackend, Privilege,
    StartupOutcome, VpnBackend,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::shell::GtkShell;
use crate::tasks;

#[cfg(feature = "tray")]
use crate::tray::TrayMessage;
#[cfg(feature = "tray")]
use std::sync::mpsc::{self, Receiver};
#[cfg(feature = "tray")]
use std::time::Duration;

/// Controller type used by the GTK front-end
pub type Controller = AppController<GtkShell>;

/// Controller slot filled on startup and emptied on shutdown
type SharedController = Rc<RefCell<Option<Rc<Controller>>>>;

/// How often tray clicks are picked up
#[cfg(feature = "tray")]
const TRAY_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Applies a color scheme through libadwaita's style manager
pub fn apply_color_scheme(scheme: ColorScheme) {
    let style_manager = adw::StyleManager::default();
    match scheme {
        ColorScheme::System => style_manager.set_color_scheme(adw::ColorScheme::Default),
        ColorScheme::Light => style_manager.set_color_scheme(adw::ColorScheme::ForceLight),
        ColorScheme::Dark => style_manager.set_color_scheme(adw::ColorScheme::ForceDark),
    }
}

/// Creates and configures the application
#[must_use]
pub fn create_application(config: ConfigManager, settings: AppSettings) -> adw::Application {
    let app = adw::Application::builder()
        .application_id(APP_ID)
        .flags(gio::ApplicationFlags::default())
        .build();

    let controller: SharedController = Rc::new(RefCell::new(None));
    let settings = Rc::new(settings);

    let slot = Rc::clone(&controller);
    app.connect_startup(move |app| {
        let built = build_controller(app, &config, &settings);
        let outcome = built.startup(
            Privilege::detect(),
            std::io::stdin().lock(),
            std::io::stdout(),
        );
        if outcome == StartupOutcome::Abort {
            return;
        }

        load_css_styles();
        apply_color_scheme(settings.ui.color_scheme);
        setup_app_actions(app, &built);
        *slot.borrow_mut() = Some(built);
    });

    let slot = Rc::clone(&controller);
    app.connect_activate(move |_| {
        let current = slot.borrow().clone();
        match current {
            Some(controller) if controller.phase() != AppPhase::Quitting => controller.activate(),
            _ => tracing::debug!("Activation ignored, application is quitting"),
        }
    });

    app.connect_shutdown(move |_| {
        tracing::info!("Application shutdown");
        controller.borrow_mut().take();
    });

    app
}

fn build_controller(
    app: &adw::Application,
    config: &ConfigManager,
    settings: &Rc<AppSettings>,
) -> Rc<Controller> {
    let backend: Arc<dyn VpnBackend> =
        Arc::new(NetworkManagerBackend::from_settings(config, &settings.network));
    let tasks = tasks::main_loop_factory();
    let shell = GtkShell::new(app, Arc::clone(&backend), tasks.clone(), Rc::clone(settings));

    #[cfg(feature = "tray")]
    let (tray_sender, tray_inbox) = mpsc::channel();
    #[cfg(feature = "tray")]
    let shell = shell.with_tray(tray_sender);

    let controller = Rc::new(
        AppController::new(shell, backend, tasks).with_app_version(env!("CARGO_PKG_VERSION")),
    );

    #[cfg(feature = "tray")]
    setup_tray_polling(&controller, tray_inbox);

    controller
}

/// Registers one `app.` action per [`AppAction`]
fn setup_app_actions(app: &adw::Application, controller: &Rc<Controller>) {
    for action in AppAction::ALL {
        let simple = gio::SimpleAction::new(action.name(), None);
        let weak = Rc::downgrade(controller);
        simple.connect_activate(move |_, _| {
            if let Some(controller) = weak.upgrade() {
                controller.activate_action(action);
            }
        });
        app.add_action(&simple);
        app.set_accels_for_action(&action.detailed_name(), action.accelerators());
    }
}

/// Forwards tray clicks to the controller
#[cfg(feature = "tray")]
fn setup_tray_polling(controller: &Rc<Controller>, inbox: Receiver<TrayMessage>) {
    let weak = Rc::downgrade(controller);
    glib::timeout_add_local(TRAY_POLL_INTERVAL, move || {
        let Some(controller) = weak.upgrade() else {
            return glib::ControlFlow::Break;
        };
        while let Ok(message) = inbox.try_recv() {
            tracing::debug!(?message, "Tray message");
            match message.action() {
                Some(action) => controller.activate_action(action),
                None => controller.activate(),
            }
        }
        glib::ControlFlow::Continue
    });
}

/// Loads the application stylesheet
fn load_css_styles() {
    let provider = gtk4::CssProvider::new();
    provider.load_from_string(include_str!("../assets/style.css"));

    match gtk4::gdk::Display::default() {
        Some(display) => gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        ),
        None => tracing::warn!("Failed to add CSS provider - no display available"),
    }
}

/// Runs the application until it quits
///
/// Returns `glib::ExitCode::FAILURE` if libadwaita cannot be initialized.
pub fn run(config: ConfigManager, settings: AppSettings) -> glib::ExitCode {
    if let Err(e) = adw::init() {
        tracing::error!(%e, "Failed to initialize libadwaita");
        return glib::ExitCode::FAILURE;
    }

    let app = create_application(config, settings);
    app.run()
}
