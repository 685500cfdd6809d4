//! Login window

use adw::prelude::*;
use gtk4::prelude::*;
use gtk4::{Align, Button, Label, Orientation};
use libadwaita as adw;
use protonvpn_gui_core::app::{AppWindow, GracefulClose};
use protonvpn_gui_core::task::TaskOutcome;
use protonvpn_gui_core::view_model::{LoginState, LoginViewModel};
use protonvpn_gui_core::{AppAction, TaskFactory, TaskKind, VpnBackend, VpnResult};
use secrecy::SecretString;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use super::{create_app_menu, create_menu_button};
use crate::i18n::i18n;

/// Username/password form
///
/// The login call runs as a native task; on success the window hands over to
/// `on_authenticated` and closes itself.
pub struct LoginWindow {
    window: adw::ApplicationWindow,
    username_row: adw::EntryRow,
    password_row: adw::PasswordEntryRow,
    submit_button: Button,
    spinner: gtk4::Spinner,
    error_label: Label,
    view_model: RefCell<LoginViewModel>,
    tasks: TaskFactory,
    on_authenticated: Rc<dyn Fn()>,
}

impl LoginWindow {
    /// Builds the window; call [`LoginWindow::present`] to show it
    pub fn new(
        app: &adw::Application,
        backend: Arc<dyn VpnBackend>,
        tasks: TaskFactory,
        on_authenticated: Rc<dyn Fn()>,
    ) -> Rc<Self> {
        let window = adw::ApplicationWindow::builder()
            .application(app)
            .title(i18n("ProtonVPN Login"))
            .default_width(420)
            .default_height(520)
            .resizable(false)
            .build();

        let header = adw::HeaderBar::new();
        let menu = create_app_menu(&[&[AppAction::GetLogs, AppAction::About], &[AppAction::Quit]]);
        header.pack_end(&create_menu_button(&menu));

        let content = gtk4::Box::new(Orientation::Vertical, 18);
        content.set_margin_top(24);
        content.set_margin_bottom(24);
        content.set_margin_start(24);
        content.set_margin_end(24);
        content.set_valign(Align::Center);

        let title = Label::builder()
            .label("ProtonVPN")
            .css_classes(["title-1"])
            .build();
        content.append(&title);

        let subtitle = Label::builder()
            .label(i18n("Sign in with your Proton account"))
            .css_classes(["dim-label"])
            .build();
        content.append(&subtitle);

        let group = adw::PreferencesGroup::new();
        let username_row = adw::EntryRow::builder().title(i18n("Username")).build();
        let password_row = adw::PasswordEntryRow::builder()
            .title(i18n("Password"))
            .build();
        group.add(&username_row);
        group.add(&password_row);
        content.append(&group);

        let error_label = Label::builder()
            .wrap(true)
            .visible(false)
            .css_classes(["error"])
            .build();
        content.append(&error_label);

        let spinner = gtk4::Spinner::builder().visible(false).build();
        content.append(&spinner);

        let submit_button = Button::builder()
            .label(i18n("Sign in"))
            .halign(Align::Center)
            .sensitive(false)
            .css_classes(["suggested-action", "pill"])
            .build();
        content.append(&submit_button);

        let clamp = adw::Clamp::builder()
            .maximum_size(360)
            .child(&content)
            .build();

        let toolbar_view = adw::ToolbarView::new();
        toolbar_view.add_top_bar(&header);
        toolbar_view.set_content(Some(&clamp));
        window.set_content(Some(&toolbar_view));

        let this = Rc::new(Self {
            window,
            username_row,
            password_row,
            submit_button,
            spinner,
            error_label,
            view_model: RefCell::new(LoginViewModel::new(backend)),
            tasks,
            on_authenticated,
        });
        this.connect_signals();
        this
    }

    /// The GTK window
    pub const fn gtk_window(&self) -> &adw::ApplicationWindow {
        &self.window
    }

    /// Shows the window and focuses the username field
    pub fn present(&self) {
        self.window.present();
        self.username_row.grab_focus();
    }

    fn connect_signals(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        self.username_row.connect_changed(move |row| {
            if let Some(this) = weak.upgrade() {
                this.view_model.borrow_mut().set_username(row.text().to_string());
                this.sync_state();
            }
        });

        let weak = Rc::downgrade(self);
        self.password_row.connect_changed(move |row| {
            if let Some(this) = weak.upgrade() {
                this.view_model
                    .borrow_mut()
                    .set_password(SecretString::from(row.text().to_string()));
                this.sync_state();
            }
        });

        let password_row = self.password_row.clone();
        self.username_row.connect_entry_activated(move |_| {
            password_row.grab_focus();
        });

        let weak = Rc::downgrade(self);
        self.password_row.connect_entry_activated(move |_| {
            if let Some(this) = weak.upgrade() {
                this.submit();
            }
        });

        let weak = Rc::downgrade(self);
        self.submit_button.connect_clicked(move |_| {
            if let Some(this) = weak.upgrade() {
                this.submit();
            }
        });
    }

    fn submit(self: &Rc<Self>) {
        let job = self.view_model.borrow_mut().begin_login();
        let Some(job) = job else {
            return;
        };
        tracing::info!("Logging in");
        self.sync_state();

        let weak = Rc::downgrade(self);
        let started = self.tasks.spawn(TaskKind::Native, job, move |outcome| {
            if let Some(this) = weak.upgrade() {
                this.finish(outcome);
            }
        });
        if let Err(e) = started {
            self.finish(Err(e));
        }
    }

    fn finish(&self, outcome: TaskOutcome<VpnResult<()>>) {
        let authenticated = self.view_model.borrow_mut().finish_login(outcome);
        self.sync_state();
        if authenticated {
            self.password_row.set_text("");
            (self.on_authenticated)();
            self.window.close();
        }
    }

    fn sync_state(&self) {
        let view_model = self.view_model.borrow();
        let busy = *view_model.state() == LoginState::Authenticating;

        self.username_row.set_sensitive(!busy);
        self.password_row.set_sensitive(!busy);
        self.submit_button.set_sensitive(view_model.can_submit());
        self.spinner.set_visible(busy);
        self.spinner.set_spinning(busy);

        match view_model.error_message() {
            Some(message) => {
                self.error_label.set_text(message);
                self.error_label.set_visible(true);
            }
            None => self.error_label.set_visible(false),
        }
    }
}

impl AppWindow for LoginWindow {
    fn title(&self) -> String {
        self.window.title().map(|t| t.to_string()).unwrap_or_default()
    }

    fn graceful_close(&self) -> Option<&dyn GracefulClose> {
        Some(self)
    }

    fn destroy(&self) {
        self.window.destroy();
    }
}

impl GracefulClose for LoginWindow {
    fn close_for_logout(&self) {
        self.window.close();
    }
}
