//! Dashboard window
//!
//! Shows the connection status and the server list grouped by country. The
//! list is refreshed on a timer through a worker task; connect and disconnect
//! run as native tasks. While one of those is in flight the buttons are
//! insensitive and refresh results are discarded so they cannot overwrite the
//! pending status.

use adw::prelude::*;
use gtk4::prelude::*;
use gtk4::{Align, Button, Label, Orientation, glib};
use libadwaita as adw;
use protonvpn_gui_core::app::{AppWindow, GracefulClose, ShutdownAware};
use protonvpn_gui_core::models::{ConnectionStatus, ServerList};
use protonvpn_gui_core::{AppAction, DashboardViewModel, TaskFactory, TaskKind, VpnBackend};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;
use uuid::Uuid;

use super::{create_app_menu, create_menu_button};
use crate::i18n::{i18n, i18n_f};

/// What the server list currently shows
#[derive(PartialEq)]
struct RenderedList {
    servers: ServerList,
    connected: Option<Uuid>,
}

/// Main window for a logged-in user
pub struct DashboardWindow {
    window: adw::ApplicationWindow,
    status_icon: gtk4::Image,
    status_label: Label,
    error_banner: adw::Banner,
    server_list: gtk4::ListBox,
    quick_connect_button: Button,
    disconnect_button: Button,
    refresh_button: Button,
    connect_buttons: RefCell<Vec<Button>>,
    rendered: RefCell<Option<RenderedList>>,
    view_model: RefCell<DashboardViewModel>,
    tasks: TaskFactory,
    refresh_source: RefCell<Option<glib::SourceId>>,
    refreshing: Cell<bool>,
    busy: Cell<bool>,
    shut_down: Cell<bool>,
}

impl DashboardWindow {
    /// Builds the window and starts the periodic refresh
    pub fn new(
        app: &adw::Application,
        backend: Arc<dyn VpnBackend>,
        tasks: TaskFactory,
        refresh_interval_secs: u32,
    ) -> Rc<Self> {
        let window = adw::ApplicationWindow::builder()
            .application(app)
            .title("ProtonVPN")
            .default_width(480)
            .default_height(640)
            .build();

        let header = adw::HeaderBar::new();
        let refresh_button = Button::from_icon_name("view-refresh-symbolic");
        refresh_button.set_tooltip_text(Some(&i18n("Refresh")));
        refresh_button.update_property(&[gtk4::accessible::Property::Label("Refresh")]);
        header.pack_start(&refresh_button);

        let menu = create_app_menu(&[
            &[AppAction::GetLogs, AppAction::Logout],
            &[AppAction::About, AppAction::Quit],
        ]);
        header.pack_end(&create_menu_button(&menu));

        let error_banner = adw::Banner::new("");

        // === Status ===
        let status_box = gtk4::Box::new(Orientation::Vertical, 12);
        status_box.set_margin_top(18);
        status_box.set_margin_bottom(12);
        status_box.add_css_class("connection-status");

        let status_icon = gtk4::Image::from_icon_name("network-vpn-symbolic");
        status_icon.set_pixel_size(64);
        status_icon.add_css_class("dim-label");
        status_box.append(&status_icon);

        let status_label = Label::builder()
            .label(i18n("Disconnected"))
            .wrap(true)
            .justify(gtk4::Justification::Center)
            .css_classes(["title-3"])
            .build();
        status_box.append(&status_label);

        let button_box = gtk4::Box::new(Orientation::Horizontal, 12);
        button_box.set_halign(Align::Center);
        let quick_connect_button = Button::builder()
            .label(i18n("Quick Connect"))
            .sensitive(false)
            .css_classes(["suggested-action", "pill"])
            .build();
        let disconnect_button = Button::builder()
            .label(i18n("Disconnect"))
            .sensitive(false)
            .css_classes(["destructive-action", "pill"])
            .build();
        button_box.append(&quick_connect_button);
        button_box.append(&disconnect_button);
        status_box.append(&button_box);

        // === Servers ===
        let server_list = gtk4::ListBox::builder()
            .selection_mode(gtk4::SelectionMode::None)
            .css_classes(["boxed-list"])
            .build();
        let placeholder = Label::builder()
            .label(i18n("No ProtonVPN profiles found in NetworkManager"))
            .wrap(true)
            .margin_top(24)
            .margin_bottom(24)
            .margin_start(12)
            .margin_end(12)
            .css_classes(["dim-label"])
            .build();
        server_list.set_placeholder(Some(&placeholder));

        let list_box = gtk4::Box::new(Orientation::Vertical, 12);
        list_box.set_margin_start(12);
        list_box.set_margin_end(12);
        list_box.set_margin_bottom(12);
        list_box.append(&status_box);
        list_box.append(&server_list);

        let clamp = adw::Clamp::builder()
            .maximum_size(600)
            .child(&list_box)
            .build();
        let scrolled = gtk4::ScrolledWindow::builder()
            .hscrollbar_policy(gtk4::PolicyType::Never)
            .vexpand(true)
            .child(&clamp)
            .build();

        let toolbar_view = adw::ToolbarView::new();
        toolbar_view.add_top_bar(&header);
        toolbar_view.add_top_bar(&error_banner);
        toolbar_view.set_content(Some(&scrolled));
        window.set_content(Some(&toolbar_view));

        let this = Rc::new(Self {
            window,
            status_icon,
            status_label,
            error_banner,
            server_list,
            quick_connect_button,
            disconnect_button,
            refresh_button,
            connect_buttons: RefCell::new(Vec::new()),
            rendered: RefCell::new(None),
            view_model: RefCell::new(DashboardViewModel::new(backend)),
            tasks,
            refresh_source: RefCell::new(None),
            refreshing: Cell::new(false),
            busy: Cell::new(false),
            shut_down: Cell::new(false),
        });
        this.connect_signals();
        this.start_refresh_timer(refresh_interval_secs);
        this.refresh();
        this
    }

    /// The GTK window
    pub const fn gtk_window(&self) -> &adw::ApplicationWindow {
        &self.window
    }

    /// Shows the window
    pub fn present(&self) {
        self.window.present();
    }

    fn connect_signals(self: &Rc<Self>) {
        let weak = Rc::downgrade(self);
        self.refresh_button.connect_clicked(move |_| {
            if let Some(this) = weak.upgrade() {
                this.refresh();
            }
        });

        let weak = Rc::downgrade(self);
        self.quick_connect_button.connect_clicked(move |_| {
            if let Some(this) = weak.upgrade() {
                this.quick_connect();
            }
        });

        let weak = Rc::downgrade(self);
        self.disconnect_button.connect_clicked(move |_| {
            if let Some(this) = weak.upgrade() {
                this.disconnect();
            }
        });

        let weak = Rc::downgrade(self);
        self.window.connect_close_request(move |_| {
            if let Some(this) = weak.upgrade() {
                this.stop_refresh_timer();
            }
            glib::Propagation::Proceed
        });
    }

    fn start_refresh_timer(self: &Rc<Self>, interval_secs: u32) {
        let weak = Rc::downgrade(self);
        let source = glib::timeout_add_seconds_local(interval_secs, move || {
            let Some(this) = weak.upgrade() else {
                return glib::ControlFlow::Break;
            };
            this.refresh();
            glib::ControlFlow::Continue
        });
        *self.refresh_source.borrow_mut() = Some(source);
    }

    fn stop_refresh_timer(&self) {
        if let Some(source) = self.refresh_source.borrow_mut().take() {
            source.remove();
            tracing::debug!("Dashboard refresh stopped");
        }
    }

    fn refresh(self: &Rc<Self>) {
        if self.shut_down.get() || self.busy.get() || self.refreshing.replace(true) {
            return;
        }

        let job = self.view_model.borrow().refresh_job();
        let weak = Rc::downgrade(self);
        let started = self.tasks.spawn(TaskKind::Worker, job, move |outcome| {
            let Some(this) = weak.upgrade() else {
                return;
            };
            this.refreshing.set(false);
            if this.shut_down.get() || this.busy.get() {
                return;
            }
            this.view_model.borrow_mut().apply_snapshot(outcome);
            this.render();
        });
        if let Err(e) = started {
            tracing::error!(%e, "Failed to start dashboard refresh");
            self.refreshing.set(false);
        }
    }

    fn quick_connect(self: &Rc<Self>) {
        let target = self
            .view_model
            .borrow()
            .quick_connect_target()
            .map(|server| server.id);
        if let Some(id) = target {
            self.connect_to(id);
        }
    }

    fn connect_to(self: &Rc<Self>, server: Uuid) {
        if self.busy.get() {
            return;
        }
        let job = self.view_model.borrow_mut().connect_job(server);
        let job = match job {
            Ok(job) => job,
            Err(e) => {
                tracing::warn!(%e, "Cannot connect to server");
                return;
            }
        };
        self.busy.set(true);
        self.render();

        let weak = Rc::downgrade(self);
        let started = self.tasks.spawn(TaskKind::Native, job, move |outcome| {
            if let Some(this) = weak.upgrade() {
                this.busy.set(false);
                this.view_model.borrow_mut().finish_connect(outcome);
                this.render();
            }
        });
        if let Err(e) = started {
            self.busy.set(false);
            self.view_model.borrow_mut().finish_connect(Err(e));
            self.render();
        }
    }

    fn disconnect(self: &Rc<Self>) {
        if self.busy.get() {
            return;
        }
        let job = self.view_model.borrow_mut().disconnect_job();
        self.busy.set(true);
        self.render();

        let weak = Rc::downgrade(self);
        let started = self.tasks.spawn(TaskKind::Native, job, move |outcome| {
            if let Some(this) = weak.upgrade() {
                this.busy.set(false);
                this.view_model.borrow_mut().finish_disconnect(outcome);
                this.render();
            }
        });
        if let Err(e) = started {
            self.busy.set(false);
            self.view_model.borrow_mut().finish_disconnect(Err(e));
            self.render();
        }
    }

    fn render(self: &Rc<Self>) {
        let view_model = self.view_model.borrow();
        let status = view_model.status();
        let busy = self.busy.get();

        self.status_label.set_text(&status_text(status));
        if matches!(status, ConnectionStatus::Connected(_)) {
            self.status_icon.remove_css_class("dim-label");
            self.status_icon.add_css_class("success");
        } else {
            self.status_icon.remove_css_class("success");
            self.status_icon.add_css_class("dim-label");
        }

        self.disconnect_button.set_sensitive(!busy && status.is_active());
        self.quick_connect_button.set_sensitive(
            !busy && !status.is_active() && view_model.quick_connect_target().is_some(),
        );
        self.refresh_button.set_sensitive(!busy);

        match view_model.last_error() {
            Some(message) => {
                self.error_banner.set_title(message);
                self.error_banner.set_revealed(true);
            }
            None => self.error_banner.set_revealed(false),
        }

        let wanted = RenderedList {
            servers: view_model.servers().clone(),
            connected: match status {
                ConnectionStatus::Connected(conn) => Some(conn.id),
                _ => None,
            },
        };
        drop(view_model);

        if self.rendered.borrow().as_ref() != Some(&wanted) {
            self.rebuild_server_list(&wanted);
            *self.rendered.borrow_mut() = Some(wanted);
        }
        for button in self.connect_buttons.borrow().iter() {
            button.set_sensitive(!busy);
        }
    }

    fn rebuild_server_list(self: &Rc<Self>, list: &RenderedList) {
        while let Some(row) = self.server_list.row_at_index(0) {
            self.server_list.remove(&row);
        }
        let mut buttons = Vec::with_capacity(list.servers.len());

        for country in list.servers.countries() {
            let expander = adw::ExpanderRow::builder()
                .title(country.label())
                .subtitle(i18n_f(
                    "{} servers",
                    &[country.servers.len().to_string().as_str()],
                ))
                .build();

            for server in &country.servers {
                let row = adw::ActionRow::builder()
                    .title(server.name.as_str())
                    .subtitle(server.kind.label())
                    .build();

                if list.connected == Some(server.id) {
                    let icon = gtk4::Image::from_icon_name("emblem-ok-symbolic");
                    icon.add_css_class("success");
                    row.add_suffix(&icon);
                    expander.set_expanded(true);
                } else {
                    let button = Button::builder()
                        .label(i18n("Connect"))
                        .valign(Align::Center)
                        .css_classes(["flat"])
                        .build();
                    let weak = Rc::downgrade(self);
                    let id = server.id;
                    button.connect_clicked(move |_| {
                        if let Some(this) = weak.upgrade() {
                            this.connect_to(id);
                        }
                    });
                    row.add_suffix(&button);
                    buttons.push(button);
                }
                expander.add_row(&row);
            }
            self.server_list.append(&expander);
        }

        *self.connect_buttons.borrow_mut() = buttons;
    }
}

fn status_text(status: &ConnectionStatus) -> String {
    match status {
        ConnectionStatus::Disconnected => i18n("Disconnected"),
        ConnectionStatus::Connecting(name) => i18n_f("Connecting to {}...", &[name.as_str()]),
        ConnectionStatus::Connected(conn) => i18n_f("Connected to {}", &[conn.name.as_str()]),
        ConnectionStatus::Disconnecting => i18n("Disconnecting..."),
    }
}

impl AppWindow for DashboardWindow {
    fn title(&self) -> String {
        self.window.title().map(|t| t.to_string()).unwrap_or_default()
    }

    fn shutdown_aware(&self) -> Option<&dyn ShutdownAware> {
        Some(self)
    }

    fn graceful_close(&self) -> Option<&dyn GracefulClose> {
        Some(self)
    }

    fn destroy(&self) {
        self.stop_refresh_timer();
        self.window.destroy();
    }
}

impl ShutdownAware for DashboardWindow {
    fn prepare_for_app_shutdown(&self) {
        self.shut_down.set(true);
        self.stop_refresh_timer();
        self.window.set_sensitive(false);
    }
}

impl GracefulClose for DashboardWindow {
    fn close_for_logout(&self) {
        self.window.close();
    }
}
