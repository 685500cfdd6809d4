//! Informational message dialog with replaceable content
//!
//! Used for the logout progress notice and the log generation notice. The
//! controller keeps the handle and either closes it or rewrites it in place
//! when the background work finishes.

use adw::prelude::*;
use gtk4::prelude::*;
use libadwaita as adw;
use protonvpn_gui_core::{Notice, UiText};
use std::cell::Cell;
use std::rc::Rc;

use crate::i18n::{i18n, i18n_text};

const CLOSE_RESPONSE: &str = "close";

/// Message dialog handle
pub struct MessageDialog {
    dialog: adw::AlertDialog,
    parent: Option<gtk4::Widget>,
    open: Rc<Cell<bool>>,
}

impl MessageDialog {
    /// Creates the dialog without showing it; `title` and `description` are translated here
    #[must_use]
    pub fn new(parent: Option<&gtk4::Window>, title: &str, description: &UiText) -> Self {
        let dialog = adw::AlertDialog::builder()
            .heading(i18n(title))
            .body(i18n_text(description))
            .build();
        dialog.add_response(CLOSE_RESPONSE, &i18n("Close"));
        dialog.set_default_response(Some(CLOSE_RESPONSE));
        dialog.set_close_response(CLOSE_RESPONSE);

        let open = Rc::new(Cell::new(false));
        let open_flag = Rc::clone(&open);
        dialog.connect_closed(move |_| open_flag.set(false));

        Self {
            dialog,
            parent: parent.map(|p| p.clone().upcast::<gtk4::Widget>()),
            open,
        }
    }

    /// Shows the dialog over its parent
    pub fn present(&self) {
        self.open.set(true);
        self.dialog.present(self.parent.as_ref());
    }
}

impl Notice for MessageDialog {
    fn update_content(&self, title: &str, description: &UiText) {
        self.dialog.set_heading(Some(&i18n(title)));
        self.dialog.set_body(&i18n_text(description));
        // Dismissed by the user before the update arrived
        if !self.open.get() {
            self.present();
        }
    }

    fn close(&self) {
        if self.open.replace(false) {
            self.dialog.close();
        }
    }
}
