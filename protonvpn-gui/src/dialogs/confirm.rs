//! Quit and logout confirmation dialogs

use adw::prelude::*;
use libadwaita as adw;
use protonvpn_gui_core::Confirmation;
use std::cell::RefCell;

use crate::i18n::i18n;

const CANCEL_RESPONSE: &str = "cancel";
const CONFIRM_RESPONSE: &str = "confirm";

/// Asks for confirmation; `respond` runs once with the answer
///
/// Dismissing the dialog counts as declining.
pub fn present_confirmation(
    parent: Option<&gtk4::Window>,
    confirmation: Confirmation,
    respond: Box<dyn FnOnce(bool)>,
) {
    let dialog = adw::AlertDialog::builder()
        .heading(i18n(confirmation.title()))
        .body(i18n(confirmation.body()))
        .build();
    dialog.add_response(CANCEL_RESPONSE, &i18n("Cancel"));
    dialog.add_response(CONFIRM_RESPONSE, &i18n(confirmation.confirm_label()));
    dialog.set_response_appearance(CONFIRM_RESPONSE, adw::ResponseAppearance::Destructive);
    dialog.set_default_response(Some(CANCEL_RESPONSE));
    dialog.set_close_response(CANCEL_RESPONSE);

    let respond = RefCell::new(Some(respond));
    dialog.connect_response(None, move |_, response| {
        let pending = respond.borrow_mut().take();
        if let Some(respond) = pending {
            tracing::debug!(?confirmation, response, "Confirmation answered");
            respond(response == CONFIRM_RESPONSE);
        }
    });

    dialog.present(parent);
}
