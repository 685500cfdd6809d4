//! Application windows
//!
//! Both windows are plain structs owning their widgets and view model. They
//! are handed to the controller as [`AppWindow`](protonvpn_gui_core::AppWindow)
//! trait objects so logout can prepare and close them.

mod dashboard;
mod login;

pub use dashboard::DashboardWindow;
pub use login::LoginWindow;

use gtk4::gio;
use gtk4::prelude::*;
use gtk4::MenuButton;
use protonvpn_gui_core::AppAction;

use crate::i18n::i18n;

/// Builds a primary menu from sections of application actions
#[must_use]
pub fn create_app_menu(sections: &[&[AppAction]]) -> gio::Menu {
    let menu = gio::Menu::new();
    for actions in sections {
        let section = gio::Menu::new();
        for action in *actions {
            section.append(Some(&i18n(action.label())), Some(&action.detailed_name()));
        }
        menu.append_section(None, &section);
    }
    menu
}

/// Header bar button opening `menu`
#[must_use]
pub fn create_menu_button(menu: &gio::Menu) -> MenuButton {
    let menu_button = MenuButton::builder()
        .icon_name("open-menu-symbolic")
        .tooltip_text(i18n("Main Menu"))
        .menu_model(menu)
        .primary(true)
        .build();
    menu_button.update_property(&[gtk4::accessible::Property::Label("Main Menu")]);
    menu_button
}
