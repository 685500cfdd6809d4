//! About dialog

use adw::prelude::*;
use libadwaita as adw;

use crate::i18n::i18n;

/// Shows the About dialog over `parent`
pub fn show_about_dialog(parent: Option<&gtk4::Window>) {
    let debug_info = format!(
        "ProtonVPN GUI {version}\n\
         GTK {gtk_major}.{gtk_minor}.{gtk_micro}\n\
         libadwaita {adw_major}.{adw_minor}.{adw_micro}\n\
         OS: {os} ({arch})",
        version = env!("CARGO_PKG_VERSION"),
        gtk_major = gtk4::major_version(),
        gtk_minor = gtk4::minor_version(),
        gtk_micro = gtk4::micro_version(),
        adw_major = adw::major_version(),
        adw_minor = adw::minor_version(),
        adw_micro = adw::micro_version(),
        os = std::env::consts::OS,
        arch = std::env::consts::ARCH,
    );

    let about = adw::AboutDialog::builder()
        .application_name("ProtonVPN")
        .developer_name("Proton Technologies AG")
        .version(env!("CARGO_PKG_VERSION"))
        .comments(i18n(
            "Desktop client for ProtonVPN. Connect to Proton servers \
             through NetworkManager from a GTK4 interface.",
        ))
        .website("https://protonvpn.com")
        .issue_url("https://github.com/ProtonVPN/linux-app/issues")
        .license_type(gtk4::License::Gpl30)
        .copyright("© Proton Technologies AG")
        .application_icon(protonvpn_gui_core::app::APP_ID)
        // Translators: Replace this with your name and language, e.g. "John Doe (German)"
        .translator_credits(i18n("translator-credits"))
        .debug_info(debug_info)
        .debug_info_filename("protonvpn-gui-debug-info.txt")
        .build();

    about.add_legal_section(
        "GTK4 & libadwaita",
        Some("© The GNOME Project"),
        gtk4::License::Lgpl21,
        None,
    );

    about.present(parent);
}
