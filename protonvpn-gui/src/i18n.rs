//! Gettext setup and translation helpers
//!
//! ```ignore
//! use crate::i18n::{i18n, i18n_f};
//!
//! let title = i18n("Quit ProtonVPN");
//! let status = i18n_f("Connected to {}", &[&server.name]);
//! ```

use gettextrs::gettext;
use protonvpn_gui_core::UiText;

/// Text domain of the GUI catalogs
pub const GETTEXT_DOMAIN: &str = "protonvpn-gui";

/// Binds the text domain to the locale directory
///
/// Failures are logged; the UI then falls back to untranslated strings.
pub fn init() {
    gettextrs::setlocale(gettextrs::LocaleCategory::LcAll, "");

    let locale_dir = locale_dir();
    if let Err(e) = gettextrs::bindtextdomain(GETTEXT_DOMAIN, locale_dir.as_str()) {
        tracing::warn!(%e, %locale_dir, "Failed to bind text domain");
        return;
    }
    if let Err(e) = gettextrs::bind_textdomain_codeset(GETTEXT_DOMAIN, "UTF-8") {
        tracing::warn!(%e, "Failed to set text domain codeset");
    }
    if let Err(e) = gettextrs::textdomain(GETTEXT_DOMAIN) {
        tracing::warn!(%e, "Failed to select text domain");
    }
}

/// Locale directory, `LOCALEDIR` overriding the install locations
fn locale_dir() -> String {
    if let Ok(dir) = std::env::var("LOCALEDIR") {
        return dir;
    }

    if std::path::Path::new("/app/share/locale").exists() {
        return "/app/share/locale".to_string();
    }

    "/usr/share/locale".to_string()
}

/// Translates a string
#[inline]
pub fn i18n(msgid: &str) -> String {
    gettext(msgid)
}

/// Translates a string and fills `{}` placeholders left to right
pub fn i18n_f(msgid: &str, args: &[&str]) -> String {
    let mut result = gettext(msgid);
    for arg in args {
        if let Some(pos) = result.find("{}") {
            result.replace_range(pos..pos + 2, arg);
        }
    }
    result
}

/// Translates the template of `text`, then fills in its arguments
pub fn i18n_text(text: &UiText) -> String {
    let args: Vec<&str> = text.args().iter().map(String::as_str).collect();
    i18n_f(text.template(), &args)
}
