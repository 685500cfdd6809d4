//! Dialogs shown by the application shell

mod about;
mod confirm;
mod message;

pub use about::show_about_dialog;
pub use confirm::present_confirmation;
pub use message::MessageDialog;
