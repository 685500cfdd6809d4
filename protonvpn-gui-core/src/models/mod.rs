//! Data structures shared by the backend and the view models

mod server;
mod server_list;

pub use server::{
    ActivationState, ActiveConnection, ConnectionStatus, Server, VpnKind, country_code,
};
pub use server_list::{CountryItem, OTHER_COUNTRY, ServerList};
