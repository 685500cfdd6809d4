//! Servers grouped by exit country

use uuid::Uuid;

use super::server::Server;

/// Label used for servers without a recognisable country
pub const OTHER_COUNTRY: &str = "Other";

/// All servers of one country
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryItem {
    /// ISO country code, `None` for the catch-all group
    pub code: Option<String>,
    /// Servers sorted by name
    pub servers: Vec<Server>,
}

impl CountryItem {
    /// Heading shown in the server list
    #[must_use]
    pub fn label(&self) -> &str {
        self.code.as_deref().unwrap_or(OTHER_COUNTRY)
    }
}

/// Server list as presented by the dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerList {
    countries: Vec<CountryItem>,
}

impl ServerList {
    /// Groups servers by country; countries sorted by code, "other" last
    #[must_use]
    pub fn from_servers(servers: Vec<Server>) -> Self {
        let mut countries: Vec<CountryItem> = Vec::new();
        for server in servers {
            match countries.iter_mut().find(|c| c.code == server.country) {
                Some(item) => item.servers.push(server),
                None => countries.push(CountryItem {
                    code: server.country.clone(),
                    servers: vec![server],
                }),
            }
        }

        for item in &mut countries {
            item.servers.sort_by(|a, b| a.name.cmp(&b.name));
        }
        // `None` sorts first for Option, so compare on (is_none, code)
        countries.sort_by(|a, b| {
            (a.code.is_none(), &a.code).cmp(&(b.code.is_none(), &b.code))
        });

        Self { countries }
    }

    /// Country groups in display order
    #[must_use]
    pub fn countries(&self) -> &[CountryItem] {
        &self.countries
    }

    /// Total number of servers
    #[must_use]
    pub fn len(&self) -> usize {
        self.countries.iter().map(|c| c.servers.len()).sum()
    }

    /// Returns true when no servers are known
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Finds a server by profile UUID
    #[must_use]
    pub fn find(&self, id: Uuid) -> Option<&Server> {
        self.iter().find(|s| s.id == id)
    }

    /// Iterates servers in display order
    pub fn iter(&self) -> impl Iterator<Item = &Server> {
        self.countries.iter().flat_map(|c| c.servers.iter())
    }
}
