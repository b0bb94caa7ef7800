use std::env;

const DEFAULT_DATABASE_URL: &str = "sqlite://hr.db?mode=rwc";
const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    pub max_connections: u32,
}

impl Settings {
    /// Reads settings from the environment (and `.env`, once `dotenv` has run).
    pub fn from_env() -> Self {
        let max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                log::warn!("Ignoring invalid DATABASE_MAX_CONNECTIONS={:?}", raw);
                DEFAULT_MAX_CONNECTIONS
            }),
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        Settings {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string()),
            max_connections,
        }
    }
}
