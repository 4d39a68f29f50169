use std::env;
use std::net::SocketAddr;
use crate::core::TodoError;

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const BIND_ADDR: &str = "BIND_ADDR";
pub const DATABASE_MAX_CONNECTIONS: &str = "DATABASE_MAX_CONNECTIONS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://todos.db".to_string(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            max_connections: 5,
        }
    }
}

impl AppConfig {
    /// Reads `.env` if present, then the process environment. Unset
    /// variables keep their defaults.
    pub fn from_env() -> Result<Self, TodoError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, TodoError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup(DATABASE_URL) {
            config.database_url = url;
        }
        if let Some(addr) = lookup(BIND_ADDR) {
            config.bind_addr = addr
                .parse()
                .map_err(|e| TodoError::Config(format!("{BIND_ADDR}={addr}: {e}")))?;
        }
        if let Some(max) = lookup(DATABASE_MAX_CONNECTIONS) {
            config.max_connections = max
                .parse()
                .map_err(|e| TodoError::Config(format!("{DATABASE_MAX_CONNECTIONS}={max}: {e}")))?;
        }
        Ok(config)
    }
}
