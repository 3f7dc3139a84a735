use std::env;
use std::net::SocketAddr;
use tracing::warn;

const DEFAULT_DATABASE_URL: &str = "sqlite://clinic.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_host: String,
    pub server_port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
            server_host: DEFAULT_HOST.to_string(),
            server_port: DEFAULT_PORT,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("DATABASE_URL not set, using default {}", DEFAULT_DATABASE_URL);
                    DEFAULT_DATABASE_URL.to_string()
                }),
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|value| {
                    value.parse().map_err(|_| {
                        warn!("SERVER_PORT {:?} is not a valid port, using default", value);
                    }).ok()
                })
                .unwrap_or(DEFAULT_PORT),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.database_url.is_empty() && self.database_max_connections > 0
    }

    /// Address the HTTP server binds to. Falls back to all interfaces when the
    /// configured host does not parse.
    pub fn bind_addr(&self) -> SocketAddr {
        format!("{}:{}", self.server_host, self.server_port)
            .parse()
            .unwrap_or_else(|_| {
                warn!("SERVER_HOST {:?} is not a valid address, binding to {}", self.server_host, DEFAULT_HOST);
                SocketAddr::from(([0, 0, 0, 0], self.server_port))
            })
    }
}
