/// Configuration management for media-service
///
/// Loads configuration from environment variables with sensible defaults.
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub log: LogConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub env: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// Apply pending migrations on startup
    pub run_migrations: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LogConfig {
    /// Emit JSON lines instead of the human readable format
    pub json: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Config {
            app: AppConfig {
                host: lookup("MEDIA_SERVICE_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: lookup("MEDIA_SERVICE_PORT")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(3000),
                env: lookup("APP_ENV").unwrap_or_else(|| "development".to_string()),
            },
            database: DatabaseConfig {
                url: lookup("DATABASE_URL")
                    .unwrap_or_else(|| "postgresql://localhost/media_studio".to_string()),
                max_connections: lookup("DATABASE_MAX_CONNECTIONS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
                run_migrations: lookup("RUN_MIGRATIONS")
                    .map(|v| parse_flag(&v))
                    .unwrap_or(true),
            },
            log: LogConfig {
                json: lookup("LOG_FORMAT")
                    .map(|v| v.eq_ignore_ascii_case("json"))
                    .unwrap_or(false),
            },
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.app.host, self.app.port)
    }

    pub fn is_production(&self) -> bool {
        self.app.env.eq_ignore_ascii_case("production")
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
