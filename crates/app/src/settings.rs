//! Handles settings for the application.
//!
//! Settings are read from `settings.toml` (or the file passed with
//! `--settings`) and overridden by `EXPENSE_TRACKER__<SECTION>__<KEY>`
//! environment variables. Every key has a default.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
    pub log_format: LogFormat,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Database {
    pub fn url(&self) -> String {
        match self {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Cors {
    pub allowed_origins: Vec<String>,
}

impl Default for Cors {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    pub database: Database,
    /// Attempts to reach the store at startup before giving up.
    pub connect_attempts: u32,
    pub log_bodies: bool,
    pub request_timeout_secs: u64,
    pub cors: Cors,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
            database: Database::Sqlite("expense_tracker.db".to_string()),
            connect_attempts: 5,
            log_bodies: false,
            request_timeout_secs: 30,
            cors: Cors::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub auth: server::AuthSettings,
}

impl Settings {
    pub fn new(path: Option<&str>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::with_name(path),
            None => File::with_name("settings").required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(environment())
            .build()?
            .try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("EXPENSE_TRACKER")
        .prefix_separator("__")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("server.cors.allowed_origins")
        .try_parsing(true)
}

/// Parses settings from a TOML string. Used by tests.
#[cfg(test)]
fn from_toml(toml: &str, env: config::Map<String, String>) -> Result<Settings, ConfigError> {
    Config::builder()
        .add_source(File::from_str(toml, config::FileFormat::Toml))
        .add_source(environment().source(Some(env)))
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let settings = from_toml("", config::Map::new()).unwrap();
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.app.log_format, LogFormat::Text);
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.server.cors.allowed_origins, vec!["*"]);
        assert!(settings.auth.hs256_secret.is_none());
    }

    #[test]
    fn sections_are_read() {
        let toml = r#"
            [app]
            level = "debug"
            log_format = "json"

            [server]
            port = 8080
            database = "memory"
            log_bodies = true

            [server.cors]
            allowed_origins = ["https://app.example.com"]

            [auth]
            tenant_id = "contoso"
            client_id = "api"
            hs256_secret = "secret"
        "#;
        let settings = from_toml(toml, config::Map::new()).unwrap();
        assert_eq!(settings.app.log_format, LogFormat::Json);
        assert_eq!(settings.server.database, Database::Memory);
        assert!(settings.server.log_bodies);
        assert_eq!(
            settings.server.cors.allowed_origins,
            vec!["https://app.example.com"]
        );
        assert_eq!(settings.auth.tenant_id.as_deref(), Some("contoso"));
    }

    #[test]
    fn sqlite_database_path() {
        let toml = r#"
            [server]
            database = { sqlite = "data/expenses.db" }
        "#;
        let settings = from_toml(toml, config::Map::new()).unwrap();
        assert_eq!(settings.server.database.url(), "sqlite:data/expenses.db?mode=rwc");
        assert_eq!(Database::Memory.url(), "sqlite::memory:");
    }

    #[test]
    fn environment_overrides_file() {
        let mut env = config::Map::new();
        env.insert("EXPENSE_TRACKER__SERVER__PORT".to_string(), "9090".to_string());
        env.insert(
            "EXPENSE_TRACKER__SERVER__CORS__ALLOWED_ORIGINS".to_string(),
            "https://a.example.com,https://b.example.com".to_string(),
        );

        let settings = from_toml("[server]\nport = 8080\n", env).unwrap();
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.server.cors.allowed_origins.len(), 2);
    }
}
