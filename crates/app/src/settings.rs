//! Handles settings for the application. Configuration is written in
//! `costbook.toml` and can be overridden with `COSTBOOK__SECTION__KEY`
//! environment variables.
use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Database::Sqlite("costbook.db".to_string())
    }
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
pub struct Holidays {
    /// Feed URL; without it the built-in calendar is kept.
    pub url: Option<String>,
    pub refresh_secs: u64,
    pub timeout_secs: u64,
}

impl Default for Holidays {
    fn default() -> Self {
        Self {
            url: None,
            refresh_secs: 86_400,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub database: Database,
    pub holidays: Holidays,
}

impl Settings {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        Self::build(Config::builder().add_source(File::with_name(path).required(false)))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .add_source(
                Environment::with_prefix("COSTBOOK")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }
}
