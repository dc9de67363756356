//! Application settings, read from `grosz.toml`.

use config::{Config, ConfigError, File};
use serde::Deserialize;

/// Where the document store lives.
///
/// `database = "memory"` for an in-memory store, or
/// `database = { sqlite = "grosz.db" }` for a file-backed one.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("grosz"))
            .build()?;

        settings.try_deserialize()
    }
}
