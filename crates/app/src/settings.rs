//! Handles settings for the application. Configuration is read from an
//! optional `settings.toml` and from `TABSPLIT__*` environment variables.
//!
//! See `settings.example.toml` for the available keys.
use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use engine::ResiduePolicy;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "settings";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
    pub residue_policy: ResiduePolicy,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            residue_policy: ResiduePolicy::FirstPerson,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
    pub static_dir: String,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 3000,
            static_dir: "public".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Storage {
    pub path: String,
}

impl Default for Storage {
    fn default() -> Self {
        Self {
            path: "data/bills.json".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub storage: Storage,
}

impl Settings {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        Self::load(Config::builder().add_source(File::with_name(path).required(false)))
    }

    fn load(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .add_source(Environment::with_prefix("TABSPLIT").separator("__"))
            .build()?
            .try_deserialize()
    }
}
