use crate::server::HandlerConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    server: Server,
    map: Map,
}

impl AppConfig {
    /// Built-in defaults, overridden by `config.toml`, `config_local.toml` and `TRACKER_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        defaults()?
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(
                config::Environment::with_prefix("TRACKER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn server(&self) -> &Server {
        &self.server
    }

    pub fn map(&self) -> &Map {
        &self.map
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5000)?
        .set_default("server.buffer_size", 4096)?
        .set_default("server.read_timeout", "30s")?
        .set_default("map.output_path", "device_location_map.html")?
        .set_default("map.zoom_start", 14)
}

#[derive(Debug, Deserialize)]
pub struct Server {
    host: String,
    port: u16,
    buffer_size: usize,
    #[serde(with = "humantime_serde")]
    read_timeout: Duration,
}

impl Server {
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn handler_config(&self) -> HandlerConfig {
        HandlerConfig {
            buffer_size: self.buffer_size,
            read_timeout: self.read_timeout,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Map {
    output_path: PathBuf,
    zoom_start: u8,
}

impl Map {
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn zoom_start(&self) -> u8 {
        self.zoom_start
    }
}
