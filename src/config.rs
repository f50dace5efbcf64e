use std::path::Path;

use serde::Deserialize;

use crate::Error;

pub const DEFAULT_LOG_FILTER: &str = "info";

/// Optional TOML settings of the command line tool. Flags win over the file.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// `tracing_subscriber::EnvFilter` directive, `RUST_LOG` overrides it
    pub log_filter: Option<String>,
    /// Store the routing graph in snapshots, on unless set to false
    pub save_graph: Option<bool>,
}

impl AppConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, Error> {
        Ok(toml::from_str(text)?)
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }

    pub fn save_graph(&self) -> bool {
        self.save_graph.unwrap_or(true)
    }
}
