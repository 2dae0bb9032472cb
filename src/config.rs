use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::database::connection::DEFAULT_STORE_PATH;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub cors_origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            cors_origin: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the JSON store file, or `:memory:`
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_STORE_PATH.to_string(),
        }
    }
}

/// Result-count caps for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    pub plans_default: usize,
    pub plans_max: usize,
    pub sales_default: usize,
    pub sales_max: usize,
    pub my_sales_max: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            plans_default: 30,
            plans_max: 200,
            sales_default: 200,
            sales_max: 2000,
            my_sales_max: 1000,
        }
    }
}

fn clamp(requested: Option<usize>, default: usize, max: usize) -> usize {
    requested.filter(|n| *n > 0).unwrap_or(default).min(max)
}

impl LimitsConfig {
    pub fn plans(&self, requested: Option<usize>) -> usize {
        clamp(requested, self.plans_default, self.plans_max)
    }

    pub fn sales(&self, requested: Option<usize>) -> usize {
        clamp(requested, self.sales_default, self.sales_max)
    }

    pub fn my_sales(&self, requested: Option<usize>) -> usize {
        clamp(requested, self.sales_default, self.my_sales_max)
    }
}

impl AppConfig {
    /// Load from a TOML file; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
