use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::harness::DEFAULT_ITERATIONS;

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub measure: MeasureConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("default CLI config to parse")
    }
}

impl CliConfig {
    pub fn merge(&mut self, other: &Self) {
        self.measure.merge(&other.measure);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasureConfig {
    pub iterations: u32,
}

impl MeasureConfig {
    fn merge(&mut self, other: &Self) {
        if other.iterations > 0 {
            self.iterations = other.iterations;
        }
    }
}

impl Default for MeasureConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

pub struct ConfigManager {
    path: PathBuf,
    config: CliConfig,
}

impl ConfigManager {
    pub fn load() -> Result<Self> {
        let path = default_config_path()?;
        Self::load_with_path(path)
    }

    pub fn load_with_path<P: Into<PathBuf>>(path: P) -> Result<Self> {
        let path = path.into();
        let mut config = CliConfig::default();

        if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("failed to read config at {}", path.display()))?;
            let user_config: CliConfig = toml::from_str(&contents)
                .with_context(|| format!("invalid config at {}", path.display()))?;
            config.merge(&user_config);
        }

        Ok(Self { path, config })
    }

    #[must_use]
    pub const fn config(&self) -> &CliConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut CliConfig {
        &mut self.config
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create config directory {}", parent.display())
            })?;
        }
        let toml = toml::to_string_pretty(&self.config)?;
        fs::write(&self.path, toml)
            .with_context(|| format!("failed to write config to {}", self.path.display()))?;
        Ok(())
    }
}

fn default_config_path() -> Result<PathBuf> {
    let base =
        dirs::config_dir().ok_or_else(|| anyhow!("unable to determine configuration directory"))?;
    Ok(base.join("benchpass").join("config.toml"))
}
