//! Configuration for the Area focus tracker
//!
//! Loads configuration from TOML file at `~/.config/area/focus.toml`
//! Auto-generates default config file on first run if missing.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub focus: FocusConfig,
    pub screens: Vec<ScreenConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            focus: FocusConfig::default(),
            screens: vec![ScreenConfig::default()],
        }
    }
}

impl Config {
    /// Load configuration from the default location, or use defaults if the
    /// file doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_or_create(&Self::config_path()?)
    }

    /// Load `path`, writing a default config there first if it is missing
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("Config file not found at {:?}, using defaults", path);
            if let Err(e) = Self::save_default(path) {
                warn!("Failed to create default config file: {}", e);
            }
            return Ok(Self::default());
        }

        Self::load_from(path)
    }

    /// Load and validate configuration from `path`
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        config.validate()?;

        info!("Configuration loaded from {:?}", path);
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// Check screen and tag declarations for consistency
    pub fn validate(&self) -> Result<()> {
        if self.screens.is_empty() {
            bail!("At least one screen must be configured");
        }

        for (idx, screen) in self.screens.iter().enumerate() {
            let mut names = HashSet::new();
            for name in &screen.tags {
                if !names.insert(name.as_str()) {
                    bail!("Screen {}: duplicate tag name {:?}", idx, name);
                }
            }
            for name in &screen.selected {
                if !names.contains(name.as_str()) {
                    bail!("Screen {}: selected tag {:?} is not declared", idx, name);
                }
            }
        }

        Ok(())
    }

    /// Get the path to the config file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("area");

        Ok(config_dir.join("focus.toml"))
    }

    /// Save default configuration to file
    fn save_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml_string = toml::to_string_pretty(&Self::default())
            .context("Failed to serialize default config")?;

        fs::write(path, toml_string).context("Failed to write default config file")?;

        info!("Created default config file at {:?}", path);
        Ok(())
    }
}

/// Where a newly mapped client enters the focus history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Most recently used; the client takes focus
    #[default]
    Front,
    /// Least recently used; focus stays where it is
    Back,
}

/// Focus behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
    pub new_client_placement: Placement,
    /// Move focus to the most recent visible client after a tag switch
    pub refocus_on_tag_switch: bool,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            new_client_placement: Placement::Front,
            refocus_on_tag_switch: true,
        }
    }
}

/// Per-screen tag layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Tag names, in display order
    pub tags: Vec<String>,
    /// Tags selected at startup
    pub selected: Vec<String>,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            tags: (1..=9).map(|i| i.to_string()).collect(),
            selected: vec!["1".to_string()],
        }
    }
}
