//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{
    CONFIG_DIR_NAME, DEFAULT_DISPLAY_HEIGHT, DEFAULT_DISPLAY_WIDTH, DEFAULT_HTTP_PORT,
};
use crate::layout::{LayoutOptions, DEFAULT_STOP_SENTINEL, LABEL_PADDING};
use crate::render::resources::font_by_name;

/// Where rendered frames are delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// PNG files (primary, accent and a composite preview)
    #[default]
    Png,
    /// Packed 1bpp device buffers
    Buffer,
}

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathConfig {
    /// Directory holding the mapping CSV files
    pub sources_dir: PathBuf,
    /// Directory the display sink writes to
    pub output_dir: PathBuf,
}

impl Default for PathConfig {
    fn default() -> Self {
        let base = Config::config_dir().unwrap_or_else(|_| PathBuf::from(".quadmap"));
        Self {
            sources_dir: base.join("sources"),
            output_dir: base.join("output"),
        }
    }
}

/// Physical display configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Sink implementation
    #[serde(default)]
    pub sink: SinkKind,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_DISPLAY_WIDTH,
            height: DEFAULT_DISPLAY_HEIGHT,
            sink: SinkKind::default(),
        }
    }
}

/// Rendering configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Label (case-insensitive) that ends the mapping section of a table
    #[serde(default = "default_stop_sentinel")]
    pub stop_sentinel: String,
    /// Font for labels and glyph text
    #[serde(default = "default_body_font")]
    pub body_font: String,
    /// Font for the start-up screen
    #[serde(default = "default_title_font")]
    pub title_font: String,
    /// Airflow arrow image (pointing left to right); built-in arrow if unset
    #[serde(default)]
    pub icon: Option<PathBuf>,
    /// Start-up logo image
    #[serde(default)]
    pub logo: Option<PathBuf>,
}

fn default_stop_sentinel() -> String {
    DEFAULT_STOP_SENTINEL.to_string()
}

fn default_body_font() -> String {
    "9x18_bold".to_string()
}

fn default_title_font() -> String {
    "10x20".to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            stop_sentinel: default_stop_sentinel(),
            body_font: default_body_font(),
            title_font: default_title_font(),
            icon: None,
            logo: None,
        }
    }
}

impl RenderConfig {
    /// Layout options matching this configuration.
    #[must_use]
    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            stop_sentinel: self.stop_sentinel.clone(),
            label_padding: LABEL_PADDING,
        }
    }
}

/// HTTP control plane configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_HTTP_PORT,
        }
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/Quadmap/config.toml`
/// - macOS: `~/Library/Application Support/Quadmap/config.toml`
/// - Windows: `%APPDATA%\Quadmap\config.toml`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// File system paths
    #[serde(default)]
    pub paths: PathConfig,
    /// Display geometry and sink
    #[serde(default)]
    pub display: DisplayConfig,
    /// Rendering settings
    #[serde(default)]
    pub render: RenderConfig,
    /// Control plane settings
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the platform-specific config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(CONFIG_DIR_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the platform config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_file_path()?;

        if !config_path.exists() {
            return Ok(Self::new());
        }

        Self::load_from(&config_path)
    }

    /// Loads and validates configuration from `path`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .context(format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context(format!(
                "Failed to create config directory: {}",
                parent.display()
            ))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .context(format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.display.width == 0 || self.display.height == 0 {
            anyhow::bail!(
                "Display size must be positive, got {}x{}",
                self.display.width,
                self.display.height
            );
        }

        if self.render.stop_sentinel.trim().is_empty() {
            anyhow::bail!("Stop sentinel cannot be empty");
        }

        for font in [&self.render.body_font, &self.render.title_font] {
            if font_by_name(font).is_none() {
                anyhow::bail!("Unknown font '{font}'");
            }
        }

        Ok(())
    }
}
