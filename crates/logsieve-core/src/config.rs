//! Configuration types for logsieve.
//!
//! [`Config::load`] reads `~/.config/logsieve/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. [`Config::defaults`] returns
//! the same defaults without touching the filesystem (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[output]
format        = "text"
show_source   = true
show_metadata = false

[filter]
level = "ALL"
since = ""
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration, loaded from `~/.config/logsieve/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub filter: FilterConfig,
}

/// How records are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `timestamp LEVEL [source] message`, one record per line.
    Text,
    /// A single pretty-printed JSON array.
    Json,
    /// One compact JSON object per line.
    Ndjson,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "ndjson" => Ok(OutputFormat::Ndjson),
            other => Err(format!("unknown output format: {other} (text|json|ndjson)")),
        }
    }
}

/// `[output]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_format")]
    pub format: OutputFormat,
    #[serde(default = "default_show_source")]
    pub show_source: bool,
    #[serde(default)]
    pub show_metadata: bool,
}

fn default_format() -> OutputFormat { OutputFormat::Text }
fn default_show_source() -> bool { true }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            show_source: default_show_source(),
            show_metadata: false,
        }
    }
}

/// `[filter]` section of `config.toml`. Values are kept as strings and
/// validated when the filter is built, so a bad value names itself.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// Relative range such as `30m`; empty means unbounded.
    #[serde(default)]
    pub since: String,
}

fn default_level() -> String { "ALL".to_string() }

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            since: String::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/logsieve/config.toml`, layered on top of the
    /// built-in defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Same as [`Config::load`] with an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let write = |path: &Path| -> std::io::Result<()> {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, DEFAULT_CONFIG.trim_start())
            };
            write(path).map_err(|source| Error::ConfigWrite {
                path: path.to_path_buf(),
                source,
            })?;
            tracing::debug!(path = %path.display(), "wrote default config");
        }

        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path).required(false))
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("logsieve")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
