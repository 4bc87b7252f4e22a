//! iconforge configuration file handling
//!
//! `iconforge.toml` carries the same settings as the `convert` command line:
//!
//! ```toml
//! [convert]
//! input = "svg"
//! output = "app/src/main/java/com/example/icons"
//! package = "com.example.icons"
//! generate_index = true
//! iconpack_name = "Icons"
//! max_commands = 300
//! clean = false
//! ```
//!
//! Flags given on the command line take precedence over the file.

use anyhow::{Context, Result};
use iconforge_codegen::DEFAULT_MAX_COMMANDS;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// File looked up in the working directory when `--config` is not given
pub const CONFIG_FILE: &str = "iconforge.toml";

static PACKAGE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z][a-z0-9_]*(\.[a-z][a-z0-9_]*)*$").expect("package pattern is valid")
});

static INVALID_PACKAGE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9_]").expect("package char pattern is valid"));

/// Root of `iconforge.toml`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct IconforgeConfig {
    #[serde(default)]
    pub convert: ConvertConfig,
}

/// Settings for `iconforge convert`
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ConvertConfig {
    /// Directory containing SVG files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
    /// Directory receiving generated Kotlin files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    /// Base Kotlin package
    #[serde(default = "default_package")]
    pub package: String,
    /// Also write the aggregate icon pack object
    #[serde(default)]
    pub generate_index: bool,
    #[serde(default = "default_iconpack_name")]
    pub iconpack_name: String,
    /// Paths longer than this are split into helper functions
    #[serde(default = "default_max_commands")]
    pub max_commands: usize,
    /// Empty the output directory before writing
    #[serde(default)]
    pub clean: bool,
}

fn default_package() -> String {
    "com.example.icons".to_string()
}

fn default_iconpack_name() -> String {
    "Icons".to_string()
}

fn default_max_commands() -> usize {
    DEFAULT_MAX_COMMANDS
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            package: default_package(),
            generate_index: false,
            iconpack_name: default_iconpack_name(),
            max_commands: default_max_commands(),
            clean: false,
        }
    }
}

impl IconforgeConfig {
    /// Config written by `iconforge init`
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            convert: ConvertConfig {
                input: Some(input.into()),
                output: Some(output.into()),
                ..ConvertConfig::default()
            },
        }
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config: IconforgeConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(config)
    }

    /// Load `iconforge.toml` from a directory if there is one
    pub fn load_from_dir(path: &Path) -> Result<Option<Self>> {
        let config_path = path.join(CONFIG_FILE);
        if !config_path.exists() {
            return Ok(None);
        }
        Self::load(&config_path).map(Some)
    }

    /// Serialize config to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize iconforge config")
    }
}

/// Normalize a package name to something Kotlin accepts.
///
/// Dashes become underscores, segments are lowercased and stripped of other characters,
/// digit-leading segments get a `pkg_` prefix and empty segments are dropped.
pub fn normalize_package_name(name: &str) -> String {
    let parts: Vec<String> = name
        .replace('-', "_")
        .split('.')
        .map(|part| {
            let part = INVALID_PACKAGE_CHARS
                .replace_all(&part.to_lowercase(), "")
                .into_owned();
            if part.starts_with(|c: char| !c.is_ascii_alphabetic()) {
                format!("pkg_{part}")
            } else {
                part
            }
        })
        .filter(|part| !part.is_empty())
        .collect();

    if parts.is_empty() {
        default_package()
    } else {
        parts.join(".")
    }
}

/// Normalize and validate a package name
pub fn validate_package_name(name: &str) -> Result<String> {
    let normalized = normalize_package_name(name);
    if !PACKAGE_NAME.is_match(&normalized) {
        anyhow::bail!(
            "Invalid package name: {} (normalized from {})",
            normalized,
            name
        );
    }
    Ok(normalized)
}
