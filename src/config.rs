//! Configuration file parsing (`qbx.toml`).
//!
//! One [`BuildConfig`] describes one build run. It is read once, validated
//! once, and never mutated by any pipeline stage.

use crate::error::BuildError;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Language standards accepted by `language_standard`.
pub const LANGUAGE_STANDARDS: &[&str] = &["c++11", "c++14", "c++17", "c++20"];

#[derive(Deserialize, Debug, Clone)]
pub struct BuildConfig {
    /// Root of the Qt toolkit installation (must contain bin/, include/, lib/).
    pub toolkit_path: PathBuf,
    #[serde(default = "default_project_path")]
    pub project_path: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_output_name")]
    pub output_name: String,
    #[serde(default = "default_language_standard")]
    pub language_standard: String,
    #[serde(default)]
    pub static_build: bool,
    #[serde(default)]
    pub pack_after_build: bool,
    /// Enabled toolkit modules; each contributes an include path and a link
    /// library.
    #[serde(default = "default_modules")]
    pub modules: Vec<String>,
    #[serde(default = "default_module_version")]
    pub module_version: u32,
    /// Linker subsystem selection (entry-point/windowing convention).
    #[serde(default = "default_subsystem")]
    pub subsystem: String,
    #[serde(default)]
    pub extra_lib_paths: Vec<PathBuf>,
    /// Compiler driver used for both compilation and linking.
    #[serde(default = "default_compiler")]
    pub compiler: String,
}

fn default_project_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./dist")
}

fn default_output_name() -> String {
    "myapp".to_string()
}

fn default_language_standard() -> String {
    "c++17".to_string()
}

fn default_modules() -> Vec<String> {
    vec!["Core".to_string(), "Gui".to_string(), "Widgets".to_string()]
}

fn default_module_version() -> u32 {
    6
}

fn default_subsystem() -> String {
    "windows".to_string()
}

fn default_compiler() -> String {
    "g++".to_string()
}

impl BuildConfig {
    /// Parse a configuration document and validate enumerated fields.
    pub fn parse(content: &str) -> Result<Self> {
        let config: BuildConfig = toml::from_str(content)
            .context("Failed to parse configuration - check for syntax errors")?;
        config.validate_fields()?;
        Ok(config)
    }

    fn validate_fields(&self) -> Result<(), BuildError> {
        if !LANGUAGE_STANDARDS.contains(&self.language_standard.as_str()) {
            return Err(BuildError::Configuration {
                message: format!(
                    "unknown language standard `{}` (expected one of: {})",
                    self.language_standard,
                    LANGUAGE_STANDARDS.join(", ")
                ),
            });
        }
        Ok(())
    }

    /// Path of the executable this configuration produces.
    pub fn executable_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.exe", self.output_name))
    }
}

/// Load a configuration document from disk.
pub fn load_config(path: &Path) -> Result<BuildConfig> {
    if !path.exists() {
        return Err(anyhow::anyhow!(
            "{} not found.\n\n\
            💡 Tip: Run 'qbx init' to create a default configuration.",
            path.display()
        ));
    }
    let config_str =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    BuildConfig::parse(&config_str)
}
