//! Configuration file support.
//!
//! Two configuration file locations are read:
//! - Global: `~/.apphost/config.toml` - User-wide defaults
//! - Project: `.apphost/config.toml` - Overrides for the current directory
//!
//! Project config takes precedence over global config.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Minimum supported toolchain major version.
pub const DEFAULT_MIN_MAJOR: u64 = 9;

/// AppHost builder configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Template host settings
    pub host: HostConfig,

    /// Toolchain settings
    pub toolchain: ToolchainConfig,

    /// Build command settings
    pub build: BuildConfig,

    /// Artifact discovery settings
    pub artifact: ArtifactConfig,
}

/// Template host settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Directory of the AppHost template project
    pub dir: Option<PathBuf>,
}

/// Toolchain settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainConfig {
    /// Program name or path of the .NET CLI
    pub program: PathBuf,

    /// Oldest supported major version
    pub min_major: u64,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        ToolchainConfig {
            program: PathBuf::from("dotnet"),
            min_major: DEFAULT_MIN_MAJOR,
        }
    }
}

/// Build command settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Toolchain verb (`publish` produces signed packages)
    pub command: String,

    /// Build configuration passed with `-c`
    pub configuration: String,

    /// Target framework passed with `-f`
    pub framework: Option<String>,

    /// Extra arguments appended verbatim
    pub extra_args: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            command: "publish".to_string(),
            configuration: "Release".to_string(),
            framework: None,
            extra_args: Vec::new(),
        }
    }
}

/// Artifact discovery settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Extension of the installable package
    pub extension: String,

    /// Substring marking a signed package
    pub signed_marker: String,

    /// Build output directory, relative to the workspace
    pub output_dir: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        ArtifactConfig {
            extension: "apk".to_string(),
            signed_marker: "-Signed".to_string(),
            output_dir: "bin".to_string(),
        }
    }
}

/// The on-disk shape of a config file: every field optional so a layer
/// only overrides what it names.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ConfigLayer {
    host: HostLayer,
    toolchain: ToolchainLayer,
    build: BuildLayer,
    artifact: ArtifactLayer,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct HostLayer {
    dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ToolchainLayer {
    program: Option<PathBuf>,
    min_major: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct BuildLayer {
    command: Option<String>,
    configuration: Option<String>,
    framework: Option<String>,
    extra_args: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ArtifactLayer {
    extension: Option<String>,
    signed_marker: Option<String>,
    output_dir: Option<String>,
}

impl ConfigLayer {
    fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }
}

impl Config {
    /// Apply a layer on top of this config (layer takes precedence).
    fn merge(&mut self, layer: ConfigLayer) {
        if let Some(dir) = layer.host.dir {
            self.host.dir = Some(dir);
        }
        if let Some(program) = layer.toolchain.program {
            self.toolchain.program = program;
        }
        if let Some(min_major) = layer.toolchain.min_major {
            self.toolchain.min_major = min_major;
        }
        if let Some(command) = layer.build.command {
            self.build.command = command;
        }
        if let Some(configuration) = layer.build.configuration {
            self.build.configuration = configuration;
        }
        if let Some(framework) = layer.build.framework {
            self.build.framework = Some(framework);
        }
        if let Some(extra_args) = layer.build.extra_args {
            self.build.extra_args = extra_args;
        }
        if let Some(extension) = layer.artifact.extension {
            self.artifact.extension = extension;
        }
        if let Some(signed_marker) = layer.artifact.signed_marker {
            self.artifact.signed_marker = signed_marker;
        }
        if let Some(output_dir) = layer.artifact.output_dir {
            self.artifact.output_dir = output_dir;
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.apphost/config.toml)
/// 2. Global config (~/.apphost/config.toml)
/// 3. Defaults
///
/// Unreadable files are reported and skipped.
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    for path in [global_path, project_path] {
        if !path.is_file() {
            continue;
        }
        match ConfigLayer::load(path) {
            Ok(layer) => {
                tracing::debug!("loaded config from {}", path.display());
                config.merge(layer);
            }
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {:#}", path.display(), e);
            }
        }
    }

    config
}

/// Get the global config directory (~/.apphost).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".apphost"))
}

/// Get the project config path (.apphost/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".apphost").join("config.toml")
}
