//! Global context for AppHost operations.
//!
//! Provides centralized access to configuration, paths, and environment.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::error::BuildError;
use crate::core::template::TemplateRoot;
use crate::util::config::{global_config_dir, load_config, project_config_path, Config};

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global AppHost data (~/.apphost/)
    home: PathBuf,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;
        let home = global_config_dir().unwrap_or_else(|| PathBuf::from(".apphost"));

        Ok(GlobalContext {
            cwd,
            home,
        })
    }

    /// Create a GlobalContext with a specific working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    /// Use a different home directory.
    pub fn with_home(mut self, home: PathBuf) -> Self {
        self.home = home;
        self
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the AppHost home directory (~/.apphost/).
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// Get the project configuration file path.
    pub fn project_config_path(&self) -> PathBuf {
        project_config_path(&self.cwd)
    }

    /// Load global and project configuration.
    pub fn load_config(&self) -> Config {
        load_config(&self.config_path(), &self.project_config_path())
    }

    /// Resolve the template root once for this session.
    ///
    /// Order: explicit directory, configured `host.dir`, then an upward
    /// search from the working directory. No match means no host was
    /// selected, which cancels the build.
    pub fn resolve_template(
        &self,
        explicit: Option<&Path>,
        config: &Config,
    ) -> Result<TemplateRoot, BuildError> {
        let chosen = explicit.or(config.host.dir.as_deref());

        if let Some(dir) = chosen {
            let dir = if dir.is_absolute() {
                dir.to_path_buf()
            } else {
                self.cwd.join(dir)
            };
            return TemplateRoot::open(dir);
        }

        TemplateRoot::discover(&self.cwd).ok_or_else(|| {
            BuildError::cancelled(format!(
                "no AppHost host directory selected (searched upward from {})",
                self.cwd.display()
            ))
        })
    }
}
