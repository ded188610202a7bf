//! Locating the installable package produced by a build.

use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::Serialize;

use crate::core::error::BuildError;
use crate::util::config::ArtifactConfig;
use crate::util::fs::glob_files;

/// A built package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactResult {
    pub path: PathBuf,
    pub signed: bool,
}

impl ArtifactResult {
    /// File name of the artifact.
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}

/// Searches a workspace's build output for the package.
///
/// Candidates are ordered by full path. The first signed candidate wins;
/// otherwise the first candidate.
#[derive(Debug, Clone)]
pub struct ArtifactLocator {
    extension: String,
    signed_marker: String,
    output_dir: String,
}

impl Default for ArtifactLocator {
    fn default() -> Self {
        ArtifactLocator::from_config(&ArtifactConfig::default())
    }
}

impl ArtifactLocator {
    pub fn from_config(config: &ArtifactConfig) -> Self {
        ArtifactLocator {
            extension: config.extension.trim_start_matches('.').to_string(),
            signed_marker: config.signed_marker.clone(),
            output_dir: config.output_dir.clone(),
        }
    }

    /// Every candidate under the workspace's output tree, sorted by path.
    pub fn candidates(&self, workspace_dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
        let pattern = format!(
            "{}/**/*.{}",
            Pattern::escape(&self.output_dir),
            Pattern::escape(&self.extension)
        );
        Ok(glob_files(workspace_dir, &[pattern])?)
    }

    /// Find the preferred artifact in `workspace_dir`.
    pub fn find(&self, workspace_dir: &Path) -> Result<ArtifactResult, BuildError> {
        let candidates = self.candidates(workspace_dir)?;
        tracing::debug!("found {} artifact candidate(s)", candidates.len());

        let is_signed = |path: &Path| {
            path.file_name()
                .map(|n| n.to_string_lossy().contains(&self.signed_marker))
                .unwrap_or(false)
        };

        if let Some(path) = candidates.iter().find(|p| is_signed(p.as_path())) {
            return Ok(ArtifactResult {
                path: path.clone(),
                signed: true,
            });
        }

        candidates
            .into_iter()
            .next()
            .map(|path| ArtifactResult {
                path,
                signed: false,
            })
            .ok_or_else(|| {
                BuildError::not_found(format!(
                    "no .{} found under {}",
                    self.extension,
                    workspace_dir.join(&self.output_dir).display()
                ))
            })
    }
}

/// Find the artifact in `workspace_dir` with default settings.
pub fn find_artifact(workspace_dir: &Path) -> Result<ArtifactResult, BuildError> {
    ArtifactLocator::default().find(workspace_dir)
}
