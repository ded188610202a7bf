//! Implementation of `apphost build`.
//!
//! The pipeline runs strictly in order and stops at the first failing stage:
//!
//! ```text
//! Idle -> ValidatingToolchain -> Staging -> Substituting -> InstallingIcons
//!      -> Building -> LocatingArtifact -> Done
//! ```
//!
//! A busy indicator is up from the first stage until `Done`, and exactly one
//! terminal notification is shown per run.

use std::cell::Cell;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::builder::artifact::{ArtifactLocator, ArtifactResult};
use crate::builder::icons::{install_icons, load_mask, render_adaptive_layers};
use crate::builder::stage::stage;
use crate::builder::substitute::{apply_all, substitutions_for};
use crate::builder::toolchain::Toolchain;
use crate::core::color::ColorPair;
use crate::core::error::{BuildError, ErrorKind};
use crate::core::request::BuildRequest;
use crate::core::template::{find_project_file, TemplateRoot};
use crate::core::workspace::BuildWorkspace;
use crate::ops::interact::{BusyGuard, FileFilter, Interaction};
use crate::util::config::Config;
use crate::util::context::GlobalContext;

/// A pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildStage {
    ValidatingToolchain,
    Staging,
    Substituting,
    InstallingIcons,
    Building,
    LocatingArtifact,
}

impl BuildStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildStage::ValidatingToolchain => "validating toolchain",
            BuildStage::Staging => "staging",
            BuildStage::Substituting => "substituting",
            BuildStage::InstallingIcons => "installing icons",
            BuildStage::Building => "building",
            BuildStage::LocatingArtifact => "locating artifact",
        }
    }
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the orchestrator is in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Idle,
    Running(BuildStage),
    Done { success: bool },
}

/// Terminal result of one pipeline run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum BuildOutcome {
    Success {
        workspace: PathBuf,
        toolchain_version: String,
        /// `None` when the build passed but produced no package
        artifact: Option<ArtifactResult>,
        /// Where the artifact was saved, if the user chose to
        saved_to: Option<PathBuf>,
    },
    Failure {
        stage: BuildStage,
        kind: ErrorKind,
        message: String,
    },
}

impl BuildOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, BuildOutcome::Success { .. })
    }

    pub fn artifact(&self) -> Option<&ArtifactResult> {
        match self {
            BuildOutcome::Success { artifact, .. } => artifact.as_ref(),
            BuildOutcome::Failure { .. } => None,
        }
    }
}

/// A stage error tagged with the stage it came from.
struct StageFailure {
    stage: BuildStage,
    error: BuildError,
}

struct Completed {
    workspace: BuildWorkspace,
    toolchain_version: String,
    artifact: Option<ArtifactResult>,
}

/// Drives one build request through the pipeline.
pub struct BuildOrchestrator<'a> {
    template: &'a TemplateRoot,
    toolchain: &'a dyn Toolchain,
    ui: &'a dyn Interaction,
    locator: ArtifactLocator,
    state: Cell<BuildState>,
}

impl<'a> BuildOrchestrator<'a> {
    pub fn new(
        template: &'a TemplateRoot,
        toolchain: &'a dyn Toolchain,
        ui: &'a dyn Interaction,
    ) -> Self {
        BuildOrchestrator {
            template,
            toolchain,
            ui,
            locator: ArtifactLocator::default(),
            state: Cell::new(BuildState::Idle),
        }
    }

    /// Use a differently configured artifact locator.
    pub fn with_locator(mut self, locator: ArtifactLocator) -> Self {
        self.locator = locator;
        self
    }

    pub fn state(&self) -> BuildState {
        self.state.get()
    }

    /// Run the whole pipeline for `request`.
    pub fn run(&self, request: &BuildRequest) -> BuildOutcome {
        tracing::info!(
            "building redirect app `{}` ({}) for {}",
            request.app_name,
            request.package_name,
            self.template.root().display()
        );

        let result = {
            let _busy = BusyGuard::show(
                self.ui,
                &format!("Building {} ({})", request.app_name, request.package_name),
            );
            self.execute(request)
        };

        let mut outcome = match result {
            Ok(done) => BuildOutcome::Success {
                workspace: done.workspace.root().to_path_buf(),
                toolchain_version: done.toolchain_version,
                artifact: done.artifact,
                saved_to: None,
            },
            Err(StageFailure { stage, error }) => {
                tracing::debug!("{} failed: {:?}", stage, error);
                BuildOutcome::Failure {
                    stage,
                    kind: error.kind(),
                    message: error.to_string(),
                }
            }
        };

        self.state.set(BuildState::Done {
            success: outcome.is_success(),
        });
        self.notify_outcome(request, &outcome);

        if let BuildOutcome::Success {
            artifact: Some(ref artifact),
            ref mut saved_to,
            ..
        } = outcome
        {
            *saved_to = self.offer_save(artifact);
        }

        outcome
    }

    fn enter(&self, stage: BuildStage) {
        tracing::info!("{}", stage);
        self.state.set(BuildState::Running(stage));
    }

    fn execute(&self, request: &BuildRequest) -> Result<Completed, StageFailure> {
        let at = |stage: BuildStage| move |error: BuildError| StageFailure { stage, error };

        self.enter(BuildStage::ValidatingToolchain);
        request
            .validate()
            .map_err(at(BuildStage::ValidatingToolchain))?;
        let version = self
            .toolchain
            .check_version()
            .map_err(at(BuildStage::ValidatingToolchain))?;

        self.enter(BuildStage::Staging);
        let ws = stage(self.template, &request.package_name, |existing| {
            self.ui.confirm(
                "Overwrite Existing Build",
                &format!(
                    "A workspace for `{}` already exists at {}.\nDelete it and start over?",
                    existing.package_name(),
                    existing.root().display()
                ),
            )
        })
        .map_err(at(BuildStage::Staging))?;

        self.enter(BuildStage::Substituting);
        apply_all(&substitutions_for(&ws, request)).map_err(at(BuildStage::Substituting))?;

        self.enter(BuildStage::InstallingIcons);
        self.install_icons(&ws, request)
            .map_err(at(BuildStage::InstallingIcons))?;

        self.enter(BuildStage::Building);
        let project = find_project_file(ws.root()).map_err(at(BuildStage::Building))?;
        self.toolchain
            .run_build(ws.root(), &project)
            .map_err(at(BuildStage::Building))?;

        self.enter(BuildStage::LocatingArtifact);
        let artifact = match self.locator.find(ws.root()) {
            Ok(artifact) => Some(artifact),
            Err(BuildError::NotFound { message }) => {
                tracing::warn!("{}", message);
                None
            }
            Err(e) => return Err(at(BuildStage::LocatingArtifact)(e)),
        };

        Ok(Completed {
            workspace: ws,
            toolchain_version: version.to_string(),
            artifact,
        })
    }

    fn install_icons(&self, ws: &BuildWorkspace, request: &BuildRequest) -> Result<(), BuildError> {
        let installed = install_icons(
            ws,
            request.foreground_image.as_deref(),
            request.background_image.as_deref(),
            request.monochrome_image.as_deref(),
        )?;
        tracing::debug!("installed {} icon file(s)", installed.len());

        let mask_path = request
            .monochrome_image
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty());
        if let (Some(mask_path), Some(accent)) = (mask_path, request.accent) {
            let colors = ColorPair::from_accent(accent);
            let layers = render_adaptive_layers(&load_mask(mask_path)?, colors);
            layers.write_layers(&ws.drawable_dir())?;
            tracing::debug!(
                "rendered adaptive layers with {} on {}",
                colors.foreground,
                colors.background
            );
        }

        Ok(())
    }

    fn notify_outcome(&self, request: &BuildRequest, outcome: &BuildOutcome) {
        match outcome {
            BuildOutcome::Success {
                artifact: Some(artifact),
                ..
            } => self.ui.notify(
                "Build Succeeded",
                &format!(
                    "Built {} ({})\n{}{}",
                    request.app_name,
                    request.package_name,
                    artifact.path.display(),
                    if artifact.signed { "" } else { " (unsigned)" }
                ),
            ),
            BuildOutcome::Success {
                artifact: None,
                workspace,
                ..
            } => self.ui.notify(
                "Artifact Missing",
                &format!(
                    "The build finished but no package was found under {}",
                    workspace.display()
                ),
            ),
            BuildOutcome::Failure {
                kind: ErrorKind::UserCancelled,
                message,
                ..
            } => self.ui.notify("Build Cancelled", message),
            BuildOutcome::Failure { stage, message, .. } => self
                .ui
                .notify("Build Failed", &format!("Failed while {}:\n{}", stage, message)),
        }
    }

    /// Offer the artifact for saving. Never fails the build.
    fn offer_save(&self, artifact: &ArtifactResult) -> Option<PathBuf> {
        let dest = self.ui.choose_save_path(artifact)?;
        match save_artifact(artifact, &dest) {
            Ok(saved) => {
                tracing::info!("saved artifact to {}", saved.display());
                Some(saved)
            }
            Err(e) => {
                tracing::warn!("failed to save artifact: {}", e);
                self.ui.notify("Save Failed", &e.to_string());
                None
            }
        }
    }
}

/// Copy `artifact` to `dest`; a directory destination keeps the file name.
pub fn save_artifact(artifact: &ArtifactResult, dest: &Path) -> Result<PathBuf, BuildError> {
    let target = if dest.is_dir() {
        match artifact.path.file_name() {
            Some(name) => dest.join(name),
            None => dest.to_path_buf(),
        }
    } else {
        dest.to_path_buf()
    };

    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
    }
    fs::copy(&artifact.path, &target).map_err(|e| BuildError::io(&target, e))?;
    Ok(target)
}

/// Resolve the template root for a session, asking the user to pick the
/// project when nothing was configured or found.
pub fn select_template(
    ctx: &GlobalContext,
    explicit: Option<&Path>,
    config: &Config,
    ui: &dyn Interaction,
) -> Result<TemplateRoot, BuildError> {
    match ctx.resolve_template(explicit, config) {
        Err(BuildError::Cancelled { reason }) => {
            tracing::debug!("{}", reason);
            let picked = ui
                .pick_file(&FileFilter::PROJECT)
                .ok_or_else(|| BuildError::cancelled(reason))?;
            if !FileFilter::PROJECT.matches(&picked) {
                return Err(BuildError::validation(format!(
                    "not an AppHost project: {}",
                    picked.display()
                )));
            }
            let dir = picked
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| ctx.cwd());
            TemplateRoot::open(dir)
        }
        other => other,
    }
}
