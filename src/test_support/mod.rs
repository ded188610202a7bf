//! Test utilities and mocks for AppHost unit tests.
//!
//! Provides scripted stand-ins for the two seams the pipeline talks through:
//! the user ([`RecordingInteraction`]) and the toolchain ([`MockToolchain`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use apphost::test_support::{create_template, MockToolchain, RecordingInteraction};
//!
//! #[test]
//! fn test_example() {
//!     let toolchain = MockToolchain::succeeding(&["bin/Release/app-Signed.apk"]);
//!     let ui = RecordingInteraction::new().declining();
//!
//!     // Drive a BuildOrchestrator with them...
//! }
//! ```

pub mod fixtures;

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use semver::Version;

use crate::builder::artifact::ArtifactResult;
use crate::builder::toolchain::{check_minimum, parse_version, BuildLog, Toolchain};
use crate::core::error::BuildError;
use crate::ops::interact::{BusyToken, FileFilter, Interaction};
use crate::util::fs::list_files;

// Re-export fixtures for convenience
pub use fixtures::*;

/// One recorded call on a [`RecordingInteraction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Confirm { title: String, message: String },
    Notify { title: String, message: String },
    PickFile(String),
    ShowBusy(u64),
    HideBusy(u64),
    SaveOffer(PathBuf),
}

/// Scripted [`Interaction`] that records every call.
#[derive(Debug, Default)]
pub struct RecordingInteraction {
    decline: bool,
    save_to: Option<PathBuf>,
    pick: Option<PathBuf>,
    next_token: Cell<u64>,
    active: RefCell<BTreeSet<u64>>,
    events: RefCell<Vec<UiEvent>>,
}

impl RecordingInteraction {
    /// Confirms everything, saves nothing, picks nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer no to every confirmation.
    pub fn declining(mut self) -> Self {
        self.decline = true;
        self
    }

    /// Answer save offers with `path`.
    pub fn saving_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.save_to = Some(path.into());
        self
    }

    /// Answer file pickers with `path`.
    pub fn picking(mut self, path: impl Into<PathBuf>) -> Self {
        self.pick = Some(path.into());
        self
    }

    /// Number of busy indicators currently shown.
    pub fn busy_count(&self) -> usize {
        self.active.borrow().len()
    }

    pub fn events(&self) -> Vec<UiEvent> {
        self.events.borrow().clone()
    }

    /// Titles of every notification, in order.
    pub fn notifications(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                UiEvent::Notify { title, .. } => Some(title.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of confirmations asked.
    pub fn confirmations(&self) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|e| matches!(e, UiEvent::Confirm { .. }))
            .count()
    }

    /// Artifacts offered for saving.
    pub fn save_offers(&self) -> Vec<PathBuf> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                UiEvent::SaveOffer(path) => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: UiEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl Interaction for RecordingInteraction {
    fn confirm(&self, title: &str, message: &str) -> bool {
        self.record(UiEvent::Confirm {
            title: title.to_string(),
            message: message.to_string(),
        });
        !self.decline
    }

    fn notify(&self, title: &str, message: &str) {
        self.record(UiEvent::Notify {
            title: title.to_string(),
            message: message.to_string(),
        });
    }

    fn pick_file(&self, filter: &FileFilter) -> Option<PathBuf> {
        self.record(UiEvent::PickFile(filter.description.to_string()));
        self.pick.clone()
    }

    fn show_busy(&self, _message: &str) -> BusyToken {
        let id = self.next_token.get() + 1;
        self.next_token.set(id);
        self.active.borrow_mut().insert(id);
        self.record(UiEvent::ShowBusy(id));
        BusyToken(id)
    }

    fn hide_busy(&self, token: BusyToken) {
        self.active.borrow_mut().remove(&token.0);
        self.record(UiEvent::HideBusy(token.0));
    }

    fn choose_save_path(&self, artifact: &ArtifactResult) -> Option<PathBuf> {
        self.record(UiEvent::SaveOffer(artifact.path.clone()));
        self.save_to.clone()
    }
}

/// Scripted build behavior for [`MockToolchain`].
#[derive(Debug, Clone)]
pub enum MockBuild {
    /// Write these files (relative to the workspace) and succeed.
    Succeed { artifacts: Vec<String> },
    /// Exit unsuccessfully with this output.
    Fail { exit_code: i32, stderr: String },
}

/// [`Toolchain`] that never spawns anything.
#[derive(Debug)]
pub struct MockToolchain {
    version: String,
    min_major: u64,
    build: MockBuild,
    version_calls: Cell<usize>,
    build_calls: RefCell<Vec<PathBuf>>,
}

impl MockToolchain {
    /// Reports 9.0.100 and produces `artifacts`.
    pub fn succeeding(artifacts: &[&str]) -> Self {
        MockToolchain {
            version: "9.0.100".to_string(),
            min_major: 9,
            build: MockBuild::Succeed {
                artifacts: artifacts.iter().map(|a| a.to_string()).collect(),
            },
            version_calls: Cell::new(0),
            build_calls: RefCell::new(Vec::new()),
        }
    }

    /// Reports 9.0.100 and fails the build.
    pub fn failing(exit_code: i32, stderr: &str) -> Self {
        MockToolchain {
            build: MockBuild::Fail {
                exit_code,
                stderr: stderr.to_string(),
            },
            ..MockToolchain::succeeding(&[])
        }
    }

    /// Report `version` and require `min_major`.
    pub fn with_version(mut self, version: &str, min_major: u64) -> Self {
        self.version = version.to_string();
        self.min_major = min_major;
        self
    }

    pub fn version_calls(&self) -> usize {
        self.version_calls.get()
    }

    /// Workspace directories passed to `run_build`, in order.
    pub fn build_calls(&self) -> Vec<PathBuf> {
        self.build_calls.borrow().clone()
    }
}

impl Toolchain for MockToolchain {
    fn check_version(&self) -> Result<Version, BuildError> {
        self.version_calls.set(self.version_calls.get() + 1);
        let version = parse_version(&self.version)
            .ok_or_else(|| BuildError::validation(format!("bad version `{}`", self.version)))?;
        check_minimum(&version, self.min_major)?;
        Ok(version)
    }

    fn run_build(&self, workspace_dir: &Path, project_file: &Path) -> Result<BuildLog, BuildError> {
        self.build_calls
            .borrow_mut()
            .push(workspace_dir.to_path_buf());

        match &self.build {
            MockBuild::Succeed { artifacts } => {
                for rel in artifacts {
                    let path = workspace_dir.join(rel);
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
                    }
                    std::fs::write(&path, b"PK").map_err(|e| BuildError::io(&path, e))?;
                }
                Ok(BuildLog {
                    stdout: format!("Build succeeded: {}", project_file.display()),
                    stderr: String::new(),
                })
            }
            MockBuild::Fail { exit_code, stderr } => Err(BuildError::Process {
                command: format!("dotnet publish {}", project_file.display()),
                exit_code: Some(*exit_code),
                stderr: stderr.clone(),
            }),
        }
    }
}

/// Every file under `root` with its bytes, sorted by relative path.
pub fn snapshot_tree(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    list_files(root)
        .expect("failed to list tree")
        .into_iter()
        .map(|rel| {
            let bytes = std::fs::read(root.join(&rel)).expect("failed to read file");
            (rel, bytes)
        })
        .collect()
}
