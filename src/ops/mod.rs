//! High-level operations.
//!
//! This module contains the implementation of AppHost commands.

pub mod apphost_build;
pub mod apphost_icon;
pub mod interact;

pub use apphost_build::{
    save_artifact, select_template, BuildOrchestrator, BuildOutcome, BuildStage, BuildState,
};
pub use apphost_icon::{render_icon, IconOptions, IconResult};
pub use interact::{BusyGuard, BusyToken, FileFilter, Interaction};
