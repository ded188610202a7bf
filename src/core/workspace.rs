//! Per-package build workspace.

use std::path::{Path, PathBuf};

use crate::core::template::{
    TemplateRoot, ACTIVITY_FILE, DRAWABLE_DIR, MANIFEST_FILE, STRINGS_FILE,
};

/// Prefix of every workspace directory name.
pub const WORKSPACE_PREFIX: &str = "AppHost_";

/// A disposable copy of the template, specialized for one package.
///
/// There is exactly one workspace path per package name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildWorkspace {
    root: PathBuf,
    package_name: String,
}

impl BuildWorkspace {
    /// The workspace belonging to `package_name` under `template`.
    pub fn for_package(template: &TemplateRoot, package_name: &str) -> Self {
        BuildWorkspace {
            root: workspace_dir(template, package_name),
            package_name: package_name.to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    pub fn exists(&self) -> bool {
        self.root.exists()
    }

    pub fn activity_file(&self) -> PathBuf {
        self.root.join(ACTIVITY_FILE)
    }

    pub fn manifest_file(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    pub fn strings_file(&self) -> PathBuf {
        self.root.join(STRINGS_FILE)
    }

    pub fn drawable_dir(&self) -> PathBuf {
        self.root.join(DRAWABLE_DIR)
    }
}

/// `<template>/AppHostApplications/AppHost_<package>`
pub fn workspace_dir(template: &TemplateRoot, package_name: &str) -> PathBuf {
    template
        .workspaces_dir()
        .join(format!("{}{}", WORKSPACE_PREFIX, package_name))
}
