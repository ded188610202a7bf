//! The AppHost template project.
//!
//! The template is read and copied, never modified. Its shape is fixed:
//!
//! ```text
//! <root>/
//!   <Name>.csproj                  exactly one project descriptor
//!   MainActivity.cs                redirect activity
//!   AndroidManifest.xml
//!   Resources/values/strings.xml
//!   Resources/drawable/
//!   AppHostApplications/           per-package workspaces (not part of the template)
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::BuildError;

/// Extension of the project descriptor.
pub const PROJECT_EXTENSION: &str = "csproj";

/// Activity source, relative to the root.
pub const ACTIVITY_FILE: &str = "MainActivity.cs";

/// Android manifest, relative to the root.
pub const MANIFEST_FILE: &str = "AndroidManifest.xml";

/// String resources, relative to the root.
pub const STRINGS_FILE: &str = "Resources/values/strings.xml";

/// Drawable resources directory, relative to the root.
pub const DRAWABLE_DIR: &str = "Resources/drawable";

/// Directory holding per-package workspaces, relative to the root.
pub const WORKSPACES_DIR: &str = "AppHostApplications";

/// Placeholder in the activity source replaced by the target package.
pub const PACKAGE_TOKEN: &str = "?package_name?";

/// Placeholder in the manifest replaced by the redirect package id.
pub const REDIRECT_PACKAGE_TOKEN: &str = "?redirect_package_name?";

/// Module name used as the default app label in the strings resource.
pub const MODULE_NAME: &str = "AndroidRedirect.AppHost";

/// Build output directories never copied out of the template.
pub const EXCLUDED_DIRS: &[&str] = &[WORKSPACES_DIR, "bin", "obj"];

/// A validated template root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRoot {
    root: PathBuf,
    project_file: PathBuf,
}

impl TemplateRoot {
    /// Open `root` as a template, requiring exactly one project descriptor.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, BuildError> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(BuildError::validation(format!(
                "host directory does not exist: {}",
                root.display()
            )));
        }

        let project_file = find_project_file(root)?;
        Ok(TemplateRoot {
            root: root.to_path_buf(),
            project_file,
        })
    }

    /// Search `start` and its ancestors for a template root.
    ///
    /// A directory qualifies when it holds exactly one project descriptor and
    /// an Android manifest. Returns `None` when nothing up the tree matches.
    pub fn discover(start: &Path) -> Option<Self> {
        let mut current = start.to_path_buf();
        loop {
            if current.join(MANIFEST_FILE).is_file() {
                if let Ok(template) = TemplateRoot::open(&current) {
                    return Some(template);
                }
            }
            if !current.pop() {
                return None;
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the project descriptor.
    pub fn project_file(&self) -> &Path {
        &self.project_file
    }

    /// Directory containing every per-package workspace.
    pub fn workspaces_dir(&self) -> PathBuf {
        self.root.join(WORKSPACES_DIR)
    }
}

/// Find the single project descriptor directly inside `dir`.
pub fn find_project_file(dir: &Path) -> Result<PathBuf, BuildError> {
    let entries = fs::read_dir(dir).map_err(|e| BuildError::io(dir, e))?;

    let mut projects = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| BuildError::io(dir, e))?.path();
        let is_project = path.is_file()
            && path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case(PROJECT_EXTENSION))
                .unwrap_or(false);
        if is_project {
            projects.push(path);
        }
    }

    match projects.len() {
        1 => Ok(projects.remove(0)),
        0 => Err(BuildError::validation_with_help(
            format!("no .{} project found in {}", PROJECT_EXTENSION, dir.display()),
            "Point --host at the AppHost project directory",
        )),
        n => {
            projects.sort();
            let names: Vec<String> = projects
                .iter()
                .filter_map(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .collect();
            Err(BuildError::validation(format!(
                "expected exactly one .{} project in {}, found {}: {}",
                PROJECT_EXTENSION,
                dir.display(),
                n,
                names.join(", ")
            )))
        }
    }
}
