//! Staging the template into a per-package workspace.

use crate::core::error::BuildError;
use crate::core::template::{find_project_file, TemplateRoot, EXCLUDED_DIRS};
use crate::core::workspace::BuildWorkspace;
use crate::util::fs::{copy_tree, remove_dir_all_if_exists};

/// Copy the template into the workspace for `package_name`.
///
/// An existing workspace is only replaced when `confirm_overwrite` agrees;
/// declining leaves it untouched and yields [`BuildError::Cancelled`]. The
/// old tree is removed completely before anything is copied.
pub fn stage<F>(
    template: &TemplateRoot,
    package_name: &str,
    confirm_overwrite: F,
) -> Result<BuildWorkspace, BuildError>
where
    F: FnOnce(&BuildWorkspace) -> bool,
{
    // The template may have changed since it was opened.
    find_project_file(template.root())?;

    let ws = BuildWorkspace::for_package(template, package_name);

    if ws.exists() {
        if !confirm_overwrite(&ws) {
            tracing::info!("kept existing workspace {}", ws.root().display());
            return Err(BuildError::cancelled(format!(
                "kept existing workspace for `{}`",
                package_name
            )));
        }

        tracing::info!("removing existing workspace {}", ws.root().display());
        remove_dir_all_if_exists(ws.root()).map_err(|e| BuildError::Io {
            message: format!("{:#}", e),
        })?;
    }

    let copied = copy_tree(template.root(), ws.root(), EXCLUDED_DIRS).map_err(|e| {
        BuildError::Io {
            message: format!("failed to stage workspace: {:#}", e),
        }
    })?;
    tracing::debug!("staged {} file(s) into {}", copied, ws.root().display());

    find_project_file(ws.root()).map_err(|e| BuildError::Io {
        message: format!("staged workspace is incomplete: {}", e),
    })?;

    Ok(ws)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use crate::test_support::{create_template, snapshot_tree};
    use crate::util::fs::list_files;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_stage_fresh_workspace_copies_template() {
        let tmp = TempDir::new().unwrap();
        let template = TemplateRoot::open(create_template(tmp.path())).unwrap();

        let ws = stage(&template, "com.acme.app", |_| panic!("no prompt expected")).unwrap();

        assert!(ws.root().starts_with(template.workspaces_dir()));
        assert_eq!(
            snapshot_tree(ws.root()),
            snapshot_tree(template.root())
                .into_iter()
                .filter(|(p, _)| !p.starts_with("AppHostApplications"))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_stage_skips_build_outputs() {
        let tmp = TempDir::new().unwrap();
        let root = create_template(tmp.path());
        fs::create_dir_all(root.join("bin/Release")).unwrap();
        fs::write(root.join("bin/Release/stale.apk"), "old").unwrap();
        fs::create_dir_all(root.join("obj")).unwrap();
        fs::write(root.join("obj/project.assets.json"), "{}").unwrap();
        let template = TemplateRoot::open(&root).unwrap();

        let ws = stage(&template, "com.acme.app", |_| true).unwrap();

        let files = list_files(ws.root()).unwrap();
        assert!(files.iter().all(|f| !f.starts_with("bin") && !f.starts_with("obj")));
    }

    #[test]
    fn test_declined_overwrite_leaves_workspace_untouched() {
        let tmp = TempDir::new().unwrap();
        let template = TemplateRoot::open(create_template(tmp.path())).unwrap();
        let ws = stage(&template, "com.acme.app", |_| true).unwrap();
        fs::write(ws.root().join("local-notes.txt"), "mine").unwrap();
        fs::write(ws.manifest_file(), "edited").unwrap();
        let before = snapshot_tree(ws.root());

        let err = stage(&template, "com.acme.app", |_| false).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UserCancelled);
        assert_eq!(snapshot_tree(ws.root()), before);
    }

    #[test]
    fn test_accepted_overwrite_replaces_workspace() {
        let tmp = TempDir::new().unwrap();
        let template = TemplateRoot::open(create_template(tmp.path())).unwrap();
        let ws = stage(&template, "com.acme.app", |_| true).unwrap();
        fs::write(ws.root().join("leftover.txt"), "stale").unwrap();

        let mut asked = false;
        let ws = stage(&template, "com.acme.app", |existing| {
            asked = true;
            existing.package_name() == "com.acme.app"
        })
        .unwrap();

        assert!(asked);
        assert!(!ws.root().join("leftover.txt").exists());
        assert!(ws.manifest_file().exists());
    }

    #[test]
    fn test_stage_rejects_template_without_project() {
        let tmp = TempDir::new().unwrap();
        let root = create_template(tmp.path());
        let template = TemplateRoot::open(&root).unwrap();
        fs::remove_file(template.project_file()).unwrap();

        let err = stage(&template, "com.acme.app", |_| true).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(!template.workspaces_dir().exists());
    }
}
