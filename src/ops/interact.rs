//! Capabilities the pipeline needs from whatever front end drives it.
//!
//! Every call may block on the user for as long as it likes; the pipeline
//! waits for the answer before continuing.

use std::path::{Path, PathBuf};

use crate::builder::artifact::ArtifactResult;

/// Opaque handle for a busy indicator shown by [`Interaction::show_busy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BusyToken(pub u64);

/// File type filter for [`Interaction::pick_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFilter {
    pub description: &'static str,
    pub extensions: &'static [&'static str],
}

impl FileFilter {
    /// AppHost project descriptors.
    pub const PROJECT: FileFilter = FileFilter {
        description: "AppHost project",
        extensions: &["csproj"],
    };

    /// Icon images.
    pub const IMAGES: FileFilter = FileFilter {
        description: "Images",
        extensions: crate::core::request::IMAGE_EXTENSIONS,
    };

    /// Check whether `path` has one of the accepted extensions.
    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|ok| e.eq_ignore_ascii_case(ok)))
            .unwrap_or(false)
    }
}

/// User-facing capabilities.
pub trait Interaction {
    /// Ask a yes/no question.
    fn confirm(&self, title: &str, message: &str) -> bool;

    /// Show a message.
    fn notify(&self, title: &str, message: &str);

    /// Let the user pick a file; `None` when they back out.
    fn pick_file(&self, filter: &FileFilter) -> Option<PathBuf>;

    /// Show a busy indicator until the token is handed back.
    fn show_busy(&self, message: &str) -> BusyToken;

    /// Hide a busy indicator.
    fn hide_busy(&self, token: BusyToken);

    /// Ask where to save a built artifact; `None` skips saving.
    fn choose_save_path(&self, artifact: &ArtifactResult) -> Option<PathBuf>;
}

/// Keeps a busy indicator up for as long as it lives.
///
/// Dropping the guard always hides the indicator, on every exit path.
pub struct BusyGuard<'a> {
    ui: &'a dyn Interaction,
    token: Option<BusyToken>,
}

impl<'a> BusyGuard<'a> {
    pub fn show(ui: &'a dyn Interaction, message: &str) -> Self {
        let token = ui.show_busy(message);
        BusyGuard {
            ui,
            token: Some(token),
        }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            self.ui.hide_busy(token);
        }
    }
}
