//! The build request handed to the orchestrator.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::color::Rgb;
use crate::core::error::BuildError;

/// Image file extensions accepted for icon assets.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Everything needed to specialize the template for one package.
///
/// Created once per invocation and never mutated afterwards.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildRequest {
    /// Android package to redirect to (e.g. `com.acme.app`)
    pub package_name: String,

    /// Launcher display name
    pub app_name: String,

    /// Adaptive icon foreground layer
    pub foreground_image: Option<PathBuf>,

    /// Adaptive icon background layer
    pub background_image: Option<PathBuf>,

    /// Monochrome mask used for themed icons and tinted layers
    pub monochrome_image: Option<PathBuf>,

    /// Accent color for the synthesized adaptive layers
    pub accent: Option<Rgb>,
}

impl BuildRequest {
    pub fn new(package_name: impl Into<String>, app_name: impl Into<String>) -> Self {
        BuildRequest {
            package_name: package_name.into(),
            app_name: app_name.into(),
            ..Default::default()
        }
    }

    pub fn with_foreground(mut self, path: impl Into<PathBuf>) -> Self {
        self.foreground_image = Some(path.into());
        self
    }

    pub fn with_background(mut self, path: impl Into<PathBuf>) -> Self {
        self.background_image = Some(path.into());
        self
    }

    pub fn with_monochrome(mut self, path: impl Into<PathBuf>) -> Self {
        self.monochrome_image = Some(path.into());
        self
    }

    pub fn with_accent(mut self, accent: Rgb) -> Self {
        self.accent = Some(accent);
        self
    }

    /// Icon paths that were actually supplied, in install order.
    pub fn icon_paths(&self) -> impl Iterator<Item = &Path> {
        [
            &self.foreground_image,
            &self.background_image,
            &self.monochrome_image,
        ]
        .into_iter()
        .filter_map(|p| p.as_deref())
        .filter(|p| !p.as_os_str().is_empty())
    }

    /// Check required fields and icon files.
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.package_name.trim().is_empty() {
            return Err(BuildError::validation("package name is required"));
        }
        validate_package_name(&self.package_name)?;

        if self.app_name.trim().is_empty() {
            return Err(BuildError::validation("app name is required"));
        }

        for path in self.icon_paths() {
            validate_image_path(path)?;
        }

        Ok(())
    }
}

/// Check that `name` is a valid Android package name.
///
/// At least two dot-separated segments, each an ASCII letter followed by
/// ASCII alphanumerics or underscores.
pub fn validate_package_name(name: &str) -> Result<(), BuildError> {
    let segments: Vec<&str> = name.split('.').collect();
    let valid_segment = |s: &str| {
        let mut chars = s.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    };

    if segments.len() < 2 || !segments.iter().all(|s| valid_segment(s)) {
        return Err(BuildError::validation_with_help(
            format!("invalid package name `{}`", name),
            "Use a dotted Android package name such as `com.example.app`",
        ));
    }

    Ok(())
}

/// Check that an icon path exists and looks like a supported image.
pub fn validate_image_path(path: &Path) -> Result<(), BuildError> {
    let supported = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.iter().any(|ok| e.eq_ignore_ascii_case(ok)))
        .unwrap_or(false);

    if !supported {
        return Err(BuildError::validation_with_help(
            format!("unsupported image file `{}`", path.display()),
            "Select a png, jpg or jpeg image",
        ));
    }

    if !path.is_file() {
        return Err(BuildError::validation(format!(
            "image file not found: {}",
            path.display()
        )));
    }

    Ok(())
}
