//! Test fixtures for common test scenarios.
//!
//! Generators for AppHost template trees and small icon images.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};

use crate::core::template::{
    ACTIVITY_FILE, DRAWABLE_DIR, MANIFEST_FILE, MODULE_NAME, PACKAGE_TOKEN,
    REDIRECT_PACKAGE_TOKEN, STRINGS_FILE,
};

/// Fixture for an AppHost template directory.
#[derive(Debug, Clone)]
pub struct TemplateFixture {
    /// Directory name of the template root.
    pub name: String,
    /// Files (path relative to the root -> content).
    pub files: BTreeMap<PathBuf, String>,
}

impl TemplateFixture {
    /// Create an empty fixture.
    pub fn new(name: impl Into<String>) -> Self {
        TemplateFixture {
            name: name.into(),
            files: BTreeMap::new(),
        }
    }

    /// The stock redirect template with all three tokens in place.
    pub fn redirect() -> Self {
        TemplateFixture::new(MODULE_NAME)
            .with_file(format!("{MODULE_NAME}.csproj"), project_file())
            .with_file(ACTIVITY_FILE, main_activity())
            .with_file(MANIFEST_FILE, android_manifest())
            .with_file(STRINGS_FILE, strings_xml())
            .with_file(format!("{DRAWABLE_DIR}/icon.xml"), "<adaptive-icon />\n")
    }

    /// Add or replace a file.
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// Drop a file from the fixture.
    pub fn without_file(mut self, path: impl AsRef<Path>) -> Self {
        self.files.remove(path.as_ref());
        self
    }

    /// Write this fixture under `base_path`, returning the template root.
    pub fn write_to(&self, base_path: &Path) -> std::io::Result<PathBuf> {
        let root = base_path.join(&self.name);
        std::fs::create_dir_all(&root)?;

        for (rel_path, content) in &self.files {
            let full_path = root.join(rel_path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&full_path, content)?;
        }

        Ok(root)
    }
}

fn project_file() -> String {
    r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <TargetFramework>net9.0-android</TargetFramework>
    <OutputType>Exe</OutputType>
  </PropertyGroup>
</Project>
"#
    .to_string()
}

fn main_activity() -> String {
    format!(
        r#"namespace AndroidRedirect.AppHost;

[Activity(MainLauncher = true, NoHistory = true)]
public class MainActivity : Activity
{{
    protected override void OnCreate(Bundle? savedInstanceState)
    {{
        base.OnCreate(savedInstanceState);
        var intent = PackageManager?.GetLaunchIntentForPackage("{PACKAGE_TOKEN}");
        if (intent != null) StartActivity(intent);
        Finish();
    }}
}}
"#
    )
}

fn android_manifest() -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<manifest xmlns:android="http://schemas.android.com/apk/res/android" package="{REDIRECT_PACKAGE_TOKEN}">
  <application android:label="@string/app_name" android:icon="@drawable/icon" />
</manifest>
"#
    )
}

fn strings_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<resources>
  <string name="app_name">{MODULE_NAME}</string>
</resources>
"#
    )
}

/// Write the stock redirect template under `base`, returning its root.
pub fn create_template(base: &Path) -> PathBuf {
    TemplateFixture::redirect()
        .write_to(base)
        .expect("failed to write template fixture")
}

/// A square mask with a transparent corner and a mix of alphas.
///
/// Pixel `(0, 0)` is fully transparent; the rest step through alphas by
/// distance from the center.
pub fn ring_mask(size: u32) -> RgbaImage {
    let center = size as f32 / 2.0;
    RgbaImage::from_fn(size, size, |x, y| {
        if x == 0 && y == 0 {
            return Rgba([0, 0, 0, 0]);
        }
        let dx = x as f32 + 0.5 - center;
        let dy = y as f32 + 0.5 - center;
        let distance = (dx * dx + dy * dy).sqrt();
        let alpha = match distance {
            d if d < center * 0.3 => 0,
            d if d < center * 0.6 => 128,
            d if d < center * 0.9 => 255,
            _ => 0,
        };
        Rgba([255, 255, 255, alpha])
    })
}

/// Save `image` as a PNG at `path`.
pub fn write_png(path: &Path, image: &RgbaImage) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("failed to create image directory");
    }
    image.save(path).expect("failed to write png fixture");
}

/// Write an executable `/bin/sh` script named `name` into `dir`.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("failed to write script");
    let mut perms = std::fs::metadata(&path)
        .expect("failed to stat script")
        .permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("failed to chmod script");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_redirect_fixture_holds_tokens() {
        let tmp = TempDir::new().unwrap();
        let root = create_template(tmp.path());

        let activity = std::fs::read_to_string(root.join(ACTIVITY_FILE)).unwrap();
        assert!(activity.contains("GetLaunchIntentForPackage(\"?package_name?\")"));
        let manifest = std::fs::read_to_string(root.join(MANIFEST_FILE)).unwrap();
        assert!(manifest.contains(REDIRECT_PACKAGE_TOKEN));
    }

    #[test]
    fn test_ring_mask_shape() {
        let mask = ring_mask(8);
        assert_eq!(mask.get_pixel(0, 0).0[3], 0);
        assert!(mask.pixels().any(|p| p.0[3] == 255));
        assert!(mask.pixels().any(|p| p.0[3] == 128));
    }
}
