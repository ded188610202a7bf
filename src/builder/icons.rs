//! Icon assets: copying user images and synthesizing adaptive layers.

use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageBuffer, RgbaImage};

use crate::core::color::{composite_tint, ColorPair};
use crate::core::error::BuildError;
use crate::core::workspace::BuildWorkspace;
use crate::util::fs::ensure_dir;

/// File name of the synthesized foreground layer.
pub const ADAPTIVE_FOREGROUND: &str = "ic_adaptive_foreground.png";

/// File name of the synthesized background layer.
pub const ADAPTIVE_BACKGROUND: &str = "ic_adaptive_background.png";

/// File name of the composited preview.
pub const ADAPTIVE_PREVIEW: &str = "ic_adaptive_preview.png";

/// Copy the supplied icons into the workspace drawable directory.
///
/// Files keep their original names and overwrite what is there. Absent or
/// empty paths are skipped. Returns the installed paths.
pub fn install_icons(
    ws: &BuildWorkspace,
    foreground: Option<&Path>,
    background: Option<&Path>,
    monochrome: Option<&Path>,
) -> Result<Vec<PathBuf>, BuildError> {
    let drawable = ws.drawable_dir();
    let mut installed = Vec::new();

    for source in [foreground, background, monochrome]
        .into_iter()
        .flatten()
        .filter(|p| !p.as_os_str().is_empty())
    {
        let file_name = source.file_name().ok_or_else(|| {
            BuildError::validation(format!("icon path has no file name: {}", source.display()))
        })?;

        ensure_dir(&drawable).map_err(|e| BuildError::Io {
            message: format!("{:#}", e),
        })?;

        let target = drawable.join(file_name);
        fs::copy(source, &target).map_err(|e| BuildError::io(source, e))?;
        tracing::debug!("installed icon {}", target.display());
        installed.push(target);
    }

    Ok(installed)
}

/// Adaptive icon layers rendered from one monochrome mask.
#[derive(Debug, Clone)]
pub struct AdaptiveLayers {
    /// Mask coverage in the accent color, transparent elsewhere
    pub foreground: RgbaImage,

    /// Solid derived background
    pub background: RgbaImage,

    /// Every pixel recolored with [`composite_tint`]
    pub preview: RgbaImage,
}

impl AdaptiveLayers {
    /// Write the foreground and background layers into `dir`.
    pub fn write_layers(&self, dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
        write_images(
            dir,
            &[
                (ADAPTIVE_FOREGROUND, &self.foreground),
                (ADAPTIVE_BACKGROUND, &self.background),
            ],
        )
    }

    /// Write both layers and the preview into `dir`.
    pub fn write_all(&self, dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
        write_images(
            dir,
            &[
                (ADAPTIVE_FOREGROUND, &self.foreground),
                (ADAPTIVE_BACKGROUND, &self.background),
                (ADAPTIVE_PREVIEW, &self.preview),
            ],
        )
    }
}

fn write_images(dir: &Path, images: &[(&str, &RgbaImage)]) -> Result<Vec<PathBuf>, BuildError> {
    ensure_dir(dir).map_err(|e| BuildError::Io {
        message: format!("{:#}", e),
    })?;

    let mut written = Vec::with_capacity(images.len());
    for (name, image) in images {
        let path = dir.join(name);
        image.save(&path).map_err(|e| BuildError::io(&path, e))?;
        written.push(path);
    }
    Ok(written)
}

/// Load a mask image as RGBA.
pub fn load_mask(path: &Path) -> Result<RgbaImage, BuildError> {
    let image = image::open(path).map_err(|e| {
        BuildError::validation(format!("failed to decode image {}: {}", path.display(), e))
    })?;
    Ok(image.to_rgba8())
}

/// Recolor every pixel of `mask` with [`composite_tint`].
pub fn tint_image(mask: &RgbaImage, colors: ColorPair) -> RgbaImage {
    let mut out = mask.clone();
    for pixel in out.pixels_mut() {
        *pixel = composite_tint(*pixel, colors.foreground, colors.background);
    }
    out
}

/// Render the adaptive layers for `mask` in `colors`.
pub fn render_adaptive_layers(mask: &RgbaImage, colors: ColorPair) -> AdaptiveLayers {
    let (width, height) = mask.dimensions();

    let mut foreground = mask.clone();
    for pixel in foreground.pixels_mut() {
        *pixel = colors.foreground.with_alpha(pixel.0[3]);
    }

    let background =
        ImageBuffer::from_pixel(width, height, colors.background.with_alpha(u8::MAX));

    AdaptiveLayers {
        foreground,
        background,
        preview: tint_image(mask, colors),
    }
}
