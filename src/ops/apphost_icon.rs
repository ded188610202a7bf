//! Implementation of `apphost icon`.

use std::path::PathBuf;

use serde::Serialize;

use crate::builder::icons::{load_mask, render_adaptive_layers};
use crate::core::color::{ColorPair, Rgb, SWATCHES};
use crate::core::error::BuildError;
use crate::core::request::validate_image_path;

/// Options for the icon command.
#[derive(Debug, Clone)]
pub struct IconOptions {
    /// Monochrome mask to recolor
    pub monochrome: PathBuf,

    /// Accent color; the first swatch when unset
    pub accent: Option<Rgb>,

    /// Directory receiving the rendered layers
    pub out_dir: PathBuf,
}

/// What `render_icon` produced.
#[derive(Debug, Clone, Serialize)]
pub struct IconResult {
    pub colors: ColorPair,
    pub width: u32,
    pub height: u32,
    pub files: Vec<PathBuf>,
}

/// Render adaptive icon layers and a preview from a monochrome mask.
pub fn render_icon(opts: &IconOptions) -> Result<IconResult, BuildError> {
    validate_image_path(&opts.monochrome)?;

    let accent = opts.accent.unwrap_or(SWATCHES[0]);
    let colors = ColorPair::from_accent(accent);
    let mask = load_mask(&opts.monochrome)?;
    let (width, height) = mask.dimensions();

    tracing::info!(
        "rendering {}x{} icon with {} on {}",
        width,
        height,
        colors.foreground,
        colors.background
    );
    let files = render_adaptive_layers(&mask, colors).write_all(&opts.out_dir)?;

    Ok(IconResult {
        colors,
        width,
        height,
        files,
    })
}
