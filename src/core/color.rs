//! Accent colors and the HSL transform used to derive icon backgrounds.
//!
//! Channels are normalized to `[0, 1]` for the HSL math; hue is a fraction
//! of a full turn in `[0, 1)`.

use std::fmt;
use std::str::FromStr;

use image::Rgba;
use palette::{IntoColor, Srgb};
use serde::{Serialize, Serializer};

/// Saturation multiplier applied by [`derive_background`].
pub const MUTE_SATURATION: f32 = 0.2;

/// Lightness multiplier applied by [`derive_background`].
pub const MUTE_LIGHTNESS: f32 = 0.25;

/// Built-in accent swatches.
pub const SWATCHES: [Rgb; 4] = [
    Rgb::new(0xF6, 0xC1, 0x77),
    Rgb::new(0x50, 0xC8, 0x78),
    Rgb::new(0xEB, 0x6F, 0x92),
    Rgb::new(0x9C, 0xCF, 0xD8),
];

/// An opaque 8-bit sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// This color as a pixel with the given alpha.
    pub fn with_alpha(self, alpha: u8) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, alpha])
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = String;

    /// Parse `#RRGGBB` or `RRGGBB`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("invalid color '{}'; expected '#RRGGBB'", s));
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| e.to_string());
        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A color in hue/saturation/lightness space, all components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    /// Scale saturation and lightness down to the muted background range.
    ///
    /// Not idempotent: each application mutes further.
    pub fn muted(self) -> Hsl {
        Hsl {
            h: self.h,
            s: self.s * MUTE_SATURATION,
            l: self.l * MUTE_LIGHTNESS,
        }
    }
}

/// Convert an 8-bit color to HSL.
pub fn to_hsl(color: Rgb) -> Hsl {
    let rgb = Srgb::new(
        color.r as f32 / 255.0,
        color.g as f32 / 255.0,
        color.b as f32 / 255.0,
    );
    let hsl: palette::Hsl = rgb.into_color();

    Hsl {
        h: hsl.hue.into_positive_degrees() / 360.0,
        s: hsl.saturation,
        l: hsl.lightness,
    }
}

/// Convert HSL back to an 8-bit color, rounding each channel.
pub fn to_rgb(hsl: Hsl) -> Rgb {
    let hsl = palette::Hsl::new(hsl.h * 360.0, hsl.s, hsl.l);
    let rgb: Srgb = hsl.into_color();

    Rgb::new(quantize(rgb.red), quantize(rgb.green), quantize(rgb.blue))
}

fn quantize(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Derive the muted, fully opaque background for an accent color.
///
/// Apply exactly once per derivation.
pub fn derive_background(foreground: Rgb) -> Rgb {
    to_rgb(to_hsl(foreground).muted())
}

/// Recolor one mask pixel.
///
/// Covered pixels (alpha > 0) take the foreground color and keep their alpha;
/// uncovered pixels become the opaque background.
pub fn composite_tint(source: Rgba<u8>, foreground: Rgb, background: Rgb) -> Rgba<u8> {
    let alpha = source.0[3];
    if alpha > 0 {
        foreground.with_alpha(alpha)
    } else {
        background.with_alpha(u8::MAX)
    }
}

/// An accent color and the background derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorPair {
    pub foreground: Rgb,
    pub background: Rgb,
}

impl ColorPair {
    pub fn from_accent(foreground: Rgb) -> Self {
        ColorPair {
            foreground,
            background: derive_background(foreground),
        }
    }
}

/// Parse an accent given as `#RRGGBB` or as an index into [`SWATCHES`].
pub fn parse_accent(s: &str) -> Result<Rgb, String> {
    if let Ok(index) = s.trim().parse::<usize>() {
        return SWATCHES.get(index).copied().ok_or_else(|| {
            format!(
                "swatch index {} out of range; expected 0..{}",
                index,
                SWATCHES.len() - 1
            )
        });
    }
    s.parse()
}
