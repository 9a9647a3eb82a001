// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Local rendering helpers shared by logos and text images: font loading,
// baseline-anchored text drawing, transparency, and image output. Operates on
// in-memory images using the `image`, `imageproc`, and `ab_glyph` crates.

use std::path::Path;

use ab_glyph::{Font, FontVec, PxScale, ScaleFont, point};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use ncstate_core::error::{NcstateError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::color::Rgb;

/// Output format when an image is written to disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    #[default]
    Png,
    Gif,
    Jpeg,
}

impl ImageType {
    /// Parse a type name; anything unknown is written as PNG.
    pub fn parse_lenient(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "gif" => Self::Gif,
            "jpeg" | "jpg" => Self::Jpeg,
            _ => Self::Png,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Jpeg => "jpeg",
        }
    }

    pub fn format(&self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Gif => ImageFormat::Gif,
            Self::Jpeg => ImageFormat::Jpeg,
        }
    }
}

/// Font sizes are given in points; glyphs are rasterised at 96 dpi.
pub fn points_to_px(points: f32) -> f32 {
    points * 96.0 / 72.0
}

/// Load a TrueType/OpenType font from `dir/file`.
#[instrument(skip_all, fields(dir = %dir.as_ref().display(), file = %file))]
pub fn load_font(dir: impl AsRef<Path>, file: &str) -> Result<FontVec> {
    let path = dir.as_ref().join(file);
    let bytes = std::fs::read(&path)
        .map_err(|e| NcstateError::Font(format!("{}: {e}", path.display())))?;
    let font = FontVec::try_from_vec(bytes)
        .map_err(|e| NcstateError::Font(format!("{}: {e}", path.display())))?;
    debug!("font loaded");
    Ok(font)
}

/// Measurements of a run of text at a given scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    /// Horizontal advance in pixels.
    pub width: u32,
    /// Height of the inked area, baseline-relative extremes included.
    pub ink_height: f32,
}

/// Measure `text` the way a bounding-box query would.
pub fn measure(font: &impl Font, px: f32, text: &str) -> TextMetrics {
    let scale = PxScale::from(px);
    let (width, _) = text_size(scale, font, text);

    let scaled = font.as_scaled(scale);
    let mut caret = 0.0;
    let (mut top, mut bottom) = (0.0f32, 0.0f32);
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        let glyph = id.with_scale_and_position(scale, point(caret, 0.0));
        caret += scaled.h_advance(id);
        if let Some(outline) = font.outline_glyph(glyph) {
            let bounds = outline.px_bounds();
            top = top.min(bounds.min.y);
            bottom = bottom.max(bounds.max.y);
        }
    }

    TextMetrics {
        width,
        ink_height: bottom - top,
    }
}

/// RGBA drawing surface with a solid brand background.
pub struct BrandCanvas {
    image: RgbaImage,
    background: Rgb,
}

impl BrandCanvas {
    pub fn new(width: u32, height: u32, background: Rgb) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, background.into()),
            background,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Draw `text` with its baseline at `baseline_y`, starting at `x`.
    /// Returns the horizontal advance.
    pub fn draw_text(
        &mut self,
        font: &impl Font,
        px: f32,
        x: i32,
        baseline_y: i32,
        color: Rgb,
        text: &str,
    ) -> u32 {
        let scale = PxScale::from(px);
        let ascent = font.as_scaled(scale).ascent();
        let top = baseline_y - ascent.round() as i32;
        draw_text_mut(&mut self.image, color.into(), x, top, scale, font, text);
        text_size(scale, font, text).0
    }

    /// Resample to exactly `width` x `height`.
    pub fn downsample(self, width: u32, height: u32) -> Self {
        let resized = image::imageops::resize(&self.image, width, height, FilterType::Triangle);
        Self {
            image: resized,
            background: self.background,
        }
    }

    /// Make every background-coloured pixel fully transparent.
    pub fn make_transparent(mut self) -> Self {
        let bg: image::Rgba<u8> = self.background.into();
        for pixel in self.image.pixels_mut() {
            if pixel.0[..3] == bg.0[..3] {
                pixel.0[3] = 0;
            }
        }
        self
    }

    pub fn into_dynamic(self) -> DynamicImage {
        DynamicImage::ImageRgba8(self.image)
    }
}

/// Write `image` to `save_path` (when set) and hand it back.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn store(
    image: DynamicImage,
    image_type: ImageType,
    save_path: Option<&Path>,
) -> Result<DynamicImage> {
    if let Some(path) = save_path {
        let output = flatten_for(&image, image_type);
        output
            .save_with_format(path, image_type.format())
            .map_err(|err| {
                NcstateError::Image(format!("failed to save image to {}: {err}", path.display()))
            })?;
        info!(path = %path.display(), kind = image_type.as_str(), "image saved");
    }
    Ok(image)
}

/// Encode `image` in the given format, returning the raw bytes.
pub fn encode(image: &DynamicImage, image_type: ImageType) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    flatten_for(image, image_type)
        .write_to(&mut cursor, image_type.format())
        .map_err(|err| NcstateError::Image(format!("image encoding failed: {err}")))?;
    Ok(buffer)
}

/// JPEG has no alpha channel.
fn flatten_for(image: &DynamicImage, image_type: ImageType) -> DynamicImage {
    match image_type {
        ImageType::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()),
        _ => image.clone(),
    }
}
