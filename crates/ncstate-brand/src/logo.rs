// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Wordmark logos: a bold run followed by a normal-weight run, rendered
// either by the remote logo service or locally from the brand fonts.

use std::path::PathBuf;

use image::DynamicImage;
use ncstate_core::config::BrandEndpoints;
use ncstate_core::error::{NcstateError, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::color::BrandPalette;
use crate::generator::ImageGenerator;
use crate::render::{self, BrandCanvas, ImageType};

/// Where the text baseline sits within the image height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    #[default]
    Center,
    Bottom,
}

impl VerticalAlign {
    /// Unknown values align to the bottom edge.
    pub fn parse_lenient(value: &str) -> Self {
        match value {
            "top" => Self::Top,
            "center" => Self::Center,
            _ => Self::Bottom,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Center => "center",
            Self::Bottom => "bottom",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogoOptions {
    pub width: u32,
    pub height: u32,
    pub left_text_offset: u32,
    /// Palette key of the background.
    pub background_color: String,
    /// Point size.
    pub font_size: f32,
    /// Palette key of the text.
    pub font_color: String,
    pub vertical_align: VerticalAlign,
    pub transparent: bool,
    pub path_to_fonts: String,
    pub normal_font: String,
    pub bold_font: String,
    pub image_type: ImageType,
    pub save_path: Option<PathBuf>,
}

impl Default for LogoOptions {
    fn default() -> Self {
        Self {
            width: 470,
            height: 60,
            left_text_offset: 10,
            background_color: "primary-red".into(),
            font_size: 36.0,
            font_color: "primary-white".into(),
            vertical_align: VerticalAlign::Center,
            transparent: false,
            path_to_fonts: String::new(),
            normal_font: "UVC_____.ttf".into(),
            bold_font: "UVCB____.ttf".into(),
            image_type: ImageType::Png,
            save_path: None,
        }
    }
}

/// Two-weight wordmark logo.
#[derive(Debug, Clone)]
pub struct BrandLogo {
    bold_text: String,
    normal_text: String,
    options: LogoOptions,
}

impl Default for BrandLogo {
    fn default() -> Self {
        Self::new("NC STATE ", "UNIVERSITY", LogoOptions::default())
    }
}

impl BrandLogo {
    pub fn new(bold_text: &str, normal_text: &str, options: LogoOptions) -> Self {
        Self {
            bold_text: bold_text.to_uppercase(),
            normal_text: normal_text.to_uppercase(),
            options,
        }
    }

    pub fn bold_text(&self) -> &str {
        &self.bold_text
    }

    pub fn set_bold_text(&mut self, text: &str) -> &mut Self {
        self.bold_text = text.to_uppercase();
        self
    }

    pub fn normal_text(&self) -> &str {
        &self.normal_text
    }

    pub fn set_normal_text(&mut self, text: &str) -> &mut Self {
        self.normal_text = text.to_uppercase();
        self
    }

    pub fn options(&self) -> &LogoOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut LogoOptions {
        &mut self.options
    }

    /// Query parameters understood by the remote logo service.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let o = &self.options;
        let mut pairs = vec![
            ("width", o.width.to_string()),
            ("height", o.height.to_string()),
            ("leftTextOffset", o.left_text_offset.to_string()),
            ("backgroundColor", o.background_color.clone()),
            ("fontSize", o.font_size.to_string()),
            ("fontColor", o.font_color.clone()),
            ("verticalAlign", o.vertical_align.as_str().to_owned()),
            ("transparent", u8::from(o.transparent).to_string()),
            ("pathToFonts", o.path_to_fonts.clone()),
            ("normalFont", o.normal_font.clone()),
            ("boldFont", o.bold_font.clone()),
            ("imageType", o.image_type.as_str().to_owned()),
        ];
        if let Some(path) = &o.save_path {
            pairs.push(("savePath", path.display().to_string()));
        }
        pairs.push(("normalText", self.normal_text.clone()));
        pairs.push(("boldText", self.bold_text.clone()));
        pairs
    }

    /// Fetch the logo from the remote renderer and store it.
    #[instrument(skip_all)]
    pub async fn fetch_image(
        &self,
        generator: &ImageGenerator,
        endpoints: &BrandEndpoints,
    ) -> Result<DynamicImage> {
        let image = generator
            .fetch(&endpoints.logo_api_url, &self.query_pairs())
            .await?;
        render::store(image, self.options.image_type, self.options.save_path.as_deref())
    }

    /// Render the logo locally from the configured fonts.
    #[instrument(skip(self), fields(bold = %self.bold_text, normal = %self.normal_text))]
    pub fn create_image(&self) -> Result<DynamicImage> {
        let o = &self.options;
        let palette = BrandPalette::new();
        let background = palette.resolve(&o.background_color)?;
        let foreground = palette.resolve(&o.font_color)?;

        let bold_font = render::load_font(&o.path_to_fonts, &o.bold_font)?;
        let normal_font = render::load_font(&o.path_to_fonts, &o.normal_font)?;

        let px = render::points_to_px(o.font_size);
        let bold = render::measure(&bold_font, px, &self.bold_text);
        let baseline = baseline_for(o.vertical_align, o.height, bold.ink_height);

        let mut canvas = BrandCanvas::new(o.width, o.height, background);
        let left = i32::try_from(o.left_text_offset).map_err(|_| {
            NcstateError::InvalidArgument(format!(
                "left text offset {} is too large to render",
                o.left_text_offset
            ))
        })?;
        let advance = canvas.draw_text(&bold_font, px, left, baseline, foreground, &self.bold_text);
        canvas.draw_text(
            &normal_font,
            px,
            left.saturating_add(i32::try_from(advance).unwrap_or(i32::MAX)),
            baseline,
            foreground,
            &self.normal_text,
        );

        if o.transparent {
            canvas = canvas.make_transparent();
        }
        info!(width = o.width, height = o.height, "logo rendered");
        render::store(canvas.into_dynamic(), o.image_type, o.save_path.as_deref())
    }
}

/// Baseline row for text of `text_height` in an image `height` pixels tall.
pub fn baseline_for(align: VerticalAlign, height: u32, text_height: f32) -> i32 {
    match align {
        VerticalAlign::Top => text_height.round() as i32,
        VerticalAlign::Center => ((height as f32 + text_height) / 2.0).ceil() as i32,
        VerticalAlign::Bottom => height as i32,
    }
}
