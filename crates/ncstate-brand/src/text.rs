// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Branded text images. Text may span several lines and uses `*asterisks*`
// to mark bold runs. Local rendering draws at 5x and resamples down.

use std::path::PathBuf;
use std::sync::OnceLock;

use image::DynamicImage;
use ncstate_core::config::BrandEndpoints;
use ncstate_core::error::{NcstateError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::color::BrandPalette;
use crate::generator::ImageGenerator;
use crate::render::{self, BrandCanvas, ImageType};

/// Local renders are drawn this many times larger, then resampled.
pub const OVERSAMPLE_FACTOR: u32 = 5;

const DEFAULT_TEXT: &str = "*TEXT* UTILITY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextOptions {
    pub width: u32,
    pub height: u32,
    pub left_text_offset: u32,
    /// Distance from the bottom edge to the last line's baseline.
    pub baseline_text_offset: u32,
    pub line_spacing: u32,
    pub background_color: String,
    pub font_size: f32,
    pub font_color: String,
    pub transparent: bool,
    pub path_to_fonts: String,
    pub normal_font: String,
    pub bold_font: String,
    pub image_type: ImageType,
    pub save_path: Option<PathBuf>,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            width: 275,
            height: 50,
            left_text_offset: 8,
            baseline_text_offset: 8,
            line_spacing: 10,
            background_color: "primary-red".into(),
            font_size: 36.0,
            font_color: "primary-white".into(),
            transparent: false,
            path_to_fonts: String::new(),
            normal_font: "UVC_____.TTF".into(),
            bold_font: "UVCB____.TTF".into(),
            image_type: ImageType::Png,
            save_path: None,
        }
    }
}

/// A piece of a line drawn in a single weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
}

/// Split marked-up text into lines of weighted runs.
///
/// Empty lines are dropped. A segment is bold only when it carries exactly
/// two asterisks; all asterisks are removed from the drawn text.
pub fn parse_markup(text: &str) -> Vec<Vec<TextRun>> {
    static BOLD: OnceLock<Regex> = OnceLock::new();
    let bold = BOLD.get_or_init(|| Regex::new(r"\*[^*]*\*").expect("static regex"));

    text.split('\n')
        .filter(|line| !line.is_empty())
        .map(|line| {
            let mut segments = Vec::new();
            let mut last = 0;
            for m in bold.find_iter(line) {
                segments.push(&line[last..m.start()]);
                segments.push(m.as_str());
                last = m.end();
            }
            segments.push(&line[last..]);

            segments
                .into_iter()
                .filter(|s| !s.is_empty())
                .map(|s| TextRun {
                    text: s.replace('*', ""),
                    bold: s.matches('*').count() == 2,
                })
                .collect()
        })
        .collect()
}

/// Text that spells out the university wordmark must use a logo instead.
pub fn is_valid_text(text: &str) -> bool {
    static WORDMARK: OnceLock<Regex> = OnceLock::new();
    let wordmark = WORDMARK
        .get_or_init(|| Regex::new(r"(?i)NC\s*STATE\s*UNIVERSITY").expect("static regex"));
    !wordmark.is_match(&text.replace('*', ""))
}

/// Multi-line text image with bold markup.
#[derive(Debug, Clone)]
pub struct BrandText {
    text: String,
    options: TextOptions,
}

impl Default for BrandText {
    fn default() -> Self {
        Self::new(DEFAULT_TEXT, TextOptions::default())
    }
}

impl BrandText {
    pub fn new(text: &str, options: TextOptions) -> Self {
        Self {
            text: text.to_owned(),
            options,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: &str) -> &mut Self {
        self.text = text.to_owned();
        self
    }

    pub fn options(&self) -> &TextOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut TextOptions {
        &mut self.options
    }

    /// Query parameters understood by the remote text service.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let o = &self.options;
        let mut pairs = vec![
            ("width", o.width.to_string()),
            ("height", o.height.to_string()),
            ("leftTextOffset", o.left_text_offset.to_string()),
            ("baselineTextOffset", o.baseline_text_offset.to_string()),
            ("lineSpacing", o.line_spacing.to_string()),
            ("backgroundColor", o.background_color.clone()),
            ("fontSize", o.font_size.to_string()),
            ("fontColor", o.font_color.clone()),
            ("transparent", u8::from(o.transparent).to_string()),
            ("pathToFonts", o.path_to_fonts.clone()),
            ("normalFont", o.normal_font.clone()),
            ("boldFont", o.bold_font.clone()),
            ("imageType", o.image_type.as_str().to_owned()),
        ];
        if let Some(path) = &o.save_path {
            pairs.push(("savePath", path.display().to_string()));
        }
        pairs.push(("text", self.text.clone()));
        pairs
    }

    #[instrument(skip_all)]
    pub async fn fetch_image(
        &self,
        generator: &ImageGenerator,
        endpoints: &BrandEndpoints,
    ) -> Result<DynamicImage> {
        let image = generator
            .fetch(&endpoints.text_api_url, &self.query_pairs())
            .await?;
        render::store(image, self.options.image_type, self.options.save_path.as_deref())
    }

    /// Render locally. Lines are laid out upwards from the baseline offset,
    /// so the last line always sits at the same height.
    #[instrument(skip(self), fields(text = %self.text))]
    pub fn create_image(&self) -> Result<DynamicImage> {
        let o = &self.options;
        let palette = BrandPalette::new();
        let background = palette.resolve(&o.background_color)?;
        let foreground = palette.resolve(&o.font_color)?;

        let normal_font = render::load_font(&o.path_to_fonts, &o.normal_font)?;
        let bold_font = render::load_font(&o.path_to_fonts, &o.bold_font)?;

        let width = oversampled(o.width, "width")?;
        let height = oversampled(o.height, "height")?;
        let left = oversampled(o.left_text_offset, "left text offset")?;
        let spacing = oversampled(o.line_spacing, "line spacing")?;
        let mut baseline = oversampled(o.height - o.baseline_text_offset.min(o.height), "height")?;

        let px = render::points_to_px(o.font_size * OVERSAMPLE_FACTOR as f32);
        let line_height = render::measure(&normal_font, px, "A").ink_height.round() as i32;

        let mut canvas = BrandCanvas::new(width.unsigned_abs(), height.unsigned_abs(), background);
        let lines = parse_markup(&self.text);
        debug!(lines = lines.len(), line_height, "laying out text");

        for line in lines.iter().rev() {
            let mut x = left;
            for run in line {
                let advance = if run.bold {
                    canvas.draw_text(&bold_font, px, x, baseline, foreground, &run.text)
                } else {
                    canvas.draw_text(&normal_font, px, x, baseline, foreground, &run.text)
                };
                x = x.saturating_add(i32::try_from(advance).unwrap_or(i32::MAX));
            }
            baseline = baseline.saturating_sub(line_height.saturating_add(spacing));
        }

        let mut canvas = canvas.downsample(o.width, o.height);
        if o.transparent {
            canvas = canvas.make_transparent();
        }
        info!(width = o.width, height = o.height, "text image rendered");
        render::store(canvas.into_dynamic(), o.image_type, o.save_path.as_deref())
    }
}

/// Scale a dimension up to the drawing canvas.
fn oversampled(value: u32, what: &str) -> Result<i32> {
    value
        .checked_mul(OVERSAMPLE_FACTOR)
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| NcstateError::InvalidArgument(format!("{what} {value} is too large to render")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::tests::{
        FIXTURE_BOLD, FIXTURE_FONTS, FIXTURE_NORMAL, blank_rows_within, first_ink_column, ink_rows,
    };

    fn run(text: &str, bold: bool) -> TextRun {
        TextRun {
            text: text.into(),
            bold,
        }
    }

    #[test]
    fn default_markup() {
        assert_eq!(
            parse_markup(DEFAULT_TEXT),
            vec![vec![run("TEXT", true), run(" UTILITY", false)]]
        );
    }

    #[test]
    fn multiple_lines_skip_blanks() {
        let lines = parse_markup("Office of\n\n*Information* Technology");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], vec![run("Office of", false)]);
        assert_eq!(lines[1][0], run("Information", true));
    }

    #[test]
    fn unbalanced_star_is_not_bold() {
        let lines = parse_markup("*half bold");
        assert_eq!(lines, vec![vec![run("half bold", false)]]);
    }

    #[test]
    fn wordmark_text_is_rejected() {
        assert!(!is_valid_text("*NC State* University"));
        assert!(!is_valid_text("ncstateuniversity"));
        assert!(is_valid_text("*NC STATE* Extension"));
    }

    #[test]
    fn query_pairs_end_with_text() {
        let text = BrandText::new("*OIT*", TextOptions::default());
        let pairs = text.query_pairs();
        assert_eq!(pairs.last(), Some(&("text", "*OIT*".to_owned())));
        assert!(pairs.contains(&("baselineTextOffset", "8".into())));
    }

    #[test]
    fn unknown_background_is_reported() {
        let mut text = BrandText::default();
        text.options_mut().background_color = "tertiary-red".into();
        assert!(matches!(
            text.create_image(),
            Err(NcstateError::ColorNotFound(key)) if key == "tertiary-red"
        ));
    }

    #[test]
    fn missing_fonts_are_font_errors() {
        let mut text = BrandText::default();
        text.options_mut().path_to_fonts = "/nonexistent/fonts".into();
        assert!(matches!(text.create_image(), Err(NcstateError::Font(_))));
    }

    fn fixture_text(text: &str, height: u32) -> BrandText {
        BrandText::new(
            text,
            TextOptions {
                height,
                background_color: "primary-black".into(),
                path_to_fonts: FIXTURE_FONTS.into(),
                normal_font: FIXTURE_NORMAL.into(),
                bold_font: FIXTURE_BOLD.into(),
                ..TextOptions::default()
            },
        )
    }

    #[test]
    fn single_line_sits_on_baseline() {
        let image = fixture_text("*TEXT* UTILITY", 120).create_image().expect("render");
        assert_eq!((image.width(), image.height()), (275, 120));

        // Baseline is 8 rows above the bottom edge; capitals have no descenders.
        let (top, bottom) = ink_rows(&image).expect("ink");
        assert!((109..=114).contains(&bottom), "bottom row {bottom}");
        assert!(top > 112 - 48 && top < bottom, "top row {top}");
        assert_eq!(blank_rows_within(&image), 0);

        let left = first_ink_column(&image).expect("ink");
        assert!((6..=16).contains(&left), "first column {left}");
    }

    #[test]
    fn lines_stack_upwards_from_the_baseline() {
        let single = fixture_text("TECHNOLOGY", 120).create_image().expect("render");
        let double = fixture_text("*OFFICE* OF\nTECHNOLOGY", 120)
            .create_image()
            .expect("render");

        let (single_top, single_bottom) = ink_rows(&single).expect("ink");
        let (double_top, double_bottom) = ink_rows(&double).expect("ink");

        // The last line keeps its place; the first goes above it.
        assert!(double_bottom.abs_diff(single_bottom) <= 1);
        let text_height = single_bottom - single_top;
        assert!(double_top + text_height < single_top, "{double_top} vs {single_top}");
        assert!(blank_rows_within(&double) >= 5);
    }

    #[test]
    fn transparent_render_clears_background() {
        let mut text = fixture_text("OIT", 50);
        text.options_mut().transparent = true;
        let image = text.create_image().expect("render").to_rgba8();
        assert_eq!(image.get_pixel(0, 0).0[3], 0);
        assert!(image.pixels().any(|p| p.0[3] == 255));
    }

    #[test]
    fn oversized_canvas_is_rejected() {
        let mut text = fixture_text("OIT", 50);
        text.options_mut().width = u32::MAX / 2;
        assert!(matches!(
            text.create_image(),
            Err(NcstateError::InvalidArgument(m)) if m.starts_with("width")
        ));

        text.options_mut().width = 275;
        text.options_mut().line_spacing = 500_000_000;
        assert!(matches!(text.create_image(), Err(NcstateError::InvalidArgument(_))));
    }
}
