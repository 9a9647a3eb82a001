// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Official brand colours and WCAG 2 contrast evaluation.
//
// Colours are addressed as `level-name` keys (e.g. `primary-red`). The
// contrast evaluator converts sRGB to relative luminance and checks the
// luminance ratio against the AA / AAA thresholds for normal and large text.

use std::fmt;

use ncstate_core::error::{NcstateError, Result};
use serde::{Deserialize, Serialize};

/// Palette table: level → (name, hex) in publication order.
const PALETTE: &[(&str, &[(&str, &str)])] = &[
    (
        "primary",
        &[("red", "CC0000"), ("black", "000000"), ("white", "FFFFFF")],
    ),
    (
        "secondary",
        &[
            ("grey1", "383838"),
            ("grey2", "666666"),
            ("grey3", "CCCCCC"),
            ("grey4", "E1E1E1"),
            ("green1", "5C5541"),
            ("green2", "666633"),
            ("blue", "556677"),
            ("red", "A20000"),
        ],
    ),
    (
        "support",
        &[
            ("brown1", "A79574"),
            ("brown2", "C5BD9D"),
            ("brown3", "E5E1D0"),
            ("green1", "778855"),
            ("green2", "99AA77"),
            ("green3", "CCDDAA"),
            ("blue", "67849C"),
            ("yellow", "CC9900"),
        ],
    ),
];

/// An 8-bit sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parse `#RRGGBB`, `RRGGBB`, `#RGB`, or `RGB`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        let expanded: String = match digits.len() {
            6 => digits.to_owned(),
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            _ => return Err(NcstateError::InvalidColor(hex.to_owned())),
        };

        let channel = |i: usize| {
            u8::from_str_radix(&expanded[i..i + 2], 16)
                .map_err(|_| NcstateError::InvalidColor(hex.to_owned()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Upper-case `#RRGGBB`.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }

    /// WCAG 2 relative luminance in `0.0..=1.0`.
    pub fn relative_luminance(&self) -> f64 {
        fn linear(channel: u8) -> f64 {
            let c = f64::from(channel) / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * linear(self.red) + 0.7152 * linear(self.green) + 0.0722 * linear(self.blue)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Rgb> for image::Rgba<u8> {
    fn from(c: Rgb) -> Self {
        image::Rgba([c.red, c.green, c.blue, 255])
    }
}

/// One entry of the brand palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrandColor {
    pub level: &'static str,
    pub name: &'static str,
    hex: &'static str,
}

impl BrandColor {
    /// `level-name` lookup key.
    pub fn key(&self) -> String {
        format!("{}-{}", self.level, self.name)
    }

    /// `#RRGGBB`.
    pub fn hex(&self) -> String {
        format!("#{}", self.hex)
    }

    /// Hex digits without the leading `#`.
    pub fn hex_digits(&self) -> &'static str {
        self.hex
    }

    pub fn rgb(&self) -> Rgb {
        // Palette entries are compile-time constants of valid hex.
        Rgb::from_hex(self.hex).unwrap_or(Rgb::BLACK)
    }
}

/// Lookup over the official brand palette.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrandPalette;

impl BrandPalette {
    pub fn new() -> Self {
        Self
    }

    /// Look up a colour by `level-name` key, e.g. `primary-red`.
    pub fn color(&self, key: &str) -> Option<BrandColor> {
        let (level, name) = key.split_once('-')?;
        self.level(level)?.into_iter().find(|c| c.name == name)
    }

    /// Resolve a key to RGB, failing with [`NcstateError::ColorNotFound`].
    pub fn resolve(&self, key: &str) -> Result<Rgb> {
        self.color(key)
            .map(|c| c.rgb())
            .ok_or_else(|| NcstateError::ColorNotFound(key.to_owned()))
    }

    /// All colours of one level, in palette order.
    pub fn level(&self, level: &str) -> Option<Vec<BrandColor>> {
        PALETTE
            .iter()
            .find(|(name, _)| *name == level)
            .map(|&(level, colors)| {
                colors
                    .iter()
                    .map(|&(name, hex)| BrandColor { level, name, hex })
                    .collect()
            })
    }

    /// Names of the palette levels.
    pub fn levels(&self) -> impl Iterator<Item = &'static str> {
        PALETTE.iter().map(|(name, _)| *name)
    }

    /// Every colour across all levels.
    pub fn colors(&self) -> Vec<BrandColor> {
        PALETTE
            .iter()
            .flat_map(|&(level, colors)| {
                colors
                    .iter()
                    .map(move |&(name, hex)| BrandColor { level, name, hex })
            })
            .collect()
    }

    /// Foreground/background brand pairs that meet `level` for the given
    /// text size.
    pub fn accessible_pairs(
        &self,
        font_size_pt: f64,
        bold: bool,
        level: WcagLevel,
    ) -> Vec<(BrandColor, BrandColor, ContrastReport)> {
        let colors = self.colors();
        let mut pairs = Vec::new();
        for fg in &colors {
            for bg in &colors {
                if fg.hex == bg.hex {
                    continue;
                }
                let report = ContrastReport::evaluate(fg.rgb(), bg.rgb(), font_size_pt, bold);
                if report.passes(level) {
                    pairs.push((*fg, *bg, report));
                }
            }
        }
        pairs
    }
}

// ---------------------------------------------------------------------------
// Contrast
// ---------------------------------------------------------------------------

/// Minimum ratios from WCAG 2 success criteria 1.4.3 and 1.4.6.
pub const AA_NORMAL: f64 = 4.5;
pub const AA_LARGE: f64 = 3.0;
pub const AAA_NORMAL: f64 = 7.0;
pub const AAA_LARGE: f64 = 4.5;

/// Text counts as large at 18pt, or 14pt when bold.
pub const LARGE_TEXT_PT: f64 = 18.0;
pub const LARGE_BOLD_TEXT_PT: f64 = 14.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WcagLevel {
    AA,
    AAA,
}

/// Luminance ratio between two colours, always `>= 1.0`.
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let la = a.relative_luminance();
    let lb = b.relative_luminance();
    let (hi, lo) = if la >= lb { (la, lb) } else { (lb, la) };
    (hi + 0.05) / (lo + 0.05)
}

/// Whether text of this size counts as "large" under WCAG.
pub fn is_large_text(font_size_pt: f64, bold: bool) -> bool {
    font_size_pt >= LARGE_TEXT_PT || (bold && font_size_pt >= LARGE_BOLD_TEXT_PT)
}

/// Outcome of a contrast check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContrastReport {
    pub foreground: Rgb,
    pub background: Rgb,
    pub ratio: f64,
    pub large_text: bool,
    pub aa: bool,
    pub aaa: bool,
    /// Ratio against the stricter normal-text thresholds regardless of size.
    pub aa_normal: bool,
    pub aaa_normal: bool,
}

impl ContrastReport {
    pub fn evaluate(foreground: Rgb, background: Rgb, font_size_pt: f64, bold: bool) -> Self {
        let ratio = contrast_ratio(foreground, background);
        let large_text = is_large_text(font_size_pt, bold);
        let (aa_min, aaa_min) = if large_text {
            (AA_LARGE, AAA_LARGE)
        } else {
            (AA_NORMAL, AAA_NORMAL)
        };
        Self {
            foreground,
            background,
            ratio,
            large_text,
            aa: ratio >= aa_min,
            aaa: ratio >= aaa_min,
            aa_normal: ratio >= AA_NORMAL,
            aaa_normal: ratio >= AAA_NORMAL,
        }
    }

    pub fn passes(&self, level: WcagLevel) -> bool {
        match level {
            WcagLevel::AA => self.aa,
            WcagLevel::AAA => self.aaa,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_key() {
        let palette = BrandPalette::new();
        let red = palette.color("primary-red").expect("primary red");
        assert_eq!(red.hex(), "#CC0000");
        assert_eq!(red.rgb(), Rgb::new(0xCC, 0, 0));
        assert_eq!(
            palette.color("secondary-red").map(|c| c.hex()),
            Some("#A20000".to_owned())
        );
    }

    #[test]
    fn unknown_keys_are_none() {
        let palette = BrandPalette::new();
        assert!(palette.color("primary-purple").is_none());
        assert!(palette.color("tertiary-red").is_none());
        assert!(palette.color("primaryred").is_none());
        assert!(matches!(
            palette.resolve("support-pink"),
            Err(NcstateError::ColorNotFound(key)) if key == "support-pink"
        ));
    }

    #[test]
    fn levels_and_flattened_list() {
        let palette = BrandPalette::new();
        assert_eq!(palette.level("primary").map(|l| l.len()), Some(3));
        assert!(palette.level("nope").is_none());

        let all = palette.colors();
        assert_eq!(all.len(), 19);
        assert_eq!(all[0].key(), "primary-red");
        assert_eq!(all[18].key(), "support-yellow");
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(Rgb::from_hex("#556677").expect("hex"), Rgb::new(0x55, 0x66, 0x77));
        assert_eq!(Rgb::from_hex("fff").expect("short"), Rgb::WHITE);
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("zzzzzz").is_err());
        assert_eq!(Rgb::new(0xCC, 0x99, 0).to_hex(), "#CC9900");
    }

    #[test]
    fn black_and_white_pass_aaa_at_18pt() {
        for (fg, bg) in [(Rgb::BLACK, Rgb::WHITE), (Rgb::WHITE, Rgb::BLACK)] {
            let report = ContrastReport::evaluate(fg, bg, 18.0, false);
            assert!(report.ratio > 7.0);
            assert!((report.ratio - 21.0).abs() < 1e-9);
            assert!(report.large_text);
            assert!(report.aaa);
            assert!(report.aaa_normal);
        }
    }

    #[test]
    fn identical_colours_have_ratio_one() {
        let grey = Rgb::from_hex("666666").expect("hex");
        assert!((contrast_ratio(grey, grey) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn brand_red_on_white_passes_aa_only() {
        let red = BrandPalette::new().resolve("primary-red").expect("red");
        let normal = ContrastReport::evaluate(red, Rgb::WHITE, 12.0, false);
        assert!(normal.ratio > 5.0 && normal.ratio < 6.0);
        assert!(normal.aa);
        assert!(!normal.aaa);

        let large = ContrastReport::evaluate(red, Rgb::WHITE, 14.0, true);
        assert!(large.large_text);
        assert!(large.aaa);
    }

    #[test]
    fn accessible_pairs_include_black_on_white() {
        let pairs = BrandPalette::new().accessible_pairs(12.0, false, WcagLevel::AAA);
        assert!(pairs
            .iter()
            .any(|(fg, bg, _)| fg.key() == "primary-black" && bg.key() == "primary-white"));
        assert!(pairs.iter().all(|(_, _, r)| r.ratio >= AAA_NORMAL));
    }
}
