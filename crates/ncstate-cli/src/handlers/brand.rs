// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Brand subcommands: palette, contrast, bar, quick links, images.

use std::cmp::Ordering;

use anyhow::{Context, Result, bail};
use ncstate_brand::render::ImageType;
use ncstate_brand::{
    BarColor, BarOptions, BrandBar, BrandLogo, BrandPalette, BrandText, ContrastReport,
    ImageGenerator, LogoOptions, Quicklinks, Rgb, TextOptions, WcagLevel,
};
use ncstate_core::NcstateConfig;
use ncstate_core::version::{VERSION, compare_version};
use tracing::info;

use super::print_json;
use crate::args::{ImageArgs, Level};

pub fn colors(level: Option<&str>) -> Result<()> {
    let palette = BrandPalette::new();
    let colors = match level {
        Some(level) => palette
            .level(level)
            .with_context(|| format!("unknown palette level '{level}'"))?,
        None => palette.colors(),
    };
    for color in colors {
        println!("{:<20} {}", color.key(), color.hex());
    }
    Ok(())
}

pub fn color(key: &str) -> Result<()> {
    let rgb = BrandPalette::new().resolve(key)?;
    println!("{key}: {rgb} (r={}, g={}, b={})", rgb.red, rgb.green, rgb.blue);
    Ok(())
}

/// A palette key, or failing that a hex colour.
fn parse_color(value: &str) -> Result<Rgb> {
    match BrandPalette::new().resolve(value) {
        Ok(rgb) => Ok(rgb),
        Err(_) => Rgb::from_hex(value)
            .with_context(|| format!("'{value}' is neither a palette key nor a hex colour")),
    }
}

pub fn contrast(foreground: &str, background: &str, size: f64, bold: bool) -> Result<()> {
    let report = ContrastReport::evaluate(parse_color(foreground)?, parse_color(background)?, size, bold);
    print_json(&report)
}

pub fn accessible(size: f64, bold: bool, level: Level) -> Result<()> {
    let level = match level {
        Level::Aa => WcagLevel::AA,
        Level::Aaa => WcagLevel::AAA,
    };
    for (fg, bg, report) in BrandPalette::new().accessible_pairs(size, bold, level) {
        println!("{:<20} on {:<20} {:>6.2}:1", fg.key(), bg.key(), report.ratio);
    }
    Ok(())
}

pub fn bar(config: &NcstateConfig, site_url: String, color: &str, centered: bool) {
    let options = BarOptions {
        site_url,
        color: BarColor::parse_lenient(color),
        centered,
        ..BarOptions::default()
    };
    println!("{}", BrandBar::with_endpoints(options, config.brand.clone()).bar_html());
}

pub fn quicklinks() {
    for (label, url) in Quicklinks.links() {
        println!("{label:<32} {url}");
    }
}

pub fn version(other: Option<&str>) {
    match other {
        None => println!("{VERSION}"),
        Some(other) => {
            let relation = match compare_version(other) {
                Ordering::Less => "older than",
                Ordering::Equal => "the same as",
                Ordering::Greater => "newer than",
            };
            println!("{other} is {relation} {VERSION}");
        }
    }
}

pub async fn logo(config: &NcstateConfig, bold: &str, normal: &str, image: &ImageArgs) -> Result<()> {
    let mut options = LogoOptions {
        transparent: image.transparent,
        path_to_fonts: image.fonts.clone(),
        image_type: image_type(&image.format)?,
        save_path: Some(image.out.clone()),
        ..LogoOptions::default()
    };
    if let Some(width) = image.width {
        options.width = width;
    }
    if let Some(height) = image.height {
        options.height = height;
    }

    let logo = BrandLogo::new(bold, normal, options);
    let rendered = if image.local {
        logo.create_image()?
    } else {
        let generator = ImageGenerator::new(&config.http)?;
        logo.fetch_image(&generator, &config.brand).await?
    };
    info!(path = %image.out.display(), width = rendered.width(), height = rendered.height(), "logo written");
    Ok(())
}

pub async fn text(config: &NcstateConfig, text: &str, image: &ImageArgs) -> Result<()> {
    let text = text.replace("\\n", "\n");
    if !ncstate_brand::text::is_valid_text(&text) {
        bail!("the university name must be rendered with `ncstate logo`, not as text");
    }

    let mut options = TextOptions {
        transparent: image.transparent,
        path_to_fonts: image.fonts.clone(),
        image_type: image_type(&image.format)?,
        save_path: Some(image.out.clone()),
        ..TextOptions::default()
    };
    if let Some(width) = image.width {
        options.width = width;
    }
    if let Some(height) = image.height {
        options.height = height;
    }

    let brand_text = BrandText::new(&text, options);
    let rendered = if image.local {
        brand_text.create_image()?
    } else {
        let generator = ImageGenerator::new(&config.http)?;
        brand_text.fetch_image(&generator, &config.brand).await?
    };
    info!(path = %image.out.display(), width = rendered.width(), height = rendered.height(), "text image written");
    Ok(())
}

fn image_type(format: &str) -> Result<ImageType> {
    match format.to_ascii_lowercase().as_str() {
        "png" | "gif" | "jpeg" | "jpg" => Ok(ImageType::parse_lenient(format)),
        other => bail!("unsupported image format '{other}' (png, gif, jpeg)"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colours_from_keys_or_hex() {
        assert_eq!(parse_color("primary-red").expect("key"), Rgb::new(0xCC, 0, 0));
        assert_eq!(parse_color("#336699").expect("hex"), Rgb::new(0x33, 0x66, 0x99));
        assert!(parse_color("primary-mauve").is_err());
    }

    #[test]
    fn image_formats() {
        assert_eq!(image_type("GIF").expect("gif"), ImageType::Gif);
        assert!(image_type("webp").is_err());
    }
}
