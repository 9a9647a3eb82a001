// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ncstate-brand: Visual identity helpers for NC State web properties.
//
// Provides the official colour palette with WCAG contrast checks, the brand
// bar iframe markup, the standard quick links, and logo / text images rendered
// remotely or locally.

pub mod bar;
pub mod color;
pub mod generator;
pub mod logo;
pub mod quicklinks;
pub mod render;
pub mod text;

pub use bar::{BarColor, BarOptions, BrandBar};
pub use color::{BrandColor, BrandPalette, ContrastReport, Rgb, WcagLevel};
pub use generator::ImageGenerator;
pub use logo::{BrandLogo, LogoOptions, VerticalAlign};
pub use quicklinks::Quicklinks;
pub use render::ImageType;
pub use text::{BrandText, TextOptions};
