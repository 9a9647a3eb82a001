// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Brand bar: the iframe with the required university navigation links that
// sits at the top of every public NC State page.

use std::sync::OnceLock;

use ncstate_core::config::BrandEndpoints;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::form_urlencoded;

/// Colour scheme of the bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarColor {
    #[default]
    Red,
    Black,
    RedOnWhite,
    BlackOnWhite,
}

impl BarColor {
    /// Parse a scheme name; unknown names fall back to `Red`.
    pub fn parse_lenient(value: &str) -> Self {
        match value {
            "black" => Self::Black,
            "red_on_white" => Self::RedOnWhite,
            "black_on_white" => Self::BlackOnWhite,
            _ => Self::Red,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Black => "black",
            Self::RedOnWhite => "red_on_white",
            Self::BlackOnWhite => "black_on_white",
        }
    }
}

/// Configuration for the brand bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarOptions {
    /// URL of the hosting site, used by the bar's site search.
    pub site_url: String,
    pub color: BarColor,
    pub centered: bool,
    /// Markup shown by browsers without iframe support.
    pub no_iframe_prompt: String,
    /// `id` and `name` of the iframe element.
    pub iframe_id: String,
}

impl Default for BarOptions {
    fn default() -> Self {
        Self {
            site_url: String::new(),
            color: BarColor::Red,
            centered: true,
            no_iframe_prompt: "Your browser does not support inline frames or is currently \
                configured  not to display inline frames.<br /> Visit \
                <a href=\"http://ncsu.edu/\">http://www.ncsu.edu</a>."
                .into(),
            iframe_id: "ncsu_branding_bar".into(),
        }
    }
}

/// HTML generator for the brand bar.
#[derive(Debug, Clone)]
pub struct BrandBar {
    options: BarOptions,
    endpoints: BrandEndpoints,
}

impl BrandBar {
    pub fn new(options: BarOptions) -> Self {
        Self::with_endpoints(options, BrandEndpoints::default())
    }

    pub fn with_endpoints(options: BarOptions, endpoints: BrandEndpoints) -> Self {
        Self { options, endpoints }
    }

    pub fn options(&self) -> &BarOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut BarOptions {
        &mut self.options
    }

    /// Stylesheet link, iframe, each on its own line.
    pub fn bar_html(&self) -> String {
        format!("\n{}\n{}\n", self.stylesheet_html(), self.iframe_html())
    }

    pub fn stylesheet_html(&self) -> String {
        format!(
            r#"<link rel="stylesheet" type="text/css" href="{}" media="screen" />"#,
            self.stylesheet_url()
        )
    }

    pub fn stylesheet_url(&self) -> &str {
        &self.endpoints.stylesheet_url
    }

    pub fn iframe_html(&self) -> String {
        let id = &self.options.iframe_id;
        format!(
            r#"<iframe name="{id}" id="{id}" frameborder="0" src="{}" scrolling="no">{}</iframe>"#,
            self.iframe_url(),
            self.options.no_iframe_prompt
        )
    }

    /// Iframe source URL. The site URL loses any leading `http://` or
    /// `https://` before it is encoded.
    pub fn iframe_url(&self) -> String {
        let site = strip_scheme(&self.options.site_url);
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("color", self.options.color.as_str())
            .append_pair("inurl", site)
            .append_pair("center", if self.options.centered { "yes" } else { "no" })
            .finish();
        debug!(site, color = self.options.color.as_str(), "built brand bar URL");
        format!("{}?{}", self.endpoints.iframe_url, query)
    }
}

/// Remove a leading `http://` or `https://`, ignoring case.
pub fn strip_scheme(url: &str) -> &str {
    static SCHEME: OnceLock<Regex> = OnceLock::new();
    let scheme = SCHEME.get_or_init(|| Regex::new(r"(?i)^https?://").expect("static regex"));
    match scheme.find(url) {
        Some(m) => &url[m.end()..],
        None => url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(site: &str) -> BrandBar {
        BrandBar::new(BarOptions {
            site_url: site.into(),
            ..BarOptions::default()
        })
    }

    #[test]
    fn strips_http_and_https() {
        let url = bar("http://www.ncsu.edu/oit").iframe_url();
        assert!(url.contains("inurl=www.ncsu.edu%2Foit"), "{url}");

        let url = bar("HTTPS://go.ncsu.edu").iframe_url();
        assert!(url.contains("inurl=go.ncsu.edu&"), "{url}");
    }

    #[test]
    fn leaves_schemeless_urls_alone() {
        assert_eq!(strip_scheme("ncsu.edu/http://x"), "ncsu.edu/http://x");
        assert_eq!(strip_scheme("ftp://ncsu.edu"), "ftp://ncsu.edu");
    }

    #[test]
    fn iframe_url_defaults() {
        assert_eq!(
            bar("").iframe_url(),
            "http://www.ncsu.edu/brand/utility-bar/iframe/index.php?color=red&inurl=&center=yes"
        );
    }

    #[test]
    fn options_are_encoded() {
        let mut b = bar("https://site.ncsu.edu/a b");
        b.options_mut().color = BarColor::BlackOnWhite;
        b.options_mut().centered = false;
        let url = b.iframe_url();
        assert!(url.ends_with("?color=black_on_white&inurl=site.ncsu.edu%2Fa+b&center=no"), "{url}");
    }

    #[test]
    fn unknown_color_falls_back_to_red() {
        assert_eq!(BarColor::parse_lenient("purple"), BarColor::Red);
        assert_eq!(BarColor::parse_lenient("red_on_white"), BarColor::RedOnWhite);
    }

    #[test]
    fn bar_html_layout() {
        let html = bar("ncsu.edu").bar_html();
        assert!(html.starts_with("\n<link rel=\"stylesheet\""));
        assert!(html.contains("<iframe name=\"ncsu_branding_bar\" id=\"ncsu_branding_bar\""));
        assert!(html.contains("Your browser does not support inline frames"));
        assert!(html.ends_with("</iframe>\n"));
    }
}
