// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Client for the remote logo and text image renderers. Requests are plain
// GETs with the image options in the query string; the response body is an
// encoded image.

use image::DynamicImage;
use ncstate_core::config::HttpSettings;
use ncstate_core::error::{NcstateError, Result};
use ncstate_core::http::build_client;
use tracing::{debug, error, info, instrument};
use url::Url;

/// HTTP front-end for the image generation services.
#[derive(Debug, Clone)]
pub struct ImageGenerator {
    http: reqwest::Client,
}

impl ImageGenerator {
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        Ok(Self {
            http: build_client(settings)?,
        })
    }

    /// Build `base_url?pairs` with form encoding.
    pub fn request_url(base_url: &str, pairs: &[(&str, String)]) -> Result<Url> {
        let mut url = Url::parse(base_url)
            .map_err(|e| NcstateError::Config(format!("invalid generator URL '{base_url}': {e}")))?;
        url.query_pairs_mut()
            .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())));
        Ok(url)
    }

    /// GET the rendered image and decode it.
    #[instrument(skip(self, pairs))]
    pub async fn fetch(&self, base_url: &str, pairs: &[(&str, String)]) -> Result<DynamicImage> {
        let url = Self::request_url(base_url, pairs)?;
        debug!(%url, "requesting generated image");

        let response = self.http.get(url).send().await.map_err(|e| {
            error!("image generator unreachable: {e}");
            NcstateError::Transport(e.to_string())
        })?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| NcstateError::Transport(e.to_string()))?;

        let image = image::load_from_memory(&body).map_err(|e| {
            error!(%status, bytes = body.len(), "generator returned no image");
            NcstateError::Image(format!("response is not a decodable image: {e}"))
        })?;
        info!(width = image.width(), height = image.height(), "generated image received");
        Ok(image)
    }
}
