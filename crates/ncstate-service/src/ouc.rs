// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Organization Unit Code lookup service.

use ncstate_core::config::{HttpSettings, OucSettings};
use ncstate_core::error::Result;
use ncstate_core::types::ResponseFormat;
use serde_json::Value;
use tracing::instrument;

use crate::query::QueryClient;

/// Default ordering for `get_all`.
pub const DEFAULT_ORDER: &str = "ouc";

#[derive(Debug, Clone)]
pub struct OucClient {
    query: QueryClient,
}

impl OucClient {
    pub fn new(settings: &OucSettings, http: &HttpSettings) -> Result<Self> {
        let client = ncstate_core::http::build_client(http)?;
        Ok(Self {
            query: QueryClient::new("OUC", settings.base_url.clone(), client),
        })
    }

    pub fn format(&self) -> ResponseFormat {
        self.query.format()
    }

    pub fn set_format(&mut self, format: ResponseFormat) -> &mut Self {
        self.query.set_format(format);
        self
    }

    pub fn query(&self) -> &QueryClient {
        &self.query
    }

    /// Details for one code.
    #[instrument(skip(self))]
    pub async fn get_ouc(&mut self, code: &str) -> Result<Value> {
        self.query.request("getOuc", &[("ouc", code.to_owned())]).await
    }

    /// Every code, ordered by `order` (`ouc` when `None`).
    #[instrument(skip(self))]
    pub async fn get_all(&mut self, order: Option<&str>) -> Result<Value> {
        let order = order.unwrap_or(DEFAULT_ORDER).to_owned();
        self.query.request("getAll", &[("order", order)]).await
    }

    #[instrument(skip(self))]
    pub async fn search(&mut self, term: &str) -> Result<Value> {
        self.query.request("searchOuc", &[("term", term.to_owned())]).await
    }
}
