// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared client for the campus "query" web APIs (Dining, OUC).
//
// Each call is a GET on `base?{args}&method=..&format=..`. The answer, JSON or
// XML, always arrives inside a single wrapper element that is stripped before
// the result is returned. A `status` of `failure` under the method's key is
// reported as a service error.

use ncstate_core::error::{NcstateError, Result};
use ncstate_core::types::ResponseFormat;
use ncstate_core::xml;
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

/// GET-and-decode client bound to one service base URL.
#[derive(Debug, Clone)]
pub struct QueryClient {
    service: &'static str,
    base_url: String,
    format: ResponseFormat,
    /// Sent on every request between `method` and `format`.
    fixed_params: Vec<(&'static str, String)>,
    http: reqwest::Client,
    last_request_uri: Option<String>,
    last_raw_response: Option<String>,
    last_parsed_response: Option<Value>,
}

impl QueryClient {
    pub fn new(service: &'static str, base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            service,
            base_url: base_url.into(),
            format: ResponseFormat::Json,
            fixed_params: Vec::new(),
            http,
            last_request_uri: None,
            last_raw_response: None,
            last_parsed_response: None,
        }
    }

    /// Name used in service error messages.
    pub fn service(&self) -> &str {
        self.service
    }

    pub fn format(&self) -> ResponseFormat {
        self.format
    }

    pub fn set_format(&mut self, format: ResponseFormat) -> &mut Self {
        self.format = format;
        self
    }

    /// Set (or replace) a parameter sent with every request.
    pub fn set_fixed_param(&mut self, key: &'static str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        match self.fixed_params.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fixed_params.push((key, value)),
        }
        self
    }

    pub fn last_request_uri(&self) -> Option<&str> {
        self.last_request_uri.as_deref()
    }

    pub fn last_raw_response(&self) -> Option<&str> {
        self.last_raw_response.as_deref()
    }

    pub fn last_parsed_response(&self) -> Option<&Value> {
        self.last_parsed_response.as_ref()
    }

    /// Full request URL for `method` with `args`. Empty values are dropped so
    /// the service applies its own defaults.
    pub fn request_url(&self, method: &str, args: &[(&str, String)]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            NcstateError::Config(format!("invalid {} URL '{}': {e}", self.service, self.base_url))
        })?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in args {
                if !value.is_empty() {
                    query.append_pair(key, value);
                }
            }
            query.append_pair("method", method);
            for (key, value) in &self.fixed_params {
                if !value.is_empty() {
                    query.append_pair(key, value);
                }
            }
            query.append_pair("format", self.format.as_str());
        }
        Ok(url)
    }

    /// Issue `method` and return the unwrapped response.
    #[instrument(skip(self, args), fields(service = self.service))]
    pub async fn request(&mut self, method: &str, args: &[(&str, String)]) -> Result<Value> {
        self.last_request_uri = None;
        self.last_raw_response = None;
        self.last_parsed_response = None;

        let url = self.request_url(method, args)?;
        self.last_request_uri = Some(url.to_string());
        debug!(%url, "query request");

        let raw = match self.fetch(url).await {
            Ok(body) => body,
            Err(message) => {
                error!(%message, "query request failed");
                self.last_raw_response = Some(message.clone());
                return Err(NcstateError::Transport(message));
            }
        };
        self.last_raw_response = Some(raw.clone());

        let decoded = match self.format {
            ResponseFormat::Json => serde_json::from_str(&raw)?,
            ResponseFormat::Xml => xml::flatten_document(&raw)?,
        };

        let mut parsed = unwrap_outer(decoded).ok_or_else(|| NcstateError::Service {
            service: self.service.to_owned(),
            message: "response has no content".into(),
        })?;
        if self.format == ResponseFormat::Xml {
            if let Value::Object(map) = &mut parsed {
                map.remove(xml::ATTRIBUTES_KEY);
            }
        }
        self.last_parsed_response = Some(parsed.clone());

        if let Some(message) = failure_message(&parsed, method) {
            warn!(%message, "service reported failure");
            return Err(NcstateError::Service {
                service: self.service.to_owned(),
                message,
            });
        }

        info!("query succeeded");
        Ok(parsed)
    }

    async fn fetch(&self, url: Url) -> std::result::Result<String, String> {
        let response = self.http.get(url).send().await.map_err(|e| e.to_string())?;
        response.text().await.map_err(|e| e.to_string())
    }
}

/// Drop the single wrapper around every response by taking its last value.
fn unwrap_outer(value: Value) -> Option<Value> {
    match value {
        Value::Object(map) => map.into_iter().next_back().map(|(_, v)| v),
        Value::Array(mut items) => items.pop(),
        _ => None,
    }
}

/// Message of a `failure` status reported under `method`, if any.
fn failure_message(parsed: &Value, method: &str) -> Option<String> {
    let section = parsed.get(method)?;
    let status = section.get("status")?.as_str()?;
    if !status.eq_ignore_ascii_case("failure") {
        return None;
    }
    let message = parsed
        .pointer("/response/message")
        .or_else(|| section.get("message"))
        .and_then(Value::as_str)
        .unwrap_or("unknown error");
    Some(message.to_owned())
}
