// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Remedy (ARS) ticketing client.
//
// Each Remedy form is published as its own SOAP endpoint under the service
// base URL (`calls`, `users`, `workgroups`, ...). Every operation is a single
// POST; required fields are checked before anything is sent.

pub mod digest;
pub mod fields;
pub mod soap;

use ncstate_core::config::{HttpSettings, RemedySettings};
use ncstate_core::error::{NcstateError, Result};
use serde_json::Value;
use tracing::{debug, error, info, instrument};

pub use digest::{DigestEntry, parse_digest};
pub use fields::{FieldMap, SoapArgs};

use fields::{
    ATTACHMENT_FIELDS, CALL_CREATE_FIELDS, CALL_CREATE_REQUIRED, CALL_UPDATE_FIELDS, EMAIL_FIELDS,
    USER_UPDATE_FIELDS, has, merge, pad_call_id, require,
};

/// Qualification used by [`RemedyClient::top_solution_list`] when none is given.
pub const DEFAULT_TOP_SOLUTION_QUALIFICATION: &str = "'Status' <= \"Published\"";

fn arg(name: &'static str, value: impl Into<String>) -> (&'static str, Option<String>) {
    (name, Some(value.into()))
}

fn opt_arg<T: ToString>(name: &'static str, value: Option<T>) -> (&'static str, Option<String>) {
    (name, value.map(|v| v.to_string()))
}

/// Paging arguments, added only when set.
fn push_paging(args: &mut SoapArgs, start_record: Option<u32>, max_limit: Option<u32>) {
    if let Some(start) = start_record {
        args.push(arg("start_record", start.to_string()));
    }
    if let Some(max) = max_limit {
        args.push(arg("max_limit", max.to_string()));
    }
}

/// Authenticated client for the Remedy SOAP endpoints.
#[derive(Debug, Clone)]
pub struct RemedyClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
    last_request: Option<String>,
    last_response: Option<String>,
}

impl RemedyClient {
    pub fn new(
        settings: &RemedySettings,
        http: &HttpSettings,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self {
            http: ncstate_core::http::build_client(http)?,
            base_url: settings.base_url.trim_end_matches('/').to_owned(),
            username: username.into(),
            password: password.into(),
            last_request: None,
            last_response: None,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Envelope of the most recent request.
    pub fn last_request(&self) -> Option<&str> {
        self.last_request.as_deref()
    }

    /// Raw body of the most recent response.
    pub fn last_response(&self) -> Option<&str> {
        self.last_response.as_deref()
    }

    // -- Calls --------------------------------------------------------------

    /// Fetch a call; its diary is returned as parsed entries.
    pub async fn call_get(&mut self, call_id: &str) -> Result<Value> {
        let args = vec![arg("call_id", pad_call_id(call_id))];
        let mut result = self.request("calls", "get-entry", &args).await?;
        digest::ensure_problem_text(&mut result);
        Ok(result)
    }

    pub async fn call_list(
        &mut self,
        qualification: &str,
        start_record: Option<u32>,
        max_limit: Option<u32>,
    ) -> Result<Value> {
        let args = vec![
            arg("qualification", qualification),
            opt_arg("start_record", start_record),
            opt_arg("max_limit", max_limit),
        ];
        self.request("calls", "get-list", &args).await
    }

    /// Update a call. Setting `email_to` and `email_text` together also
    /// sends an email; either one alone is an error.
    pub async fn call_update(&mut self, call_id: &str, data: &FieldMap) -> Result<Value> {
        let mut args = merge(
            CALL_UPDATE_FIELDS,
            &[("call_id", pad_call_id(call_id))],
            data,
        );

        let email_to = has(&args, "email_to");
        let email_text = has(&args, "email_text");
        match (email_to, email_text) {
            (true, true) => args.push(arg("send_email", "Pending")),
            (true, false) => {
                return Err(NcstateError::Validation(
                    "If email_to field is set, email_text must also be set".into(),
                ));
            }
            (false, true) => {
                return Err(NcstateError::Validation(
                    "If email_text field is set, email_to must also be set".into(),
                ));
            }
            (false, false) => args.retain(|(k, _)| !EMAIL_FIELDS.contains(k)),
        }

        self.request("calls", "update-entry", &args).await
    }

    /// Create a call. `agent` defaults to the authenticated user.
    pub async fn call_create(&mut self, data: &FieldMap) -> Result<Value> {
        let args = merge(CALL_CREATE_FIELDS, &[("agent", self.username.clone())], data);

        for field in CALL_CREATE_REQUIRED {
            require(&args, field)?;
        }
        if !has(&args, "workgroup_id") && !has(&args, "workgroup") {
            return Err(NcstateError::Validation(
                "Field for \"workgroup\" or \"workgroup_id\" is required and not set".into(),
            ));
        }

        self.request("calls", "create-entry", &args).await
    }

    pub async fn call_attachment_get(&mut self, entry_id: &str) -> Result<Value> {
        let args = vec![arg("entry_id", entry_id)];
        self.request("calls-attachments", "get-entry", &args).await
    }

    pub async fn call_attachment_list(&mut self, call_id: &str) -> Result<Value> {
        let args = vec![
            arg("call_id", pad_call_id(call_id)),
            ("start_record", None),
            ("max_limit", None),
        ];
        self.request("calls-attachments", "get-list-entry", &args).await
    }

    /// Attach a file to a call. Every attachment field must be present.
    pub async fn call_attachment_create(&mut self, call_id: &str, data: &FieldMap) -> Result<Value> {
        let args = merge(ATTACHMENT_FIELDS, &[("call_id", pad_call_id(call_id))], data);
        for field in ATTACHMENT_FIELDS {
            require(&args, field)?;
        }
        self.request("calls-attachments", "create-entry", &args).await
    }

    pub async fn call_history_get(&mut self, entry_id: &str) -> Result<Value> {
        let args = vec![arg("entry_id", entry_id)];
        self.request("calls-history", "get-entry", &args).await
    }

    pub async fn call_history_list(
        &mut self,
        call_id: &str,
        max_limit: Option<u32>,
        start_record: Option<u32>,
    ) -> Result<Value> {
        let args = vec![
            arg("call_id", pad_call_id(call_id)),
            opt_arg("max_limit", max_limit),
            opt_arg("start_record", start_record),
        ];
        self.request("calls-history", "get-list-entry", &args).await
    }

    /// Customer-facing call listing; each call's diary is parsed.
    pub async fn call_cust_list(
        &mut self,
        qualification: &str,
        start_record: Option<u32>,
        max_limit: Option<u32>,
    ) -> Result<Value> {
        let args = vec![
            arg("qualification", qualification),
            opt_arg("start_record", start_record),
            opt_arg("max_limit", max_limit),
        ];
        let mut result = self.request("calls-cust", "get-list-entry", &args).await?;
        match result.get_mut("getListValues") {
            Some(Value::Array(calls)) => calls.iter_mut().for_each(digest::expand_problem_text),
            Some(call) => digest::expand_problem_text(call),
            None => {}
        }
        Ok(result)
    }

    pub async fn call_cust_get(&mut self, call_id: &str) -> Result<Value> {
        let args = vec![arg("call_id", pad_call_id(call_id))];
        let mut result = self.request("calls-cust", "get-entry", &args).await?;
        digest::ensure_problem_text(&mut result);
        Ok(result)
    }

    // -- Customers and workgroups -------------------------------------------

    pub async fn customer_get_by_cid(&mut self, cid: &str) -> Result<Value> {
        let args = vec![arg("cid", cid), ("login", None)];
        self.request("customers", "get-entry", &args).await
    }

    pub async fn customer_get_by_login(&mut self, login: &str) -> Result<Value> {
        let args = vec![arg("login", login), ("cid", None)];
        self.request("customers", "get-entry", &args).await
    }

    pub async fn workgroup_get_by_id(&mut self, workgroup_id: &str) -> Result<Value> {
        let args = vec![arg("group_id", workgroup_id), ("group_name", None)];
        self.request("workgroups", "get-entry", &args).await
    }

    pub async fn workgroup_get_by_name(&mut self, name: &str) -> Result<Value> {
        let args = vec![arg("group_name", name), arg("group_id", "-1")];
        self.request("workgroups", "get-entry", &args).await
    }

    pub async fn workgroup_list(
        &mut self,
        qualification: &str,
        start_record: Option<u32>,
        max_limit: Option<u32>,
    ) -> Result<Value> {
        let mut args = vec![arg("qualification", qualification)];
        push_paging(&mut args, start_record, max_limit);
        self.request("workgroups", "get-list-entry", &args).await
    }

    // -- Users ----------------------------------------------------------------

    pub async fn user_get_by_user_id(&mut self, user_id: &str) -> Result<Value> {
        let args = vec![arg("user_id", user_id)];
        self.request("users", "get-entry", &args).await
    }

    pub async fn user_get_by_login(&mut self, login: &str) -> Result<Value> {
        let args = vec![arg("login_name", login)];
        self.request("users", "get-entry", &args).await
    }

    /// Check a Remedy login and password.
    pub async fn validate_credentials(&mut self, login: &str, password: &str) -> Result<Value> {
        let args = vec![arg("login_name", login), arg("password", password)];
        self.request("users", "validate-credentials", &args).await
    }

    pub async fn user_list(
        &mut self,
        qualification: &str,
        start_record: Option<u32>,
        max_limit: Option<u32>,
    ) -> Result<Value> {
        let args = vec![
            arg("qualification", qualification),
            opt_arg("start_record", start_record),
            opt_arg("max_limit", max_limit),
        ];
        self.request("users", "get-list-entry", &args).await
    }

    pub async fn user_update(&mut self, user_id: &str, data: &FieldMap) -> Result<Value> {
        let defaults: Vec<(&str, String)> = if user_id.is_empty() {
            Vec::new()
        } else {
            vec![("user_id", user_id.to_owned())]
        };
        let args = merge(USER_UPDATE_FIELDS, &defaults, data);
        require(&args, "user_id")?;
        self.request("users", "update-entry", &args).await
    }

    // -- Solutions and knowledge base ----------------------------------------

    pub async fn solution_get(&mut self, solution_id: &str) -> Result<Value> {
        let args = vec![arg("solution_id", solution_id)];
        self.request("solutions", "get-entry", &args).await
    }

    /// List solutions, with or without their keywords.
    pub async fn solution_list(
        &mut self,
        qualification: &str,
        start_record: Option<u32>,
        max_limit: Option<u32>,
        with_keywords: bool,
    ) -> Result<Value> {
        let mut args = vec![arg("qualification", qualification)];
        push_paging(&mut args, start_record, max_limit);
        let operation = if with_keywords {
            "get-list-entry"
        } else {
            "get-listNoKWDS"
        };
        self.request("solutions", operation, &args).await
    }

    /// Most-viewed solutions. `None` arguments fall back to the published
    /// solutions, starting at record 0, ten at a time.
    pub async fn top_solution_list(
        &mut self,
        qualification: Option<&str>,
        start_record: Option<u32>,
        max_limit: Option<u32>,
    ) -> Result<Value> {
        let mut args = vec![arg(
            "qualification",
            qualification.unwrap_or(DEFAULT_TOP_SOLUTION_QUALIFICATION),
        )];
        push_paging(&mut args, Some(start_record.unwrap_or(0)), Some(max_limit.unwrap_or(10)));
        self.request("solutions-by-wwwused", "get-list", &args).await
    }

    pub async fn survey_list(
        &mut self,
        qualification: &str,
        start_record: Option<u32>,
        max_limit: Option<u32>,
    ) -> Result<Value> {
        let mut args = vec![arg("qualification", qualification)];
        push_paging(&mut args, start_record, max_limit);
        self.request("surveys", "get-list-entry", &args).await
    }

    pub async fn keyword_list(
        &mut self,
        solution_id: &str,
        start_record: Option<u32>,
        max_limit: Option<u32>,
    ) -> Result<Value> {
        let args = vec![
            arg("solution_id", solution_id),
            opt_arg("startRecord", start_record),
            opt_arg("maxLimit", max_limit),
        ];
        self.request("keywords", "get-list", &args).await
    }

    /// Bump a usage counter on a solution.
    pub async fn solution_increment(
        &mut self,
        field_name: &str,
        service: &str,
        solution_id: &str,
    ) -> Result<Value> {
        let args = vec![
            arg("field_name", field_name),
            arg("service", service),
            arg("solutionid", solution_id),
        ];
        self.request("solutions-inc-counter", "increment", &args).await
    }

    // -- Transport -------------------------------------------------------------

    #[instrument(skip(self, args), fields(user = %self.username))]
    async fn request(&mut self, endpoint: &str, operation: &str, args: &SoapArgs) -> Result<Value> {
        let envelope =
            soap::build_envelope(endpoint, operation, &self.username, &self.password, args)?;
        let url = format!("{}/{endpoint}", self.base_url);
        self.last_request = Some(envelope.clone());
        self.last_response = None;
        debug!(%url, "sending SOAP request");

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", soap::action(endpoint, operation))
            .body(envelope)
            .send()
            .await
            .map_err(|e| {
                error!("Remedy request failed: {e}");
                NcstateError::Soap(e.to_string())
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| NcstateError::Soap(e.to_string()))?;
        self.last_response = Some(body.clone());

        match soap::parse_response(&body) {
            Ok(value) if status.is_success() => {
                info!(%status, "SOAP call completed");
                Ok(value)
            }
            Ok(_) => {
                error!(%status, "Remedy answered with an HTTP error");
                Err(NcstateError::Soap(format!("HTTP {status}")))
            }
            Err(NcstateError::Xml(detail)) if !status.is_success() => {
                Err(NcstateError::Soap(format!("HTTP {status}: {detail}")))
            }
            Err(e) => Err(e),
        }
    }
}
