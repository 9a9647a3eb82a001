// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Field schemas for Remedy write operations and the helpers that merge
// caller data into them.

use std::collections::BTreeMap;

use ncstate_core::error::{NcstateError, Result};

/// Caller-supplied field values, keyed by Remedy field name.
pub type FieldMap = BTreeMap<String, String>;

/// An ordered SOAP argument list. `None` is sent as an empty element.
pub type SoapArgs = Vec<(&'static str, Option<String>)>;

pub const EMAIL_FIELDS: &[&str] = &[
    "email_to",
    "email_text",
    "email_cc",
    "email_bcc",
    "email_subject",
];

pub const CALL_UPDATE_FIELDS: &[&str] = &[
    "action",
    "call_id",
    "customer_id",
    "date_nextcontact",
    "impact",
    "on_site_visit",
    "origin",
    "owner_id",
    "owner",
    "priority",
    "problem_text",
    "problem",
    "product_id",
    "product",
    "solution_id",
    "status",
    "time_spent",
    "workgroup_id",
    "workgroup",
    "email_to",
    "email_text",
    "email_cc",
    "email_bcc",
    "email_subject",
];

pub const CALL_CREATE_FIELDS: &[&str] = &[
    "action",
    "agent",
    "comments",
    "customer_id",
    "date_nextcontact",
    "impact",
    "on_site_visit",
    "origin",
    "owner_id",
    "owner",
    "priority",
    "problem_text",
    "problem",
    "product_id",
    "product",
    "solution_id",
    "status",
    "time_spent",
    "workgroup_id",
    "workgroup",
];

/// Required on call creation, in the order they are checked.
pub const CALL_CREATE_REQUIRED: &[&str] = &["impact", "origin", "priority", "problem", "status"];

/// Every attachment field is required.
pub const ATTACHMENT_FIELDS: &[&str] = &[
    "attachment_data",
    "attachment_name",
    "attachment_size",
    "call_id",
    "type",
    "status",
];

pub const USER_UPDATE_FIELDS: &[&str] = &[
    "availability",
    "default_notify_mechanism",
    "email_address",
    "email_signature",
    "initial_query",
    "pager_address",
    "pager_template",
    "password",
    "products_count",
    "solutions_count",
    "user_id",
];

/// Walk `schema` in order, taking each value from `data`, else from
/// `defaults`. Fields with neither are left out.
pub fn merge(schema: &[&'static str], defaults: &[(&str, String)], data: &FieldMap) -> SoapArgs {
    schema
        .iter()
        .filter_map(|&field| {
            data.get(field)
                .cloned()
                .or_else(|| {
                    defaults
                        .iter()
                        .find(|(k, _)| *k == field)
                        .map(|(_, v)| v.clone())
                })
                .map(|value| (field, Some(value)))
        })
        .collect()
}

pub fn has(args: &SoapArgs, field: &str) -> bool {
    args.iter().any(|(k, v)| *k == field && v.is_some())
}

pub fn require(args: &SoapArgs, field: &str) -> Result<()> {
    if has(args, field) {
        Ok(())
    } else {
        Err(NcstateError::missing_field(field))
    }
}

/// Left-pad a call id with zeros to eight characters.
pub fn pad_call_id(call_id: &str) -> String {
    format!("{call_id:0>8}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(pairs: &[(&str, &str)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn merge_follows_schema_order() {
        let args = merge(
            CALL_CREATE_FIELDS,
            &[("agent", "svc_account".into())],
            &data(&[("status", "Open"), ("impact", "1"), ("unknown", "x")]),
        );
        let keys: Vec<_> = args.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, ["agent", "impact", "status"]);
    }

    #[test]
    fn caller_data_overrides_defaults() {
        let args = merge(CALL_CREATE_FIELDS, &[("agent", "svc".into())], &data(&[("agent", "jdoe")]));
        assert_eq!(args, vec![("agent", Some("jdoe".to_owned()))]);
    }

    #[test]
    fn required_field_message() {
        let err = require(&Vec::new(), "impact").expect_err("missing");
        assert_eq!(err.to_string(), "Field for \"impact\" is required and not set");
    }

    #[test]
    fn call_ids_are_padded() {
        assert_eq!(pad_call_id("1234"), "00001234");
        assert_eq!(pad_call_id("123456789"), "123456789");
    }
}
