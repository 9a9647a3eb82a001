// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Remedy diary fields pack every entry into one string, using private-use
// code points as separators.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Separates diary entries.
pub const ENTRY_SEPARATOR: char = '\u{F8E2}';
/// Separates the fields within an entry.
pub const FIELD_SEPARATOR: char = '\u{F8E3}';

/// One diary entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestEntry {
    pub timestamp: String,
    #[serde(rename = "userName")]
    pub user_name: String,
    pub entry: String,
}

/// Split a packed diary into entries. Blank entries are skipped and missing
/// trailing fields are left empty.
pub fn parse_digest(digest: &str) -> Vec<DigestEntry> {
    digest
        .split(ENTRY_SEPARATOR)
        .filter(|e| !e.trim().is_empty())
        .map(|e| {
            let mut fields = e.split(FIELD_SEPARATOR);
            let mut next = || fields.next().unwrap_or_default().to_owned();
            DigestEntry {
                timestamp: next(),
                user_name: next(),
                entry: next(),
            }
        })
        .collect()
}

/// Replace a string `problem_text` on `record` with its parsed entries.
pub(crate) fn expand_problem_text(record: &mut Value) {
    let Some(slot) = record.get_mut("problem_text") else {
        return;
    };
    let Some(text) = slot.as_str() else {
        return;
    };
    let entries = parse_digest(text);
    *slot = serde_json::to_value(entries).unwrap_or(Value::Array(Vec::new()));
}

/// Like [`expand_problem_text`], but a record without a diary gets an empty
/// `problem_text` list.
pub(crate) fn ensure_problem_text(record: &mut Value) {
    if let Value::Object(fields) = record {
        fields
            .entry("problem_text")
            .or_insert_with(|| Value::Array(Vec::new()));
    }
    expand_problem_text(record);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entries_and_fields() {
        let digest = "1199145600\u{F8E3}jdoe\u{F8E3}Called customer\u{F8E2}  \u{F8E2}1199232000\u{F8E3}asmith\u{F8E3}Closed";
        let parsed = parse_digest(digest);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].user_name, "jdoe");
        assert_eq!(parsed[1].entry, "Closed");
    }

    #[test]
    fn short_entry_leaves_fields_empty() {
        let parsed = parse_digest("1199145600");
        assert_eq!(parsed[0].timestamp, "1199145600");
        assert_eq!(parsed[0].user_name, "");
        assert_eq!(parsed[0].entry, "");
    }

    #[test]
    fn blank_digest_is_empty() {
        assert!(parse_digest("").is_empty());
        assert!(parse_digest(" \u{F8E2} ").is_empty());
    }

    #[test]
    fn expands_record_field() {
        let mut record = json!({ "call_id": "00001234", "problem_text": "t\u{F8E3}u\u{F8E3}e" });
        expand_problem_text(&mut record);
        assert_eq!(
            record["problem_text"],
            json!([{ "timestamp": "t", "userName": "u", "entry": "e" }])
        );
    }

    #[test]
    fn missing_diary_becomes_empty_list() {
        let mut record = json!({ "call_id": "00001234", "status": "Open" });
        ensure_problem_text(&mut record);
        assert_eq!(record["problem_text"], json!([]));

        let mut listed = json!({ "call_id": "00001234" });
        expand_problem_text(&mut listed);
        assert!(listed.get("problem_text").is_none());
    }
}
