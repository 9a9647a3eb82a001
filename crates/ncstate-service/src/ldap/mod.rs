// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Campus LDAP directory access.
//
// `LdapConnector` talks to the real server; the entity wrappers (`UserDirectory`,
// `BuildingDirectory`, `UnitDirectory`) only need something implementing
// `Directory`, so they can run against any backend.

mod building;
mod connector;
mod unit;
mod user;

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::future::Future;

use ncstate_core::error::Result;
use ncstate_core::types::SortDirection;

pub use building::BuildingDirectory;
pub use connector::LdapConnector;
pub use unit::UnitDirectory;
pub use user::{UserContext, UserDirectory};

/// One directory entry: lower-cased attribute name → first value.
pub type Entry = BTreeMap<String, String>;

/// Attributes requested when the caller names none: all user and
/// operational attributes.
pub const ALL_ATTRIBUTES: [&str; 2] = ["*", "+"];

/// A subtree search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub filter: String,
    pub base: String,
    /// Empty means every attribute.
    pub attributes: Vec<String>,
    /// Client-side natural sort on an attribute.
    pub sort: Option<(String, SortDirection)>,
}

impl SearchRequest {
    pub fn new(filter: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            base: base.into(),
            attributes: Vec::new(),
            sort: None,
        }
    }

    pub fn with_attributes<S: AsRef<str>>(mut self, attributes: &[S]) -> Self {
        self.attributes = attributes.iter().map(|a| a.as_ref().to_owned()).collect();
        self
    }

    pub fn sorted_by(mut self, key: impl Into<String>, direction: SortDirection) -> Self {
        self.sort = Some((key.into(), direction));
        self
    }

    /// Attributes to send to the server.
    pub fn requested_attributes(&self) -> Vec<String> {
        if self.attributes.is_empty() {
            ALL_ATTRIBUTES.iter().map(|a| (*a).to_owned()).collect()
        } else {
            self.attributes.clone()
        }
    }
}

/// A searchable directory.
pub trait Directory {
    /// Whether the connection was bound without credentials.
    fn is_anonymous(&self) -> bool;

    /// Run a search and return flattened, optionally sorted entries.
    fn search(&mut self, request: &SearchRequest) -> impl Future<Output = Result<Vec<Entry>>> + Send;
}

/// Reduce multi-valued attributes to their first value, lower-casing names.
/// The `dn` is not an attribute and is left out.
pub fn flatten_attributes(attrs: HashMap<String, Vec<String>>) -> Entry {
    attrs
        .into_iter()
        .filter_map(|(name, values)| {
            let name = name.to_lowercase();
            if name == "dn" {
                return None;
            }
            values.into_iter().next().map(|first| (name, first))
        })
        .collect()
}

/// Apply the request's sort, if any.
pub fn sort_entries(entries: &mut [Entry], sort: Option<&(String, SortDirection)>) {
    let Some((key, direction)) = sort else {
        return;
    };
    let key = key.to_lowercase();
    entries.sort_by(|a, b| {
        natural_cmp(
            a.get(&key).map(String::as_str).unwrap_or(""),
            b.get(&key).map(String::as_str).unwrap_or(""),
        )
    });
    if *direction == SortDirection::Desc {
        entries.reverse();
    }
}

/// Sort by `description` in plain byte order.
pub(crate) fn sort_by_description(entries: &mut [Entry]) {
    entries.sort_by(|a, b| {
        let a = a.get("description").map(String::as_str).unwrap_or("");
        let b = b.get("description").map(String::as_str).unwrap_or("");
        a.cmp(b)
    });
}

/// Case-insensitive "natural" comparison: digit runs compare by value, so
/// `room9` sorts before `room10`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = a.chars().peekable();
    let mut right = b.chars().peekable();

    loop {
        while left.peek().is_some_and(|c| c.is_whitespace()) {
            left.next();
        }
        while right.peek().is_some_and(|c| c.is_whitespace()) {
            right.next();
        }

        match (left.peek().copied(), right.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) if l.is_ascii_digit() && r.is_ascii_digit() => {
                let ln = take_digits(&mut left);
                let rn = take_digits(&mut right);
                let lt = ln.trim_start_matches('0');
                let rt = rn.trim_start_matches('0');
                let ord = lt.len().cmp(&rt.len()).then_with(|| lt.cmp(rt));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(l), Some(r)) => {
                let ord = l.to_lowercase().cmp(r.to_lowercase());
                if ord != Ordering::Equal {
                    return ord;
                }
                left.next();
                right.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut digits = String::new();
    while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
        digits.push(c);
        chars.next();
    }
    digits
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// In-memory directory returning canned entries and recording searches.
    #[derive(Default)]
    pub(crate) struct FakeDirectory {
        pub anonymous: bool,
        pub entries: Vec<Entry>,
        pub searches: Vec<SearchRequest>,
    }

    impl Directory for FakeDirectory {
        fn is_anonymous(&self) -> bool {
            self.anonymous
        }

        async fn search(&mut self, request: &SearchRequest) -> Result<Vec<Entry>> {
            self.searches.push(request.clone());
            let mut entries = self.entries.clone();
            sort_entries(&mut entries, request.sort.as_ref());
            Ok(entries)
        }
    }

    pub(crate) fn entry(pairs: &[(&str, &str)]) -> Entry {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    #[test]
    fn natural_ordering() {
        assert_eq!(natural_cmp("room9", "room10"), Ordering::Less);
        assert_eq!(natural_cmp("Alpha", "alpha"), Ordering::Equal);
        assert_eq!(natural_cmp("b", "A"), Ordering::Greater);
        assert_eq!(natural_cmp("x007", "x7"), Ordering::Equal);
        assert_eq!(natural_cmp("", "a"), Ordering::Less);
    }

    #[test]
    fn flatten_keeps_first_value_and_drops_dn() {
        let mut attrs = HashMap::new();
        attrs.insert("cn".to_owned(), vec!["Mr. Wuf".to_owned(), "Wuf".to_owned()]);
        attrs.insert("DN".to_owned(), vec!["uid=wuf,ou=people".to_owned()]);
        attrs.insert("Mail".to_owned(), vec!["wuf@ncsu.edu".to_owned()]);
        attrs.insert("empty".to_owned(), Vec::new());

        let entry = flatten_attributes(attrs);
        assert_eq!(entry.get("cn").map(String::as_str), Some("Mr. Wuf"));
        assert_eq!(entry.get("mail").map(String::as_str), Some("wuf@ncsu.edu"));
        assert!(!entry.contains_key("dn"));
        assert!(!entry.contains_key("empty"));
    }

    #[test]
    fn sort_descending_reverses() {
        let mut entries = vec![
            entry(&[("sn", "item10")]),
            entry(&[("sn", "Item2")]),
            entry(&[("sn", "item1")]),
        ];
        sort_entries(&mut entries, Some(&("sn".into(), SortDirection::Asc)));
        let order: Vec<_> = entries.iter().map(|e| e["sn"].clone()).collect();
        assert_eq!(order, ["item1", "Item2", "item10"]);

        sort_entries(&mut entries, Some(&("SN".into(), SortDirection::Desc)));
        assert_eq!(entries[0]["sn"], "item10");
    }

    #[test]
    fn empty_attribute_list_requests_everything() {
        let request = SearchRequest::new("uid=wuf", "ou=people,dc=ncsu,dc=edu");
        assert_eq!(request.requested_attributes(), ["*", "+"]);
        let request = request.with_attributes(&["cn"]);
        assert_eq!(request.requested_attributes(), ["cn"]);
    }
}
