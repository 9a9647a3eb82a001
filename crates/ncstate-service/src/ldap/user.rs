// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// People lookups by Unity ID or campus ID.

use ldap3::ldap_escape;
use ncstate_core::error::{NcstateError, Result};
use tracing::instrument;

use super::{Directory, Entry, SearchRequest};

/// Subtree of the directory a user search runs in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UserContext {
    #[default]
    People,
    Students,
    Employees,
    Accounts,
}

impl UserContext {
    pub fn base_dn(&self) -> &'static str {
        match self {
            Self::People => "ou=people,dc=ncsu,dc=edu",
            Self::Students => "ou=students,ou=people,dc=ncsu,dc=edu",
            Self::Employees => "ou=employees,ou=people,dc=ncsu,dc=edu",
            Self::Accounts => "ou=accounts,dc=ncsu,dc=edu",
        }
    }

    /// Parse a context name such as `students`.
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "people" => Ok(Self::People),
            "students" => Ok(Self::Students),
            "employees" => Ok(Self::Employees),
            "accounts" => Ok(Self::Accounts),
            _ => Err(NcstateError::InvalidArgument(format!(
                "Invalid context \"{value}\"; expected people, students, employees, or accounts"
            ))),
        }
    }
}

/// User searches over any [`Directory`].
#[derive(Debug)]
pub struct UserDirectory<D> {
    directory: D,
}

impl<D: Directory> UserDirectory<D> {
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    pub fn into_inner(self) -> D {
        self.directory
    }

    /// Look up a person by Unity ID (`uid`).
    #[instrument(skip(self, fields))]
    pub async fn find_by_unity_id(
        &mut self,
        unity_id: &str,
        context: UserContext,
        fields: &[&str],
    ) -> Result<Vec<Entry>> {
        let request = SearchRequest::new(format!("uid={}", ldap_escape(unity_id)), context.base_dn())
            .with_attributes(fields);
        self.directory.search(&request).await
    }

    /// Look up a person by campus ID. Needs an authenticated bind and is not
    /// available in the accounts subtree.
    #[instrument(skip(self, fields))]
    pub async fn find_by_campus_id(
        &mut self,
        campus_id: &str,
        context: UserContext,
        fields: &[&str],
    ) -> Result<Vec<Entry>> {
        if self.directory.is_anonymous() {
            return Err(NcstateError::InvalidArgument(
                "Can not search on campus ID using anonymous LDAP access".into(),
            ));
        }
        if context == UserContext::Accounts {
            return Err(NcstateError::InvalidArgument(
                "Invalid context for this method passed".into(),
            ));
        }
        let request = SearchRequest::new(
            format!("ncsucampusID={}", ldap_escape(campus_id)),
            context.base_dn(),
        )
        .with_attributes(fields);
        self.directory.search(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ldap::tests::{FakeDirectory, entry};

    #[tokio::test]
    async fn unity_id_search_uses_context() {
        let fake = FakeDirectory {
            entries: vec![entry(&[("uid", "mrwuf"), ("cn", "Mr. Wuf")])],
            ..FakeDirectory::default()
        };
        let mut users = UserDirectory::new(fake);

        let found = users
            .find_by_unity_id("mrwuf", UserContext::Students, &["cn"])
            .await
            .expect("search");
        assert_eq!(found[0]["cn"], "Mr. Wuf");

        let fake = users.into_inner();
        assert_eq!(fake.searches[0].filter, "uid=mrwuf");
        assert_eq!(fake.searches[0].base, "ou=students,ou=people,dc=ncsu,dc=edu");
        assert_eq!(fake.searches[0].attributes, ["cn"]);
    }

    #[tokio::test]
    async fn filter_values_are_escaped() {
        let mut users = UserDirectory::new(FakeDirectory::default());
        users
            .find_by_unity_id("*)(uid=*", UserContext::People, &[])
            .await
            .expect("search");
        let fake = users.into_inner();
        assert_eq!(fake.searches[0].filter, r"uid=\2a\29\28uid=\2a");
    }

    #[tokio::test]
    async fn campus_id_requires_authenticated_bind() {
        let mut users = UserDirectory::new(FakeDirectory {
            anonymous: true,
            ..FakeDirectory::default()
        });
        let err = users
            .find_by_campus_id("000123456", UserContext::People, &[])
            .await
            .expect_err("anonymous");
        assert!(err.to_string().contains("anonymous LDAP access"));
        assert!(users.into_inner().searches.is_empty());
    }

    #[tokio::test]
    async fn campus_id_rejects_accounts_context() {
        let mut users = UserDirectory::new(FakeDirectory::default());
        let result = users
            .find_by_campus_id("000123456", UserContext::Accounts, &[])
            .await;
        assert!(matches!(result, Err(NcstateError::InvalidArgument(_))));

        users
            .find_by_campus_id("000123456", UserContext::Employees, &[])
            .await
            .expect("employees");
        let fake = users.into_inner();
        assert_eq!(fake.searches.len(), 1);
        assert_eq!(fake.searches[0].filter, "ncsucampusID=000123456");
    }

    #[test]
    fn context_names() {
        assert_eq!(UserContext::parse("Employees").expect("ctx"), UserContext::Employees);
        assert!(UserContext::parse("faculty").is_err());
    }
}
