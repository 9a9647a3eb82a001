// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Organisational units directory.

use ncstate_core::error::Result;
use tracing::instrument;

use super::{Directory, Entry, SearchRequest, sort_by_description};

pub const UNIT_BASE: &str = "ou=units,dc=ncsu,dc=edu";

#[derive(Debug)]
pub struct UnitDirectory<D> {
    directory: D,
}

impl<D: Directory> UnitDirectory<D> {
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    pub fn into_inner(self) -> D {
        self.directory
    }

    /// Every unit, ordered by description.
    #[instrument(skip_all)]
    pub async fn units(&mut self, fields: &[&str]) -> Result<Vec<Entry>> {
        let request = SearchRequest::new("ou=*", UNIT_BASE).with_attributes(fields);
        let mut units = self.directory.search(&request).await?;
        sort_by_description(&mut units);
        Ok(units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ldap::tests::{FakeDirectory, entry};

    #[tokio::test]
    async fn units_search_and_sort() {
        let fake = FakeDirectory {
            entries: vec![
                entry(&[("ou", "oit"), ("description", "Office of Information Technology")]),
                entry(&[("ou", "dasa"), ("description", "Academic and Student Affairs")]),
                entry(&[("ou", "misc")]),
            ],
            ..FakeDirectory::default()
        };
        let mut directory = UnitDirectory::new(fake);

        let units = directory.units(&["ou", "description"]).await.expect("units");
        let codes: Vec<_> = units.iter().map(|u| u["ou"].as_str()).collect();
        assert_eq!(codes, ["misc", "dasa", "oit"]);

        let fake = directory.into_inner();
        assert_eq!(fake.searches[0].filter, "ou=*");
        assert_eq!(fake.searches[0].attributes, ["ou", "description"]);
    }
}
