// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Campus buildings directory.

use ncstate_core::error::Result;
use tracing::instrument;

use super::{Directory, Entry, SearchRequest, sort_by_description};

pub const BUILDING_BASE: &str = "ou=buildings,dc=ncsu,dc=edu";

#[derive(Debug)]
pub struct BuildingDirectory<D> {
    directory: D,
}

impl<D: Directory> BuildingDirectory<D> {
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    pub fn into_inner(self) -> D {
        self.directory
    }

    /// Every building with an abbreviation, ordered by description.
    #[instrument(skip_all)]
    pub async fn buildings(&mut self, fields: &[&str]) -> Result<Vec<Entry>> {
        let request = SearchRequest::new("ncsuBldgAbbrev=*", BUILDING_BASE).with_attributes(fields);
        let mut buildings = self.directory.search(&request).await?;
        sort_by_description(&mut buildings);
        Ok(buildings)
    }
}
