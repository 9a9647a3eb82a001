// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// LDAP v3 connection to the campus directory using `ldap3`'s async API.
//
// Anonymous binds go to the plain server; as soon as both a bind DN and a
// password are supplied the secure (ldaps) server is used instead.

use ldap3::{LdapConnAsync, LdapError, Scope, SearchEntry, SearchOptions};
use ncstate_core::config::LdapSettings;
use ncstate_core::error::{NcstateError, Result};
use tracing::{debug, info, instrument, warn};

use super::{Directory, Entry, SearchRequest, flatten_attributes, sort_entries};

/// LDAP result code for "size limit exceeded"; the entries up to the limit
/// are still returned.
const SIZE_LIMIT_EXCEEDED: u32 = 4;

/// A bound LDAP connection.
pub struct LdapConnector {
    ldap: ldap3::Ldap,
    anonymous: bool,
    max_results: i32,
}

impl std::fmt::Debug for LdapConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LdapConnector")
            .field("anonymous", &self.anonymous)
            .field("max_results", &self.max_results)
            .finish_non_exhaustive()
    }
}

impl LdapConnector {
    /// Connect and bind. Either credential empty means an anonymous bind.
    #[instrument(skip(settings, password))]
    pub async fn connect(settings: &LdapSettings, bind_dn: &str, password: &str) -> Result<Self> {
        let anonymous = bind_dn.is_empty() || password.is_empty();
        let url = if anonymous {
            &settings.server_url
        } else {
            &settings.secure_server_url
        };
        debug!(%url, anonymous, "connecting to directory");

        let (conn, mut ldap) = LdapConnAsync::new(url).await.map_err(ldap_error)?;
        tokio::spawn(async move {
            if let Err(e) = conn.drive().await {
                warn!("LDAP connection error: {e}");
            }
        });

        let (dn, pw) = if anonymous { ("", "") } else { (bind_dn, password) };
        ldap.simple_bind(dn, pw)
            .await
            .and_then(|result| result.success())
            .map_err(ldap_error)?;

        info!(%url, anonymous, "directory bind succeeded");
        Ok(Self {
            ldap,
            anonymous,
            max_results: settings.max_results,
        })
    }

    /// Server-side size limit applied to searches (0 = none).
    pub fn max_results(&self) -> i32 {
        self.max_results
    }

    pub fn set_max_results(&mut self, max_results: i32) -> &mut Self {
        self.max_results = max_results;
        self
    }

    /// Close the connection.
    pub async fn unbind(mut self) -> Result<()> {
        self.ldap.unbind().await.map_err(ldap_error)
    }
}

impl Directory for LdapConnector {
    fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    #[instrument(skip(self), fields(filter = %request.filter, base = %request.base))]
    async fn search(&mut self, request: &SearchRequest) -> Result<Vec<Entry>> {
        let attributes = request.requested_attributes();
        let ldap3::SearchResult(raw, result) = self
            .ldap
            .with_search_options(SearchOptions::new().sizelimit(self.max_results))
            .search(&request.base, Scope::Subtree, &request.filter, attributes)
            .await
            .map_err(ldap_error)?;

        if result.rc != 0 && result.rc != SIZE_LIMIT_EXCEEDED {
            return Err(NcstateError::Ldap {
                code: result.rc,
                message: result.text,
            });
        }
        if result.rc == SIZE_LIMIT_EXCEEDED {
            warn!(limit = self.max_results, "search truncated by size limit");
        }

        let mut entries: Vec<Entry> = raw
            .into_iter()
            .map(|e| flatten_attributes(SearchEntry::construct(e).attrs))
            .collect();
        sort_entries(&mut entries, request.sort.as_ref());

        debug!(count = entries.len(), "search complete");
        Ok(entries)
    }
}

fn ldap_error(err: LdapError) -> NcstateError {
    match err {
        LdapError::LdapResult { result } => NcstateError::Ldap {
            code: result.rc,
            message: if result.text.is_empty() {
                format!("result code {}", result.rc)
            } else {
                result.text
            },
        },
        other => NcstateError::Ldap {
            code: 0,
            message: other.to_string(),
        },
    }
}
