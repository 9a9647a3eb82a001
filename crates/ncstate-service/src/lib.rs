// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ncstate-service: Thin async clients for NC State campus services.
//
// Each client issues one outbound call per operation (HTTP GET, LDAP
// bind + search, or SOAP POST) and reshapes the answer into plain data:
// `serde_json::Value` for the web services, flat attribute maps for LDAP.

pub mod dining;
pub mod ldap;
pub mod ouc;
pub mod query;
pub mod remedy;

pub use dining::{Diet, DiningClient, Meal, MenuDate};
pub use ldap::{
    BuildingDirectory, Directory, Entry, LdapConnector, SearchRequest, UnitDirectory,
    UserContext, UserDirectory,
};
pub use ouc::OucClient;
pub use query::QueryClient;
pub use remedy::RemedyClient;
