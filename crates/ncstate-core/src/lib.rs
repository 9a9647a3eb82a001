// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// NC State toolkit: Core types, errors, configuration, and the XML response
// normaliser shared by every service client.

pub mod config;
pub mod error;
pub mod http;
pub mod types;
pub mod version;
pub mod xml;

pub use config::NcstateConfig;
pub use error::NcstateError;
pub use types::*;
