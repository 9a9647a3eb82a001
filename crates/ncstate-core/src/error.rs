// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the NC State toolkit.

use thiserror::Error;

/// Top-level error type for all toolkit operations.
#[derive(Debug, Error)]
pub enum NcstateError {
    // -- Brand errors --
    #[error("proper branding color not found for {0}")]
    ColorNotFound(String),

    #[error("invalid color value: {0}")]
    InvalidColor(String),

    #[error("image rendering failed: {0}")]
    Image(String),

    #[error("font could not be loaded: {0}")]
    Font(String),

    // -- Caller input --
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Validation(String),

    // -- Remote services --
    #[error("HTTP request failed: {0}")]
    Transport(String),

    #[error("{service} Service Error: {message}")]
    Service { service: String, message: String },

    #[error("LDAP error {code}: {message}")]
    Ldap { code: u32, message: String },

    #[error("SOAP Error: {0}")]
    Soap(String),

    #[error("malformed XML: {0}")]
    Xml(String),

    // -- Local configuration / persistence --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl NcstateError {
    /// Shorthand for a required-field failure raised before any request.
    pub fn missing_field(field: &str) -> Self {
        Self::Validation(format!("Field for \"{field}\" is required and not set"))
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, NcstateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_error_names_the_service() {
        let err = NcstateError::Service {
            service: "Dining".into(),
            message: "unknown location".into(),
        };
        assert_eq!(err.to_string(), "Dining Service Error: unknown location");
    }

    #[test]
    fn missing_field_message() {
        let err = NcstateError::missing_field("impact");
        assert_eq!(
            err.to_string(),
            "Field for \"impact\" is required and not set"
        );
    }
}
