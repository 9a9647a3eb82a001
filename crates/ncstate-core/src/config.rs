// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Toolkit configuration: every remote endpoint the clients talk to.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{NcstateError, Result};

/// Environment variable naming a JSON configuration file.
pub const CONFIG_ENV: &str = "NCSTATE_CONFIG";

/// Endpoints for all brand and service components.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NcstateConfig {
    pub brand: BrandEndpoints,
    pub dining: DiningSettings,
    pub ouc: OucSettings,
    pub ldap: LdapSettings,
    pub remedy: RemedySettings,
    pub http: HttpSettings,
}

/// Brand bar and image-generation services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandEndpoints {
    /// Stylesheet linked ahead of the brand bar iframe.
    pub stylesheet_url: String,
    /// Base URL of the brand bar iframe.
    pub iframe_url: String,
    /// Remote logo renderer.
    pub logo_api_url: String,
    /// Remote text-image renderer.
    pub text_api_url: String,
}

impl Default for BrandEndpoints {
    fn default() -> Self {
        Self {
            stylesheet_url:
                "http://www.ncsu.edu/brand/utility-bar/iframe/css/utility_bar_iframe.css".into(),
            iframe_url: "http://www.ncsu.edu/brand/utility-bar/iframe/index.php".into(),
            logo_api_url: "http://webapps.ncsu.edu/logoapi/".into(),
            text_api_url: "http://webapps.ncsu.edu/textapi/".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiningSettings {
    pub base_url: String,
    /// Dining API version sent as `v`.
    pub api_version: u32,
}

impl Default for DiningSettings {
    fn default() -> Self {
        Self {
            base_url: "http://www.ncsudining.com/diningapi/".into(),
            api_version: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OucSettings {
    pub base_url: String,
}

impl Default for OucSettings {
    fn default() -> Self {
        Self {
            base_url: "http://webapps.ncsu.edu/ouc/".into(),
        }
    }
}

/// Campus directory servers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LdapSettings {
    /// Used for anonymous binds.
    pub server_url: String,
    /// Used whenever a bind DN and password are both supplied.
    pub secure_server_url: String,
    /// Server-side size limit; 0 means no limit.
    pub max_results: i32,
}

impl Default for LdapSettings {
    fn default() -> Self {
        Self {
            server_url: "ldap://ldap.ncsu.edu".into(),
            secure_server_url: "ldaps://ldap.ncsu.edu".into(),
            max_results: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemedySettings {
    /// Base of the per-form SOAP endpoints.
    pub base_url: String,
}

impl Default for RemedySettings {
    fn default() -> Self {
        Self {
            base_url: "https://remedyservice.oit.ncsu.edu/arsys/WSDL/public/ars00srv".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("ncstate-toolkit/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl NcstateConfig {
    /// Read a JSON configuration file. Missing sections keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|e| {
            NcstateError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config = serde_json::from_str(&data)?;
        info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Load from the file named by `NCSTATE_CONFIG`, or use the defaults.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(path),
            None => {
                debug!("{CONFIG_ENV} not set, using built-in endpoints");
                Ok(Self::default())
            }
        }
    }

    /// Write the configuration as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_campus_endpoints() {
        let config = NcstateConfig::default();
        assert_eq!(config.dining.api_version, 2);
        assert_eq!(config.ldap.server_url, "ldap://ldap.ncsu.edu");
        assert!(config.remedy.base_url.ends_with("/ars00srv"));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("ncstate.json");
        std::fs::write(&path, r#"{ "ouc": { "base_url": "http://localhost:9000/ouc/" } }"#)
            .expect("write");

        let config = NcstateConfig::load(&path).expect("load");
        assert_eq!(config.ouc.base_url, "http://localhost:9000/ouc/");
        assert_eq!(config.dining, DiningSettings::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("ncstate.json");
        let mut config = NcstateConfig::default();
        config.http.timeout_secs = 5;
        config.save(&path).expect("save");

        assert_eq!(NcstateConfig::load(&path).expect("load"), config);
    }

    #[test]
    fn missing_file_is_config_error() {
        let result = NcstateConfig::load("/definitely/not/here.json");
        assert!(matches!(result, Err(NcstateError::Config(_))));
    }
}
