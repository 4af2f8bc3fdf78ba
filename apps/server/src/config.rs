// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Server configuration loaded from environment variables.

use ifc_facets_geometry::ErrorPolicy;
use std::str::FromStr;

/// Default tracing filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug,ifc_facets_server=debug";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Maximum upload size in MB.
    pub max_file_size_mb: usize,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Extraction mode used when a request does not choose one.
    pub error_policy: ErrorPolicy,
    /// Apply product placements to extracted faces.
    pub apply_placement: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for
    /// missing or unparsable values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: var(&lookup, "PORT", 8080),
            max_file_size_mb: var(&lookup, "MAX_FILE_SIZE_MB", 200),
            request_timeout_secs: var(&lookup, "REQUEST_TIMEOUT_SECS", 120),
            error_policy: var(&lookup, "ERROR_POLICY", ErrorPolicy::Tolerant),
            apply_placement: var(&lookup, "APPLY_PLACEMENT", true),
        }
    }

    /// Upload body limit in bytes.
    pub fn max_body_bytes(&self) -> usize {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    let Some(value) = lookup(key) else {
        return default;
    };
    match value.trim().parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            tracing::warn!(key, value = %value, "Ignoring invalid configuration value");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_file_size_mb, 200);
        assert_eq!(config.max_body_bytes(), 200 * 1024 * 1024);
        assert_eq!(config.request_timeout_secs, 120);
        assert_eq!(config.error_policy, ErrorPolicy::Tolerant);
        assert!(config.apply_placement);
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("PORT", "9000"),
            ("ERROR_POLICY", "Strict"),
            ("APPLY_PLACEMENT", "false"),
            ("MAX_FILE_SIZE_MB", "5"),
        ]);
        assert_eq!(config.port, 9000);
        assert_eq!(config.error_policy, ErrorPolicy::Strict);
        assert!(!config.apply_placement);
        assert_eq!(config.max_file_size_mb, 5);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config(&[("PORT", "http"), ("ERROR_POLICY", "lenient")]);
        assert_eq!(config.port, 8080);
        assert_eq!(config.error_policy, ErrorPolicy::Tolerant);
    }
}
