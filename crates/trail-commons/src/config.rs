//! Audit configuration.
//!
//! Loaded from TOML or constructed in code. Environment-specific concerns
//! (where the file lives, reload) belong to the host application.

use serde::{Deserialize, Serialize};

/// Configuration for the change-tracking layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Kill switch: when true no identity is captured and no log entry is
    /// written anywhere in the workspace.
    #[serde(default)]
    pub disabled: bool,

    /// Request methods that never capture identity (read-only traffic).
    #[serde(default = "defaults::exempt_methods")]
    pub exempt_methods: Vec<String>,

    /// When true (default) the record write and its log entry go through one
    /// atomic storage batch, so a failed log write also aborts the save.
    /// When false they are written sequentially; log failures are still
    /// surfaced to the caller.
    #[serde(default = "defaults::atomic_log_writes")]
    pub atomic_log_writes: bool,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            disabled: false,
            exempt_methods: defaults::exempt_methods(),
            atomic_log_writes: defaults::atomic_log_writes(),
        }
    }
}

impl AuditConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

        let config: AuditConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration settings.
    pub fn validate(&self) -> anyhow::Result<()> {
        const KNOWN_METHODS: [&str; 9] = [
            "GET", "HEAD", "POST", "PUT", "PATCH", "DELETE", "OPTIONS", "TRACE", "CONNECT",
        ];
        for method in &self.exempt_methods {
            if !KNOWN_METHODS.contains(&method.to_ascii_uppercase().as_str()) {
                return Err(anyhow::anyhow!(
                    "Unknown request method '{}' in exempt_methods. Must be one of: {}",
                    method,
                    KNOWN_METHODS.join(", ")
                ));
            }
        }
        Ok(())
    }

    /// True when the given request method is exempt from identity capture.
    pub fn is_exempt_method(&self, method: &str) -> bool {
        self.exempt_methods
            .iter()
            .any(|m| m.eq_ignore_ascii_case(method))
    }
}

/// Serde default functions for [`AuditConfig`].
pub mod defaults {
    pub fn exempt_methods() -> Vec<String> {
        ["GET", "HEAD", "OPTIONS", "TRACE"]
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn atomic_log_writes() -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_exempt_read_only_methods() {
        let config = AuditConfig::default();
        assert!(!config.disabled);
        assert!(config.atomic_log_writes);
        assert!(config.is_exempt_method("GET"));
        assert!(config.is_exempt_method("get"));
        assert!(!config.is_exempt_method("POST"));
    }

    #[test]
    fn parses_partial_toml() {
        let config: AuditConfig = toml::from_str("disabled = true").unwrap();
        assert!(config.disabled);
        assert_eq!(config.exempt_methods.len(), 4);
    }

    #[test]
    fn rejects_unknown_method_names() {
        let config: AuditConfig =
            toml::from_str("exempt_methods = [\"FETCH\"]").unwrap();
        assert!(config.validate().is_err());
    }
}
