//! Verification policy configuration
//!
//! Values are process-wide: loaded once at startup and never mutated per
//! request. The attempt limit is deliberately absent; it is fixed in the
//! core domain and is not externally configurable.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Default number of digits in an issued code
pub const DEFAULT_CODE_LENGTH: usize = 4;

/// Default code lifetime when TTL support is enabled (5 minutes)
pub const DEFAULT_DURATION_SECONDS: u64 = 300;

/// Largest supported code length; codes are stored as `u32`
pub const MAX_CODE_LENGTH: usize = 9;

/// Verification policy settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct VerificationConfig {
    /// Reject codes older than `duration_seconds`
    #[serde(default)]
    pub ttl_support: bool,

    /// Number of digits in an issued code
    #[serde(default = "default_code_length")]
    pub code_length: usize,

    /// Maximum code age in seconds when `ttl_support` is enabled
    #[serde(default = "default_duration_seconds")]
    pub duration_seconds: u64,

    /// Store-level TTL for records in seconds, 0 keeps them forever.
    ///
    /// Must outlive `duration_seconds` for `Expired` to be observable;
    /// a record the store already dropped verifies as a mismatch.
    #[serde(default)]
    pub record_retention_seconds: u64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            ttl_support: false,
            code_length: default_code_length(),
            duration_seconds: default_duration_seconds(),
            record_retention_seconds: 0,
        }
    }
}

impl VerificationConfig {
    /// Check the values are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.code_length == 0 || self.code_length > MAX_CODE_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "verification.code_length must be between 1 and {}, got {}",
                MAX_CODE_LENGTH, self.code_length
            )));
        }
        if self.ttl_support && self.duration_seconds == 0 {
            return Err(ConfigError::Invalid(
                "verification.duration_seconds must be positive when ttl_support is enabled"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// Apply a configuration file in the legacy `config.json` format.
    ///
    /// The file is a JSON object whose values are all strings, e.g.
    /// `{"TtlSupport": "true", "CodeLen": "4", "Duration": "300"}`.
    /// Absent keys leave the current value untouched; values that do not
    /// parse are rejected.
    pub fn apply_legacy_json(&mut self, json: &str) -> Result<(), ConfigError> {
        let legacy: LegacyVerificationFile = serde_json::from_str(json)
            .map_err(|e| ConfigError::Legacy(format!("malformed legacy config: {}", e)))?;

        if let Some(value) = legacy.ttl_support {
            self.ttl_support = value.trim().parse().map_err(|_| {
                ConfigError::Legacy(format!("TtlSupport is not a boolean: {:?}", value))
            })?;
        }
        if let Some(value) = legacy.code_len {
            self.code_length = value.trim().parse().map_err(|_| {
                ConfigError::Legacy(format!("CodeLen is not an integer: {:?}", value))
            })?;
        }
        if let Some(value) = legacy.duration {
            self.duration_seconds = value.trim().parse().map_err(|_| {
                ConfigError::Legacy(format!("Duration is not an integer: {:?}", value))
            })?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct LegacyVerificationFile {
    #[serde(rename = "TtlSupport", alias = "ttlSupport", alias = "ttlsupport")]
    ttl_support: Option<String>,
    #[serde(rename = "CodeLen", alias = "codeLen", alias = "codelen")]
    code_len: Option<String>,
    #[serde(rename = "Duration", alias = "duration")]
    duration: Option<String>,
}

fn default_code_length() -> usize {
    DEFAULT_CODE_LENGTH
}

fn default_duration_seconds() -> u64 {
    DEFAULT_DURATION_SECONDS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = VerificationConfig::default();
        assert!(!config.ttl_support);
        assert_eq!(config.code_length, 4);
        assert_eq!(config.duration_seconds, 300);
        assert_eq!(config.record_retention_seconds, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_code_length() {
        let mut config = VerificationConfig::default();
        config.code_length = 0;
        assert!(config.validate().is_err());
        config.code_length = 10;
        assert!(config.validate().is_err());
        config.code_length = 9;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_duration_with_ttl() {
        let config = VerificationConfig {
            ttl_support: true,
            duration_seconds: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_apply_legacy_json() {
        let mut config = VerificationConfig::default();
        config
            .apply_legacy_json(r#"{"TtlSupport":"true","CodeLen":"6","Duration":"60"}"#)
            .unwrap();

        assert!(config.ttl_support);
        assert_eq!(config.code_length, 6);
        assert_eq!(config.duration_seconds, 60);
    }

    #[test]
    fn test_apply_legacy_json_partial() {
        let mut config = VerificationConfig::default();
        config.apply_legacy_json(r#"{"CodeLen":"5"}"#).unwrap();

        assert!(!config.ttl_support);
        assert_eq!(config.code_length, 5);
        assert_eq!(config.duration_seconds, DEFAULT_DURATION_SECONDS);
    }

    #[test]
    fn test_apply_legacy_json_rejects_bad_values() {
        let mut config = VerificationConfig::default();
        let result = config.apply_legacy_json(r#"{"CodeLen":"four"}"#);
        assert!(matches!(result, Err(ConfigError::Legacy(_))));
        assert_eq!(config.code_length, DEFAULT_CODE_LENGTH);

        assert!(config.apply_legacy_json("not json").is_err());
    }
}
