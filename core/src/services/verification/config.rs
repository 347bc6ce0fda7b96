//! Configuration for the verification service

use pv_shared::config::verification::{
    DEFAULT_CODE_LENGTH, DEFAULT_DURATION_SECONDS, MAX_CODE_LENGTH,
};
use pv_shared::VerificationConfig;

/// Configuration for the verification service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationServiceConfig {
    /// Whether codes older than `duration_seconds` are rejected
    pub ttl_support: bool,
    /// Number of digits in an issued code, 1 to 9
    pub code_length: usize,
    /// Maximum code age in seconds
    pub duration_seconds: u64,
    /// Store-level TTL for records (0 = no expiry)
    pub record_retention_seconds: u64,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            ttl_support: false,
            code_length: DEFAULT_CODE_LENGTH,
            duration_seconds: DEFAULT_DURATION_SECONDS,
            record_retention_seconds: 0,
        }
    }
}

impl VerificationServiceConfig {
    /// Clamp `code_length` into the range a numeric code can hold
    pub fn normalized(mut self) -> Self {
        self.code_length = self.code_length.clamp(1, MAX_CODE_LENGTH);
        self
    }
}

impl From<&VerificationConfig> for VerificationServiceConfig {
    fn from(config: &VerificationConfig) -> Self {
        Self {
            ttl_support: config.ttl_support,
            code_length: config.code_length,
            duration_seconds: config.duration_seconds,
            record_retention_seconds: config.record_retention_seconds,
        }
    }
}
