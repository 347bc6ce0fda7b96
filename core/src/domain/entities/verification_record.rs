//! Verification record entity.
//!
//! One record exists per issued code, keyed in the store by its request id.
//! The serialized field names match the records written by earlier
//! deployments, so a store can be shared across versions and restarts.

use chrono::{DateTime, Utc};
use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};

/// Maximum number of accepted verifications before a record locks for good
pub const MAX_ATTEMPTS: u32 = 3;

/// A code issued for a number, and the attempts made against it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// Opaque identifier the client presents when verifying
    #[serde(rename = "RequestId", alias = "requestId")]
    pub request_id: String,

    /// Numeric code; immutable after issuance
    #[serde(rename = "Code", alias = "code")]
    pub code: u32,

    /// Target number, stored as given
    #[serde(rename = "Number", alias = "number")]
    pub number: String,

    /// Attempts that reached policy evaluation; never decreases
    #[serde(rename = "Count", alias = "attemptCount")]
    pub attempt_count: u32,

    /// Creation time in milliseconds since the Unix epoch
    #[serde(rename = "CreationTime", alias = "createdAt")]
    pub created_at: i64,
}

impl VerificationRecord {
    /// Creates a fresh record with no attempts
    pub fn new(request_id: String, code: u32, number: String, now: DateTime<Utc>) -> Self {
        Self {
            request_id,
            code,
            number,
            attempt_count: 0,
            created_at: now.timestamp_millis(),
        }
    }

    /// Whole seconds elapsed since creation, truncated toward zero
    pub fn elapsed_seconds(&self, now: DateTime<Utc>) -> i64 {
        (now.timestamp_millis() - self.created_at) / 1000
    }

    /// Whether the code is older than `duration_seconds`.
    ///
    /// A record exactly `duration_seconds` old is still valid.
    pub fn is_expired(&self, now: DateTime<Utc>, duration_seconds: u64) -> bool {
        let duration = i64::try_from(duration_seconds).unwrap_or(i64::MAX);
        self.elapsed_seconds(now) > duration
    }

    /// Whether the attempt limit has been passed
    pub fn is_locked(&self) -> bool {
        self.attempt_count > MAX_ATTEMPTS
    }

    /// Count one more attempt and return the new total
    pub fn record_attempt(&mut self) -> u32 {
        self.attempt_count = self.attempt_count.saturating_add(1);
        self.attempt_count
    }

    /// Check a submitted request id and code against this record.
    ///
    /// The request id is compared too, so a record stored under the wrong
    /// key never matches. The code comparison runs in constant time.
    pub fn matches(&self, request_id: &str, code: u32) -> bool {
        let id_matches = self.request_id == request_id;
        let code_matches = constant_time_eq(&self.code.to_be_bytes(), &code.to_be_bytes());
        id_matches & code_matches
    }

    /// Serialize to the byte representation held by the store
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Deserialize from the byte representation held by the store
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
