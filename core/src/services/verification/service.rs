//! Main verification service implementation

use chrono::Utc;
use pv_shared::phone::mask_phone;
use std::sync::Arc;

use crate::domain::entities::VerificationRecord;
use crate::errors::{DomainError, DomainResult, StoreError};

use super::config::VerificationServiceConfig;
use super::generator::{generate_check_code, generate_request_id};
use super::traits::VerificationStore;
use super::types::VerifyOutcome;

/// Request ids tried before issuance gives up on collisions
const MAX_ISSUE_ATTEMPTS: u32 = 3;

/// Conditional writes tried before a verification reports contention
const MAX_UPDATE_ATTEMPTS: u32 = 10;

/// Issues and verifies phone-bound one-time codes
pub struct VerificationService<S: VerificationStore + ?Sized> {
    /// Store holding serialized records keyed by request id
    store: Arc<S>,
    /// Service configuration, fixed for the lifetime of the service
    config: VerificationServiceConfig,
}

impl<S: VerificationStore + ?Sized> VerificationService<S> {
    /// Create a new verification service
    ///
    /// # Arguments
    ///
    /// * `store` - Record store implementation
    /// * `config` - Service configuration; an out-of-range code length is
    ///   clamped to 1..=9 digits
    pub fn new(store: Arc<S>, config: VerificationServiceConfig) -> Self {
        let normalized = config.clone().normalized();
        if normalized.code_length != config.code_length {
            tracing::warn!(
                requested = config.code_length,
                used = normalized.code_length,
                event = "code_length_clamped",
                "Code length out of range, clamped"
            );
        }
        Self {
            store,
            config: normalized,
        }
    }

    /// The configuration this service was built with
    pub fn config(&self) -> &VerificationServiceConfig {
        &self.config
    }

    /// Issue a new code for a number
    ///
    /// This method:
    /// 1. Generates a request id and a code of the configured length
    /// 2. Creates the record with no attempts
    /// 3. Persists it under the request id, retrying with a fresh id if
    ///    the id is already taken
    ///
    /// The number is opaque and is not validated; an empty string is
    /// accepted.
    ///
    /// # Returns
    ///
    /// * `Ok(VerificationRecord)` - The persisted record
    /// * `Err(DomainError)` - If the store write fails or no free id was found
    pub async fn issue(&self, number: &str) -> DomainResult<VerificationRecord> {
        let code_text = generate_check_code(self.config.code_length);
        let code: u32 = code_text.parse().map_err(|_| DomainError::Internal {
            message: format!(
                "Code length {} does not fit a numeric code",
                self.config.code_length
            ),
        })?;

        for attempt in 1..=MAX_ISSUE_ATTEMPTS {
            let record =
                VerificationRecord::new(generate_request_id(), code, number.to_string(), Utc::now());
            let bytes = record.to_bytes()?;

            let created = self
                .store
                .set_if_absent(
                    &record.request_id,
                    &bytes,
                    self.config.record_retention_seconds,
                )
                .await
                .map_err(|e| {
                    tracing::error!(
                        number = %mask_phone(number),
                        error = %e,
                        event = "record_storage_failed",
                        "Failed to store verification record"
                    );
                    e
                })?;

            if created {
                tracing::info!(
                    number = %mask_phone(number),
                    request_id = %record.request_id,
                    event = "code_issued",
                    "Issued verification code"
                );
                return Ok(record);
            }

            tracing::warn!(
                request_id = %record.request_id,
                attempt = attempt,
                event = "request_id_collision",
                "Generated request id already exists, retrying"
            );
        }

        Err(DomainError::Internal {
            message: format!(
                "No unused request id after {} attempts",
                MAX_ISSUE_ATTEMPTS
            ),
        })
    }

    /// Verify a submitted code against the record for `request_id`
    ///
    /// Policy, in order:
    /// 1. No record, or a record whose id or code does not match, is a
    ///    `CodeMismatch` and nothing is written
    /// 2. With TTL support, a record older than the configured duration is
    ///    `Expired` and nothing is written
    /// 3. Otherwise the attempt is counted and written back; past the
    ///    attempt limit the result is `AttemptsExceeded`, else `Accepted`
    ///
    /// The write-back only succeeds if the record is unchanged since it was
    /// read. On a lost race the evaluation starts over from a fresh read, so
    /// concurrent verifications never lose an attempt.
    pub async fn verify(&self, request_id: &str, code: u32) -> DomainResult<VerifyOutcome> {
        for _ in 0..MAX_UPDATE_ATTEMPTS {
            let current = match self.store.get(request_id).await? {
                Some(bytes) => bytes,
                None => {
                    tracing::debug!(
                        request_id = %request_id,
                        event = "record_not_found",
                        "No verification record for request id"
                    );
                    return Ok(VerifyOutcome::CodeMismatch);
                }
            };

            let mut record =
                VerificationRecord::from_bytes(&current).map_err(|e| StoreError::Corrupt {
                    key: request_id.to_string(),
                    message: e.to_string(),
                })?;

            if !record.matches(request_id, code) {
                tracing::info!(
                    request_id = %request_id,
                    event = "code_mismatch",
                    "Submitted code does not match"
                );
                return Ok(VerifyOutcome::CodeMismatch);
            }

            let now = Utc::now();
            if self.config.ttl_support && record.is_expired(now, self.config.duration_seconds) {
                tracing::info!(
                    request_id = %request_id,
                    elapsed_seconds = record.elapsed_seconds(now),
                    event = "code_expired",
                    "Verification code expired"
                );
                return Ok(VerifyOutcome::Expired);
            }

            let attempts = record.record_attempt();
            let updated = record.to_bytes()?;

            if !self
                .store
                .compare_and_set(request_id, &current, &updated)
                .await?
            {
                tracing::debug!(
                    request_id = %request_id,
                    event = "record_update_conflict",
                    "Record changed concurrently, re-evaluating"
                );
                continue;
            }

            if record.is_locked() {
                tracing::warn!(
                    request_id = %request_id,
                    number = %mask_phone(&record.number),
                    attempts = attempts,
                    event = "attempts_exceeded",
                    "Verification attempts exceeded, record locked"
                );
                return Ok(VerifyOutcome::AttemptsExceeded);
            }

            tracing::info!(
                request_id = %request_id,
                number = %mask_phone(&record.number),
                attempts = attempts,
                event = "code_verified",
                "Verification code accepted"
            );
            return Ok(VerifyOutcome::Accepted { verified_at: now });
        }

        tracing::error!(
            request_id = %request_id,
            event = "record_update_exhausted",
            "Gave up updating verification record under contention"
        );
        Err(StoreError::Conflict {
            key: request_id.to_string(),
        }
        .into())
    }

    /// Check the backing store is reachable
    pub async fn store_health(&self) -> DomainResult<()> {
        self.store.health_check().await.map_err(DomainError::from)
    }
}
