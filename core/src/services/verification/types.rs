//! Types for verification service results

use chrono::{DateTime, Utc};

/// Result of a verification attempt.
///
/// Each variant maps to a distinct remediation path for the client, so they
/// must never be collapsed into one generic failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Code accepted at the given time
    Accepted { verified_at: DateTime<Utc> },
    /// Wrong code or unknown request id; the client may try again
    CodeMismatch,
    /// The code is older than the configured duration
    Expired,
    /// The attempt limit has been passed; the record is locked for good
    AttemptsExceeded,
}

impl VerifyOutcome {
    /// Whether the code was accepted
    pub fn is_accepted(&self) -> bool {
        matches!(self, VerifyOutcome::Accepted { .. })
    }
}
