//! DTOs for the send and verify endpoints

use serde::{Deserialize, Serialize};

/// Body of `POST /api/v1/send`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendCodeRequest {
    /// Target number; opaque, a missing field is treated as empty
    #[serde(default)]
    pub number: String,
}

/// Response of `POST /api/v1/send`.
///
/// The number and creation time are never echoed back.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendCodeResponse {
    pub request_id: String,
    pub code: u32,
}

/// Body of `POST /api/v1/verify/`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyCodeRequest {
    pub request_id: String,
    pub code: u32,
}
