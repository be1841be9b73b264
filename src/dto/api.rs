//! Payloads exchanged over the JSON API besides domain records.

use serde::{Deserialize, Serialize};

/// Body returned for every failed request.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FailurePayload {
    /// Always `false`; browsers check it before reading other fields.
    pub success: bool,
    pub status_code: u16,
    pub message: String,
}

impl FailurePayload {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code,
            message: message.into(),
        }
    }
}

/// Plain confirmation, e.g. after a delete.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessagePayload {
    pub message: String,
}

impl MessagePayload {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result of `POST /api/upload`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadResponse {
    pub urls: Vec<String>,
}
