//! Response envelope used by every backend endpoint
//!
//! ```json
//! {"status": "ok", "message": "success", "data": [...], "total": 42}
//! {"status": "error", "message": "error", "error": "spider not found"}
//! ```

use serde::{Deserialize, Serialize};

pub const STATUS_OK: &str = "ok";
pub const STATUS_ERROR: &str = "error";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope<T> {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
    pub total: Option<u64>,
    pub error: Option<String>,
}

/// Typed view of an envelope: either a payload or a backend error message
#[derive(Debug, Clone, PartialEq)]
pub enum EnvelopeOutcome<T> {
    Ok { data: Option<T>, total: Option<u64> },
    Err { message: String },
}

impl<T> ResponseEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: STATUS_OK.to_string(),
            message: "success".to_string(),
            data: Some(data),
            total: None,
            error: None,
        }
    }

    pub fn ok_list(data: T, total: u64) -> Self {
        Self {
            total: Some(total),
            ..Self::ok(data)
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            message: STATUS_ERROR.to_string(),
            data: None,
            total: None,
            error: Some(error.into()),
        }
    }

    /// Most specific error text carried by the envelope, if any
    pub fn error_message(&self) -> Option<String> {
        self.error
            .as_deref()
            .filter(|e| !e.is_empty())
            .or_else(|| Some(self.message.as_str()).filter(|m| !m.is_empty() && *m != "success"))
            .map(str::to_string)
    }

    pub fn is_error(&self) -> bool {
        self.status == STATUS_ERROR || self.error.as_deref().is_some_and(|e| !e.is_empty())
    }

    pub fn into_outcome(self) -> EnvelopeOutcome<T> {
        if self.is_error() {
            let message = self
                .error_message()
                .unwrap_or_else(|| "unknown error".to_string());
            return EnvelopeOutcome::Err { message };
        }
        EnvelopeOutcome::Ok {
            data: self.data,
            total: self.total,
        }
    }
}
