use serde::Serialize;

/// API error payload. `retry_in_s` is only present for a 429 response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_in_s: Option<u64>,
}

impl ErrorResponse {
    pub(super) fn new(message: String) -> Self {
        Self {
            message,
            retry_in_s: None,
        }
    }

    pub(super) fn rate_limited(message: String, retry_in_s: u64) -> Self {
        Self {
            message,
            retry_in_s: Some(retry_in_s),
        }
    }
}
