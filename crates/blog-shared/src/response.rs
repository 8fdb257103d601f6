//! Problem documents returned by the posts API (RFC 7807).

use serde::{Deserialize, Serialize};

/// RFC 7807 Problem Details body sent with every 4xx/5xx response.
///
/// See: https://datatracker.ietf.org/doc/html/rfc7807
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(rename = "type")]
    pub error_type: String,

    pub title: String,

    pub status: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Path of the request that failed, e.g. `/posts/{id}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    /// Same value as the `X-Request-ID` response header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    /// Problem for `status`, titled with the status' canonical reason.
    pub fn for_status(status: u16) -> Self {
        let title = match status {
            400 => "Bad Request",
            404 => "Not Found",
            500 => "Internal Server Error",
            s if s >= 500 => "Server Error",
            _ => "Client Error",
        };

        Self {
            error_type: "about:blank".to_string(),
            title: title.to_string(),
            status,
            detail: None,
            instance: None,
            request_id: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Tie the problem to the request that produced it.
    pub fn for_request(
        mut self,
        instance: impl Into<String>,
        request_id: impl Into<String>,
    ) -> Self {
        self.instance = Some(instance.into());
        self.request_id = Some(request_id.into());
        self
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::for_status(400).with_detail(detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::for_status(404).with_detail(detail)
    }

    /// Server failures never carry a detail; the cause is only logged.
    pub fn internal_error() -> Self {
        Self::for_status(500)
    }

    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }
}
