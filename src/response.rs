//! The JSON envelope shared by every successful API response.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::pagination::PaginationMeta;

/// A successful API response.
///
/// Serialises as `{"success": true, "message": ..., "data": ..., "meta": ...}`
/// with absent fields left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Always `true`. Failures are sent as [ProblemDetails](crate::ProblemDetails).
    pub success: bool,
    /// A human readable note, e.g. "Transaction created successfully".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// The payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Set on paginated lists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PaginationMeta>,
}

impl<T> ApiResponse<T> {
    /// A response carrying `data`.
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            meta: None,
        }
    }

    /// A page of `data` with its pagination details.
    pub fn paginated(data: T, meta: PaginationMeta) -> Self {
        Self {
            meta: Some(meta),
            ..Self::data(data)
        }
    }

    /// Attach a human readable message.
    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_owned());
        self
    }
}

impl ApiResponse<()> {
    /// A response with only a message.
    pub fn message(message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_owned()),
            data: None,
            meta: None,
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    /// Pair the response with a status code other than 200 OK.
    pub fn with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
