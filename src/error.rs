//! Defines the app level error type and its conversion to Problem+JSON responses.
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::{HeaderValue, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// The media type for [ProblemDetails] bodies.
pub const PROBLEM_JSON: &str = "application/problem+json";

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request body could not be parsed, e.g. malformed JSON or a missing
    /// `Content-Type: application/json` header.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The request body could not be read, e.g. it was larger than the limit.
    #[error("could not read the request body: {0}")]
    RequestBody(String),

    /// The request was well-formed but one or more fields failed validation.
    ///
    /// The string is a `; ` separated list of `field: message` pairs.
    #[error("validation failed: {0}")]
    Validation(String),

    /// No transaction exists with the requested ID.
    #[error("transaction not found")]
    TransactionNotFound,

    /// A lock guarding shared state was poisoned by a panicking thread.
    #[error("could not acquire the {0} lock")]
    LockPoisoned(&'static str),

    /// The body of a response could not be buffered for the idempotency cache.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("could not read the response body: {0}")]
    ResponseBody(String),
}

impl Error {
    /// The HTTP status code that this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest(_) | Error::RequestBody(_) => StatusCode::BAD_REQUEST,
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::TransactionNotFound => StatusCode::NOT_FOUND,
            Error::LockPoisoned(_) | Error::ResponseBody(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // Valid JSON, wrong shape: missing fields, unknown enum values, etc.
            JsonRejection::JsonDataError(error) => Error::Validation(error.body_text()),
            rejection => Error::BadRequest(rejection.body_text()),
        }
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let detail = match self {
            Error::BadRequest(detail) | Error::Validation(detail) => detail,
            Error::TransactionNotFound => "Transaction not found".to_owned(),
            Error::RequestBody(_) => self.to_string(),
            // Internal errors are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                "An unexpected error occurred on the server".to_owned()
            }
        };

        ProblemDetails::new(status, detail).into_response()
    }
}

/// An error response body in the RFC 7807 Problem+JSON format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// A URI identifying the problem type.
    #[serde(rename = "type")]
    pub problem_type: String,
    /// A short summary of the problem type, e.g. "Not Found".
    pub title: String,
    /// The HTTP status code.
    pub status: u16,
    /// An explanation specific to this occurrence of the problem.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// The request path that caused the problem.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ProblemDetails {
    /// Create the problem details for `status` with a `detail` message.
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            problem_type: format!("https://httpstatuses.com/{}", status.as_u16()),
            title: status
                .canonical_reason()
                .unwrap_or("Unknown Error")
                .to_owned(),
            status: status.as_u16(),
            detail: Some(detail.into()),
            instance: None,
        }
    }

    /// Set the request path that caused the problem.
    pub fn instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self)).into_response();
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(PROBLEM_JSON));
        response
    }
}
