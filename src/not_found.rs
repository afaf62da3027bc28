use axum::{
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::ProblemDetails;

/// The fallback route handler for paths that do not match any route.
pub async fn get_404_not_found(uri: Uri) -> Response {
    get_404_not_found_response(&uri)
}

/// A Problem+JSON 404 response naming the route that was not found.
pub fn get_404_not_found_response(uri: &Uri) -> Response {
    ProblemDetails::new(StatusCode::NOT_FOUND, format!("Route {uri} not found"))
        .instance(uri.path())
        .into_response()
}
