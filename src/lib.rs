//! An in-memory ledger of income and expense transactions served as a JSON API.
//!
//! This library provides the transaction store, the idempotency cache that
//! deduplicates retried writes, and the axum router that exposes both over
//! HTTP.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod clock;
mod config;
pub mod endpoints;
mod error;
pub mod idempotency;
mod logging;
mod not_found;
mod pagination;
mod response;
mod routing;
mod system;
pub mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, DEVELOPMENT};
pub use error::{Error, PROBLEM_JSON, ProblemDetails};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use pagination::{PaginationConfig, PaginationMeta};
pub use response::ApiResponse;
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
