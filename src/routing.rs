//! Application router configuration.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{any, get},
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
};

use crate::{
    AppState,
    endpoints,
    idempotency::idempotency_middleware,
    logging::{MAX_BODY_SIZE, logging_middleware},
    not_found::get_404_not_found,
    system::{get_api_docs, get_api_info, get_health},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, edit_transaction_endpoint,
        get_transaction_endpoint, get_transaction_stats_endpoint, list_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Paths outside `/api` are served from `state.static_dir` with `index.html`
/// as the fallback, or answered with a 404 if there is no static directory.
pub fn build_router(state: AppState) -> Router {
    let routes = Router::new()
        .route(endpoints::HEALTH, get(get_health))
        .route(endpoints::API_ROOT, get(get_api_info))
        .route(endpoints::API_DOCS, get(get_api_docs))
        .route(
            endpoints::TRANSACTIONS,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(
            endpoints::TRANSACTION_STATS,
            get(get_transaction_stats_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(edit_transaction_endpoint)
                .patch(edit_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .route(endpoints::API_FALLBACK, any(get_404_not_found));

    let routes = match &state.static_dir {
        Some(static_dir) => routes.fallback_service(
            ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html"))),
        ),
        None => routes.fallback(get_404_not_found),
    };

    routes
        .layer(middleware::from_fn_with_state(
            state.idempotency_cache.clone(),
            idempotency_middleware,
        ))
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(middleware::from_fn(logging_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
