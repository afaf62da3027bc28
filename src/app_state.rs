//! Implements a struct that holds the state of the REST server.

use std::{path::PathBuf, sync::Arc, time::Instant};

use crate::{
    clock::Clock,
    config::AppConfig,
    idempotency::IdempotencyCache,
    pagination::PaginationConfig,
    transaction::{SharedTransactionStore, TransactionStore},
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The store that owns every transaction.
    pub transaction_store: SharedTransactionStore,

    /// The responses replayed for repeated idempotency keys.
    pub idempotency_cache: Arc<IdempotencyCache>,

    /// The config that controls how to return pages of data.
    pub pagination_config: PaginationConfig,

    /// The deployment environment, e.g. "development".
    pub environment: String,

    /// The directory of the frontend, if one is served.
    pub static_dir: Option<PathBuf>,

    /// When the server started, for reporting uptime.
    pub started_at: Instant,
}

impl AppState {
    /// Create a new [AppState] with an empty transaction store.
    ///
    /// Both the store and the idempotency cache read the time from `clock`.
    pub fn new(config: AppConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            transaction_store: TransactionStore::new(clock.clone()).into_shared(),
            idempotency_cache: Arc::new(IdempotencyCache::new(config.idempotency, clock)),
            pagination_config: config.pagination,
            environment: config.environment,
            static_dir: config.static_dir,
            started_at: Instant::now(),
        }
    }
}
