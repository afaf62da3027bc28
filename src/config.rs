//! Settings that shape the application state.

use std::path::PathBuf;

use crate::{idempotency::IdempotencyConfig, pagination::PaginationConfig};

/// The name of the environment in which detailed docs and logs are expected.
pub const DEVELOPMENT: &str = "development";

/// Everything needed to build an [AppState](crate::AppState).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// The deployment environment reported by the health check, e.g. "production".
    pub environment: String,
    /// How write requests are deduplicated.
    pub idempotency: IdempotencyConfig,
    /// The default and maximum page sizes for listing transactions.
    pub pagination: PaginationConfig,
    /// The directory holding a built frontend to serve for non-API paths.
    pub static_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: DEVELOPMENT.to_owned(),
            idempotency: IdempotencyConfig::default(),
            pagination: PaginationConfig::default(),
            static_dir: None,
        }
    }
}
