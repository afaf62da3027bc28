//! Defines the endpoint for listing transactions a page at a time.

use axum::{
    extract::{FromRef, Query, State, rejection::QueryRejection},
    response::{IntoResponse, Response},
};

use crate::{
    AppState,
    Error,
    pagination::{PaginationConfig, PaginationMeta},
    response::ApiResponse,
};

use super::{
    core::Transaction,
    form::ListTransactionsParams,
    store::{SharedTransactionStore, read_store},
};

/// The state needed to list transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The store that owns every transaction.
    pub store: SharedTransactionStore,
    /// The default and maximum page sizes.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.transaction_store.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// A route handler for listing transactions.
///
/// Supports filtering by `type` and `category`, sorting with `sortBy` and
/// `sortOrder`, and paging with `limit` and `offset`.
pub async fn list_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    params: Result<Query<ListTransactionsParams>, QueryRejection>,
) -> Result<Response, Error> {
    let Query(params) = params?;
    let query = params.validate(&state.pagination_config)?;

    let (transactions, total): (Vec<Transaction>, usize) = {
        let store = read_store(&state.store)?;
        let page = store.find_all(&query);
        (page.transactions.into_iter().cloned().collect(), page.total)
    };

    let meta = PaginationMeta::new(total, query.limit, query.offset);

    Ok(ApiResponse::paginated(transactions, meta).into_response())
}
