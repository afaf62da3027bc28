use axum::{
    extract::State,
    response::{IntoResponse, Response},
};

use crate::{Error, response::ApiResponse};

use super::{state::TransactionState, store::read_store};

/// A route handler for the totals, counts and averages over every transaction.
pub async fn get_transaction_stats_endpoint(
    State(state): State<TransactionState>,
) -> Result<Response, Error> {
    let stats = read_store(&state.store)?.stats();

    Ok(ApiResponse::data(stats).into_response())
}
