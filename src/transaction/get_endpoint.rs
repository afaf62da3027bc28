use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{Error, response::ApiResponse};

use super::{form::parse_transaction_id, state::TransactionState, store::read_store};

/// A route handler for fetching a single transaction by its ID.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<String>,
) -> Result<Response, Error> {
    let transaction_id = parse_transaction_id(&transaction_id)?;

    let transaction = read_store(&state.store)?
        .find_by_id(transaction_id)
        .cloned()
        .ok_or(Error::TransactionNotFound)?;

    Ok(ApiResponse::data(transaction).into_response())
}
