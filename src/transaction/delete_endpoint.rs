use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use crate::{Error, response::ApiResponse};

use super::{form::parse_transaction_id, state::TransactionState, store::write_store};

/// A route handler for deleting a transaction.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<String>,
) -> Result<Response, Error> {
    let transaction_id = parse_transaction_id(&transaction_id)?;

    if !write_store(&state.store)?.delete(transaction_id) {
        return Err(Error::TransactionNotFound);
    }
    tracing::info!("Deleted transaction {transaction_id}");

    Ok(ApiResponse::message("Transaction deleted successfully").into_response())
}
