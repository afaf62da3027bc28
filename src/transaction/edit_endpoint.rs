//! Defines the endpoint for updating an existing transaction.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};

use crate::{Error, response::ApiResponse};

use super::{
    form::{UpdateTransactionForm, parse_transaction_id},
    state::TransactionState,
    store::write_store,
};

/// A route handler for updating a transaction, served for both `PUT` and `PATCH`.
///
/// Only the fields present in the body are changed.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(transaction_id): Path<String>,
    form: Result<Json<UpdateTransactionForm>, JsonRejection>,
) -> Result<Response, Error> {
    let transaction_id = parse_transaction_id(&transaction_id)?;
    let Json(form) = form?;
    let update = form.validate()?;

    let transaction = write_store(&state.store)?
        .update(transaction_id, update)
        .cloned()
        .ok_or(Error::TransactionNotFound)?;
    tracing::info!("Updated transaction {transaction_id}");

    Ok(ApiResponse::data(transaction)
        .with_message("Transaction updated successfully")
        .into_response())
}
