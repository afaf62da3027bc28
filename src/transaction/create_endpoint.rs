//! Defines the endpoint for creating a new transaction.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};

use crate::{Error, response::ApiResponse};

use super::{form::CreateTransactionForm, state::TransactionState, store::write_store};

/// A route handler for creating a new transaction.
///
/// Responds with `201 Created` and the stored transaction.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    form: Result<Json<CreateTransactionForm>, JsonRejection>,
) -> Result<Response, Error> {
    let Json(form) = form?;
    let builder = form.validate()?;

    let transaction = write_store(&state.store)?.create(builder);
    tracing::info!("Created transaction {}", transaction.id);

    Ok(ApiResponse::data(transaction)
        .with_message("Transaction created successfully")
        .with_status(StatusCode::CREATED))
}

#[cfg(test)]
mod tests {
    use axum::{Json, extract::State, http::StatusCode};

    use crate::{
        Error,
        response::ApiResponse,
        test_utils::{assert_status, get_header, parse_json_body},
        transaction::{
            Category, CreateTransactionForm, Transaction, TransactionType,
            create_transaction_endpoint, read_store, test_utils::get_test_state,
        },
    };

    fn groceries() -> CreateTransactionForm {
        CreateTransactionForm {
            title: "Groceries".to_owned(),
            description: Some("Weekly shop".to_owned()),
            amount: 84.2,
            transaction_type: TransactionType::Expense,
            category: Category::Food,
        }
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let (state, _) = get_test_state();

        let response = create_transaction_endpoint(State(state.clone()), Ok(Json(groceries())))
            .await
            .unwrap();

        assert_status(&response, StatusCode::CREATED);
        assert_eq!(get_header(&response, "content-type"), "application/json");
        let body: ApiResponse<Transaction> = parse_json_body(response).await;
        assert!(body.success);
        assert_eq!(
            body.message.as_deref(),
            Some("Transaction created successfully")
        );
        let transaction = body.data.unwrap();
        assert_eq!(transaction.title, "Groceries");
        assert_eq!(transaction.description.as_deref(), Some("Weekly shop"));
        assert_eq!(transaction.created_at, transaction.updated_at);

        let store = read_store(&state.store).unwrap();
        assert_eq!(store.find_by_id(transaction.id), Some(&transaction));
    }

    #[tokio::test]
    async fn invalid_form_is_not_stored() {
        let (state, _) = get_test_state();
        let form = CreateTransactionForm {
            amount: -1.0,
            ..groceries()
        };

        let result = create_transaction_endpoint(State(state.clone()), Ok(Json(form))).await;

        assert_eq!(
            result.err(),
            Some(Error::Validation("amount: Amount must be positive".to_owned()))
        );
        assert!(read_store(&state.store).unwrap().is_empty());
    }
}
