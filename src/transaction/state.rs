use axum::extract::FromRef;

use crate::AppState;

use super::store::SharedTransactionStore;

/// The state needed to get, create, update or delete a transaction.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The store that owns every transaction.
    pub store: SharedTransactionStore,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.transaction_store.clone(),
        }
    }
}
