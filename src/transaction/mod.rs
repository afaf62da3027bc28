//! Transaction management for the ledger.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - The in-memory `TransactionStore` and the queries and statistics it answers
//! - Request validation for the JSON API
//! - The HTTP route handlers under `/api/transactions`

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod form;
mod get_endpoint;
mod list_endpoint;
mod query;
mod seed;
mod state;
mod stats;
mod stats_endpoint;
mod store;

pub use core::{
    Category, Transaction, TransactionBuilder, TransactionId, TransactionType, TransactionUpdate,
    UnknownVariant,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use form::{
    CreateTransactionForm, ListTransactionsParams, MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH,
    UpdateTransactionForm, parse_transaction_id,
};
pub use get_endpoint::get_transaction_endpoint;
pub use list_endpoint::{ListTransactionsState, list_transactions_endpoint};
pub use query::{DEFAULT_LIMIT, SortBy, SortOrder, TransactionPage, TransactionQuery};
pub use seed::seed_sample_transactions;
pub use state::TransactionState;
pub use stats::TransactionStatistics;
pub use stats_endpoint::get_transaction_stats_endpoint;
pub use store::{SharedTransactionStore, TransactionStore, read_store, write_store};

#[cfg(test)]
mod test_utils;
