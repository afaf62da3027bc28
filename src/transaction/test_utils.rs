use std::sync::Arc;

use time::macros::datetime;

use crate::clock::ManualClock;

use super::{
    core::{Category, Transaction, TransactionType},
    state::TransactionState,
    store::{TransactionStore, write_store},
};

/// A [TransactionState] with an empty store and a clock the test controls.
pub fn get_test_state() -> (TransactionState, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(datetime!(2025-11-14 10:30 UTC)));
    let store = TransactionStore::new(clock.clone()).into_shared();

    (TransactionState { store }, clock)
}

/// Add the Rent expense used throughout the endpoint tests.
#[track_caller]
pub fn create_rent(state: &TransactionState) -> Transaction {
    let rent = Transaction::build("Rent", 1500.0, TransactionType::Expense, Category::Housing);
    write_store(&state.store).unwrap().create(rent)
}
