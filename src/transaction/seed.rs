//! Sample transactions for a fresh server.

use super::{
    core::{Category, Transaction, TransactionBuilder, TransactionType},
    store::TransactionStore,
};

fn sample_transactions() -> [TransactionBuilder; 5] {
    [
        Transaction::build(
            "Monthly Salary",
            5000.0,
            TransactionType::Income,
            Category::Salary,
        )
        .description(Some("Software developer salary".to_owned())),
        Transaction::build(
            "Groceries",
            1000.0,
            TransactionType::Expense,
            Category::Food,
        )
        .description(Some("Monthly supermarket visit".to_owned())),
        Transaction::build(
            "Monthly Salary",
            3000.0,
            TransactionType::Income,
            Category::Salary,
        )
        .description(Some("Remote software developer salary".to_owned())),
        Transaction::build(
            "Freelance Project",
            1200.0,
            TransactionType::Income,
            Category::Freelance,
        )
        .description(Some("Landing page design".to_owned())),
        Transaction::build("Rent", 1500.0, TransactionType::Expense, Category::Housing),
    ]
}

/// Fill an empty `store` with a handful of example transactions.
///
/// Does nothing if the store already has transactions. Returns the number of
/// transactions added.
pub fn seed_sample_transactions(store: &mut TransactionStore) -> usize {
    if !store.is_empty() {
        return 0;
    }

    let samples = sample_transactions();
    let count = samples.len();

    for builder in samples {
        store.create(builder);
    }

    tracing::info!("Seeded the store with {count} sample transactions");
    count
}
