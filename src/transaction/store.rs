//! The in-memory collection that owns every transaction.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use crate::{Error, clock::Clock};

use super::{
    core::{Transaction, TransactionBuilder, TransactionId, TransactionUpdate},
    query::{TransactionPage, TransactionQuery},
    stats::TransactionStatistics,
};

/// A [TransactionStore] shared between request handlers.
///
/// Reads may run concurrently, writes are exclusive.
pub type SharedTransactionStore = Arc<RwLock<TransactionStore>>;

/// Handles the creation, retrieval and aggregation of transactions.
///
/// Lookups that miss return `None` or `false` rather than an error, it is up
/// to the caller to decide whether that is a problem.
#[derive(Debug)]
pub struct TransactionStore {
    transactions: Vec<Transaction>,
    clock: Arc<dyn Clock>,
}

impl TransactionStore {
    /// Create an empty store that stamps transactions with the time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            transactions: Vec::new(),
            clock,
        }
    }

    /// Wrap the store so it can be shared between request handlers.
    pub fn into_shared(self) -> SharedTransactionStore {
        Arc::new(RwLock::new(self))
    }

    /// The number of transactions in the store.
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    /// Whether the store has no transactions.
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Create a new transaction in the store from a builder.
    ///
    /// The transaction gets a fresh ID and both timestamps are set to the
    /// current time. The builder is assumed to have been validated already.
    pub fn create(&mut self, builder: TransactionBuilder) -> Transaction {
        let now = self.clock.now();
        let transaction = Transaction {
            id: self.new_id(),
            title: builder.title,
            description: builder.description,
            amount: builder.amount,
            transaction_type: builder.transaction_type,
            category: builder.category,
            created_at: now,
            updated_at: now,
        };

        self.transactions.push(transaction.clone());
        transaction
    }

    fn new_id(&self) -> TransactionId {
        loop {
            let id = Uuid::new_v4();

            if self.find_by_id(id).is_none() {
                return id;
            }
        }
    }

    /// Retrieve the stored transaction with `id`.
    pub fn find_by_id(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions
            .iter()
            .find(|transaction| transaction.id == id)
    }

    /// Retrieve transactions from the store in the way defined by `query`.
    ///
    /// Transactions are filtered, then stable sorted, then counted, then
    /// sliced to the page `[offset, offset + limit)`. A page past the end is
    /// empty but still reports the filtered total.
    pub fn find_all(&self, query: &TransactionQuery) -> TransactionPage<'_> {
        let mut matches: Vec<&Transaction> = self
            .transactions
            .iter()
            .filter(|transaction| query.matches(transaction))
            .collect();

        matches.sort_by(|a, b| query.sort_order.apply(query.sort_by.compare(a, b)));

        let total = matches.len();
        let transactions = matches
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .collect();

        TransactionPage {
            transactions,
            total,
        }
    }

    /// Overwrite the fields set in `update` on the transaction with `id`.
    ///
    /// The ID and creation time never change. The update time is set to the
    /// current time, or kept as is if the clock has gone backwards.
    ///
    /// Returns `None` if there is no transaction with `id`.
    pub fn update(&mut self, id: TransactionId, update: TransactionUpdate) -> Option<&Transaction> {
        let now = self.clock.now();
        let transaction = self
            .transactions
            .iter_mut()
            .find(|transaction| transaction.id == id)?;

        update.apply(transaction);
        transaction.updated_at = now.max(transaction.updated_at);

        Some(&*transaction)
    }

    /// Remove the transaction with `id`.
    ///
    /// Returns whether a transaction was removed.
    pub fn delete(&mut self, id: TransactionId) -> bool {
        let initial_length = self.transactions.len();
        self.transactions.retain(|transaction| transaction.id != id);
        self.transactions.len() != initial_length
    }

    /// Summarise every transaction in the store.
    pub fn stats(&self) -> TransactionStatistics {
        TransactionStatistics::from_transactions(&self.transactions)
    }
}

/// Acquire a read lock on `store`.
///
/// # Errors
/// Returns [Error::LockPoisoned] if a writer panicked while holding the lock.
pub fn read_store(
    store: &SharedTransactionStore,
) -> Result<RwLockReadGuard<'_, TransactionStore>, Error> {
    store
        .read()
        .map_err(|_| Error::LockPoisoned("transaction store"))
}

/// Acquire a write lock on `store`.
///
/// # Errors
/// Returns [Error::LockPoisoned] if a writer panicked while holding the lock.
pub fn write_store(
    store: &SharedTransactionStore,
) -> Result<RwLockWriteGuard<'_, TransactionStore>, Error> {
    store
        .write()
        .map_err(|_| Error::LockPoisoned("transaction store"))
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, sync::Arc};

    use time::{Duration, macros::datetime};
    use uuid::Uuid;

    use crate::{
        clock::{Clock, ManualClock, SystemClock},
        transaction::{
            Category, SortBy, SortOrder, Transaction, TransactionBuilder, TransactionQuery,
            TransactionStore, TransactionType, TransactionUpdate,
        },
    };

    fn get_test_store() -> (TransactionStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(datetime!(2025-11-14 10:30 UTC)));
        let store = TransactionStore::new(clock.clone());
        (store, clock)
    }

    fn income(title: &str, amount: f64) -> TransactionBuilder {
        Transaction::build(title, amount, TransactionType::Income, Category::Salary)
    }

    fn expense(title: &str, amount: f64) -> TransactionBuilder {
        Transaction::build(title, amount, TransactionType::Expense, Category::Food)
    }

    fn everything() -> TransactionQuery {
        TransactionQuery {
            limit: usize::MAX,
            ..Default::default()
        }
    }

    #[test]
    fn create_assigns_id_and_equal_timestamps() {
        let (mut store, clock) = get_test_store();

        let transaction = store.create(
            Transaction::build("Rent", 1500.0, TransactionType::Expense, Category::Housing)
                .description(Some("November".to_owned())),
        );

        assert_eq!(transaction.title, "Rent");
        assert_eq!(transaction.description.as_deref(), Some("November"));
        assert_eq!(transaction.amount, 1500.0);
        assert_eq!(transaction.created_at, clock.now());
        assert_eq!(transaction.created_at, transaction.updated_at);
        assert_eq!(store.find_by_id(transaction.id), Some(&transaction));
    }

    #[test]
    fn created_ids_are_unique() {
        let mut store = TransactionStore::new(Arc::new(SystemClock));

        let ids: HashSet<_> = (0..100)
            .map(|i| store.create(income(&format!("Income {i}"), 1.0)).id)
            .collect();

        assert_eq!(ids.len(), 100);
        assert_eq!(store.len(), 100);
    }

    #[test]
    fn find_by_id_returns_none_for_unknown_id() {
        let (mut store, _) = get_test_store();
        store.create(income("Salary", 100.0));

        assert_eq!(store.find_by_id(Uuid::new_v4()), None);
    }

    #[test]
    fn rent_scenario() {
        let (mut store, clock) = get_test_store();
        let created = store.create(Transaction::build(
            "Rent",
            1500.0,
            TransactionType::Expense,
            Category::Housing,
        ));
        clock.advance(Duration::seconds(1));

        let updated = store
            .update(
                created.id,
                TransactionUpdate {
                    amount: Some(1600.0),
                    ..Default::default()
                },
            )
            .cloned()
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.amount, 1600.0);
        assert_eq!(updated.title, "Rent");
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);

        assert!(store.delete(created.id));
        assert_eq!(store.find_by_id(created.id), None);
    }

    #[test]
    fn update_returns_none_for_unknown_id() {
        let (mut store, _) = get_test_store();

        let result = store.update(Uuid::new_v4(), TransactionUpdate::default());

        assert_eq!(result, None);
    }

    #[test]
    fn update_never_moves_updated_at_backwards() {
        let (mut store, clock) = get_test_store();
        let created = store.create(income("Salary", 100.0));
        clock.advance(Duration::seconds(-30));

        let updated = store
            .update(created.id, TransactionUpdate::default())
            .cloned()
            .unwrap();

        assert_eq!(updated.updated_at, created.updated_at);
    }

    #[test]
    fn delete_returns_false_for_unknown_id() {
        let (mut store, _) = get_test_store();
        store.create(income("Salary", 100.0));

        assert!(!store.delete(Uuid::new_v4()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn find_all_returns_every_record_once() {
        let (mut store, _) = get_test_store();
        let mut want: Vec<_> = (1..=5)
            .map(|i| {
                let amount = 10.0 * f64::from(i);
                store.create(income(&format!("Income {i}"), amount)).id
            })
            .collect();

        let page = store.find_all(&everything());
        let mut got: Vec<_> = page
            .transactions
            .iter()
            .map(|transaction| transaction.id)
            .collect();

        want.sort();
        got.sort();
        assert_eq!(got, want);
        assert_eq!(page.total, 5);
    }

    #[test]
    fn find_all_filters_by_type_and_category() {
        let (mut store, _) = get_test_store();
        store.create(income("Salary", 100.0));
        store.create(expense("Groceries", 50.0));
        store.create(Transaction::build("Refund", 20.0, TransactionType::Income, Category::Food));

        let incomes = store.find_all(&TransactionQuery {
            transaction_type: Some(TransactionType::Income),
            ..everything()
        });
        let food = store.find_all(&TransactionQuery {
            category: Some(Category::Food),
            ..everything()
        });
        let food_income = store.find_all(&TransactionQuery {
            transaction_type: Some(TransactionType::Income),
            category: Some(Category::Food),
            ..everything()
        });

        assert_eq!(incomes.total, 2);
        assert_eq!(food.total, 2);
        assert_eq!(food_income.total, 1);
        assert_eq!(food_income.transactions[0].title, "Refund");
    }

    #[test]
    fn amount_ascending_is_reverse_of_descending() {
        let (mut store, _) = get_test_store();
        for amount in [30.0, 10.0, 50.0, 20.0, 40.0] {
            store.create(income("Income", amount));
        }

        let ascending: Vec<_> = store
            .find_all(&TransactionQuery {
                sort_by: SortBy::Amount,
                sort_order: SortOrder::Ascending,
                ..everything()
            })
            .transactions
            .iter()
            .map(|transaction| transaction.amount)
            .collect();
        let mut descending: Vec<_> = store
            .find_all(&TransactionQuery {
                sort_by: SortBy::Amount,
                sort_order: SortOrder::Descending,
                ..everything()
            })
            .transactions
            .iter()
            .map(|transaction| transaction.amount)
            .collect();
        descending.reverse();

        assert_eq!(ascending, vec![10.0, 20.0, 30.0, 40.0, 50.0]);
        assert_eq!(ascending, descending);
    }

    #[test]
    fn sorts_by_created_at_newest_first_by_default() {
        let (mut store, clock) = get_test_store();
        for title in ["First", "Second", "Third"] {
            store.create(income(title, 1.0));
            clock.advance(Duration::seconds(1));
        }

        let titles: Vec<_> = store
            .find_all(&TransactionQuery::default())
            .transactions
            .iter()
            .map(|transaction| transaction.title.as_str())
            .collect();

        assert_eq!(titles, ["Third", "Second", "First"]);
    }

    #[test]
    fn sorts_by_title_ignoring_case() {
        let (mut store, _) = get_test_store();
        for title in ["banana", "Cherry", "apple"] {
            store.create(income(title, 1.0));
        }

        let titles: Vec<_> = store
            .find_all(&TransactionQuery {
                sort_by: SortBy::Title,
                sort_order: SortOrder::Ascending,
                ..everything()
            })
            .transactions
            .iter()
            .map(|transaction| transaction.title.as_str())
            .collect();

        assert_eq!(titles, ["apple", "banana", "Cherry"]);
    }

    #[test]
    fn sort_is_stable_for_equal_keys() {
        let (mut store, _) = get_test_store();
        for title in ["A", "B", "C"] {
            store.create(income(title, 5.0));
        }

        let titles: Vec<_> = store
            .find_all(&TransactionQuery {
                sort_by: SortBy::Amount,
                sort_order: SortOrder::Descending,
                ..everything()
            })
            .transactions
            .iter()
            .map(|transaction| transaction.title.as_str())
            .collect();

        assert_eq!(titles, ["A", "B", "C"]);
    }

    #[test]
    fn pages_through_sorted_results() {
        let (mut store, _) = get_test_store();
        for amount in 1..=5 {
            store.create(income("Income", amount as f64));
        }
        let query = |offset, limit| TransactionQuery {
            sort_by: SortBy::Amount,
            sort_order: SortOrder::Ascending,
            limit,
            offset,
            ..Default::default()
        };

        let amounts = |offset, limit| -> Vec<f64> {
            store
                .find_all(&query(offset, limit))
                .transactions
                .iter()
                .map(|transaction| transaction.amount)
                .collect()
        };

        assert_eq!(amounts(0, 2), [1.0, 2.0]);
        assert_eq!(amounts(2, 2), [3.0, 4.0]);
        assert_eq!(amounts(4, 2), [5.0]);
    }

    #[test]
    fn offset_past_end_gives_empty_page_with_total() {
        let (mut store, _) = get_test_store();
        store.create(income("Salary", 100.0));
        store.create(expense("Groceries", 50.0));

        let page = store.find_all(&TransactionQuery {
            offset: 10,
            ..Default::default()
        });

        assert!(page.transactions.is_empty());
        assert_eq!(page.total, 2);
    }

    #[test]
    fn zero_limit_gives_empty_page_with_total() {
        let (mut store, _) = get_test_store();
        store.create(income("Salary", 100.0));

        let page = store.find_all(&TransactionQuery {
            limit: 0,
            ..Default::default()
        });

        assert!(page.transactions.is_empty());
        assert_eq!(page.total, 1);
    }

    #[test]
    fn stats_scenario() {
        let (mut store, _) = get_test_store();
        for amount in [100.0, 200.0, 300.0] {
            store.create(income("Income", amount));
        }
        for amount in [50.0, 75.0] {
            store.create(expense("Expense", amount));
        }

        let stats = store.stats();

        assert_eq!(stats.total_count, 5);
        assert_eq!(stats.total_income, 600.0);
        assert_eq!(stats.total_expense, 125.0);
        assert_eq!(stats.balance, 475.0);
        assert_eq!(stats.income_count, 3);
        assert_eq!(stats.expense_count, 2);
        assert_eq!(stats.average_income, 200.0);
        assert_eq!(stats.average_expense, 62.5);
        assert_eq!(stats.category_totals[&Category::Salary], 600.0);
        assert_eq!(stats.category_totals[&Category::Food], 125.0);
        assert_eq!(stats.category_totals[&Category::Education], 0.0);
    }

    #[test]
    fn stats_balance_matches_totals_after_changes() {
        let (mut store, _) = get_test_store();
        let salary = store.create(income("Salary", 1000.0));
        store.create(expense("Groceries", 250.0));
        store.update(
            salary.id,
            TransactionUpdate {
                transaction_type: Some(TransactionType::Expense),
                ..Default::default()
            },
        );

        let stats = store.stats();

        assert_eq!(stats.balance, stats.total_income - stats.total_expense);
        assert_eq!(stats.balance, -1250.0);
        assert_eq!(stats.average_income, 0.0);
    }
}
