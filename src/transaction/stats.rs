//! Summary statistics over a collection of transactions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::core::{Category, Transaction, TransactionType};

/// Totals, counts and averages over a set of transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStatistics {
    /// The number of transactions.
    pub total_count: usize,
    /// The sum of the amounts of income transactions.
    pub total_income: f64,
    /// The sum of the amounts of expense transactions.
    pub total_expense: f64,
    /// `total_income - total_expense`.
    pub balance: f64,
    /// The number of income transactions.
    pub income_count: usize,
    /// The number of expense transactions.
    pub expense_count: usize,
    /// The mean income amount, or zero if there is no income.
    pub average_income: f64,
    /// The mean expense amount, or zero if there are no expenses.
    pub average_expense: f64,
    /// The sum of amounts per category.
    ///
    /// Every [Category] has an entry, including those without transactions.
    pub category_totals: BTreeMap<Category, f64>,
}

impl TransactionStatistics {
    /// Aggregate `transactions` in a single pass.
    pub fn from_transactions<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut category_totals: BTreeMap<Category, f64> = Category::ALL
            .into_iter()
            .map(|category| (category, 0.0))
            .collect();

        let mut total_income = 0.0;
        let mut total_expense = 0.0;
        let mut income_count = 0;
        let mut expense_count = 0;

        for transaction in transactions {
            *category_totals.entry(transaction.category).or_insert(0.0) += transaction.amount;

            match transaction.transaction_type {
                TransactionType::Income => {
                    total_income += transaction.amount;
                    income_count += 1;
                }
                TransactionType::Expense => {
                    total_expense += transaction.amount;
                    expense_count += 1;
                }
            }
        }

        Self {
            total_count: income_count + expense_count,
            total_income,
            total_expense,
            balance: total_income - total_expense,
            income_count,
            expense_count,
            average_income: average(total_income, income_count),
            average_expense: average(total_expense, expense_count),
            category_totals,
        }
    }
}

fn average(total: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        total / count as f64
    }
}
