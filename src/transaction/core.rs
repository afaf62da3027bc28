//! Defines the core data models for transactions.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

// ============================================================================
// MODELS
// ============================================================================

/// The ID of a transaction.
pub type TransactionId = Uuid;

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Money was earned.
    Income,
    /// Money was spent.
    Expense,
}

impl TransactionType {
    /// Every transaction type, in declaration order.
    pub const ALL: [TransactionType; 2] = [TransactionType::Income, TransactionType::Expense];

    /// The name used for this type in requests and responses.
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TransactionType::ALL
            .into_iter()
            .find(|transaction_type| transaction_type.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("transaction type", s))
    }
}

/// What a transaction was for.
///
/// The first five categories describe income and the rest describe expenses,
/// but a transaction may pair any category with any [TransactionType].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Wages from an employer.
    Salary,
    /// Payment for contract work.
    Freelance,
    /// Revenue from a business.
    Business,
    /// Returns on investments.
    Investment,
    /// Any other income.
    OtherIncome,
    /// Groceries and eating out.
    Food,
    /// Rent and other home costs.
    Housing,
    /// Getting around.
    Transportation,
    /// Household bills like power and water.
    Utilities,
    /// Medical costs.
    Healthcare,
    /// Leisure and hobbies.
    Entertainment,
    /// General purchases.
    Shopping,
    /// Tuition and course materials.
    Education,
    /// Any other expense.
    OtherExpense,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: [Category; 14] = [
        Category::Salary,
        Category::Freelance,
        Category::Business,
        Category::Investment,
        Category::OtherIncome,
        Category::Food,
        Category::Housing,
        Category::Transportation,
        Category::Utilities,
        Category::Healthcare,
        Category::Entertainment,
        Category::Shopping,
        Category::Education,
        Category::OtherExpense,
    ];

    /// The name used for this category in requests and responses.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Salary => "salary",
            Category::Freelance => "freelance",
            Category::Business => "business",
            Category::Investment => "investment",
            Category::OtherIncome => "other_income",
            Category::Food => "food",
            Category::Housing => "housing",
            Category::Transportation => "transportation",
            Category::Utilities => "utilities",
            Category::Healthcare => "healthcare",
            Category::Entertainment => "entertainment",
            Category::Shopping => "shopping",
            Category::Education => "education",
            Category::OtherExpense => "other_expense",
        }
    }

    /// The transaction type this category is normally used with.
    pub fn usual_type(self) -> TransactionType {
        match self {
            Category::Salary
            | Category::Freelance
            | Category::Business
            | Category::Investment
            | Category::OtherIncome => TransactionType::Income,
            Category::Food
            | Category::Housing
            | Category::Transportation
            | Category::Utilities
            | Category::Healthcare
            | Category::Entertainment
            | Category::Shopping
            | Category::Education
            | Category::OtherExpense => TransactionType::Expense,
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownVariant::new("category", s))
    }
}

/// A string did not name any variant of a closed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} \"{value}\"")]
pub struct UnknownVariant {
    /// The name of the enumeration, e.g. "category".
    pub kind: &'static str,
    /// The string that failed to parse.
    pub value: String,
}

impl UnknownVariant {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build] and pass the
/// builder to [TransactionStore::create](super::TransactionStore::create).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A short name for the transaction.
    pub title: String,
    /// Optional free text about the transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The amount of money spent or earned. Always positive.
    pub amount: f64,
    /// Whether the money was spent or earned.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// What the transaction was for.
    pub category: Category,
    /// When the transaction was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the transaction was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        title: &str,
        amount: f64,
        transaction_type: TransactionType,
        category: Category,
    ) -> TransactionBuilder {
        TransactionBuilder {
            title: title.to_owned(),
            description: None,
            amount,
            transaction_type,
            category,
        }
    }
}

/// The business fields of a [Transaction] that has not been stored yet.
///
/// The store assigns the ID and timestamps.
///
/// # Examples
///
/// ```ignore
/// use crate::transaction::{Category, Transaction, TransactionType};
///
/// let rent = Transaction::build("Rent", 1500.0, TransactionType::Expense, Category::Housing)
///     .description(Some("November".to_owned()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionBuilder {
    /// A short name for the transaction, 1 to 100 characters.
    pub title: String,
    /// Optional free text, up to 500 characters.
    pub description: Option<String>,
    /// The amount of money, must be greater than zero.
    pub amount: f64,
    /// Whether the money was spent or earned.
    pub transaction_type: TransactionType,
    /// What the transaction was for.
    pub category: Category,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

/// The fields to change on an existing transaction.
///
/// Fields set to `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionUpdate {
    /// The new title.
    pub title: Option<String>,
    /// The new description. There is no way to clear a description.
    pub description: Option<String>,
    /// The new amount.
    pub amount: Option<f64>,
    /// The new type.
    pub transaction_type: Option<TransactionType>,
    /// The new category.
    pub category: Option<Category>,
}

impl TransactionUpdate {
    /// Overwrite the fields of `transaction` that are set in this update.
    pub(crate) fn apply(self, transaction: &mut Transaction) {
        if let Some(title) = self.title {
            transaction.title = title;
        }
        if let Some(description) = self.description {
            transaction.description = Some(description);
        }
        if let Some(amount) = self.amount {
            transaction.amount = amount;
        }
        if let Some(transaction_type) = self.transaction_type {
            transaction.transaction_type = transaction_type;
        }
        if let Some(category) = self.category {
            transaction.category = category;
        }
    }
}
