//! Request bodies and query strings for the transaction endpoints, and the
//! rules they must satisfy before reaching the store.

use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use unicode_segmentation::UnicodeSegmentation;

use crate::{Error, pagination::PaginationConfig};

use super::{
    core::{
        Category, Transaction, TransactionBuilder, TransactionId, TransactionType,
        TransactionUpdate,
    },
    query::{SortBy, SortOrder, TransactionQuery},
};

/// The maximum number of characters in a transaction title.
pub const MAX_TITLE_LENGTH: usize = 100;
/// The maximum number of characters in a transaction description.
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// The JSON body for creating a transaction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionForm {
    /// A short name for the transaction.
    pub title: String,
    /// Optional free text. May be left out but not sent as `null`.
    #[serde(default, deserialize_with = "non_null")]
    pub description: Option<String>,
    /// The amount of money, must be greater than zero.
    pub amount: f64,
    /// Sent as `type`.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// What the transaction was for.
    pub category: Category,
}

impl CreateTransactionForm {
    /// Check the form against the field rules.
    ///
    /// # Errors
    /// Returns [Error::Validation] listing every field that broke a rule.
    pub fn validate(self) -> Result<TransactionBuilder, Error> {
        let mut issues = Issues::default();
        issues.check_title(&self.title);
        issues.check_description(self.description.as_deref());
        issues.check_amount(self.amount);
        issues.into_result()?;

        let builder = Transaction::build(
            &self.title,
            self.amount,
            self.transaction_type,
            self.category,
        );

        Ok(builder.description(self.description))
    }
}

/// The JSON body for updating a transaction.
///
/// Every field is optional, missing fields keep their current value.
/// Only `description` may be sent as `null`, which also keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionForm {
    /// The new title.
    #[serde(default, deserialize_with = "non_null")]
    pub title: Option<String>,
    /// The new description.
    #[serde(default)]
    pub description: Option<String>,
    /// The new amount.
    #[serde(default, deserialize_with = "non_null")]
    pub amount: Option<f64>,
    /// Sent as `type`.
    #[serde(default, rename = "type", deserialize_with = "non_null")]
    pub transaction_type: Option<TransactionType>,
    /// The new category.
    #[serde(default, deserialize_with = "non_null")]
    pub category: Option<Category>,
}

impl UpdateTransactionForm {
    /// Check each supplied field against the same rules as creation.
    ///
    /// # Errors
    /// Returns [Error::Validation] listing every field that broke a rule.
    pub fn validate(self) -> Result<TransactionUpdate, Error> {
        let mut issues = Issues::default();
        if let Some(title) = &self.title {
            issues.check_title(title);
        }
        issues.check_description(self.description.as_deref());
        if let Some(amount) = self.amount {
            issues.check_amount(amount);
        }
        issues.into_result()?;

        Ok(TransactionUpdate {
            title: self.title,
            description: self.description,
            amount: self.amount,
            transaction_type: self.transaction_type,
            category: self.category,
        })
    }
}

/// The raw query string for listing transactions.
///
/// Values are kept as strings so that each bad value can be reported by name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTransactionsParams {
    /// `income` or `expense`.
    #[serde(default, rename = "type")]
    pub transaction_type: Option<String>,
    /// One of the [Category] names.
    #[serde(default)]
    pub category: Option<String>,
    /// `createdAt`, `amount` or `title`.
    #[serde(default)]
    pub sort_by: Option<String>,
    /// `asc` or `desc`.
    #[serde(default)]
    pub sort_order: Option<String>,
    /// The page size.
    #[serde(default)]
    pub limit: Option<String>,
    /// The number of transactions to skip.
    #[serde(default)]
    pub offset: Option<String>,
}

impl ListTransactionsParams {
    /// Parse the query string into a [TransactionQuery].
    ///
    /// Empty `type` and `category` values mean "no filter". `limit` must be
    /// between one and `config.max_limit`, `offset` must not be negative.
    ///
    /// # Errors
    /// Returns [Error::Validation] listing every parameter that could not be parsed.
    pub fn validate(self, config: &PaginationConfig) -> Result<TransactionQuery, Error> {
        let mut issues = Issues::default();

        let transaction_type: Option<TransactionType> = issues.parse_optional(
            "type",
            non_empty(self.transaction_type),
            "Type must be either income or expense",
        );
        let category: Option<Category> =
            issues.parse_optional("category", non_empty(self.category), "Invalid category");
        let sort_by: SortBy = issues
            .parse_optional(
                "sortBy",
                self.sort_by,
                "Sort field must be one of createdAt, amount or title",
            )
            .unwrap_or_default();
        let sort_order: SortOrder = issues
            .parse_optional(
                "sortOrder",
                self.sort_order,
                "Sort order must be asc or desc",
            )
            .unwrap_or_default();

        let limit = match self.limit {
            Some(value) => match value.trim().parse::<usize>() {
                Ok(limit) if (1..=config.max_limit).contains(&limit) => limit,
                _ => {
                    let max_limit = config.max_limit;
                    let message = format!("Limit must be a whole number from 1 to {max_limit}");
                    issues.push("limit", &message);
                    config.default_limit
                }
            },
            None => config.default_limit,
        };
        let offset = match self.offset {
            Some(value) => match value.trim().parse::<usize>() {
                Ok(offset) => offset,
                Err(_) => {
                    issues.push("offset", "Offset must be a whole number of at least 0");
                    0
                }
            },
            None => 0,
        };

        issues.into_result()?;

        Ok(TransactionQuery {
            transaction_type,
            category,
            sort_by,
            sort_order,
            limit,
            offset,
        })
    }
}

/// Deserialize a field that may be left out but must not be `null`.
///
/// Pair with `#[serde(default)]` so a missing field becomes `None`.
fn non_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

/// Parse a transaction ID from a path segment.
///
/// # Errors
/// Returns [Error::Validation] if `id` is not a UUID.
pub fn parse_transaction_id(id: &str) -> Result<TransactionId, Error> {
    id.parse()
        .map_err(|_| Error::Validation("id: Invalid transaction ID format".to_owned()))
}

/// Collects `field: message` pairs for an [Error::Validation].
#[derive(Debug, Default)]
struct Issues(Vec<String>);

impl Issues {
    fn push(&mut self, field: &str, message: &str) {
        self.0.push(format!("{field}: {message}"));
    }

    fn parse<T: FromStr>(&mut self, field: &str, value: &str, message: &str) -> Option<T> {
        match value.parse() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                self.push(field, message);
                None
            }
        }
    }

    fn parse_optional<T: FromStr>(
        &mut self,
        field: &str,
        value: Option<String>,
        message: &str,
    ) -> Option<T> {
        value.and_then(|value| self.parse(field, &value, message))
    }

    fn check_title(&mut self, title: &str) {
        let length = title.graphemes(true).count();

        if length == 0 {
            self.push("title", "Title is required");
        } else if length > MAX_TITLE_LENGTH {
            self.push("title", "Title too long");
        }
    }

    fn check_description(&mut self, description: Option<&str>) {
        let too_long = description.is_some_and(|description| {
            description.graphemes(true).count() > MAX_DESCRIPTION_LENGTH
        });

        if too_long {
            self.push("description", "Description too long");
        }
    }

    fn check_amount(&mut self, amount: f64) {
        if !(amount.is_finite() && amount > 0.0) {
            self.push("amount", "Amount must be positive");
        }
    }

    fn into_result(self) -> Result<(), Error> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(Error::Validation(self.0.join("; ")))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{
        Error,
        pagination::PaginationConfig,
        transaction::{
            Category, CreateTransactionForm, ListTransactionsParams, SortBy, SortOrder,
            TransactionQuery, TransactionType, TransactionUpdate, UpdateTransactionForm,
            parse_transaction_id,
        },
    };

    fn rent_form() -> CreateTransactionForm {
        CreateTransactionForm {
            title: "Rent".to_owned(),
            description: None,
            amount: 1500.0,
            transaction_type: TransactionType::Expense,
            category: Category::Housing,
        }
    }

    #[test]
    fn valid_create_form_becomes_builder() {
        let builder = rent_form().validate().unwrap();

        assert_eq!(builder.title, "Rent");
        assert_eq!(builder.amount, 1500.0);
        assert_eq!(builder.category, Category::Housing);
    }

    #[test]
    fn create_form_reports_every_bad_field() {
        let form = CreateTransactionForm {
            title: String::new(),
            description: Some("x".repeat(501)),
            amount: -5.0,
            ..rent_form()
        };

        let result = form.validate();

        assert_eq!(
            result,
            Err(Error::Validation(
                "title: Title is required; description: Description too long; \
                amount: Amount must be positive"
                    .to_owned()
            ))
        );
    }

    #[test]
    fn title_is_checked_and_kept_as_sent() {
        let form = CreateTransactionForm {
            title: "  Rent  ".to_owned(),
            ..rent_form()
        };

        assert_eq!(form.validate().unwrap().title, "  Rent  ");
    }

    #[test]
    fn title_length_counts_characters_not_bytes() {
        let form = CreateTransactionForm {
            title: "é".repeat(100),
            ..rent_form()
        };

        assert!(form.validate().is_ok());

        let form = CreateTransactionForm {
            title: "a".repeat(101),
            ..rent_form()
        };

        assert_eq!(
            form.validate(),
            Err(Error::Validation("title: Title too long".to_owned()))
        );
    }

    #[test]
    fn zero_amount_is_rejected() {
        let form = CreateTransactionForm {
            amount: 0.0,
            ..rent_form()
        };

        assert_eq!(
            form.validate(),
            Err(Error::Validation("amount: Amount must be positive".to_owned()))
        );
    }

    #[test]
    fn empty_update_form_is_valid() {
        let update = UpdateTransactionForm::default().validate();

        assert_eq!(update, Ok(TransactionUpdate::default()));
    }

    #[test]
    fn update_form_checks_supplied_fields() {
        let form = UpdateTransactionForm {
            title: Some(String::new()),
            amount: Some(0.0),
            ..Default::default()
        };

        assert_eq!(
            form.validate(),
            Err(Error::Validation(
                "title: Title is required; amount: Amount must be positive".to_owned()
            ))
        );
    }

    #[test]
    fn update_form_deserializes_partial_json() {
        let form: UpdateTransactionForm = serde_json::from_str(r#"{"amount": 1600}"#).unwrap();

        assert_eq!(
            form,
            UpdateTransactionForm {
                amount: Some(1600.0),
                ..Default::default()
            }
        );
    }

    #[test]
    fn null_create_description_is_rejected() {
        let body = json!({
            "title": "Rent",
            "description": null,
            "amount": 1500,
            "type": "expense",
            "category": "housing"
        });

        let result = serde_json::from_value::<CreateTransactionForm>(body);

        assert!(result.is_err());
    }

    #[test]
    fn null_update_fields_are_rejected() {
        for field in ["title", "amount", "type", "category"] {
            let body = json!({ field: null });

            let result = serde_json::from_value::<UpdateTransactionForm>(body);

            assert!(result.is_err(), "null {field} was accepted");
        }
    }

    #[test]
    fn null_update_description_keeps_current_value() {
        let body = json!({"description": null});

        let form: UpdateTransactionForm = serde_json::from_value(body).unwrap();

        assert_eq!(form, UpdateTransactionForm::default());
    }

    #[test]
    fn empty_params_use_defaults() {
        let query = ListTransactionsParams::default()
            .validate(&PaginationConfig::default())
            .unwrap();

        assert_eq!(query, TransactionQuery::default());
    }

    #[test]
    fn empty_filters_mean_no_filter() {
        let params = ListTransactionsParams {
            transaction_type: Some(String::new()),
            category: Some(String::new()),
            ..Default::default()
        };

        let query = params.validate(&PaginationConfig::default()).unwrap();

        assert_eq!(query.transaction_type, None);
        assert_eq!(query.category, None);
    }

    #[test]
    fn parses_all_params() {
        let params = ListTransactionsParams {
            transaction_type: Some("income".to_owned()),
            category: Some("freelance".to_owned()),
            sort_by: Some("amount".to_owned()),
            sort_order: Some("asc".to_owned()),
            limit: Some("5".to_owned()),
            offset: Some("10".to_owned()),
        };

        let query = params.validate(&PaginationConfig::default()).unwrap();

        assert_eq!(
            query,
            TransactionQuery {
                transaction_type: Some(TransactionType::Income),
                category: Some(Category::Freelance),
                sort_by: SortBy::Amount,
                sort_order: SortOrder::Ascending,
                limit: 5,
                offset: 10,
            }
        );
    }

    #[test]
    fn rejects_out_of_range_limit_and_negative_offset() {
        let params = ListTransactionsParams {
            limit: Some("101".to_owned()),
            offset: Some("-1".to_owned()),
            ..Default::default()
        };

        let result = params.validate(&PaginationConfig::default());

        assert_eq!(
            result,
            Err(Error::Validation(
                "limit: Limit must be a whole number from 1 to 100; \
                offset: Offset must be a whole number of at least 0"
                    .to_owned()
            ))
        );
    }

    #[test]
    fn rejects_unknown_enum_values() {
        let params = ListTransactionsParams {
            transaction_type: Some("gift".to_owned()),
            sort_by: Some("date".to_owned()),
            ..Default::default()
        };

        let result = params.validate(&PaginationConfig::default());

        assert!(matches!(result, Err(Error::Validation(detail))
            if detail.starts_with("type: ") && detail.contains("sortBy: ")));
    }

    #[test]
    fn transaction_id_must_be_uuid() {
        assert!(parse_transaction_id("4b8e5a6e-4f43-4c4b-9b8e-2f1d8a0c9e11").is_ok());
        assert_eq!(
            parse_transaction_id("abc123"),
            Err(Error::Validation("id: Invalid transaction ID format".to_owned()))
        );
    }
}
