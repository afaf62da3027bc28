//! Endpoints that describe the service itself rather than its data.

use axum::{
    Json,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{DOCTYPE, Markup, html};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState,
    endpoints,
    transaction::{Category, SortBy, SortOrder, TransactionType},
};

/// The version reported by the health check and API info.
pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The body of the health check response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub success: bool,
    pub message: String,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub version: String,
    /// Seconds since the server started.
    pub uptime: f64,
    pub environment: String,
}

/// A route handler that reports that the server is up.
pub async fn get_health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(HealthReport {
        success: true,
        message: "Ledger API is healthy".to_owned(),
        timestamp: OffsetDateTime::now_utc(),
        version: API_VERSION.to_owned(),
        uptime: state.started_at.elapsed().as_secs_f64(),
        environment: state.environment.clone(),
    })
}

/// Where to find the main parts of the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointMap {
    pub health: String,
    pub transactions: String,
    pub stats: String,
}

/// The body of the API root response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiInfo {
    pub success: bool,
    pub message: String,
    pub version: String,
    pub documentation: String,
    pub endpoints: EndpointMap,
}

/// A route handler that greets clients and points them at the docs.
pub async fn get_api_info() -> Json<ApiInfo> {
    Json(ApiInfo {
        success: true,
        message: "Welcome to the Ledger API".to_owned(),
        version: API_VERSION.to_owned(),
        documentation: endpoints::API_DOCS.to_owned(),
        endpoints: EndpointMap {
            health: endpoints::HEALTH.to_owned(),
            transactions: endpoints::TRANSACTIONS.to_owned(),
            stats: endpoints::TRANSACTION_STATS.to_owned(),
        },
    })
}

struct EndpointDoc {
    method: &'static str,
    path: &'static str,
    description: &'static str,
}

const ENDPOINT_DOCS: [EndpointDoc; 8] = [
    EndpointDoc {
        method: "GET",
        path: endpoints::HEALTH,
        description: "Health check",
    },
    EndpointDoc {
        method: "GET",
        path: endpoints::TRANSACTIONS,
        description: "List transactions with filtering, sorting and pagination",
    },
    EndpointDoc {
        method: "GET",
        path: endpoints::TRANSACTION_STATS,
        description: "Totals, counts and averages over every transaction",
    },
    EndpointDoc {
        method: "GET",
        path: endpoints::TRANSACTION,
        description: "Get a single transaction by ID",
    },
    EndpointDoc {
        method: "POST",
        path: endpoints::TRANSACTIONS,
        description: "Create a transaction",
    },
    EndpointDoc {
        method: "PUT",
        path: endpoints::TRANSACTION,
        description: "Update some or all fields of a transaction",
    },
    EndpointDoc {
        method: "PATCH",
        path: endpoints::TRANSACTION,
        description: "Same as PUT",
    },
    EndpointDoc {
        method: "DELETE",
        path: endpoints::TRANSACTION,
        description: "Delete a transaction",
    },
];

const DOCS_STYLE: &str = r#"
    body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; background: #fafafa; margin: 0; }
    main { max-width: 960px; margin: 0 auto; padding: 20px; }
    section { background: #fff; margin-bottom: 20px; padding: 20px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
    h1 { color: #1976d2; }
    table { border-collapse: collapse; width: 100%; }
    td { padding: 8px; border-bottom: 1px solid #f0f0f0; }
    .method { font-weight: bold; font-family: monospace; }
    code, pre { font-family: Monaco, Courier, monospace; }
"#;

const EXAMPLE_REQUEST: &str = r#"{
  "title": "Monthly Salary",
  "description": "Software developer salary",
  "amount": 5000,
  "type": "income",
  "category": "salary"
}"#;

fn docs_view() -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "API Documentation - Ledger" }
                style { (DOCS_STYLE) }
            }

            body
            {
                main
                {
                    section
                    {
                        h1 { "Ledger API" }
                        p { "A JSON API for recording income and expenses." }
                        p
                        {
                            "Send an " code { "Idempotency-Key" } " header with POST, PUT "
                            "and PATCH requests to safely retry them."
                        }
                    }

                    section
                    {
                        h2 { "Endpoints" }
                        table
                        {
                            @for endpoint in &ENDPOINT_DOCS
                            {
                                tr
                                {
                                    td class="method" { (endpoint.method) }
                                    td { code { (endpoint.path) } }
                                    td { (endpoint.description) }
                                }
                            }
                        }
                    }

                    section
                    {
                        h2 { "Query parameters for " code { (endpoints::TRANSACTIONS) } }
                        ul
                        {
                            li { strong { "type: " } (variants(TransactionType::ALL.map(TransactionType::as_str))) }
                            li
                            {
                                strong { "category: " }
                                ul
                                {
                                    @for transaction_type in TransactionType::ALL
                                    {
                                        li { (transaction_type) ": " (categories_for(transaction_type)) }
                                    }
                                }
                            }
                            li { strong { "sortBy: " } (variants(SortBy::ALL.map(SortBy::as_str))) }
                            li { strong { "sortOrder: " } (variants(SortOrder::ALL.map(SortOrder::as_str))) }
                            li { strong { "limit: " } "1 to 100, defaults to 20" }
                            li { strong { "offset: " } "0 or more, defaults to 0" }
                        }
                    }

                    section
                    {
                        h2 { "Example request body" }
                        pre { (EXAMPLE_REQUEST) }
                    }
                }
            }
        }
    }
}

fn variants<const N: usize>(names: [&'static str; N]) -> String {
    names.join(" | ")
}

/// The categories usually paired with `transaction_type`.
fn categories_for(transaction_type: TransactionType) -> String {
    let names: Vec<&str> = Category::ALL
        .into_iter()
        .filter(|category| category.usual_type() == transaction_type)
        .map(Category::as_str)
        .collect();

    names.join(" | ")
}

/// A route handler for the HTML page describing the API.
pub async fn get_api_docs() -> Response {
    docs_view().into_response()
}
