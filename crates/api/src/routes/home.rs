//! Home dashboard routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::AppState;

/// Creates the home dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/home/summary", get(get_summary))
        .route("/home/incomes", get(get_income_comparison))
        .route("/home/spends", get(get_spend_comparison))
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters for the totals summary.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// Fiscal year id, as sent by the client.
    #[serde(rename = "fiscalYearId")]
    pub fiscal_year_id: Option<String>,
}

/// Query parameters for the comparison tables.
#[derive(Debug, Deserialize)]
pub struct ComparisonQuery {
    /// Fiscal year id, as sent by the client.
    #[serde(rename = "fiscalYearId")]
    pub fiscal_year_id: Option<String>,
    /// Requested grouping (`department`, `type`, `subtype`).
    #[serde(rename = "groupBy")]
    pub group_by: Option<String>,
}

/// Parses the raw fiscal year value; unparsable is treated as absent.
///
/// Negative values parse here and are rejected by the service's validity
/// gate, so they produce the same zeros/empty payloads as an absent id.
fn parse_fiscal_year(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse().ok())
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /home/summary
#[axum::debug_handler]
async fn get_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> impl IntoResponse {
    let fiscal_year_id = parse_fiscal_year(query.fiscal_year_id.as_deref());

    match state.home.totals(fiscal_year_id).await {
        Ok(totals) => (StatusCode::OK, Json(totals)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to get totals summary");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "Failed to get totals summary"
                })),
            )
                .into_response()
        }
    }
}

/// GET /home/incomes
#[axum::debug_handler]
async fn get_income_comparison(
    State(state): State<AppState>,
    Query(query): Query<ComparisonQuery>,
) -> impl IntoResponse {
    let fiscal_year_id = parse_fiscal_year(query.fiscal_year_id.as_deref());

    match state
        .home
        .income_comparison(fiscal_year_id, query.group_by.as_deref())
        .await
    {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to get income comparison");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "Failed to get income comparison"
                })),
            )
                .into_response()
        }
    }
}

/// GET /home/spends
#[axum::debug_handler]
async fn get_spend_comparison(
    State(state): State<AppState>,
    Query(query): Query<ComparisonQuery>,
) -> impl IntoResponse {
    let fiscal_year_id = parse_fiscal_year(query.fiscal_year_id.as_deref());

    match state
        .home
        .spend_comparison(fiscal_year_id, query.group_by.as_deref())
        .await
    {
        Ok(rows) => (StatusCode::OK, Json(rows)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to get spend comparison");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "internal_error",
                    "message": "Failed to get spend comparison"
                })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::parse_fiscal_year;

    #[rstest]
    #[case::absent(None, None)]
    #[case::plain(Some("7"), Some(7))]
    #[case::padded(Some(" 42 "), Some(42))]
    #[case::negative(Some("-1"), Some(-1))]
    #[case::not_a_number(Some("twelve"), None)]
    #[case::fractional(Some("1.5"), None)]
    #[case::empty(Some(""), None)]
    fn test_parse_fiscal_year(#[case] raw: Option<&str>, #[case] expected: Option<i64>) {
        assert_eq!(parse_fiscal_year(raw), expected);
    }
}
