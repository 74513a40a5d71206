use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UseCaseSummary {
    pub name: &'static str,
    pub has_costs: bool,
    pub has_diagram: bool,
    pub calculator_url: String,
}

/// GET /api/v1/use-cases
/// Lists the catalog in menu order, with what each entry will contribute.
pub async fn list_use_cases_handler(State(state): State<AppState>) -> Json<Vec<UseCaseSummary>> {
    let summaries = state
        .catalog
        .names()
        .into_iter()
        .map(|name| {
            let entry = state.catalog.lookup(name);
            UseCaseSummary {
                name,
                has_costs: entry.has_costs(),
                has_diagram: entry.existing_diagram().is_some(),
                calculator_url: entry.calculator_url,
            }
        })
        .collect();
    Json(summaries)
}
