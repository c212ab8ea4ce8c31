//! Sandbox scenario handlers.

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use tracing::info;

use crate::engine::catalog::{self, ScenarioListing};
use crate::engine::{ScenarioDescriptor, ScenarioInput, ScenarioKind, ScenarioReport};
use crate::error::{AppError, AppResult};
use crate::result_ext::OptionResultExt;
use crate::state::AppState;

fn find_scenario(scenario_id: &str) -> AppResult<ScenarioKind> {
    ScenarioKind::find(scenario_id)
        .log_none(format!("scenario lookup: {}", scenario_id))
        .ok_or_else(|| AppError::NotFound(format!("Scenario {} not found", scenario_id)))
}

/// List sandbox scenarios.
///
/// `GET /api/sandbox/scenarios`
pub async fn list() -> Json<Vec<ScenarioListing>> {
    Json(catalog::list())
}

/// Describe a scenario and its steps.
///
/// `GET /api/sandbox/scenarios/{scenario_id}`
pub async fn get(Path(scenario_id): Path<String>) -> AppResult<Json<ScenarioDescriptor>> {
    Ok(Json(find_scenario(&scenario_id)?.descriptor()))
}

/// Execute a scenario.
///
/// `POST /api/sandbox/scenarios/{scenario_id}/run`
///
/// # Request Body
///
/// Optional. Missing fields take their defaults:
///
/// ```json
/// {
///   "customer_id": "C001",
///   "product": "AUTO",
///   "risk_data": {"vehicle_type": "sedan", "driver_age": 35}
/// }
/// ```
///
/// # Response
///
/// `{"results": [...10 steps], "summary": {...}, "logs": [...]}`.
/// A step whose precursor is missing aborts the run with `409 Conflict`.
pub async fn run(
    State(state): State<AppState>,
    Path(scenario_id): Path<String>,
    body: Bytes,
) -> AppResult<Json<ScenarioReport>> {
    let kind = find_scenario(&scenario_id)?;
    let input = parse_input(&body)?;

    let report = kind.run(&input, state.config.step_delay()).await?;
    info!(
        scenario = kind.id(),
        trace_id = report.summary.trace_id.as_ref().map(|t| t.as_str()).unwrap_or("-"),
        steps = report.results.len(),
        "Scenario run completed"
    );
    Ok(Json(report))
}

fn parse_input(body: &[u8]) -> AppResult<ScenarioInput> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ScenarioInput::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid scenario input: {}", e)))
}
