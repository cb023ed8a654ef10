use std::{sync::Arc, time::Duration};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use shared::{
    error::ErrorBody,
    protocol::{LeaguePayload, OddsPayload, ScenarioPayload},
};
use tracing::{debug, info};

use crate::fixtures::{FixtureCatalog, FixtureLeague};

pub struct AppState {
    pub catalog: FixtureCatalog,
    pub latency: Duration,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorBody>)>;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub leagues: Vec<String>,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/healthz", get(healthz))
        .route("/api/league/:league_id", get(league))
        .route("/api/league/:league_id/odds", get(odds))
        .route("/api/league/:league_id/scenarios/:team_id", get(scenarios))
        .fallback(not_found)
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "Playoff odds fixture service is running",
        leagues: state
            .catalog
            .league_ids()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}

async fn league(
    State(state): State<Arc<AppState>>,
    Path(league_id): Path<String>,
) -> ApiResult<LeaguePayload> {
    let fixture = find_league(&state, &league_id).await?;
    info!(%league_id, teams = fixture.league.teams.len(), "serving league");
    Ok(Json(fixture.league.clone()))
}

async fn odds(
    State(state): State<Arc<AppState>>,
    Path(league_id): Path<String>,
) -> ApiResult<Vec<OddsPayload>> {
    let fixture = find_league(&state, &league_id).await?;
    info!(%league_id, "serving odds");
    Ok(Json(fixture.odds.clone()))
}

async fn scenarios(
    State(state): State<Arc<AppState>>,
    Path((league_id, team_id)): Path<(String, String)>,
) -> ApiResult<ScenarioPayload> {
    let fixture = find_league(&state, &league_id).await?;
    let scenario = fixture
        .scenario(&team_id)
        .ok_or_else(|| not_found_error(format!("Team {team_id} not found in league {league_id}")))?;
    info!(%league_id, %team_id, conditions = scenario.conditions.len(), "serving scenarios");
    Ok(Json(scenario))
}

async fn not_found() -> (StatusCode, Json<ErrorBody>) {
    not_found_error("Not Found")
}

async fn find_league<'a>(
    state: &'a AppState,
    league_id: &str,
) -> Result<&'a FixtureLeague, (StatusCode, Json<ErrorBody>)> {
    if !state.latency.is_zero() {
        debug!(latency_ms = state.latency.as_millis() as u64, "delaying response");
        tokio::time::sleep(state.latency).await;
    }
    state
        .catalog
        .league(league_id)
        .ok_or_else(|| not_found_error(format!("League {league_id} not found")))
}

fn not_found_error(detail: impl Into<String>) -> (StatusCode, Json<ErrorBody>) {
    (StatusCode::NOT_FOUND, Json(ErrorBody::new(detail)))
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
