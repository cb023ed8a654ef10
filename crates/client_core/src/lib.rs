//! Client-side orchestration for the playoff odds dashboard: loads a league's
//! standings and odds, runs the per-team scenario drill-down and projects both
//! into render-ready views.

use std::{sync::Arc, time::Duration};

use shared::domain::{LeagueId, TeamId, TeamStanding};
use tokio::sync::broadcast;
use tracing::debug;

pub mod classify;
pub mod drilldown;
pub mod error;
pub mod loader;
pub mod service;
pub mod store;
pub mod view;

pub use drilldown::{DrilldownOutcome, DrilldownPhase, DrilldownState, ScenarioDrilldownController};
pub use loader::{LeagueLoadController, LoadOutcome};
pub use service::{HttpLeagueService, LeagueService};
pub use store::{LoadStatus, SessionReader, SessionView};

use error::{DrilldownError, LoadError};
use view::DashboardView;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_EVENT_BUFFER: usize = 64;

#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Upper bound for every league service call.
    pub request_timeout: Duration,
    pub event_buffer: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

/// Notification that some state changed and the view should be re-projected.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    SessionChanged {
        status: LoadStatus,
    },
    DrilldownChanged {
        team_id: Option<TeamId>,
        phase: DrilldownPhase,
    },
}

/// Owns both controllers and is the single entry point for presentation
/// commands.
pub struct Dashboard {
    loader: LeagueLoadController,
    drilldown: ScenarioDrilldownController,
    session: SessionReader,
    events: broadcast::Sender<DashboardEvent>,
}

impl Dashboard {
    pub fn new(service: Arc<dyn LeagueService>, config: CoreConfig) -> Arc<Self> {
        let (events, _) = broadcast::channel(config.event_buffer.max(1));
        let loader = LeagueLoadController::new(service.clone(), config.clone(), events.clone());
        let session = loader.reader();
        let drilldown =
            ScenarioDrilldownController::new(service, session.clone(), config, events.clone());
        Arc::new(Self {
            loader,
            drilldown,
            session,
            events,
        })
    }

    /// Loads a league from raw input and closes any open drill-down once the
    /// new cycle has begun, so no selection can reopen it for the old league.
    /// Blank input is rejected without touching either.
    pub async fn submit_league(&self, input: &str) -> Result<LoadOutcome, LoadError> {
        let league_id = LeagueId::from_input(input).ok_or(LoadError::EmptyLeagueId)?;
        let token = self.loader.begin(league_id.clone()).await;
        self.drilldown.close().await;
        Ok(self.loader.fetch(token, league_id).await)
    }

    pub async fn select_team(
        &self,
        team: &TeamStanding,
    ) -> Result<DrilldownOutcome, DrilldownError> {
        self.drilldown.select(team).await
    }

    pub async fn select_team_id(
        &self,
        team_id: &TeamId,
    ) -> Result<DrilldownOutcome, DrilldownError> {
        self.drilldown.select_id(team_id).await
    }

    /// Selects by 1-based standings rank.
    pub async fn select_rank(&self, rank: usize) -> Result<DrilldownOutcome, DrilldownError> {
        let (_, snapshot) = self
            .session
            .active_league()
            .await
            .ok_or(DrilldownError::NoActiveLeague)?;
        let team_id = snapshot
            .team_at_rank(rank)
            .map(|team| team.team_id.clone())
            .ok_or_else(|| DrilldownError::UnknownTeam(format!("#{rank}")))?;
        debug!(rank, %team_id, "resolved standings rank");
        self.drilldown.select_id(&team_id).await
    }

    pub async fn deselect(&self) {
        self.drilldown.close().await;
    }

    pub async fn session(&self) -> SessionView {
        self.session.view().await
    }

    pub async fn drilldown(&self) -> DrilldownState {
        self.drilldown.state().await
    }

    pub async fn render(&self) -> DashboardView {
        let session = self.session.view().await;
        let drilldown = self.drilldown.state().await;
        view::project(&session, &drilldown)
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
