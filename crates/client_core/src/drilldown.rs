//! Per-team scenario drill-down. Runs independently of the league load; a
//! selection is tagged with its own token and a result is applied only while
//! that token is still the newest.

use std::sync::Arc;

use serde::Serialize;
use shared::domain::{ScenarioReport, TeamId, TeamStanding};
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};

use crate::{
    error::{DrilldownError, ServiceError},
    service::{with_deadline, LeagueService},
    store::SessionReader,
    CoreConfig, DashboardEvent,
};

/// Shown in place of any drill-down failure detail.
pub const SCENARIO_FAILED_MESSAGE: &str = "Could not load scenarios.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DrilldownToken(u64);

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DrilldownState {
    #[default]
    Closed,
    Selecting {
        team: TeamStanding,
    },
    Loading {
        team: TeamStanding,
    },
    Ready {
        team: TeamStanding,
        report: Arc<ScenarioReport>,
    },
    Failed {
        team: TeamStanding,
        message: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DrilldownPhase {
    Closed,
    Selecting,
    Loading,
    Ready,
    Failed,
}

impl DrilldownState {
    pub fn phase(&self) -> DrilldownPhase {
        match self {
            DrilldownState::Closed => DrilldownPhase::Closed,
            DrilldownState::Selecting { .. } => DrilldownPhase::Selecting,
            DrilldownState::Loading { .. } => DrilldownPhase::Loading,
            DrilldownState::Ready { .. } => DrilldownPhase::Ready,
            DrilldownState::Failed { .. } => DrilldownPhase::Failed,
        }
    }

    pub fn team(&self) -> Option<&TeamStanding> {
        match self {
            DrilldownState::Closed => None,
            DrilldownState::Selecting { team }
            | DrilldownState::Loading { team }
            | DrilldownState::Ready { team, .. }
            | DrilldownState::Failed { team, .. } => Some(team),
        }
    }

    pub fn is_loading(&self, team_id: &TeamId) -> bool {
        match self {
            DrilldownState::Selecting { team } | DrilldownState::Loading { team } => {
                &team.team_id == team_id
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrilldownOutcome {
    Ready(Arc<ScenarioReport>),
    Failed(String),
    Superseded,
}

#[derive(Debug, Default)]
struct DrilldownMachine {
    latest: DrilldownToken,
    state: DrilldownState,
}

impl DrilldownMachine {
    fn close(&mut self) -> bool {
        self.latest = DrilldownToken(self.latest.0 + 1);
        let was_open = self.state != DrilldownState::Closed;
        self.state = DrilldownState::Closed;
        was_open
    }

    fn open(&mut self, team: TeamStanding) -> DrilldownToken {
        self.close();
        self.state = DrilldownState::Selecting { team };
        self.latest
    }

    fn begin_loading(&mut self, token: DrilldownToken) {
        if token != self.latest {
            return;
        }
        if let DrilldownState::Selecting { team } = std::mem::take(&mut self.state) {
            self.state = DrilldownState::Loading { team };
        }
    }

    fn resolve(
        &mut self,
        token: DrilldownToken,
        result: Result<Arc<ScenarioReport>, ()>,
    ) -> bool {
        if token != self.latest {
            return false;
        }
        let DrilldownState::Loading { team } = std::mem::take(&mut self.state) else {
            return false;
        };
        self.state = match result {
            Ok(report) => DrilldownState::Ready { team, report },
            Err(()) => DrilldownState::Failed {
                team,
                message: SCENARIO_FAILED_MESSAGE.to_string(),
            },
        };
        true
    }
}

pub struct ScenarioDrilldownController {
    service: Arc<dyn LeagueService>,
    session: SessionReader,
    machine: RwLock<DrilldownMachine>,
    config: CoreConfig,
    events: broadcast::Sender<DashboardEvent>,
}

impl ScenarioDrilldownController {
    pub fn new(
        service: Arc<dyn LeagueService>,
        session: SessionReader,
        config: CoreConfig,
        events: broadcast::Sender<DashboardEvent>,
    ) -> Self {
        Self {
            service,
            session,
            machine: RwLock::new(DrilldownMachine::default()),
            config,
            events,
        }
    }

    pub async fn state(&self) -> DrilldownState {
        self.machine.read().await.state.clone()
    }

    /// Opens the drill-down for `team`, replacing whatever was open before.
    /// The team must belong to the fully loaded league.
    pub async fn select(&self, team: &TeamStanding) -> Result<DrilldownOutcome, DrilldownError> {
        self.select_id(&team.team_id).await
    }

    pub async fn select_id(&self, team_id: &TeamId) -> Result<DrilldownOutcome, DrilldownError> {
        let (load_token, snapshot) = self
            .session
            .active_league()
            .await
            .ok_or(DrilldownError::NoActiveLeague)?;
        let team = snapshot
            .team(team_id)
            .cloned()
            .ok_or_else(|| DrilldownError::UnknownTeam(team_id.to_string()))?;

        let token = {
            let mut machine = self.machine.write().await;
            // A load that began after the league was read owns the panel now.
            if self.session.latest_token().await != load_token {
                debug!(team_id = %team.team_id, "league reload started before selection; ignoring");
                return Err(DrilldownError::NoActiveLeague);
            }
            let token = machine.open(team.clone());
            self.notify(&machine.state);
            machine.begin_loading(token);
            self.notify(&machine.state);
            token
        };
        info!(league_id = %snapshot.league_id, team_id = %team.team_id, "scenario drill-down opened");

        let fetched = with_deadline(
            self.config.request_timeout,
            self.service
                .get_scenarios(&snapshot.league_id, &team.team_id),
        )
        .await
        .and_then(|report| {
            report
                .check_weeks(snapshot.total_weeks)
                .map_err(ServiceError::from)?;
            Ok(Arc::new(report))
        });

        // A league reload since selection invalidates the team id.
        let league_changed = self.session.latest_token().await != load_token;

        let mut machine = self.machine.write().await;
        if token != machine.latest {
            debug!(team_id = %team.team_id, "discarding scenario result for superseded selection");
            return Ok(DrilldownOutcome::Superseded);
        }
        if league_changed {
            debug!(team_id = %team.team_id, "league changed during scenario fetch; closing drill-down");
            machine.close();
            self.notify(&machine.state);
            return Ok(DrilldownOutcome::Superseded);
        }

        let outcome = match fetched {
            Ok(report) => {
                machine.resolve(token, Ok(report.clone()));
                DrilldownOutcome::Ready(report)
            }
            Err(err) => {
                warn!(team_id = %team.team_id, error = %err, "scenario fetch failed");
                machine.resolve(token, Err(()));
                DrilldownOutcome::Failed(SCENARIO_FAILED_MESSAGE.to_string())
            }
        };
        self.notify(&machine.state);
        Ok(outcome)
    }

    /// Closes the drill-down from any state; in-flight results are dropped.
    pub async fn close(&self) {
        let mut machine = self.machine.write().await;
        if machine.close() {
            self.notify(&machine.state);
        }
    }

    fn notify(&self, state: &DrilldownState) {
        let _ = self.events.send(DashboardEvent::DrilldownChanged {
            team_id: state.team().map(|team| team.team_id.clone()),
            phase: state.phase(),
        });
    }
}

#[cfg(test)]
#[path = "tests/drilldown_tests.rs"]
mod tests;
