//! Scripted in-memory league service and fixture builders shared by the unit
//! tests of this crate.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use shared::domain::{
    Condition, LeagueId, LeagueSnapshot, OddsEntry, ScenarioReport, Streak, StreakKind, TeamId,
    TeamStanding,
};
use tokio::sync::oneshot;

use crate::{error::ServiceError, service::LeagueService};

pub(crate) type Gate<T> = oneshot::Sender<Result<T, ServiceError>>;

pub(crate) enum Reply<T> {
    Now(Result<T, ServiceError>),
    Gated(oneshot::Receiver<Result<T, ServiceError>>),
    Never,
}

impl<T> Reply<T> {
    pub(crate) fn ok(value: T) -> Self {
        Reply::Now(Ok(value))
    }

    pub(crate) fn err(error: ServiceError) -> Self {
        Reply::Now(Err(error))
    }

    pub(crate) fn gated() -> (Gate<T>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Reply::Gated(rx))
    }

    async fn resolve(self) -> Result<T, ServiceError> {
        match self {
            Reply::Now(result) => result,
            Reply::Gated(rx) => rx
                .await
                .unwrap_or_else(|_| Err(ServiceError::Transport("gate dropped".to_string()))),
            Reply::Never => std::future::pending().await,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Snapshot(LeagueId),
    Odds(LeagueId),
    Scenarios(LeagueId, TeamId),
}

#[derive(Default)]
pub(crate) struct ScriptedLeagueService {
    snapshots: Mutex<VecDeque<Reply<LeagueSnapshot>>>,
    odds: Mutex<VecDeque<Reply<Vec<OddsEntry>>>>,
    scenarios: Mutex<VecDeque<Reply<ScenarioReport>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedLeagueService {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn push_snapshot(&self, reply: Reply<LeagueSnapshot>) {
        self.snapshots.lock().unwrap().push_back(reply);
    }

    pub(crate) fn push_odds(&self, reply: Reply<Vec<OddsEntry>>) {
        self.odds.lock().unwrap().push_back(reply);
    }

    pub(crate) fn push_scenarios(&self, reply: Reply<ScenarioReport>) {
        self.scenarios.lock().unwrap().push_back(reply);
    }

    /// Scripts a full successful load of `snapshot` with the given odds.
    pub(crate) fn push_league(&self, snapshot: LeagueSnapshot, odds: Vec<OddsEntry>) {
        self.push_snapshot(Reply::ok(snapshot));
        self.push_odds(Reply::ok(odds));
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) async fn wait_for_calls(&self, count: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.calls.lock().unwrap().len() < count {
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        })
        .await
        .expect("service was not called in time");
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next<T>(queue: &Mutex<VecDeque<Reply<T>>>) -> Reply<T> {
        queue.lock().unwrap().pop_front().unwrap_or_else(|| {
            Reply::err(ServiceError::Transport("no scripted reply".to_string()))
        })
    }
}

#[async_trait]
impl LeagueService for ScriptedLeagueService {
    async fn get_snapshot(&self, league_id: &LeagueId) -> Result<LeagueSnapshot, ServiceError> {
        self.record(Call::Snapshot(league_id.clone()));
        Self::next(&self.snapshots).resolve().await
    }

    async fn get_odds(&self, league_id: &LeagueId) -> Result<Vec<OddsEntry>, ServiceError> {
        self.record(Call::Odds(league_id.clone()));
        Self::next(&self.odds).resolve().await
    }

    async fn get_scenarios(
        &self,
        league_id: &LeagueId,
        team_id: &TeamId,
    ) -> Result<ScenarioReport, ServiceError> {
        self.record(Call::Scenarios(league_id.clone(), team_id.clone()));
        Self::next(&self.scenarios).resolve().await
    }
}

pub(crate) const DEMO_TEAMS: [&str; 10] = [
    "Alpha", "Beta", "Gamma", "Delta", "Epsilon", "Zeta", "Eta", "Theta", "Iota", "Kappa",
];

pub(crate) fn team(id: &str, name: &str, wins: u32, losses: u32, points_for: f64) -> TeamStanding {
    TeamStanding {
        team_id: TeamId::from(id),
        name: name.to_string(),
        owner: None,
        logo_url: None,
        wins,
        losses,
        ties: 0,
        points_for,
        points_against: None,
        streak: Streak::Run {
            kind: StreakKind::Win,
            length: 1,
        },
    }
}

pub(crate) fn league(league_id: &str, names: &[&str]) -> LeagueSnapshot {
    let count = names.len() as u32;
    let teams = names
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let idx = idx as u32;
            team(
                &(idx + 1).to_string(),
                name,
                count - idx,
                idx,
                1500.0 - f64::from(idx) * 25.5,
            )
        })
        .collect();
    LeagueSnapshot {
        league_id: LeagueId::from(league_id),
        name: format!("League {league_id}"),
        current_week: 11,
        total_weeks: 14,
        playoff_spots: 4,
        teams,
    }
}

/// Ten teams ranked Alpha..Kappa, ids "1".."10".
pub(crate) fn demo_league() -> LeagueSnapshot {
    league("7495009", &DEMO_TEAMS)
}

/// Odds for every team of `snapshot`, in standings order.
pub(crate) fn odds_for(snapshot: &LeagueSnapshot, probabilities: &[f64]) -> Vec<OddsEntry> {
    snapshot
        .teams
        .iter()
        .zip(probabilities)
        .map(|(team, probability)| OddsEntry {
            team_id: team.team_id.clone(),
            team_name: team.name.clone(),
            playoff_probability: *probability,
            headlines: vec![format!("{} needs a win", team.name)],
        })
        .collect()
}

/// Alpha clinched, Zeta eliminated, everyone else in between.
pub(crate) fn demo_odds(snapshot: &LeagueSnapshot) -> Vec<OddsEntry> {
    odds_for(
        snapshot,
        &[100.0, 88.2, 71.4, 55.0, 50.0, 0.0, 30.3, 12.5, 8.1, 0.5],
    )
}

pub(crate) fn report(
    league_id: &str,
    team_id: &str,
    probability: f64,
    conditions: Vec<Condition>,
) -> ScenarioReport {
    ScenarioReport {
        league_id: LeagueId::from(league_id),
        team_id: TeamId::from(team_id),
        probability,
        message: format!("Team {team_id} playoff outlook"),
        conditions,
    }
}

pub(crate) fn condition(week: u32, frequency: f64, is_own_game: bool) -> Condition {
    Condition {
        description: format!("Week {week} result"),
        week,
        frequency,
        is_own_game,
    }
}
