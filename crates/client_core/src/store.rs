//! Session state for the active league: snapshot, odds and the load lifecycle.
//!
//! The store is written only by [`crate::LeagueLoadController`]; everything
//! else reads it through [`SessionReader`].

use std::{collections::HashSet, sync::Arc};

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::domain::{LeagueId, LeagueSnapshot, OddsEntry, TeamId};
use tokio::sync::RwLock;

use crate::error::StoreError;

/// Single user-facing text for every league load failure.
pub const LEAGUE_LOAD_FAILED_MESSAGE: &str =
    "Failed to fetch league data. Please check the ID and try again.";

/// Sequence marker handed out by [`SessionStateStore::begin_load`]. Only the
/// newest token may mutate the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LoadToken(u64);

impl LoadToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    SnapshotUnavailable,
    OddsUnavailable,
    DataIntegrity,
    Rejected,
}

impl FailureKind {
    pub fn reason(self) -> &'static str {
        match self {
            FailureKind::SnapshotUnavailable => "snapshot unavailable",
            FailureKind::OddsUnavailable => "odds unavailable",
            FailureKind::DataIntegrity => "odds do not match league standings",
            FailureKind::Rejected => "load result rejected by session store",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadFailure {
    pub kind: FailureKind,
    /// Diagnostic detail for logs.
    pub detail: String,
}

impl LoadFailure {
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn user_message(&self) -> &'static str {
        LEAGUE_LOAD_FAILED_MESSAGE
    }
}

/// Point-in-time copy of the store handed to the presentation layer.
#[derive(Debug, Clone, Default)]
pub struct SessionView {
    pub league_id: Option<LeagueId>,
    pub status: LoadStatus,
    pub snapshot: Option<Arc<LeagueSnapshot>>,
    pub odds: Option<Arc<Vec<OddsEntry>>>,
    pub last_error: Option<LoadFailure>,
    pub loaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
pub struct SessionStateStore {
    latest: LoadToken,
    league_id: Option<LeagueId>,
    snapshot: Option<Arc<LeagueSnapshot>>,
    odds: Option<Arc<Vec<OddsEntry>>>,
    status: LoadStatus,
    last_error: Option<LoadFailure>,
    loaded_at: Option<DateTime<Utc>>,
}

impl SessionStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new load cycle and supersedes any cycle still in flight.
    pub fn begin_load(&mut self, league_id: LeagueId) -> LoadToken {
        self.latest = LoadToken(self.latest.0 + 1);
        self.league_id = Some(league_id);
        self.snapshot = None;
        self.odds = None;
        self.last_error = None;
        self.loaded_at = None;
        self.status = LoadStatus::Loading;
        self.latest
    }

    pub fn is_current(&self, token: LoadToken) -> bool {
        token == self.latest
    }

    pub fn latest_token(&self) -> LoadToken {
        self.latest
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn commit_snapshot(
        &mut self,
        token: LoadToken,
        snapshot: LeagueSnapshot,
    ) -> Result<(), StoreError> {
        self.ensure_loading(token, "commit snapshot")?;
        if self.snapshot.is_some() {
            return Err(StoreError::InvalidTransition {
                operation: "commit a second snapshot",
                status: self.status,
            });
        }
        self.snapshot = Some(Arc::new(snapshot));
        Ok(())
    }

    /// Stores the odds and moves to `Ready`. A team-id mismatch against the
    /// committed snapshot fails the cycle instead.
    pub fn commit_odds(&mut self, token: LoadToken, odds: Vec<OddsEntry>) -> Result<(), StoreError> {
        self.ensure_loading(token, "commit odds")?;
        let Some(snapshot) = self.snapshot.as_ref() else {
            return Err(StoreError::MissingSnapshot);
        };

        if let Some(detail) = odds_mismatch(snapshot, &odds) {
            self.mark_failed(LoadFailure::new(FailureKind::DataIntegrity, detail.clone()));
            return Err(StoreError::Integrity(detail));
        }

        self.odds = Some(Arc::new(odds));
        self.status = LoadStatus::Ready;
        self.loaded_at = Some(Utc::now());
        Ok(())
    }

    /// Terminal failure for the current cycle. A snapshot committed earlier in
    /// the cycle is dropped so standings never show without matching odds.
    pub fn fail(&mut self, token: LoadToken, failure: LoadFailure) -> Result<(), StoreError> {
        self.ensure_loading(token, "fail")?;
        self.mark_failed(failure);
        Ok(())
    }

    /// Fails the current cycle whatever its status. Returns `false` for a
    /// superseded token.
    pub fn abandon(&mut self, token: LoadToken, failure: LoadFailure) -> bool {
        if !self.is_current(token) {
            return false;
        }
        self.mark_failed(failure);
        true
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            league_id: self.league_id.clone(),
            status: self.status,
            snapshot: self.snapshot.clone(),
            odds: self.odds.clone(),
            last_error: self.last_error.clone(),
            loaded_at: self.loaded_at,
        }
    }

    fn ensure_loading(&self, token: LoadToken, operation: &'static str) -> Result<(), StoreError> {
        if !self.is_current(token) {
            return Err(StoreError::Stale);
        }
        if self.status != LoadStatus::Loading {
            return Err(StoreError::InvalidTransition {
                operation,
                status: self.status,
            });
        }
        Ok(())
    }

    fn mark_failed(&mut self, failure: LoadFailure) {
        self.snapshot = None;
        self.odds = None;
        self.loaded_at = None;
        self.last_error = Some(failure);
        self.status = LoadStatus::Failed;
    }
}

/// Describes how the odds id set differs from the snapshot, if it does.
fn odds_mismatch(snapshot: &LeagueSnapshot, odds: &[OddsEntry]) -> Option<String> {
    let expected = snapshot.team_ids();
    let mut seen: HashSet<&TeamId> = HashSet::with_capacity(odds.len());
    let mut duplicates = Vec::new();
    for entry in odds {
        if !seen.insert(&entry.team_id) {
            duplicates.push(entry.team_id.as_str());
        }
    }

    let mut missing: Vec<&str> = expected
        .difference(&seen)
        .copied()
        .map(TeamId::as_str)
        .collect();
    let mut unexpected: Vec<&str> = seen
        .difference(&expected)
        .copied()
        .map(TeamId::as_str)
        .collect();

    if missing.is_empty() && unexpected.is_empty() && duplicates.is_empty() {
        return None;
    }

    missing.sort_unstable();
    unexpected.sort_unstable();
    let mut parts = Vec::new();
    if !missing.is_empty() {
        parts.push(format!("missing odds for [{}]", missing.join(", ")));
    }
    if !unexpected.is_empty() {
        parts.push(format!("odds for unknown teams [{}]", unexpected.join(", ")));
    }
    if !duplicates.is_empty() {
        parts.push(format!("duplicate odds for [{}]", duplicates.join(", ")));
    }
    Some(parts.join("; "))
}

/// Read-only handle on the session store.
#[derive(Clone)]
pub struct SessionReader {
    store: Arc<RwLock<SessionStateStore>>,
}

impl SessionReader {
    pub(crate) fn new(store: Arc<RwLock<SessionStateStore>>) -> Self {
        Self { store }
    }

    pub async fn view(&self) -> SessionView {
        self.store.read().await.view()
    }

    pub async fn latest_token(&self) -> LoadToken {
        self.store.read().await.latest_token()
    }

    /// The snapshot of a fully loaded league together with the token of the
    /// cycle that produced it.
    pub async fn active_league(&self) -> Option<(LoadToken, Arc<LeagueSnapshot>)> {
        let store = self.store.read().await;
        if store.status != LoadStatus::Ready {
            return None;
        }
        store
            .snapshot
            .clone()
            .map(|snapshot| (store.latest_token(), snapshot))
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
