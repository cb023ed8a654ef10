use std::sync::Arc;

use shared::domain::LeagueId;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, error, info, warn};

use crate::{
    error::{LoadError, StoreError},
    service::{with_deadline, LeagueService},
    store::{FailureKind, LoadFailure, LoadToken, SessionReader, SessionStateStore},
    CoreConfig, DashboardEvent,
};

/// Terminal result of one `load` call as seen by its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Ready { teams: usize },
    Failed(LoadFailure),
    /// A newer load started before this one finished; nothing was applied.
    Superseded,
}

/// Runs the snapshot-then-odds fetch sequence and is the only writer of the
/// session store.
pub struct LeagueLoadController {
    service: Arc<dyn LeagueService>,
    store: Arc<RwLock<SessionStateStore>>,
    config: CoreConfig,
    events: broadcast::Sender<DashboardEvent>,
}

impl LeagueLoadController {
    pub fn new(
        service: Arc<dyn LeagueService>,
        config: CoreConfig,
        events: broadcast::Sender<DashboardEvent>,
    ) -> Self {
        Self {
            service,
            store: Arc::new(RwLock::new(SessionStateStore::new())),
            config,
            events,
        }
    }

    pub fn reader(&self) -> SessionReader {
        SessionReader::new(self.store.clone())
    }

    /// Validates free-form input before anything touches the store or the
    /// network.
    pub async fn load(&self, input: &str) -> Result<LoadOutcome, LoadError> {
        let league_id = LeagueId::from_input(input).ok_or(LoadError::EmptyLeagueId)?;
        Ok(self.load_league(league_id).await)
    }

    pub async fn load_league(&self, league_id: LeagueId) -> LoadOutcome {
        let token = self.begin(league_id.clone()).await;
        self.fetch(token, league_id).await
    }

    /// Starts a load cycle. From here on the previous league is no longer
    /// active and results of older cycles are discarded.
    pub async fn begin(&self, league_id: LeagueId) -> LoadToken {
        let token = self.store.write().await.begin_load(league_id.clone());
        self.notify().await;
        info!(%league_id, token = token.value(), "league load started");
        token
    }

    /// Runs the snapshot-then-odds fetch for a cycle opened by [`Self::begin`].
    pub async fn fetch(&self, token: LoadToken, league_id: LeagueId) -> LoadOutcome {
        let snapshot = match with_deadline(
            self.config.request_timeout,
            self.service.get_snapshot(&league_id),
        )
        .await
        {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(%league_id, error = %err, "league snapshot fetch failed");
                return self
                    .finish_failed(
                        token,
                        LoadFailure::new(FailureKind::SnapshotUnavailable, err.to_string()),
                    )
                    .await;
            }
        };
        let teams = snapshot.teams.len();

        let committed = self.store.write().await.commit_snapshot(token, snapshot);
        if let Err(err) = committed {
            return self.settle_rejected(token, err).await;
        }
        debug!(%league_id, teams, "snapshot committed; requesting odds");

        let odds = match with_deadline(
            self.config.request_timeout,
            self.service.get_odds(&league_id),
        )
        .await
        {
            Ok(odds) => odds,
            Err(err) => {
                warn!(%league_id, error = %err, "playoff odds fetch failed");
                return self
                    .finish_failed(
                        token,
                        LoadFailure::new(FailureKind::OddsUnavailable, err.to_string()),
                    )
                    .await;
            }
        };

        let committed = self.store.write().await.commit_odds(token, odds);
        match committed {
            Ok(()) => {
                self.notify().await;
                info!(%league_id, teams, "league ready");
                LoadOutcome::Ready { teams }
            }
            Err(StoreError::Integrity(detail)) => {
                warn!(%league_id, %detail, "odds rejected by integrity check");
                self.notify().await;
                LoadOutcome::Failed(LoadFailure::new(FailureKind::DataIntegrity, detail))
            }
            Err(err) => self.settle_rejected(token, err).await,
        }
    }

    async fn finish_failed(&self, token: LoadToken, failure: LoadFailure) -> LoadOutcome {
        let recorded = self.store.write().await.fail(token, failure.clone());
        match recorded {
            Ok(()) => {
                self.notify().await;
                LoadOutcome::Failed(failure)
            }
            Err(err) => self.settle_rejected(token, err).await,
        }
    }

    async fn settle_rejected(&self, token: LoadToken, err: StoreError) -> LoadOutcome {
        if let StoreError::Stale = err {
            debug!(token = token.value(), "discarding result of superseded league load");
            return LoadOutcome::Superseded;
        }
        error!(token = token.value(), error = %err, "session store rejected load result");
        let failure = LoadFailure::new(FailureKind::Rejected, err.to_string());
        if !self.store.write().await.abandon(token, failure.clone()) {
            return LoadOutcome::Superseded;
        }
        self.notify().await;
        LoadOutcome::Failed(failure)
    }

    async fn notify(&self) {
        let status = self.store.read().await.status();
        let _ = self.events.send(DashboardEvent::SessionChanged { status });
    }
}

#[cfg(test)]
#[path = "tests/loader_tests.rs"]
mod tests;
