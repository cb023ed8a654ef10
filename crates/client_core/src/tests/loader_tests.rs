use std::time::Duration;

use super::*;
use crate::{
    error::ServiceError,
    store::LoadStatus,
    test_support::{demo_league, demo_odds, league, odds_for, Call, Reply, ScriptedLeagueService},
};

fn controller(service: Arc<ScriptedLeagueService>) -> LeagueLoadController {
    controller_with(service, CoreConfig::default())
}

fn controller_with(service: Arc<ScriptedLeagueService>, config: CoreConfig) -> LeagueLoadController {
    let (events, _) = broadcast::channel(16);
    LeagueLoadController::new(service, config, events)
}

#[tokio::test]
async fn successful_load_commits_snapshot_then_odds() {
    let service = ScriptedLeagueService::new();
    let snapshot = demo_league();
    service.push_league(snapshot.clone(), demo_odds(&snapshot));
    let loader = controller(service.clone());

    let outcome = loader.load("  7495009 ").await.unwrap();
    assert_eq!(outcome, LoadOutcome::Ready { teams: 10 });

    let id = LeagueId::from("7495009");
    assert_eq!(
        service.calls(),
        vec![Call::Snapshot(id.clone()), Call::Odds(id)]
    );
    let view = loader.reader().view().await;
    assert_eq!(view.status, LoadStatus::Ready);
    assert_eq!(view.snapshot.unwrap().teams.len(), 10);
    assert_eq!(view.odds.unwrap().len(), 10);
}

#[tokio::test]
async fn blank_input_is_rejected_without_service_call() {
    let service = ScriptedLeagueService::new();
    let loader = controller(service.clone());

    assert_eq!(loader.load("   ").await, Err(LoadError::EmptyLeagueId));
    assert!(service.calls().is_empty());
    assert_eq!(loader.reader().view().await.status, LoadStatus::Idle);
}

#[tokio::test]
async fn snapshot_failure_never_requests_odds() {
    let service = ScriptedLeagueService::new();
    service.push_snapshot(Reply::err(ServiceError::NotFound("League not found".into())));
    let loader = controller(service.clone());

    let outcome = loader.load("missing").await.unwrap();
    let LoadOutcome::Failed(failure) = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert_eq!(failure.kind, FailureKind::SnapshotUnavailable);
    assert_eq!(service.calls(), vec![Call::Snapshot(LeagueId::from("missing"))]);

    let view = loader.reader().view().await;
    assert_eq!(view.status, LoadStatus::Failed);
    assert!(view.snapshot.is_none());
    assert!(view.odds.is_none());
}

#[tokio::test]
async fn odds_failure_discards_committed_snapshot() {
    let service = ScriptedLeagueService::new();
    service.push_snapshot(Reply::ok(demo_league()));
    service.push_odds(Reply::err(ServiceError::Status {
        status: 500,
        detail: "boom".into(),
    }));
    let loader = controller(service);

    let outcome = loader.load("7495009").await.unwrap();
    assert!(matches!(
        outcome,
        LoadOutcome::Failed(LoadFailure {
            kind: FailureKind::OddsUnavailable,
            ..
        })
    ));
    let view = loader.reader().view().await;
    assert_eq!(view.status, LoadStatus::Failed);
    assert!(view.snapshot.is_none());
}

#[tokio::test]
async fn mismatched_odds_fail_as_data_integrity() {
    let service = ScriptedLeagueService::new();
    let snapshot = league("a", &["Alpha", "Beta"]);
    let short = odds_for(&snapshot, &[75.0]);
    service.push_league(snapshot, short);
    let loader = controller(service);

    let outcome = loader.load("a").await.unwrap();
    assert!(matches!(
        outcome,
        LoadOutcome::Failed(LoadFailure {
            kind: FailureKind::DataIntegrity,
            ..
        })
    ));
    assert_eq!(loader.reader().view().await.status, LoadStatus::Failed);
}

#[tokio::test]
async fn second_submit_of_same_id_wins_when_first_resolves_last() {
    let service = ScriptedLeagueService::new();
    let (first_gate, first_reply) = Reply::gated();
    service.push_snapshot(first_reply);
    let loader = Arc::new(controller(service.clone()));

    let first = tokio::spawn({
        let loader = loader.clone();
        async move { loader.load("7495009").await }
    });
    service.wait_for_calls(1).await;

    let current = demo_league();
    service.push_league(current.clone(), demo_odds(&current));
    let second_outcome = loader.load("7495009").await.unwrap();
    assert_eq!(second_outcome, LoadOutcome::Ready { teams: 10 });

    first_gate
        .send(Ok(league("7495009", &["Outdated"])))
        .unwrap();
    assert_eq!(first.await.unwrap().unwrap(), LoadOutcome::Superseded);

    let view = loader.reader().view().await;
    assert_eq!(view.status, LoadStatus::Ready);
    assert_eq!(view.snapshot.unwrap().teams.len(), 10);
    assert_eq!(view.odds.unwrap().len(), 10);
}

#[tokio::test]
async fn stale_odds_do_not_overwrite_newer_league() {
    let service = ScriptedLeagueService::new();
    let old_snapshot = league("old", &["Stale", "Older"]);
    service.push_snapshot(Reply::ok(old_snapshot.clone()));
    let (odds_gate, odds_reply) = Reply::gated();
    service.push_odds(odds_reply);
    let loader = Arc::new(controller(service.clone()));

    let old = tokio::spawn({
        let loader = loader.clone();
        async move { loader.load("old").await }
    });
    service.wait_for_calls(2).await;

    let fresh = demo_league();
    service.push_league(fresh.clone(), demo_odds(&fresh));
    loader.load("7495009").await.unwrap();

    odds_gate
        .send(Ok(odds_for(&old_snapshot, &[60.0, 40.0])))
        .unwrap();
    assert_eq!(old.await.unwrap().unwrap(), LoadOutcome::Superseded);

    let view = loader.reader().view().await;
    assert_eq!(view.league_id, Some(LeagueId::from("7495009")));
    assert_eq!(view.odds.unwrap().len(), 10);
}

#[tokio::test]
async fn stale_snapshot_does_not_overwrite_newer_league() {
    let service = ScriptedLeagueService::new();
    let (old_gate, old_reply) = Reply::gated();
    service.push_snapshot(old_reply);
    let loader = Arc::new(controller(service.clone()));

    let old = tokio::spawn({
        let loader = loader.clone();
        async move { loader.load("old").await }
    });
    service.wait_for_calls(1).await;

    let fresh = demo_league();
    service.push_snapshot(Reply::ok(fresh.clone()));
    service.push_odds(Reply::ok(demo_odds(&fresh)));
    let fresh_outcome = loader.load("7495009").await.unwrap();
    assert_eq!(fresh_outcome, LoadOutcome::Ready { teams: 10 });

    old_gate.send(Ok(league("old", &["Stale"]))).unwrap();
    assert_eq!(old.await.unwrap().unwrap(), LoadOutcome::Superseded);

    let view = loader.reader().view().await;
    assert_eq!(view.league_id, Some(LeagueId::from("7495009")));
    assert_eq!(view.status, LoadStatus::Ready);
    assert_eq!(view.snapshot.unwrap().teams.len(), 10);
    // The superseded load stopped before asking for odds.
    assert!(!service.calls().contains(&Call::Odds(LeagueId::from("old"))));
}

#[tokio::test]
async fn stale_failure_is_discarded() {
    let service = ScriptedLeagueService::new();
    let (old_gate, old_reply) = Reply::gated();
    service.push_snapshot(old_reply);
    let loader = Arc::new(controller(service.clone()));

    let old = tokio::spawn({
        let loader = loader.clone();
        async move { loader.load("old").await }
    });
    service.wait_for_calls(1).await;

    let fresh = demo_league();
    service.push_league(fresh.clone(), demo_odds(&fresh));
    loader.load("7495009").await.unwrap();

    old_gate
        .send(Err(ServiceError::Transport("connection reset".into())))
        .unwrap();
    assert_eq!(old.await.unwrap().unwrap(), LoadOutcome::Superseded);

    let view = loader.reader().view().await;
    assert_eq!(view.status, LoadStatus::Ready);
    assert!(view.last_error.is_none());
}

#[tokio::test]
async fn deadline_turns_a_hung_call_into_failure() {
    let service = ScriptedLeagueService::new();
    service.push_snapshot(Reply::Never);
    let loader = controller_with(
        service,
        CoreConfig {
            request_timeout: Duration::from_millis(20),
            ..CoreConfig::default()
        },
    );

    let outcome = loader.load("slow").await.unwrap();
    assert!(matches!(
        outcome,
        LoadOutcome::Failed(LoadFailure {
            kind: FailureKind::SnapshotUnavailable,
            ..
        })
    ));
    assert_eq!(loader.reader().view().await.status, LoadStatus::Failed);
}

#[tokio::test]
async fn load_broadcasts_status_changes() {
    let service = ScriptedLeagueService::new();
    let snapshot = demo_league();
    service.push_league(snapshot.clone(), demo_odds(&snapshot));
    let (events, mut rx) = broadcast::channel(16);
    let loader = LeagueLoadController::new(service, CoreConfig::default(), events);

    loader.load("7495009").await.unwrap();

    assert_eq!(
        rx.recv().await.unwrap(),
        DashboardEvent::SessionChanged {
            status: LoadStatus::Loading
        }
    );
    assert_eq!(
        rx.recv().await.unwrap(),
        DashboardEvent::SessionChanged {
            status: LoadStatus::Ready
        }
    );
}

#[tokio::test]
async fn store_rejection_fails_the_cycle_instead_of_leaving_it_loading() {
    let loader = controller(ScriptedLeagueService::new());
    let token = loader.begin(LeagueId::from("7495009")).await;
    assert_eq!(loader.reader().view().await.status, LoadStatus::Loading);

    let outcome = loader
        .settle_rejected(token, StoreError::MissingSnapshot)
        .await;
    assert!(matches!(
        outcome,
        LoadOutcome::Failed(LoadFailure {
            kind: FailureKind::Rejected,
            ..
        })
    ));
    assert_eq!(loader.reader().view().await.status, LoadStatus::Failed);

    let newer = loader.begin(LeagueId::from("other")).await;
    assert_eq!(
        loader.settle_rejected(token, StoreError::Stale).await,
        LoadOutcome::Superseded
    );
    assert!(newer > token);
    assert_eq!(loader.reader().view().await.status, LoadStatus::Loading);
}
