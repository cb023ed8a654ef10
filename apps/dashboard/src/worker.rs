//! Backend worker: owns the dashboard, executes prompt commands and turns
//! dashboard events into fresh views for the prompt to print.

use std::sync::Arc;

use client_core::{
    error::{DrilldownError, LoadError},
    view::DashboardView,
    Dashboard, DrilldownOutcome, LoadOutcome,
};
use tokio::{
    sync::{broadcast::error::RecvError, mpsc},
    task::JoinHandle,
};
use tracing::{debug, warn};

use crate::commands::{DashboardCommand, TeamRef};

#[derive(Debug)]
pub enum UiEvent {
    View(Box<DashboardView>),
    Notice(String),
    Error(String),
    Stopped,
}

/// Queues a prompt command, waiting for room when the worker is behind.
pub async fn dispatch_command(
    cmd_tx: &mpsc::Sender<DashboardCommand>,
    cmd: DashboardCommand,
) -> Result<(), String> {
    let cmd_name = cmd.name();
    match cmd_tx.send(cmd).await {
        Ok(()) => {
            debug!(command = cmd_name, "queued prompt->backend command");
            Ok(())
        }
        Err(_) => Err("Backend worker stopped; restart the dashboard".to_string()),
    }
}

/// Spawns the worker and the event forwarder. Long-running commands run as
/// their own tasks so a new submit can supersede one still in flight.
pub fn spawn_worker(
    dashboard: Arc<Dashboard>,
    mut cmd_rx: mpsc::Receiver<DashboardCommand>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
) -> JoinHandle<()> {
    let forwarder = spawn_event_forwarder(dashboard.clone(), ui_tx.clone());

    tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            debug!(command = cmd.name(), "backend command");
            match cmd {
                DashboardCommand::SubmitLeague(input) => {
                    let dashboard = dashboard.clone();
                    let ui_tx = ui_tx.clone();
                    tokio::spawn(async move {
                        let event = match dashboard.submit_league(&input).await {
                            Ok(outcome) => league_notice(&outcome),
                            Err(LoadError::EmptyLeagueId) => {
                                Some(UiEvent::Error("Please enter a league id.".to_string()))
                            }
                        };
                        if let Some(event) = event {
                            let _ = ui_tx.send(event);
                        }
                    });
                }
                DashboardCommand::SelectTeam(team) => {
                    let dashboard = dashboard.clone();
                    let ui_tx = ui_tx.clone();
                    tokio::spawn(async move {
                        let result = match team {
                            TeamRef::Rank(rank) => dashboard.select_rank(rank).await,
                            TeamRef::Id(team_id) => dashboard.select_team_id(&team_id).await,
                        };
                        match result {
                            Ok(DrilldownOutcome::Ready(_)) | Ok(DrilldownOutcome::Superseded) => {}
                            Ok(DrilldownOutcome::Failed(message)) => {
                                let _ = ui_tx.send(UiEvent::Notice(message));
                            }
                            Err(err) => {
                                let _ = ui_tx.send(UiEvent::Error(drilldown_error_text(&err)));
                            }
                        }
                    });
                }
                DashboardCommand::Deselect => dashboard.deselect().await,
                DashboardCommand::Show => {
                    let _ = ui_tx.send(UiEvent::View(Box::new(dashboard.render().await)));
                }
                DashboardCommand::Quit => break,
            }
        }
        forwarder.abort();
        let _ = ui_tx.send(UiEvent::Stopped);
    })
}

fn spawn_event_forwarder(
    dashboard: Arc<Dashboard>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
) -> JoinHandle<()> {
    let mut events = dashboard.subscribe_events();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => debug!(?event, "dashboard event"),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "dashboard events lagged; rendering latest state");
                }
                Err(RecvError::Closed) => break,
            }
            let view = dashboard.render().await;
            if ui_tx.send(UiEvent::View(Box::new(view))).is_err() {
                break;
            }
        }
    })
}

fn league_notice(outcome: &LoadOutcome) -> Option<UiEvent> {
    match outcome {
        LoadOutcome::Ready { teams } => Some(UiEvent::Notice(format!("Loaded {teams} teams."))),
        LoadOutcome::Failed(failure) => {
            debug!(reason = failure.kind.reason(), detail = %failure.detail, "league load failed");
            None
        }
        LoadOutcome::Superseded => None,
    }
}

pub fn drilldown_error_text(err: &DrilldownError) -> String {
    match err {
        DrilldownError::NoActiveLeague => "Load a league before picking a team.".to_string(),
        DrilldownError::UnknownTeam(team) => format!("No team '{team}' in this league."),
    }
}

#[cfg(test)]
#[path = "tests/worker_tests.rs"]
mod tests;
