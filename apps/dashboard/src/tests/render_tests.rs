use std::sync::Arc;

use client_core::{
    store::{FailureKind, LoadFailure, LoadStatus, SessionView},
    view::project,
    DrilldownState,
};
use shared::domain::{
    LeagueId, LeagueSnapshot, OddsEntry, ScenarioReport, Streak, StreakKind, TeamId, TeamStanding,
};

use super::*;

fn standing(id: &str, name: &str, wins: u32, losses: u32) -> TeamStanding {
    TeamStanding {
        team_id: TeamId::from(id),
        name: name.into(),
        owner: None,
        logo_url: None,
        wins,
        losses,
        ties: 0,
        points_for: 1234.56,
        points_against: None,
        streak: Streak::Run {
            kind: StreakKind::Win,
            length: 3,
        },
    }
}

fn ready_session() -> SessionView {
    let snapshot = LeagueSnapshot {
        league_id: LeagueId::from("mock"),
        name: "Mock League".into(),
        current_week: 13,
        total_weeks: 14,
        playoff_spots: 1,
        teams: vec![standing("1", "Team A", 8, 4), standing("2", "Team B", 7, 5)],
    };
    let odds = vec![
        OddsEntry {
            team_id: TeamId::from("1"),
            team_name: "Team A".into(),
            playoff_probability: 100.0,
            headlines: vec!["Clinched playoffs".into()],
        },
        OddsEntry {
            team_id: TeamId::from("2"),
            team_name: "Team B".into(),
            playoff_probability: 0.0,
            headlines: Vec::new(),
        },
    ];
    SessionView {
        league_id: Some(LeagueId::from("mock")),
        status: LoadStatus::Ready,
        snapshot: Some(Arc::new(snapshot)),
        odds: Some(Arc::new(odds)),
        last_error: None,
        loaded_at: None,
    }
}

#[test]
fn idle_dashboard_prompts_for_league() {
    let text = render_text(&project(&SessionView::default(), &DrilldownState::Closed));
    assert!(text.contains("No league loaded"));
}

#[test]
fn ready_dashboard_lists_standings_and_odds() {
    let text = render_text(&project(&ready_session(), &DrilldownState::Closed));
    assert!(text.contains("== Mock League =="));
    assert!(text.contains("Week 13 / 14 | 1 playoff spots"));
    assert!(text.contains("Team A"));
    assert!(text.contains("8-4-0"));
    assert!(text.contains("1234.6"));
    assert!(text.contains("W3"));
    assert!(text.contains("100.0%"));
    assert!(text.contains("clinched"));
    assert!(text.contains("eliminated"));
    assert!(text.contains("Clinched playoffs"));
    assert!(text.contains("  1* [T]"));
    assert!(text.contains("  2  [T]"));
}

#[test]
fn failed_load_shows_single_message() {
    let session = SessionView {
        status: LoadStatus::Failed,
        last_error: Some(LoadFailure::new(FailureKind::OddsUnavailable, "HTTP 500 boom")),
        ..SessionView::default()
    };
    let text = render_text(&project(&session, &DrilldownState::Closed));
    assert!(text.contains("Failed to fetch league data. Please check the ID and try again."));
    assert!(!text.contains("boom"));
}

#[test]
fn drilldown_ready_renders_probability_and_fallback() {
    let session = ready_session();
    let team = session.snapshot.as_ref().unwrap().teams[0].clone();
    let state = DrilldownState::Ready {
        team,
        report: Arc::new(ScenarioReport {
            league_id: LeagueId::from("mock"),
            team_id: TeamId::from("1"),
            probability: 62.5,
            message: "Found 1250 paths to playoffs in 2000 simulations.".into(),
            conditions: Vec::new(),
        }),
    };
    let text = render_text(&project(&session, &state));
    assert!(text.contains("-- Team A: path to playoffs --"));
    assert!(text.contains("62.5% [favored]"));
    assert!(text.contains("No specific dependencies found. It's a toss-up."));
}

#[test]
fn drilldown_loading_marks_odds_row() {
    let session = ready_session();
    let team = session.snapshot.as_ref().unwrap().teams[1].clone();
    let text = render_text(&project(&session, &DrilldownState::Loading { team }));
    assert!(text.contains("(loading...)"));
    assert!(text.contains("Crunching the numbers..."));
}

#[test]
fn long_names_are_truncated() {
    assert_eq!(truncate("abcdef", 4), "abc~");
    assert_eq!(truncate("abc", 4), "abc");
}
