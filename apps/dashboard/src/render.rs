//! Plain-text rendering of the dashboard view model.

use std::fmt::Write as _;

use client_core::{
    classify::ConditionIcon,
    view::{ConditionRow, DashboardView, DrilldownPanel, OddsRow, StandingRow, TeamBadge},
};

const BAR_WIDTH: usize = 20;

pub fn render_text(view: &DashboardView) -> String {
    let mut out = String::new();

    if let Some(header) = &view.header {
        let _ = writeln!(out, "== {} ==", header.league_name);
        let _ = writeln!(
            out,
            "Week {} | {} playoff spots",
            header.week, header.playoff_spots
        );
    }
    if let Some(status) = &view.status_line {
        let _ = writeln!(out, "{status}");
    }
    if view.header.is_none() && view.status_line.is_none() {
        let _ = writeln!(out, "No league loaded. Enter a league id to begin.");
    }

    if !view.standings.is_empty() {
        out.push('\n');
        render_standings(&mut out, &view.standings);
    }
    if !view.odds.is_empty() {
        out.push('\n');
        render_odds(&mut out, &view.odds);
    }

    if view.drilldown != DrilldownPanel::Closed {
        out.push('\n');
        render_drilldown(&mut out, &view.drilldown);
    }
    out
}

fn render_standings(out: &mut String, rows: &[StandingRow]) {
    let _ = writeln!(
        out,
        "{:>3}  {:<3} {:<24} {:>8} {:>9} {:>6}",
        "#", "", "Team", "W-L-T", "PF", "Strk"
    );
    for row in rows {
        let badge = match &row.badge {
            TeamBadge::Logo(_) => "[*]".to_string(),
            TeamBadge::Initial(c) => format!("[{c}]"),
        };
        let marker = if row.in_playoff_position { '*' } else { ' ' };
        let _ = writeln!(
            out,
            "{:>3}{marker} {badge:<3} {:<24} {:>8} {:>9} {:>6}",
            row.rank,
            truncate(&row.name, 24),
            row.record,
            row.points_for,
            row.streak
        );
    }
    let _ = writeln!(out, "(* in playoff position)");
}

fn render_odds(out: &mut String, rows: &[OddsRow]) {
    let _ = writeln!(out, "Playoff odds");
    for row in rows {
        let filled = (((row.probability / 100.0) * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
        let bar = format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled));
        let loading = if row.is_loading { " (loading...)" } else { "" };
        let _ = writeln!(
            out,
            "  {:<24} {bar} {:>6}  {:<10}{loading}",
            truncate(&row.team_name, 24),
            row.probability_text,
            row.category.label(),
        );
        if let Some(preview) = &row.preview {
            let _ = writeln!(out, "  {:<24} {preview}", "");
        }
    }
}

fn render_drilldown(out: &mut String, panel: &DrilldownPanel) {
    match panel {
        DrilldownPanel::Closed => {}
        DrilldownPanel::Loading { team_name, text } | DrilldownPanel::Failed { team_name, text } => {
            let _ = writeln!(out, "-- {team_name} --");
            let _ = writeln!(out, "{text}");
        }
        DrilldownPanel::Ready {
            team_name,
            probability,
            category,
            message,
            conditions,
            fallback,
        } => {
            let _ = writeln!(out, "-- {team_name}: path to playoffs --");
            let _ = writeln!(out, "{probability} [{}]", category.label());
            if !message.is_empty() {
                let _ = writeln!(out, "{message}");
            }
            for condition in conditions {
                render_condition(out, condition);
            }
            if let Some(fallback) = fallback {
                let _ = writeln!(out, "{fallback}");
            }
        }
    }
}

fn render_condition(out: &mut String, row: &ConditionRow) {
    let label = match row.icon {
        ConditionIcon::Critical => "critical",
        ConditionIcon::OwnGame => "own game",
        ConditionIcon::ThirdParty => "other game",
    };
    let _ = writeln!(
        out,
        "  {} {:<40} {:<8} impact {:>4} ({label})",
        row.icon.glyph(),
        row.description,
        row.week,
        row.impact
    );
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('~');
        cut
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
