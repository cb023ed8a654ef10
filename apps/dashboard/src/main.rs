use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::Parser;
use client_core::{
    store::LEAGUE_LOAD_FAILED_MESSAGE, view::DashboardView, Dashboard, HttpLeagueService,
    LoadOutcome,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod render;
mod worker;

use commands::{parse_command, parse_team_ref, DashboardCommand, TeamRef, HELP};
use config::{load_settings, CONFIG_FILE};
use render::render_text;
use worker::{dispatch_command, drilldown_error_text, spawn_worker, UiEvent};

const COMMAND_QUEUE: usize = 32;

#[derive(Parser, Debug)]
#[command(about = "Terminal dashboard for fantasy league playoff odds")]
struct Args {
    /// Base url of the league service.
    #[arg(long)]
    service_url: Option<String>,
    /// Per-request deadline in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[arg(long, default_value = CONFIG_FILE)]
    config: PathBuf,
    /// Load this league, print the dashboard and exit.
    #[arg(long)]
    league: Option<String>,
    /// With --league: also open the scenario drill-down for this team (id or #rank).
    #[arg(long, requires = "league")]
    team: Option<String>,
    /// Print view models as JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings(&args.config);
    if let Some(url) = &args.service_url {
        settings.service_url = url.clone();
    }
    if let Some(secs) = args.timeout_secs {
        settings.request_timeout_secs = secs;
    }
    let core = settings.core_config();
    info!(service_url = %settings.service_url, timeout = ?core.request_timeout, "starting dashboard");

    let service = HttpLeagueService::new(&settings.service_url, core.request_timeout)
        .with_context(|| format!("invalid service url '{}'", settings.service_url))?;
    let dashboard = Dashboard::new(Arc::new(service), core);

    match &args.league {
        Some(league) => run_once(&dashboard, league, args.team.as_deref(), args.json).await,
        None => run_interactive(dashboard, args.json).await,
    }
}

async fn run_once(dashboard: &Dashboard, league: &str, team: Option<&str>, json: bool) -> Result<()> {
    let outcome = dashboard
        .submit_league(league)
        .await
        .context("league id must not be empty")?;

    if let (LoadOutcome::Ready { .. }, Some(team)) = (&outcome, team) {
        let selected = match parse_team_ref(team)? {
            TeamRef::Rank(rank) => dashboard.select_rank(rank).await,
            TeamRef::Id(team_id) => dashboard.select_team_id(&team_id).await,
        };
        if let Err(err) = selected {
            bail!(drilldown_error_text(&err));
        }
    }

    print_view(&dashboard.render().await, json)?;
    if matches!(outcome, LoadOutcome::Failed(_)) {
        bail!(LEAGUE_LOAD_FAILED_MESSAGE);
    }
    Ok(())
}

async fn run_interactive(dashboard: Arc<Dashboard>, json: bool) -> Result<()> {
    let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_QUEUE);
    let (ui_tx, mut ui_rx) = mpsc::unbounded_channel();
    let worker = spawn_worker(dashboard, cmd_rx, ui_tx);

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                let command = match line.context("failed to read stdin")? {
                    Some(line) => parse_command(&line),
                    None => {
                        stdin_open = false;
                        Ok(Some(DashboardCommand::Quit))
                    }
                };
                match command {
                    Ok(Some(cmd)) => {
                        if let Err(status) = dispatch_command(&cmd_tx, cmd).await {
                            eprintln!("{status}");
                        }
                    }
                    Ok(None) => {}
                    Err(err) => eprintln!("{err}"),
                }
            }
            event = ui_rx.recv() => match event {
                Some(UiEvent::View(view)) => print_view(&view, json)?,
                Some(UiEvent::Notice(text)) => println!("{text}"),
                Some(UiEvent::Error(text)) => eprintln!("{text}"),
                Some(UiEvent::Stopped) | None => break,
            },
        }
    }

    worker.await.context("backend worker panicked")?;
    Ok(())
}

fn print_view(view: &DashboardView, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(view)?);
    } else {
        println!("{}", render_text(view));
    }
    Ok(())
}
