//! Commands queued from the prompt to the backend worker.

use shared::domain::TeamId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamRef {
    Rank(usize),
    Id(TeamId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardCommand {
    SubmitLeague(String),
    SelectTeam(TeamRef),
    Deselect,
    Show,
    Quit,
}

impl DashboardCommand {
    pub fn name(&self) -> &'static str {
        match self {
            DashboardCommand::SubmitLeague(_) => "submit_league",
            DashboardCommand::SelectTeam(_) => "select_team",
            DashboardCommand::Deselect => "deselect",
            DashboardCommand::Show => "show",
            DashboardCommand::Quit => "quit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}'; try: league <id>, team <id|#rank>, close, show, quit")]
    Unknown(String),
    #[error("'team' needs a team id or #rank")]
    MissingTeam,
}

pub const HELP: &str = "commands: league <id> | team <id|#rank> | close | show | quit";

/// Parses one prompt line. Blank lines yield `None`.
///
/// `league` keeps the rest of the line verbatim so blank ids reach the
/// dashboard's own validation.
pub fn parse_command(line: &str) -> Result<Option<DashboardCommand>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map(|(verb, rest)| (verb, rest.trim()))
        .unwrap_or((line, ""));

    let command = match verb.to_ascii_lowercase().as_str() {
        "league" | "l" => DashboardCommand::SubmitLeague(rest.to_string()),
        "team" | "t" => DashboardCommand::SelectTeam(parse_team_ref(rest)?),
        "close" | "c" => DashboardCommand::Deselect,
        "show" | "s" => DashboardCommand::Show,
        "quit" | "q" | "exit" => DashboardCommand::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

/// `#3` is always a rank; a bare number is treated as a team id.
pub fn parse_team_ref(text: &str) -> Result<TeamRef, CommandError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(CommandError::MissingTeam);
    }
    if let Some(rank) = text.strip_prefix('#') {
        if let Ok(rank) = rank.trim().parse::<usize>() {
            return Ok(TeamRef::Rank(rank));
        }
    }
    Ok(TeamRef::Id(TeamId::from(text)))
}

#[cfg(test)]
#[path = "tests/commands_tests.rs"]
mod tests;
