use super::*;

#[test]
fn parses_league_with_surrounding_whitespace() {
    assert_eq!(
        parse_command("  league   7495009  "),
        Ok(Some(DashboardCommand::SubmitLeague("7495009".into())))
    );
}

#[test]
fn bare_league_passes_empty_id_through() {
    assert_eq!(
        parse_command("league"),
        Ok(Some(DashboardCommand::SubmitLeague(String::new())))
    );
}

#[test]
fn team_accepts_rank_or_id() {
    assert_eq!(
        parse_command("team #3"),
        Ok(Some(DashboardCommand::SelectTeam(TeamRef::Rank(3))))
    );
    assert_eq!(
        parse_command("t 6"),
        Ok(Some(DashboardCommand::SelectTeam(TeamRef::Id(TeamId::from("6")))))
    );
    assert_eq!(parse_command("team"), Err(CommandError::MissingTeam));
}

#[test]
fn short_and_long_verbs() {
    assert_eq!(parse_command("close"), Ok(Some(DashboardCommand::Deselect)));
    assert_eq!(parse_command("S"), Ok(Some(DashboardCommand::Show)));
    assert_eq!(parse_command("exit"), Ok(Some(DashboardCommand::Quit)));
    assert_eq!(parse_command("   "), Ok(None));
}

#[test]
fn unknown_verb_is_reported() {
    let err = parse_command("standings").unwrap_err();
    assert_eq!(err, CommandError::Unknown("standings".into()));
    assert!(err.to_string().contains("league <id>"));
}
