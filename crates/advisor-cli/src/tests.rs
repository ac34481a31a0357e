use super::*;

#[test]
fn parses_db_ping() {
    let cli = Cli::try_parse_from(["advisor", "db", "ping"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate() {
    let cli = Cli::try_parse_from(["advisor", "db", "migrate"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_subcommand_is_allowed() {
    let cli = Cli::try_parse_from(["advisor"]).unwrap();
    assert!(cli.command.is_none());
}

#[test]
fn collect_defaults_to_all_sources() {
    let cli = Cli::try_parse_from(["advisor", "collect"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Collect {
            source: None,
            dry_run: false
        })
    ));
}

#[test]
fn collect_accepts_source_and_dry_run() {
    let cli = Cli::try_parse_from(["advisor", "collect", "--source", "news", "--dry-run"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Collect {
            source: Some(SourceArg::News),
            dry_run: true
        })
    ));
}

#[test]
fn collect_rejects_unknown_source() {
    assert!(Cli::try_parse_from(["advisor", "collect", "--source", "twitter"]).is_err());
}

#[test]
fn analyze_parses_all_flags() {
    let cli = Cli::try_parse_from([
        "advisor",
        "analyze",
        "--symbol",
        "aapl",
        "--since-hours",
        "24",
        "--source",
        "reddit",
        "--limit",
        "50",
        "--json",
    ])
    .unwrap();

    match cli.command {
        Some(Commands::Analyze {
            symbol,
            since_hours,
            source,
            limit,
            json,
        }) => {
            assert_eq!(symbol.as_deref(), Some("aapl"));
            assert_eq!(since_hours, Some(24));
            assert_eq!(source.as_deref(), Some("reddit"));
            assert_eq!(limit, Some(50));
            assert!(json);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn analyze_rejects_negative_window() {
    assert!(Cli::try_parse_from(["advisor", "analyze", "--since-hours", "-3"]).is_err());
}

#[test]
fn analyze_rejects_zero_limit() {
    assert!(Cli::try_parse_from(["advisor", "analyze", "--limit", "0"]).is_err());
}

#[test]
fn summary_defaults_to_five_recent() {
    let cli = Cli::try_parse_from(["advisor", "summary"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Summary { recent: 5 })
    ));
}

#[test]
fn help_does_not_need_configuration() {
    let err = Cli::try_parse_from(["advisor", "--help"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}
