use super::*;

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["leadsync-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["leadsync-cli", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["leadsync-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn lead_create_from_flags() {
    let cli = Cli::try_parse_from([
        "leadsync-cli",
        "lead",
        "create",
        "--email",
        "ada@example.com",
        "--firstname",
        "Ada",
    ])
    .unwrap();

    match cli.command {
        Some(Commands::Lead {
            command:
                LeadCommands::Create {
                    payload: None,
                    email: Some(email),
                    firstname: Some(firstname),
                    lastname: None,
                    ..
                },
        }) => {
            assert_eq!(email, "ada@example.com");
            assert_eq!(firstname, "Ada");
        }
        other => panic!("unexpected parse: {other:?}"),
    }
}

#[test]
fn lead_create_requires_email_or_payload() {
    assert!(Cli::try_parse_from(["leadsync-cli", "lead", "create", "--firstname", "Ada"]).is_err());
    assert!(Cli::try_parse_from([
        "leadsync-cli",
        "lead",
        "create",
        "--payload",
        r#"{"email":"a@b.c"}"#
    ])
    .is_ok());
}

#[test]
fn lead_create_payload_conflicts_with_flags() {
    let result = Cli::try_parse_from([
        "leadsync-cli",
        "lead",
        "create",
        "--payload",
        "{}",
        "--email",
        "a@b.c",
    ]);
    assert!(result.is_err());
}

#[test]
fn lead_update_requires_lead_id() {
    assert!(Cli::try_parse_from(["leadsync-cli", "lead", "update", "--phone", "1"]).is_err());

    let cli = Cli::try_parse_from([
        "leadsync-cli",
        "lead",
        "update",
        "--lead-id",
        "42",
        "--status",
        "OPEN",
    ])
    .unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Lead {
            command: LeadCommands::Update { ref lead_id, status: Some(ref status), .. }
        }) if lead_id == "42" && status == "OPEN"
    ));
}

#[test]
fn meeting_create_parses_timestamps() {
    let cli = Cli::try_parse_from([
        "leadsync-cli",
        "meeting",
        "create",
        "--contact-id",
        "42",
        "--title",
        "Intro",
        "--start",
        "2026-03-01T15:00:00Z",
        "--end",
        "1772379000000",
    ])
    .unwrap();

    match cli.command {
        Some(Commands::Meeting {
            command: MeetingCommands::Create { start, end, body, .. },
        }) => {
            assert_eq!(start.to_rfc3339(), "2026-03-01T15:00:00+00:00");
            assert_eq!(end.timestamp_millis(), 1_772_379_000_000);
            assert_eq!(body, "");
        }
        other => panic!("unexpected parse: {other:?}"),
    }
}

#[test]
fn meeting_create_rejects_bad_timestamp() {
    let result = Cli::try_parse_from([
        "leadsync-cli",
        "meeting",
        "create",
        "--contact-id",
        "42",
        "--title",
        "Intro",
        "--start",
        "next tuesday",
        "--end",
        "2026-03-01T15:30:00Z",
    ]);
    assert!(result.is_err());
}

#[test]
fn lead_payload_keeps_only_given_fields() {
    let payload = commands::lead_payload(&[
        ("email", Some("a@b.c".to_owned())),
        ("phone", None),
    ]);
    assert_eq!(payload, serde_json::json!({"email": "a@b.c"}));
}
