use super::*;
use clap::CommandFactory;

#[test]
fn command_definition_is_valid() {
    Cli::command().debug_assert();
}

#[test]
fn no_arguments_runs_the_ui() {
    let cli = Cli::try_parse_from(["geeklife"]).unwrap();
    assert_eq!(cli.command, None);
    assert_eq!(cli.overrides(), Overrides::default());
}

#[test]
fn short_flags() {
    let cli = Cli::try_parse_from(["geeklife", "-d", "/tmp/x.db", "-v", "-D"]).unwrap();
    assert_eq!(
        cli.overrides(),
        Overrides {
            db_file: Some("/tmp/x.db".to_string()),
            vertical: true,
            dynamic: true,
        }
    );
}

#[test]
fn long_flags_and_migrate() {
    let cli =
        Cli::try_parse_from(["geeklife", "--db-file", "~/tasks.db", "--dynamic", "migrate"])
            .unwrap();
    assert_eq!(cli.command, Some(CliCommand::Migrate));
    assert_eq!(cli.db_file.as_deref(), Some("~/tasks.db"));
    assert!(cli.dynamic);
    assert!(!cli.vertical);
}

#[test]
fn unknown_subcommand_is_rejected() {
    assert!(Cli::try_parse_from(["geeklife", "export"]).is_err());
}
