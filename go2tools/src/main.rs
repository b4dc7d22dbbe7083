mod backup;
mod migrate;

use std::io::Write;

use clap::Parser;
use clap::Subcommand;

use go2tools_core::error::Error;
use go2tools_core::tracing_ext::init_tracing;

/// Maintenance tools for a go2redirector database.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct CommandLine {
    /// Logging format.
    #[arg(
        long,
        global = true,
        env = "GO2TOOLS_LOG_FORMAT",
        value_parser = ["text", "json"],
        default_value = "text",
    )]
    log_format: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Migrate(migrate::CommandLine),
    Backup(backup::CommandLine),
}

#[tokio::main]
async fn main() {
    let cl = CommandLine::parse();

    init_tracing(&cl.log_format);

    let result = match &cl.command {
        Command::Migrate(cl) => migrate::main(cl),
        Command::Backup(cl) => backup::main(cl).await,
    };

    if let Err(err) = result {
        tracing::error!(%err);
        // RUST_LOG may filter out the event above.
        report_error(&mut std::io::stderr(), &err);
        std::process::exit(1);
    }
}

fn report_error<W: Write>(w: &mut W, err: &Error) {
    let _ = writeln!(w, "go2tools: {err}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use clap::CommandFactory;
    use clap::error::ErrorKind;

    #[test]
    fn test_command_line() {
        CommandLine::command().debug_assert();
    }

    #[test]
    fn test_migrate_command_line() {
        let cl = CommandLine::try_parse_from(["go2tools", "migrate", "godb.json"]);
        assert_matches!(cl, Ok(cl) => {
            assert_eq!(cl.log_format, "text");
            assert_matches!(cl.command, Command::Migrate(_));
        });

        let cl = CommandLine::try_parse_from(["go2tools", "migrate"]);
        assert_matches!(cl, Err(err) => {
            assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        });
    }

    #[test]
    fn test_backup_command_line() {
        let cl = CommandLine::try_parse_from([
            "go2tools",
            "backup",
            "--log-format=json",
            "http://go2.example.com:8080",
        ]);
        assert_matches!(cl, Ok(cl) => {
            assert_eq!(cl.log_format, "json");
            assert_matches!(cl.command, Command::Backup(_));
        });

        let cl = CommandLine::try_parse_from(["go2tools", "backup"]);
        assert_matches!(cl, Err(err) => {
            assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        });

        let cl = CommandLine::try_parse_from(["go2tools", "backup", "go2.example.com"]);
        assert_matches!(cl, Err(err) => {
            assert_eq!(err.kind(), ErrorKind::ValueValidation);
        });
    }

    #[test]
    fn test_report_error() {
        let mut buf = vec![];
        report_error(&mut buf, &Error::NotFound("godb.json".into()));
        assert_eq!(String::from_utf8(buf).unwrap(), "go2tools: godb.json not found\n");
    }

    #[test]
    fn test_unknown_log_format() {
        let cl = CommandLine::try_parse_from([
            "go2tools",
            "--log-format=xml",
            "migrate",
            "godb.json",
        ]);
        assert_matches!(cl, Err(err) => {
            assert_eq!(err.kind(), ErrorKind::InvalidValue);
        });
    }
}
