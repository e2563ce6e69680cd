//! CLI command implementations
//!
//! Each invocation loads the config, opens the store, runs one service
//! call and prints its result as JSON. Nothing is kept between runs
//! except the document file itself.

use std::io::Write;
use std::path::Path;

use serde_json::json;

use crate::api::{ApiError, ChirpService};
use crate::config::Config;
use crate::observability::{log_event_with_fields, Event, Logger, Severity};
use crate::store::DocumentFile;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::write_response;

/// Parse arguments and run the selected command against stdout
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_command(&cli, &mut out)
}

/// Run a parsed command, writing its JSON result to `out`
pub fn run_command<W: Write>(cli: &Cli, out: &mut W) -> CliResult<()> {
    if let Some(level) = cli.log_level.as_deref() {
        let severity = Severity::parse(level)
            .ok_or_else(|| CliError::invalid_argument(format!("Unknown log level: '{}'", level)))?;
        Logger::set_min_severity(severity);
    }

    let config = load_config(&cli.config)?;

    if let Command::Init = cli.command {
        return init(&config, out);
    }

    let service = ChirpService::open(&config)?;
    dispatch(&service, &cli.command, out)
}

fn load_config(path: &Path) -> CliResult<Config> {
    let config = Config::load(path)?;
    let shown = path.display().to_string();
    log_event_with_fields(Event::ConfigLoaded, &[("path", shown.as_str())]);
    Ok(config)
}

/// Create the document file if absent
pub fn init<W: Write>(config: &Config, out: &mut W) -> CliResult<()> {
    let created = DocumentFile::new(&config.db_path)
        .ensure_exists()
        .map_err(ApiError::from)?;

    write_response(
        out,
        &json!({
            "db_path": config.db_path,
            "created": created,
        }),
    )
}

fn dispatch<W: Write>(service: &ChirpService, command: &Command, out: &mut W) -> CliResult<()> {
    match command {
        Command::Init => Err(CliError::invalid_argument("init is handled before the store opens")),

        Command::Register { email, password } => {
            let account = service.register(email, password)?;
            write_response(out, &account)
        }

        Command::Login {
            email,
            password,
            expires_in_seconds,
        } => {
            let login = service.login(email, password, *expires_in_seconds)?;
            write_response(out, &login)
        }

        Command::Refresh { token } => {
            let refreshed = service.refresh(token)?;
            write_response(out, &refreshed)
        }

        Command::Revoke { token } => {
            service.revoke(token)?;
            write_response(out, &json!({ "revoked": true }))
        }

        Command::Post { body, author_id } => {
            let post = service.create_post(body, *author_id)?;
            write_response(out, &post)
        }

        Command::Posts { id: Some(id), .. } => {
            let post = service.get_post(*id)?;
            write_response(out, &post)
        }

        Command::Posts {
            id: None,
            author: Some(author),
        } => {
            let posts = service.list_posts_by_author(*author)?;
            write_response(out, &posts)
        }

        Command::Posts {
            id: None,
            author: None,
        } => {
            let posts = service.list_posts()?;
            write_response(out, &posts)
        }

        Command::UpdateAccount {
            token,
            email,
            password,
        } => {
            let account = service.update_account(token, email, password)?;
            write_response(out, &account)
        }

        Command::Purge => {
            let removed = service.purge_expired_tokens()?;
            write_response(out, &json!({ "removed": removed }))
        }
    }
}
