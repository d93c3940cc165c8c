//! FRA CLI - Command-line interface for forest-rights claim review.

use clap::Parser;
use fra_cli::commands::{self, Session};
use fra_cli::{Cli, CliError, Command, Config, Formatter};
use fra_store::SqliteStore;
use fra_workflow::WorkflowEngine;
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() {
    // Initialize tracing (log to stderr so stdout stays machine readable)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run() -> fra_cli::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(Path::new(path))?,
        None => Config::load()?,
    };

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let database = match &cli.database {
        Some(path) => Path::new(path).to_path_buf(),
        None => config.database_path()?,
    };
    if let Some(parent) = database.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    tracing::debug!("Using claims database {}", database.display());

    let store = SqliteStore::new(&database)?;
    let engine = WorkflowEngine::new(store, config.workflow.clone());
    let authorities = config.authorities()?;
    let session = Session {
        engine: &engine,
        authorities: &authorities,
        token: cli.token.as_deref().filter(|t| !t.trim().is_empty()),
    };

    let output = match cli.command {
        Command::Submit(args) => commands::execute_submit(args, &session, &formatter),
        Command::Show(args) => commands::execute_show(args, &session, &formatter),
        Command::History(args) => commands::execute_history(args, &session, &formatter),
        Command::List(args) => commands::execute_list(args, &session, &formatter),
        Command::Pending => commands::execute_pending(&session, &formatter),
        Command::Act(args) => commands::execute_act(args, &session, &formatter),
        Command::Boundary(args) => commands::execute_boundary(args, &session, &formatter),
    };

    match output {
        Ok(text) => {
            if !text.is_empty() {
                println!("{}", text);
            }
            Ok(())
        }
        Err(CliError::Workflow(e)) if e.is_retryable() => {
            eprintln!(
                "{}",
                formatter.info("The claim changed while you were working on it. Reload it and try again.")
            );
            Err(CliError::Workflow(e))
        }
        Err(e) => Err(e),
    }
}
