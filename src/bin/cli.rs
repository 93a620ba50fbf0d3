use teller::{
    config::{AppConfig, DEFAULT_LOG_LEVEL},
    frontend::{Account, Console, Session}};

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::{error, info};

/// Record deposits and withdrawals and query the balance interactively.
///
/// Commands at the prompt: deposit, withdraw, balance, exit.
#[derive(Parser, Debug)]
#[clap(version, about, propagate_version = true)]
struct Cli {
    /// Configuration file (defaults to ./teller.toml when present)
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Ledger document to operate on, overrides the configuration
    #[clap(short, long, value_parser)]
    ledger: Option<PathBuf>,
}

fn run(config: AppConfig) -> anyhow::Result<()> {
    let store = config.store();
    info!("using ledger {}", store.path().display());

    if !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let console = Console::new(io::stdin().lock(), io::stdout());
    Session::new(Account::new(store), console)
        .run()
        .context("console input/output failed")?;
    return Ok(());
}

fn main() {
    let args = Cli::parse();

    let config = AppConfig::load(args.config.as_deref())
        .map(|config| config.with_ledger_override(args.ledger));
    let log_level = config.as_ref()
        .map(|config| config.log_level.as_str())
        .unwrap_or(DEFAULT_LOG_LEVEL);
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    if let Err(err) = config.and_then(run) {
        error!("{:#}", err);
        process::exit(1);
    }
}
