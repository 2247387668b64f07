// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! `importer-ledger`: command-line access to the importer compliance ledger.
//!
//! Every subcommand prints its result as JSON on stdout. Logs go to stderr,
//! filtered by `RUST_LOG` or the config file's `log_filter`.

mod commands;
mod config;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use importer_core::{Clock, FixedClock, Registry, SystemClock};
use importer_store::{MemoryStore, RecordStore};
use importer_store_fs::FsRecordStore;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::commands::Command;
use crate::config::CliConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "Tamper-resistant importer compliance ledger")]
struct Args {
    /// Directory holding record files (overrides the config file).
    #[arg(long, global = true, conflicts_with = "memory")]
    store_dir: Option<PathBuf>,
    /// Use a throwaway in-memory store.
    #[arg(long, global = true)]
    memory: bool,
    /// Config file path (defaults to the platform config dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Pin mutation timestamps to this RFC 3339 instant.
    #[arg(long, global = true)]
    at: Option<String>,
    #[command(subcommand)]
    cmd: Command,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(CliConfig::default_path);
    let (config, persisted) = match &config_path {
        Some(path) => match CliConfig::load(path)? {
            Some(config) => (config, true),
            None => (CliConfig::default(), false),
        },
        None => (CliConfig::default(), true),
    };

    init_tracing(config.log_filter.as_deref())?;

    if !persisted {
        if let Some(path) = &config_path {
            // Best effort; a read-only config dir must not block the command.
            match config.save(path) {
                Ok(()) => debug!(path = %path.display(), "wrote default config"),
                Err(err) => debug!(error = %err, "could not persist default config"),
            }
        }
    }

    let store = open_store(&args, &config)?;
    let clock: Box<dyn Clock> = match &args.at {
        Some(instant) => Box::new(
            FixedClock::parse(instant).with_context(|| format!("parse --at {instant}"))?,
        ),
        None => Box::new(SystemClock),
    };
    let mut registry = Registry::with_clock(store, clock);

    let output = commands::run(&mut registry, args.cmd)?;
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &output).context("write output")?;
    writeln!(stdout).context("write output")?;
    Ok(())
}

fn init_tracing(configured: Option<&str>) -> Result<()> {
    let filter = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(directives) => EnvFilter::try_new(&directives)
            .with_context(|| format!("invalid {} {directives:?}", EnvFilter::DEFAULT_ENV))?,
        Err(_) => EnvFilter::try_new(configured.unwrap_or("info"))
            .context("invalid log_filter in config")?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn open_store(args: &Args, config: &CliConfig) -> Result<Box<dyn RecordStore>> {
    if args.memory {
        info!("using in-memory store; nothing will be persisted");
        return Ok(Box::new(MemoryStore::new()));
    }
    let store = match args.store_dir.as_ref().or(config.store_dir.as_ref()) {
        Some(dir) => FsRecordStore::at(dir)
            .with_context(|| format!("open store at {}", dir.display()))?,
        None => FsRecordStore::new().context("open default store")?,
    };
    debug!(root = %store.root().display(), "opened record store");
    Ok(Box::new(store))
}
