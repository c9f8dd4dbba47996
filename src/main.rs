mod cli;
mod commands;
mod config;
mod engine;
mod progress;
mod resource;
mod state;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use config::LongshipConfig;
use state::StateFile;
use std::io;
use std::path::PathBuf;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
    pub config_path: PathBuf,
    pub state_path: PathBuf,
}

impl Context {
    /// Load the config file, which must exist
    pub fn load_config(&self) -> Result<LongshipConfig> {
        LongshipConfig::load(&self.config_path)
    }

    /// Load the config file, or an empty config when only credentials are needed
    pub fn load_config_or_default(&self) -> Result<LongshipConfig> {
        LongshipConfig::load_or_default(&self.config_path)
    }

    pub fn open_state(&self) -> Result<StateFile> {
        StateFile::open(self.state_path.clone())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
        config_path: config::resolve_path(cli.config.as_deref(), config::default_path)?,
        state_path: config::resolve_path(cli.state.as_deref(), state::default_path)?,
    };
    log::debug!(
        "config={} state={} verbose={}",
        ctx.config_path.display(),
        ctx.state_path.display(),
        ctx.verbose
    );

    match cli.command {
        Command::Plan(args) => commands::plan::run(&ctx, &args),
        Command::Apply(args) => commands::apply::run(&ctx, &args),
        Command::Refresh => commands::refresh::run(&ctx),
        Command::Import { address, id } => commands::import::run(&ctx, &address, &id),
        Command::Destroy(args) => commands::destroy::run(&ctx, &args),
        Command::State(cmd) => commands::state::run(&ctx, cmd),
        Command::Data(cmd) => commands::data::run(&ctx, cmd),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "longship", &mut io::stdout());
            Ok(())
        }
    }
    .inspect_err(|e| {
        if let Some(err) = e.downcast_ref::<declarative::Error>() {
            ui::error(err.category().advice());
        }
    })
}
