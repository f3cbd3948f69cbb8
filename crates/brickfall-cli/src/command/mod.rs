use std::{fs::File, path::PathBuf};

use anyhow::Context as _;
use brickfall_engine::GameConfig;
use clap::{Parser, Subcommand};
use env_logger::{Builder, Env, Target};

use crate::{command::play::PlayArg, util};

mod config;
mod play;
mod stats;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Write log output to this file instead of stderr
    #[clap(long, global = true)]
    log_file: Option<PathBuf>,
    /// Directory holding the high score and last game files
    #[clap(long, global = true, default_value = "./data")]
    data_dir: PathBuf,
    /// Game configuration file (JSON format)
    #[clap(long, global = true)]
    config: Option<PathBuf>,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play a game in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Print the stored high score and last game as JSON
    Stats,
    /// Print the effective game configuration as JSON
    Config,
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logger(args.log_file.as_ref())?;

    let config = load_config(args.config.as_ref())?;
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg, config, &args.data_dir)?,
        Mode::Stats => stats::run(&args.data_dir)?,
        Mode::Config => config::run(&config)?,
    }
    Ok(())
}

fn init_logger(log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file: {}", path.display()))?;
        builder.target(Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let config: GameConfig = util::read_json_file("config", path)?;
    config
        .validate()
        .with_context(|| format!("Invalid game config: {}", path.display()))?;
    log::info!("loaded game config from {}", path.display());
    Ok(config)
}
