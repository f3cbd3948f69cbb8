use std::path::Path;

use brickfall_engine::{GameConfig, GameSession, PieceSeed};

use crate::{command::play::app::PlayApp, store::ScoreStore, tui::Tui};

mod app;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Seed for the piece sequence (32 hex characters); random when omitted
    #[clap(long)]
    seed: Option<PieceSeed>,
    /// Start the first game immediately instead of showing the start screen
    #[clap(long)]
    autostart: bool,
}

pub(crate) fn run(arg: &PlayArg, config: GameConfig, data_dir: &Path) -> anyhow::Result<()> {
    let PlayArg { seed, autostart } = arg;

    let store = ScoreStore::new(data_dir);
    let high_score = store.load_high_score();

    let session = match seed {
        Some(seed) => GameSession::with_seed(config, *seed)?,
        None => GameSession::new(config)?,
    }
    .with_high_score(high_score);

    let mut app = PlayApp::new(session, store, *autostart);
    Tui::new().run(&mut app)?;
    Ok(())
}
