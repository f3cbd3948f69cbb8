use std::path::Path;

use serde::Serialize;

use crate::{
    store::{GameRecord, ScoreStore},
    util,
};

#[derive(Debug, Serialize)]
struct StoredStats {
    high_score: usize,
    last_game: Option<GameRecord>,
}

pub(crate) fn run(data_dir: &Path) -> anyhow::Result<()> {
    let store = ScoreStore::new(data_dir);
    let stats = StoredStats {
        high_score: store.load_high_score(),
        last_game: store.load_last_game(),
    };
    util::print_json(&stats)
}
