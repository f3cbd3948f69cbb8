use brickfall_engine::GameConfig;

use crate::util;

pub(crate) fn run(config: &GameConfig) -> anyhow::Result<()> {
    util::print_json(config)
}
