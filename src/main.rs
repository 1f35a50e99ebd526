mod app;
mod input;
mod term;

use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use simplelog::{Config, LevelFilter, WriteLogger};

use serpent::config::{DEFAULT_FOOD_REWARD, DEFAULT_INITIAL_LENGTH, DEFAULT_TICK_INTERVAL_MS};
use serpent::{Cell, Game, GameConfig};

#[derive(Parser)]
#[command(name = "serpent")]
#[command(version, about = "Classic snake on a square grid, in the terminal")]
struct Cli {
    /// Side length of the square board
    #[arg(long, default_value_t = 20)]
    board_size: u16,

    /// Milliseconds between two ticks
    #[arg(long, default_value_t = DEFAULT_TICK_INTERVAL_MS)]
    tick_ms: u64,

    /// Length of a fresh snake
    #[arg(long, default_value_t = DEFAULT_INITIAL_LENGTH)]
    initial_length: usize,

    /// Starting row of the head (defaults to mid-board)
    #[arg(long)]
    start_row: Option<i32>,

    /// Starting column of the head (defaults to a few cells left of centre)
    #[arg(long)]
    start_col: Option<i32>,

    /// Points per food eaten
    #[arg(long, default_value_t = DEFAULT_FOOD_REWARD)]
    reward: u32,

    /// Random samples tried before scanning for a free food cell (defaults to board size squared)
    #[arg(long)]
    max_food_trials: Option<usize>,

    /// Seed for a reproducible food sequence
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the log; the terminal itself is taken by the game
    #[arg(long, default_value = "serpent.log")]
    log_file: PathBuf,

    #[arg(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

impl Cli {
    fn game_config(&self) -> GameConfig {
        let defaults = GameConfig::with_board_size(self.board_size);
        let head = Cell::new(
            self.start_row.unwrap_or(defaults.initial_head.row),
            self.start_col.unwrap_or(defaults.initial_head.col),
        );

        GameConfig {
            tick_interval: Duration::from_millis(self.tick_ms),
            initial_length: self.initial_length,
            initial_head: head,
            food_reward: self.reward,
            max_food_trials: self.max_food_trials.unwrap_or(defaults.max_food_trials),
            ..defaults
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {}", cli.log_file.display()))?;
    WriteLogger::init(cli.log_level, Config::default(), log_file).context("Failed to initialize logger")?;

    let config = cli.game_config();
    info!("starting with {:?}", config);

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let game = Game::new(config, rng).context("Invalid game configuration")?;

    app::SnakeApp::new(game)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_library_defaults() {
        let cli = Cli::parse_from(["serpent"]);
        assert_eq!(cli.game_config(), GameConfig::default());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "serpent", "--board-size", "12", "--tick-ms", "150", "--start-row", "2", "--reward", "5",
        ]);
        let config = cli.game_config();

        assert_eq!(config.board_size, 12);
        assert_eq!(config.tick_interval, Duration::from_millis(150));
        assert_eq!(config.initial_head, Cell::new(2, 3));
        assert_eq!(config.food_reward, 5);
        assert_eq!(config.max_food_trials, 144);
    }
}
