//! richman CLI
//!
//! Plays a game on the sample board (or a saved map) and logs the tables
//! the engine renders.

use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use richman::board::format_table;
use richman::prelude::*;

#[derive(Parser)]
#[command(name = "richman")]
#[command(about = "Play a property-trading board game", long_about = None)]
struct Cli {
    /// Player as NAME or NAME:console (repeatable)
    #[arg(short, long = "player", default_values_t = [String::from("Alice"), String::from("Bob")])]
    players: Vec<String>,

    /// Starting money per player
    #[arg(long, default_value_t = 20000)]
    money: i64,

    /// Dice seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Stop with a draw after this many rounds (0 = no limit)
    #[arg(long, default_value_t = 1000)]
    max_rounds: u32,

    /// Play on a saved map instead of the sample board
    #[arg(long)]
    map: Option<PathBuf>,

    /// Save the board layout to this file and exit
    #[arg(long)]
    save_map: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn parse_player(arg: &str) -> Result<(String, Rc<dyn Strategy>)> {
    let (name, kind) = arg.split_once(':').unwrap_or((arg, "simple"));
    if name.is_empty() {
        bail!("player '{}' has no name", arg);
    }
    let strategy: Rc<dyn Strategy> = match kind {
        "simple" => Rc::new(SimpleStrategy::new()),
        "console" => Rc::new(ConsoleStrategy::stdio()),
        other => bail!("unknown strategy '{}' for {}", other, name),
    };
    Ok((name.to_owned(), strategy))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.money <= 0 {
        bail!("starting money must be positive, got {}", cli.money);
    }
    let config = GameConfig::new()
        .with_initial_money(cli.money)
        .with_seed(cli.seed)
        .with_max_rounds((cli.max_rounds > 0).then_some(cli.max_rounds));

    let mut board = match &cli.map {
        Some(path) => Board::from_file(path, config.clone())
            .with_context(|| format!("loading map {}", path.display()))?,
        None => richman::maps::sample_board(config.clone()),
    };

    if let Some(path) = &cli.save_map {
        board
            .save(path)
            .with_context(|| format!("saving map {}", path.display()))?;
        info!(path = %path.display(), "map saved");
        return Ok(());
    }

    board.subscribe(EventKind::RenderTable, |_, event| {
        if let GameEvent::RenderTable { title, header, rows } = event {
            info!("\n{}", format_table(title, header, rows));
        }
        false
    });

    let mut players = Vec::new();
    for arg in &cli.players {
        let (name, strategy) = parse_player(arg)?;
        players.push((Player::new(name, config.initial_money), strategy));
    }
    if players.len() < 2 {
        bail!("a game needs at least two players");
    }

    let mut game = Game::new(board, players);
    match game.run()? {
        GameResult::Winner(player) => {
            info!(winner = game.board().player(player).name(), rounds = game.board().round(), "winner")
        }
        GameResult::Draw => info!(rounds = game.board().round(), "draw"),
    }
    Ok(())
}
