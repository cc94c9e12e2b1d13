//! Solve command - search one saved position

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use abalone_core::{Board, Player, SavedPosition, STANDARD_RADIUS};
use abalone_search::{Algorithm, SearchSession};

#[derive(Args)]
pub struct SolveArgs {
    /// Saved position JSON file ({"white": [[x, z], ...], "black": [...]})
    #[arg(long, value_name = "FILE")]
    pub state: PathBuf,

    /// Side to move
    #[arg(long, value_parser = parse_side, default_value = "w")]
    pub player: Player,

    /// Search depth in plies
    #[arg(long, default_value = "2")]
    pub depth: u32,
}

fn parse_side(raw: &str) -> Result<Player, String> {
    match raw {
        "w" | "white" => Ok(Player::White),
        "b" | "black" => Ok(Player::Black),
        other => Err(format!("unknown side {other:?}, expected w or b")),
    }
}

pub fn run(args: SolveArgs, seed: u64) -> Result<()> {
    let raw = fs::read_to_string(&args.state)
        .with_context(|| format!("cannot read position file: {}", args.state.display()))?;
    let position: SavedPosition = serde_json::from_str(&raw)
        .with_context(|| format!("malformed position file: {}", args.state.display()))?;
    let board = Board::from_saved(&position).context("invalid position")?;

    println!("{board}");

    let mut session = SearchSession::with_seed(STANDARD_RADIUS, seed);
    let (score, best) = session.evaluate(&board, args.depth, args.player, Algorithm::PvsTable);
    tracing::info!(nodes = session.stats().nodes, "solve finished");

    match best {
        Some(mv) => println!("{:?} should play {mv} (score {score})", args.player),
        None => println!("{:?} has no move (score {score})", args.player),
    }
    Ok(())
}
