//! Sim command - play one game against a random mover

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use abalone_core::{Board, Move, Opening, Player, STANDARD_RADIUS};
use abalone_mcts::{MctsConfig, MctsPlayer};
use abalone_search::{Algorithm, SearchSession};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Engine {
    Minimax,
    AlphaBeta,
    Pvs,
    AlphaBetaTable,
    PvsTable,
    Mcts,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OpeningChoice {
    Standard,
    Mini,
}

impl OpeningChoice {
    fn board(self) -> Board {
        match self {
            OpeningChoice::Standard => Opening::Standard.board(),
            OpeningChoice::Mini => Opening::Mini.board(),
        }
    }
}

#[derive(Args)]
pub struct SimArgs {
    /// Engine playing white
    #[arg(long, value_enum, default_value = "pvs-table")]
    pub engine: Engine,

    /// Search depth in plies (minimax-family engines)
    #[arg(long, default_value = "2")]
    pub depth: u32,

    /// Playouts per move (mcts engine)
    #[arg(long, default_value = "1000")]
    pub iterations: usize,

    /// Starting position
    #[arg(long, value_enum, default_value = "standard")]
    pub opening: OpeningChoice,

    /// Stop after this many full rounds and call the game undecided
    #[arg(long, default_value = "200")]
    pub max_rounds: u32,

    /// Write the last search's transposition table here (table engines)
    #[arg(long, value_name = "FILE")]
    pub dump_table: Option<PathBuf>,
}

/// White's brain for the game loop
enum WhitePlayer {
    Search(SearchSession, Algorithm),
    Mcts(MctsPlayer),
}

impl WhitePlayer {
    fn build(args: &SimArgs, seed: u64) -> Self {
        match args.engine {
            Engine::Minimax => Self::session(seed, Algorithm::Minimax),
            Engine::AlphaBeta => Self::session(seed, Algorithm::AlphaBeta),
            Engine::Pvs => Self::session(seed, Algorithm::Pvs),
            Engine::AlphaBetaTable => Self::session(seed, Algorithm::AlphaBetaTable),
            Engine::PvsTable => Self::session(seed, Algorithm::PvsTable),
            Engine::Mcts => {
                let config = MctsConfig {
                    iterations: args.iterations,
                    ..MctsConfig::default()
                };
                WhitePlayer::Mcts(MctsPlayer::with_seed(config, seed))
            }
        }
    }

    fn session(seed: u64, algorithm: Algorithm) -> Self {
        WhitePlayer::Search(
            SearchSession::with_seed(STANDARD_RADIUS, seed),
            algorithm,
        )
    }

    fn best_move(&mut self, board: &Board, depth: u32) -> Option<Move> {
        match self {
            WhitePlayer::Search(session, algorithm) => {
                let (score, best) = session.evaluate(board, depth, Player::White, *algorithm);
                tracing::info!(nodes = session.stats().nodes, score, "white searched");
                best
            }
            WhitePlayer::Mcts(player) => player.best_move(board, Player::White),
        }
    }
}

pub fn run(args: SimArgs, seed: u64) -> Result<()> {
    let mut board = args.opening.board();
    let mut white = WhitePlayer::build(&args, seed);
    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));

    let start_white = board.marbles(Player::White);
    let start_black = board.marbles(Player::Black);

    println!("{board}");

    let mut outcome = None;
    for round in 1..=args.max_rounds {
        match play_ply(&mut board, Player::White, |b| white.best_move(b, args.depth))? {
            PlyOutcome::Won => {
                outcome = Some(Player::White);
                break;
            }
            PlyOutcome::NoMove => break,
            PlyOutcome::Played => {}
        }

        match play_ply(&mut board, Player::Black, |b| random_move(b, &mut rng))? {
            PlyOutcome::Won => {
                outcome = Some(Player::Black);
                break;
            }
            PlyOutcome::NoMove => break,
            PlyOutcome::Played => {}
        }

        println!("--- round {round} ---");
        println!("{board}");
        println!(
            "captured: white {} / black {}",
            start_black - board.marbles(Player::Black),
            start_white - board.marbles(Player::White),
        );
    }

    println!("{board}");
    match outcome {
        Some(winner) => println!("{winner:?} wins"),
        None => println!("undecided after {} rounds", args.max_rounds),
    }

    if let Some(path) = &args.dump_table {
        dump_table(&white, path)?;
    }
    Ok(())
}

enum PlyOutcome {
    Played,
    Won,
    NoMove,
}

fn play_ply(
    board: &mut Board,
    side: Player,
    mut choose: impl FnMut(&Board) -> Option<Move>,
) -> Result<PlyOutcome> {
    let mv = match choose(board) {
        Some(mv) => mv,
        None => {
            println!("{side:?} has no move");
            return Ok(PlyOutcome::NoMove);
        }
    };
    board
        .apply(&mv)
        .with_context(|| format!("{side:?} played illegal move {mv}"))?;
    tracing::debug!(%mv, ?side, "played");
    if board.check_win(side) {
        return Ok(PlyOutcome::Won);
    }
    Ok(PlyOutcome::Played)
}

fn random_move(board: &Board, rng: &mut ChaCha8Rng) -> Option<Move> {
    board.legal_moves(Player::Black).choose(rng).cloned()
}

fn dump_table(white: &WhitePlayer, path: &PathBuf) -> Result<()> {
    let WhitePlayer::Search(session, _) = white else {
        anyhow::bail!("--dump-table needs a transposition-table engine");
    };
    let file = File::create(path)
        .with_context(|| format!("cannot create table dump: {}", path.display()))?;
    session.export_table(BufWriter::new(file))?;
    println!("wrote {} table entries to {}", session.table_len(), path.display());
    Ok(())
}
