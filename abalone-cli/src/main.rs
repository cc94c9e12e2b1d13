//! Abalone CLI - command-line interface
//!
//! Commands:
//! - sim: play one game, a search engine (white) against a random mover
//! - solve: report the best move for a saved position

use clap::{Parser, Subcommand};

mod sim;
mod solve;

#[derive(Parser)]
#[command(name = "abalone")]
#[command(about = "Abalone engine: minimax-family search and MCTS players")]
struct Cli {
    /// RNG seed shared by the engines and the random opponent
    #[arg(long, global = true, default_value = "42")]
    seed: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single game against a random mover
    Sim(sim::SimArgs),
    /// Search a saved position and print the chosen move
    Solve(solve::SolveArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Sim(args) => sim::run(args, cli.seed),
        Commands::Solve(args) => solve::run(args, cli.seed),
    }
}
