//! One-shot move picker: reads a tic-tac-toe position from the command line,
//! runs a single search for the player to move, and prints the chosen action.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use mcts_core::{
    tictactoe::{State, TicTacToe},
    Board, MctsOptions, MonteCarloTreeSearch,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "mcts_think", about = "Pick a move with Monte Carlo Tree Search")]
struct Args {
    /// Position as nine cells in row-major order: X, O, and . for empty
    #[arg(long, default_value = ".........")]
    board: String,

    /// Wall-clock budget for the search, in milliseconds
    #[arg(long, default_value_t = 1000)]
    time_ms: u64,

    /// Exploration constant of the UCB1 formula
    #[arg(long, default_value_t = 2.0)]
    exploration: f64,

    /// Stop after this many iterations even if time is left
    #[arg(long)]
    max_iterations: Option<u64>,

    /// Seed for the search; drawn from the OS when absent
    #[arg(long)]
    seed: Option<u64>,

    /// Log the statistics of every candidate move
    #[arg(long)]
    verbose: bool,

    /// Log level, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let state: State = args
        .board
        .parse()
        .with_context(|| format!("cannot read board {:?}", args.board))?;
    println!("{}", state);
    if TicTacToe.is_ended(&state) {
        bail!("the game is already over");
    }

    let mut options = MctsOptions::default().with_exploration(args.exploration);
    if let Some(iterations) = args.max_iterations {
        options = options.with_max_iterations(iterations);
    }
    if args.verbose {
        options = options.verbose();
    }

    let mut rng = match args.seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_entropy(),
    };

    let player = TicTacToe.current_player(&state);
    let result = MonteCarloTreeSearch::new(options).search_with_stats(
        &TicTacToe,
        &state,
        Duration::from_millis(args.time_ms),
        &mut rng,
    )?;
    info!(
        iterations = result.iterations,
        elapsed_ms = result.elapsed.as_millis() as u64,
        tree_size = result.tree_size,
        "Player{} thought",
        player.id()
    );

    println!("best move: {}", result.action);
    println!("{}", TicTacToe.next_state(&state, result.action));
    Ok(())
}
