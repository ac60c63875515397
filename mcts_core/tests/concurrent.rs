use std::time::Duration;

use mcts_core::{
    tictactoe::{State, TicTacToe},
    Board, MctsOptions, MonteCarloTreeSearch,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rayon::prelude::*;

const POSITIONS: [&str; 6] = [
    ".........",
    "X........",
    "X../.O./...",
    "XX./OO./...",
    "X.O/.X./...",
    "XO./.../...",
];

fn search(position: &str, seed: u64) -> mcts_core::SearchResult<mcts_core::tictactoe::Move> {
    let state: State = position.parse().unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    MonteCarloTreeSearch::new(MctsOptions::default().with_max_iterations(300))
        .search_with_stats(&TicTacToe, &state, Duration::from_secs(60), &mut rng)
        .unwrap()
}

#[test]
fn test_independent_searches_in_parallel() {
    let jobs = POSITIONS
        .iter()
        .enumerate()
        .flat_map(|(i, p)| (0..4).map(move |s| (*p, (i * 10 + s) as u64)))
        .collect::<Vec<_>>();

    let parallel = jobs
        .par_iter()
        .map(|(position, seed)| search(position, *seed))
        .collect::<Vec<_>>();

    for ((position, seed), result) in jobs.iter().zip(parallel) {
        let state: State = position.parse().unwrap();
        assert!(TicTacToe.legal_actions(&state).contains(&result.action));
        assert_eq!(result.root_visits, 300);

        // Each search owns its tree and rng, so threads change nothing.
        let serial = search(position, *seed);
        assert_eq!(serial.action, result.action);
        assert_eq!(serial.children, result.children);
    }
}
