use std::time::{Duration, Instant};

use rand::Rng;
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::interface::{Board, Player};

use super::node::{NodeId, SearchTree};
use super::rollout_policy::{is_win, RolloutPolicy};

/// Errors reported by the search.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    #[error("cannot search from a state where the game has already ended")]
    TerminalState,

    #[error("cannot search from a state without legal actions")]
    NoLegalActions,

    /// The board reported no legal actions for a state it claims is still
    /// running. Carries the phase that ran into it.
    #[error("board returned no legal actions for a non-terminal state during {0}")]
    EmptyLegalActions(&'static str),

    #[error("invalid search options: {0}")]
    InvalidOptions(String),
}

/// Options for MonteCarloTreeSearch.
#[derive(Debug, Clone)]
pub struct MctsOptions {
    verbose: bool,
    exploration: f64,
    // None means only the time budget ends the search.
    max_iterations: Option<u64>,
}

impl Default for MctsOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            exploration: 2.0,
            max_iterations: None,
        }
    }
}

impl MctsOptions {
    /// Log the statistics of every root child after each search.
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Set the exploration constant of the UCB1 formula.
    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    /// Stop after this many iterations even if time is left.
    pub fn with_max_iterations(mut self, iterations: u64) -> Self {
        self.max_iterations = Some(iterations);
        self
    }

    pub fn exploration(&self) -> f64 {
        self.exploration
    }

    pub fn max_iterations(&self) -> Option<u64> {
        self.max_iterations
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(SearchError::InvalidOptions(format!(
                "exploration must be a finite non-negative number, got {}",
                self.exploration
            )));
        }
        if self.max_iterations == Some(0) {
            return Err(SearchError::InvalidOptions(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Visit statistics of one root child.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildStats<A> {
    pub action: A,
    pub visits: u32,
    pub wins: f64,
}

/// Outcome of a search call.
#[derive(Debug, Clone)]
pub struct SearchResult<A> {
    /// Most visited root action.
    pub action: A,
    /// Completed select-expand-simulate-backpropagate iterations.
    pub iterations: u64,
    pub root_visits: u32,
    pub elapsed: Duration,
    /// Nodes in the tree when the search stopped, root included.
    pub tree_size: usize,
    /// Root children in action order.
    pub children: Vec<ChildStats<A>>,
}

pub struct MonteCarloTreeSearch {
    options: MctsOptions,
}

impl MonteCarloTreeSearch {
    pub fn new(options: MctsOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MctsOptions {
        &self.options
    }

    /// Runs a search from `state` and returns the most visited action.
    ///
    /// At least one iteration always runs, so a zero `time_budget` still
    /// yields an action. The deadline is only checked between iterations.
    pub fn search<B, R>(
        &self,
        board: &B,
        state: &B::State,
        time_budget: Duration,
        rng: &mut R,
    ) -> Result<B::Action, SearchError>
    where
        B: Board,
        R: Rng + ?Sized,
    {
        self.search_with_stats(board, state, time_budget, rng)
            .map(|result| result.action)
    }

    /// Same as [`MonteCarloTreeSearch::search`], also reporting the root
    /// statistics.
    pub fn search_with_stats<B, R>(
        &self,
        board: &B,
        state: &B::State,
        time_budget: Duration,
        rng: &mut R,
    ) -> Result<SearchResult<B::Action>, SearchError>
    where
        B: Board,
        R: Rng + ?Sized,
    {
        self.options.validate()?;
        if board.is_ended(state) {
            return Err(SearchError::TerminalState);
        }
        let root_actions = board.legal_actions(state);
        if root_actions.is_empty() {
            return Err(SearchError::NoLegalActions);
        }

        let bot = board.current_player(state);
        let mut tree = SearchTree::new(root_actions);

        let start = Instant::now();
        let mut iterations = 0u64;
        loop {
            self.iterate(board, &mut tree, state, bot, rng)?;
            iterations += 1;
            if self.options.max_iterations.is_some_and(|max| iterations >= max) {
                break;
            }
            if start.elapsed() >= time_budget {
                break;
            }
        }
        let elapsed = start.elapsed();

        let (action, _) = tree.robust_child().ok_or(SearchError::NoLegalActions)?;
        let root = tree.get(tree.root());
        let children = root
            .children
            .iter()
            .map(|(action, child)| {
                let child = tree.get(*child);
                ChildStats {
                    action: *action,
                    visits: child.visits,
                    wins: child.wins,
                }
            })
            .collect::<Vec<_>>();

        debug!(
            iterations,
            tree_size = tree.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            rate = iterations as f64 / elapsed.as_secs_f64().max(f64::EPSILON),
            "MCTS search complete, chose {:?}",
            action
        );

        if self.options.verbose {
            // Sort moves by visit count, largest first.
            let mut ranked = children.iter().collect::<Vec<_>>();
            ranked.sort_by_key(|c| std::cmp::Reverse(c.visits));
            for child in ranked.into_iter().take(10) {
                info!(
                    "{:>6} visits, {:.02}% wins: {:?}",
                    child.visits,
                    100.0 * child.wins / f64::from(child.visits.max(1)),
                    child.action
                );
            }
        }

        Ok(SearchResult {
            action,
            iterations,
            root_visits: root.visits,
            elapsed,
            tree_size: tree.len(),
            children,
        })
    }

    /// One select-expand-simulate-backpropagate pass.
    fn iterate<B, R>(
        &self,
        board: &B,
        tree: &mut SearchTree<B::Action>,
        root_state: &B::State,
        bot: Player,
        rng: &mut R,
    ) -> Result<(), SearchError>
    where
        B: Board,
        R: Rng + ?Sized,
    {
        let (mut node, mut state) = self.traverse_nodes(board, tree, root_state.clone(), bot);

        if !board.is_ended(&state) {
            (node, state) = tree.expand(board, node, &state, rng)?;
        }

        let end_state = RolloutPolicy::rollout(board, state, rng)?;
        let won = is_win(board, &end_state, bot);
        tree.backpropagate(node, won);

        trace!(node = node.index(), won, "MCTS iteration complete");
        Ok(())
    }

    /// Descends from the root while the game is running and the current node
    /// is fully expanded, returning the node reached and its state.
    fn traverse_nodes<B>(
        &self,
        board: &B,
        tree: &SearchTree<B::Action>,
        mut state: B::State,
        bot: Player,
    ) -> (NodeId, B::State)
    where
        B: Board,
    {
        let mut node = tree.root();
        while !board.is_ended(&state) && tree.get(node).is_fully_expanded() {
            let is_opponent = board.current_player(&state) != bot;
            let Some((action, child)) =
                tree.best_child(node, self.options.exploration, is_opponent)
            else {
                // Fully expanded without children.
                return (node, state);
            };
            state = board.next_state(&state, action);
            node = child;
        }
        (node, state)
    }
}
