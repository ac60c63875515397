pub mod interface;
mod mcts;
pub mod tictactoe;

pub use interface::{Board, Player, PointsValues};
pub use mcts::algorithm::{ChildStats, MctsOptions, MonteCarloTreeSearch, SearchError, SearchResult};
pub use mcts::node::{NodeId, SearchNode, SearchTree};
pub use mcts::rollout_policy::{is_win, RolloutPolicy};
