//! The common structures and traits.

use std::fmt::Debug;

/// One of the two seats at the table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// The player sitting in the other seat.
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Numeric id of the seat, either 1 or 2.
    pub fn id(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }
}

/// Outcome of a finished game, one score per player.
///
/// A win is scored 1.0, a loss 0.0, and a draw 0.5 for each side.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointsValues {
    pub one: f64,
    pub two: f64,
}

impl PointsValues {
    pub fn new(one: f64, two: f64) -> Self {
        Self { one, two }
    }

    /// Outcome where `winner` takes the full point.
    pub fn win_for(winner: Player) -> Self {
        match winner {
            Player::One => Self::new(1.0, 0.0),
            Player::Two => Self::new(0.0, 1.0),
        }
    }

    pub fn draw() -> Self {
        Self::new(0.5, 0.5)
    }

    pub fn get(&self, player: Player) -> f64 {
        match player {
            Player::One => self.one,
            Player::Two => self.two,
        }
    }
}

/// Defines the rules for a two-player, perfect-knowledge, turn-based game.
///
/// The search only ever talks to the game through this trait: it never looks
/// inside a state, it copies states around and asks the board about them.
/// Implementations are expected to be pure, `next_state` must not mutate its
/// input.
pub trait Board {
    /// The type of the game state.
    type State: Clone;
    /// The type of game actions.
    ///
    /// The ordering is used to break ties between equally scored actions, so
    /// it must be total and stable.
    type Action: Copy + Ord + Debug;

    /// The player whose turn it is in `state`.
    fn current_player(&self, state: &Self::State) -> Player;

    /// Whether `state` is terminal.
    fn is_ended(&self, state: &Self::State) -> bool;

    /// Legal actions at `state`. Non-empty for every non-terminal state.
    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// The state reached by playing `action` at `state`.
    fn next_state(&self, state: &Self::State, action: Self::Action) -> Self::State;

    /// `None` while the game is running, each player's score once it ended.
    fn points_values(&self, state: &Self::State) -> Option<PointsValues>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent() {
        assert_eq!(Player::One.opponent(), Player::Two);
        assert_eq!(Player::Two.opponent().opponent(), Player::Two);
        assert_eq!(Player::Two.id(), 2);
    }

    #[test]
    fn test_points_values() {
        let points = PointsValues::win_for(Player::Two);
        assert_eq!(points.get(Player::Two), 1.0);
        assert_eq!(points.get(Player::One), 0.0);
        assert_eq!(PointsValues::draw().get(Player::One), 0.5);
    }
}
