use rand::{seq::SliceRandom, Rng};

use crate::interface::{Board, Player};

use super::algorithm::SearchError;

pub struct RolloutPolicy;

/// Heuristic random rollout policy for Monte Carlo Tree Search.
impl RolloutPolicy {
    /// Choose the action to play at `state` during a rollout.
    ///
    /// Any action that ends the game is played first. Failing that, an action
    /// ending the game as a win for the opponent of the mover. Otherwise one
    /// legal action is drawn uniformly. Returns `None` only for an empty
    /// `legal_actions`.
    pub fn heuristic_action<B, R>(
        board: &B,
        state: &B::State,
        legal_actions: &[B::Action],
        rng: &mut R,
    ) -> Option<B::Action>
    where
        B: Board,
        R: Rng + ?Sized,
    {
        for &action in legal_actions {
            let next_state = board.next_state(state, action);
            if board.points_values(&next_state).is_some() {
                return Some(action);
            }
        }

        // Unreachable while the pass above takes every terminal successor.
        let opponent = board.current_player(state).opponent();
        for &action in legal_actions {
            let next_state = board.next_state(state, action);
            if board.points_values(&next_state).is_some() && is_win(board, &next_state, opponent) {
                return Some(action);
            }
        }

        legal_actions.choose(rng).copied()
    }

    /// Plays `state` out to the end with [`RolloutPolicy::heuristic_action`]
    /// and returns the terminal state. Never touches the search tree.
    pub fn rollout<B, R>(
        board: &B,
        mut state: B::State,
        rng: &mut R,
    ) -> Result<B::State, SearchError>
    where
        B: Board,
        R: Rng + ?Sized,
    {
        while !board.is_ended(&state) {
            let legal_actions = board.legal_actions(&state);
            let action = Self::heuristic_action(board, &state, &legal_actions, rng)
                .ok_or(SearchError::EmptyLegalActions("rollout"))?;
            state = board.next_state(&state, action);
        }
        Ok(state)
    }
}

/// Whether `state` is a win for `player`.
///
/// # Panics
///
/// If `state` is not terminal. Reaching this with a running game means the
/// search loop is wired wrong.
pub fn is_win<B: Board>(board: &B, state: &B::State, player: Player) -> bool {
    let Some(outcome) = board.points_values(state) else {
        panic!("is_win was called on a non-terminal state");
    };
    outcome.get(player) == 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::{Move, State, TicTacToe};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_takes_the_only_winning_action() {
        // X to move, the only empty cell completes the top row.
        let state: State = "XX./OOX/XOO".parse().unwrap();
        let legal = TicTacToe.legal_actions(&state);
        assert_eq!(legal, vec![Move::new(0, 2)]);

        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let action = RolloutPolicy::heuristic_action(&TicTacToe, &state, &legal, &mut rng);
        assert_eq!(action, Some(Move::new(0, 2)));
    }

    #[test]
    fn test_prefers_first_terminal_action() {
        // X to move, and each of (0,0), (0,2) and (1,2) completes a line.
        let state: State = ".O./XX./XOO".parse().unwrap();
        let legal = TicTacToe.legal_actions(&state);
        for seed in 0..20 {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let action = RolloutPolicy::heuristic_action(&TicTacToe, &state, &legal, &mut rng);
            assert_eq!(action, Some(Move::new(0, 0)));
        }
    }

    #[test]
    fn test_falls_back_to_legal_random_action() {
        let state = State::default();
        let legal = TicTacToe.legal_actions(&state);
        let mut rng = ChaCha20Rng::seed_from_u64(9);
        for _ in 0..20 {
            let action = RolloutPolicy::heuristic_action(&TicTacToe, &state, &legal, &mut rng);
            assert!(legal.contains(&action.unwrap()));
        }
        assert_eq!(
            RolloutPolicy::heuristic_action(&TicTacToe, &state, &[], &mut rng),
            None
        );
    }

    #[test]
    fn test_rollout_reaches_terminal_state() {
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        for _ in 0..20 {
            let end = RolloutPolicy::rollout(&TicTacToe, State::default(), &mut rng).unwrap();
            assert!(TicTacToe.is_ended(&end));
            assert!(TicTacToe.points_values(&end).is_some());
        }
    }

    #[test]
    fn test_rollout_from_terminal_state_is_identity() {
        let state: State = "XXX/OO./...".parse().unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(42);
        let end = RolloutPolicy::rollout(&TicTacToe, state.clone(), &mut rng).unwrap();
        assert_eq!(end, state);
    }

    #[test]
    fn test_is_win() {
        let state: State = "XXX/OO./...".parse().unwrap();
        assert!(is_win(&TicTacToe, &state, Player::One));
        assert!(!is_win(&TicTacToe, &state, Player::Two));

        let draw: State = "XOX/XOO/OXX".parse().unwrap();
        assert!(!is_win(&TicTacToe, &draw, Player::One));
        assert!(!is_win(&TicTacToe, &draw, Player::Two));
    }

    #[test]
    #[should_panic(expected = "non-terminal")]
    fn test_is_win_panics_on_running_game() {
        is_win(&TicTacToe, &State::default(), Player::One);
    }
}
