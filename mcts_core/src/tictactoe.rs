use super::interface::{Board, Player, PointsValues};
use std::fmt::{Debug, Display};
use std::str::FromStr;
use thiserror::Error;

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

pub struct TicTacToe;

#[derive(Default, Clone, PartialEq, Eq)]
pub struct State {
    pub cells: [Option<Player>; 9],
}

impl State {
    pub fn new(cells: [Option<Player>; 9]) -> Self {
        Self { cells }
    }

    fn pieces(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// `Player::One` (X) always opens.
    pub fn player_to_move(&self) -> Player {
        if self.pieces() % 2 == 0 {
            Player::One
        } else {
            Player::Two
        }
    }

    pub fn player_just_moved(&self) -> Player {
        self.player_to_move().opponent()
    }

    fn is_full(&self) -> bool {
        self.pieces() == 9
    }

    #[inline]
    pub fn get_winner(&self) -> Option<Player> {
        LINES.iter().find_map(|&[a, b, c]| match self.cells[a] {
            Some(p) if self.cells[b] == Some(p) && self.cells[c] == Some(p) => Some(p),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid tic-tac-toe board: {0}")]
pub struct ParseStateError(String);

/// Parses nine cells in row-major order: `X`, `O`, and `.` or `_` for empty.
/// Whitespace and `/` separators are ignored, so `"x.o/.x./..o"` works too.
impl FromStr for State {
    type Err = ParseStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let symbols = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '/')
            .collect::<Vec<_>>();
        if symbols.len() != 9 {
            return Err(ParseStateError(format!(
                "expected 9 cells, found {}",
                symbols.len()
            )));
        }

        let mut cells = [None; 9];
        for (cell, symbol) in cells.iter_mut().zip(symbols) {
            *cell = match symbol.to_ascii_uppercase() {
                'X' => Some(Player::One),
                'O' => Some(Player::Two),
                '.' | '_' => None,
                other => return Err(ParseStateError(format!("unknown cell '{other}'"))),
            };
        }

        let xs = cells.iter().filter(|c| **c == Some(Player::One)).count();
        let os = cells.iter().filter(|c| **c == Some(Player::Two)).count();
        if xs != os && xs != os + 1 {
            return Err(ParseStateError(format!(
                "{xs} X against {os} O cannot happen with X moving first"
            )));
        }
        Ok(State::new(cells))
    }
}

impl Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "  a b c")?;
        for (row, line) in self.cells.chunks(3).enumerate() {
            write!(f, "{} ", row)?;
            for cell in line {
                write!(
                    f,
                    "{}",
                    match cell {
                        Some(Player::One) => "X ",
                        Some(Player::Two) => "O ",
                        None => "_ ",
                    }
                )?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Debug for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for cell in &self.cells {
            let symbol = match cell {
                Some(Player::One) => 'X',
                Some(Player::Two) => 'O',
                None => '.',
            };
            write!(f, "{}", symbol)?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Move(u8);
// 0 1 2
// 3 4 5
// 6 7 8
impl Move {
    pub fn new(row: usize, col: usize) -> Self {
        assert!(row < 3 && col < 3, "coordinate out of bounds, should be 0..3");
        Move((col + row * 3) as _)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }

    pub fn get_coord(&self) -> (usize, usize) {
        // row, col
        (self.0 as usize / 3, self.0 as usize % 3)
    }
}

impl Debug for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.0 / 3, self.0 % 3)
    }
}

impl Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "M({},{})", ((self.0 % 3) + b'a') as char, self.0 / 3)
    }
}

impl Board for TicTacToe {
    type State = State;
    type Action = Move;

    fn current_player(&self, state: &State) -> Player {
        state.player_to_move()
    }

    fn is_ended(&self, state: &State) -> bool {
        state.is_full() || state.get_winner().is_some()
    }

    fn legal_actions(&self, state: &State) -> Vec<Move> {
        if state.get_winner().is_some() {
            return Vec::new();
        }
        state
            .cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_none())
            .map(|(i, _)| Move(i as _))
            .collect()
    }

    fn next_state(&self, state: &State, action: Move) -> State {
        assert!(
            state.cells[action.index()].is_none(),
            "cell {:?} is already taken",
            action
        );
        let mut next = state.clone();
        next.cells[action.index()] = Some(state.player_to_move());
        next
    }

    fn points_values(&self, state: &State) -> Option<PointsValues> {
        match (state.is_full(), state.get_winner()) {
            (_, Some(winner)) => Some(PointsValues::win_for(winner)),
            (true, None) => Some(PointsValues::draw()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let state: State = "XO./.X./..O".parse().unwrap();
        assert_eq!(state.cells[0], Some(Player::One));
        assert_eq!(state.cells[1], Some(Player::Two));
        assert_eq!(state.player_to_move(), Player::One);
        assert_eq!(format!("{:?}", state), "XO..X...O");
        assert!(state.to_string().starts_with("  a b c"));
    }

    #[test]
    fn test_parse_rejects_bad_boards() {
        assert!("XO".parse::<State>().is_err());
        assert!("XXX......".parse::<State>().is_err());
        assert!("XOZ......".parse::<State>().is_err());
    }

    #[test]
    fn test_get_winner() {
        let state: State = "XXX/OO./...".parse().unwrap();
        assert_eq!(state.get_winner(), Some(Player::One));
        assert!(TicTacToe.is_ended(&state));
        assert!(TicTacToe.legal_actions(&state).is_empty());
        assert_eq!(
            TicTacToe.points_values(&state),
            Some(PointsValues::win_for(Player::One))
        );
    }

    #[test]
    fn test_draw() {
        let state: State = "XOX/XOO/OXX".parse().unwrap();
        assert_eq!(state.get_winner(), None);
        assert_eq!(TicTacToe.points_values(&state), Some(PointsValues::draw()));
    }

    #[test]
    fn test_next_state_is_pure() {
        let state = State::default();
        let next = TicTacToe.next_state(&state, Move::new(1, 1));
        assert_eq!(state, State::default());
        assert_eq!(next.cells[4], Some(Player::One));
        assert_eq!(TicTacToe.current_player(&next), Player::Two);
        assert_eq!(TicTacToe.legal_actions(&next).len(), 8);
        assert_eq!(TicTacToe.points_values(&next), None);
    }

    #[test]
    fn test_move_order() {
        assert!(Move::new(0, 2) < Move::new(1, 0));
        assert_eq!(Move::new(2, 1).get_coord(), (2, 1));
        assert_eq!(Move::new(2, 1).to_string(), "M(b,2)");
    }
}
