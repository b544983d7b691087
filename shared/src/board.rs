//! Board data model: players, cell owners and the 5x5 grid

use crate::BOARD_SIZE;
use std::fmt;

/// One of the two seats in a game. `One` is whoever connected first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Index into per-player arrays such as placement quotas.
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }

    /// Role string carried in the `GAME_START` payload.
    pub fn role(self) -> &'static str {
        match self {
            Player::One => "FIRST",
            Player::Two => "SECOND",
        }
    }

    pub fn from_role(role: &str) -> Option<Player> {
        match role {
            "FIRST" => Some(Player::One),
            "SECOND" => Some(Player::Two),
            _ => None,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "PLAYER1"),
            Player::Two => write!(f, "PLAYER2"),
        }
    }
}

/// Contents of a single board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Owner {
    #[default]
    Empty,
    Player1,
    Player2,
}

impl Owner {
    pub fn player(self) -> Option<Player> {
        match self {
            Owner::Empty => None,
            Owner::Player1 => Some(Player::One),
            Owner::Player2 => Some(Player::Two),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Owner::Empty
    }

    /// Character used for this cell in text grids.
    pub fn symbol(self) -> char {
        match self {
            Owner::Empty => '.',
            Owner::Player1 => 'X',
            Owner::Player2 => 'O',
        }
    }
}

impl From<Player> for Owner {
    fn from(player: Player) -> Self {
        match player {
            Player::One => Owner::Player1,
            Player::Two => Owner::Player2,
        }
    }
}

/// The 5x5 grid. Pieces have no identity beyond the cell they occupy.
///
/// Coordinates are signed so that wire values (including the `-1,-1`
/// placement sentinel) can be passed straight through; anything outside the
/// grid reads as `None` and is never written.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Board {
    cells: [[Owner; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid_position(row: i32, col: i32) -> bool {
        let size = BOARD_SIZE as i32;
        (0..size).contains(&row) && (0..size).contains(&col)
    }

    pub fn get(&self, row: i32, col: i32) -> Option<Owner> {
        if Self::is_valid_position(row, col) {
            Some(self.cells[row as usize][col as usize])
        } else {
            None
        }
    }

    /// Writes a cell. Returns false (and writes nothing) when out of range.
    pub fn set(&mut self, row: i32, col: i32, owner: Owner) -> bool {
        if !Self::is_valid_position(row, col) {
            return false;
        }
        self.cells[row as usize][col as usize] = owner;
        true
    }

    /// Relocates whatever occupies the source cell. Callers validate first.
    pub fn move_piece(&mut self, from_row: i32, from_col: i32, to_row: i32, to_col: i32) {
        if let Some(owner) = self.get(from_row, from_col) {
            if Self::is_valid_position(to_row, to_col) {
                self.set(from_row, from_col, Owner::Empty);
                self.set(to_row, to_col, owner);
            }
        }
    }

    /// Clears a cell; out-of-range coordinates are a no-op.
    pub fn remove_piece(&mut self, row: i32, col: i32) {
        self.set(row, col, Owner::Empty);
    }

    /// Custodian captures produced by `player` having just arrived at
    /// `(row, col)`. Only the four straight lines out of that cell are
    /// examined: an opponent piece directly adjacent with one of `player`'s
    /// pieces right behind it is captured.
    pub fn check_captures(&self, row: i32, col: i32, player: Player) -> Vec<(i32, i32)> {
        const DIRECTIONS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

        let mover = Owner::from(player);
        let opponent = Owner::from(player.opponent());

        DIRECTIONS
            .iter()
            .filter_map(|(dr, dc)| {
                let middle = (row + dr, col + dc);
                let end = (row + dr * 2, col + dc * 2);
                let flanked = self.get(middle.0, middle.1) == Some(opponent)
                    && self.get(end.0, end.1) == Some(mover);
                flanked.then_some(middle)
            })
            .collect()
    }

    pub fn count(&self, player: Player) -> usize {
        let owner = Owner::from(player);
        self.cells
            .iter()
            .flatten()
            .filter(|cell| **cell == owner)
            .count()
    }

    /// Coordinates of every piece belonging to `player`, row-major.
    pub fn pieces(&self, player: Player) -> impl Iterator<Item = (i32, i32)> + '_ {
        let owner = Owner::from(player);
        self.cells.iter().enumerate().flat_map(move |(r, row)| {
            row.iter()
                .enumerate()
                .filter(move |(_, cell)| **cell == owner)
                .map(move |(c, _)| (r as i32, c as i32))
        })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for col in 0..BOARD_SIZE {
            write!(f, " {}", col)?;
        }
        writeln!(f)?;

        for (r, row) in self.cells.iter().enumerate() {
            write!(f, "{} ", r)?;
            for cell in row {
                write!(f, " {}", cell.symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
