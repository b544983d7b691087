//! Seega rule engine shared by the server and both clients.
//!
//! Everything here is deterministic and only touches the `GameState` it is
//! called on. Turn alternation is driven by the caller: placing a piece bumps
//! `pieces_placed_this_turn`, and it is up to the owner of the state to check
//! [`GameState::should_change_turn`] and call [`GameState::reset_turn_counter`]
//! plus [`GameState::pass_turn`].

use crate::board::{Board, Owner, Player};
use crate::{BOARD_SIZE, PIECES_PER_PLAYER, PIECES_PER_TURN};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Players take turns dropping pieces, two at a time.
    Setup,
    /// Pieces move one step orthogonally and capture by custody.
    Play,
}

/// Why a player has lost once the win condition is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Defeat {
    NoPieces,
    NoMoves,
}

impl Defeat {
    /// Reason code a winning client attaches to its `GAME_END` notice.
    pub fn victory_code(self) -> &'static str {
        match self {
            Defeat::NoPieces => "VICTORY_CAPTURED_ALL",
            Defeat::NoMoves => "VICTORY_NO_MOVES",
        }
    }

    /// Notice shown to the loser.
    pub fn loss_notice(self) -> &'static str {
        match self {
            Defeat::NoPieces => "Você perdeu! Todas as suas peças foram capturadas!",
            Defeat::NoMoves => "Você perdeu! Não há movimentos válidos disponíveis!",
        }
    }

    /// Notice shown to the winner.
    pub fn victory_notice(self) -> &'static str {
        match self {
            Defeat::NoPieces => "Você venceu! Capturou todas as peças do oponente!",
            Defeat::NoMoves => "Você venceu! Oponente sem movimentos válidos!",
        }
    }

    /// Inverse of [`Defeat::victory_code`]; anything unrecognised reads as a
    /// stalemate loss.
    pub fn from_victory_code(code: &str) -> Defeat {
        if code == Defeat::NoPieces.victory_code() {
            Defeat::NoPieces
        } else {
            Defeat::NoMoves
        }
    }
}

/// Board plus the turn and phase counters of one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub phase: GamePhase,
    pub current_turn: Player,
    pieces_to_place: [u8; 2],
    pieces_placed_this_turn: u8,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            phase: GamePhase::Setup,
            current_turn: Player::One,
            pieces_to_place: [PIECES_PER_PLAYER; 2],
            pieces_placed_this_turn: 0,
        }
    }

    pub fn is_setup_phase(&self) -> bool {
        self.phase == GamePhase::Setup
    }

    pub fn pieces_to_place(&self, player: Player) -> u8 {
        self.pieces_to_place[player.index()]
    }

    pub fn pieces_placed_this_turn(&self) -> u8 {
        self.pieces_placed_this_turn
    }

    pub fn pieces_remaining_this_turn(&self) -> u8 {
        PIECES_PER_TURN.saturating_sub(self.pieces_placed_this_turn)
    }

    pub fn can_place(&self, player: Player) -> bool {
        self.is_setup_phase() && self.pieces_to_place(player) > 0
    }

    /// Drops a piece for `player`. The centre cell is off limits for the
    /// whole setup phase. Flips the phase to `Play` once both quotas are used.
    pub fn place_piece(&mut self, row: i32, col: i32, player: Player) -> bool {
        if !self.can_place(player) {
            return false;
        }
        if self.board.get(row, col) != Some(Owner::Empty) {
            return false;
        }
        let center = (BOARD_SIZE / 2) as i32;
        if row == center && col == center {
            return false;
        }

        self.board.set(row, col, Owner::from(player));
        self.pieces_to_place[player.index()] -= 1;
        self.pieces_placed_this_turn += 1;

        if self.pieces_to_place.iter().all(|left| *left == 0) {
            self.phase = GamePhase::Play;
        }

        true
    }

    pub fn should_change_turn(&self) -> bool {
        self.pieces_placed_this_turn >= PIECES_PER_TURN
    }

    pub fn reset_turn_counter(&mut self) {
        self.pieces_placed_this_turn = 0;
    }

    pub fn pass_turn(&mut self) {
        self.current_turn = self.current_turn.opponent();
    }

    /// One step up, down, left or right onto an empty cell, with a piece the
    /// mover owns, outside the setup phase.
    pub fn is_valid_move(
        &self,
        from_row: i32,
        from_col: i32,
        to_row: i32,
        to_col: i32,
        player: Player,
    ) -> bool {
        if self.is_setup_phase() {
            return false;
        }
        if self.board.get(from_row, from_col) != Some(Owner::from(player)) {
            return false;
        }
        if self.board.get(to_row, to_col) != Some(Owner::Empty) {
            return false;
        }
        (from_row - to_row).abs() + (from_col - to_col).abs() == 1
    }

    pub fn has_valid_moves(&self, player: Player) -> bool {
        const STEPS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

        self.board.pieces(player).any(|(row, col)| {
            STEPS
                .iter()
                .any(|(dr, dc)| self.is_valid_move(row, col, row + dr, col + dc, player))
        })
    }

    /// Moves a piece and removes whatever it captures. Callers validate with
    /// [`GameState::is_valid_move`] first. Returns the captured cells.
    pub fn apply_move(
        &mut self,
        from_row: i32,
        from_col: i32,
        to_row: i32,
        to_col: i32,
        player: Player,
    ) -> Vec<(i32, i32)> {
        self.board.move_piece(from_row, from_col, to_row, to_col);
        let captured = self.board.check_captures(to_row, to_col, player);
        for (row, col) in &captured {
            self.board.remove_piece(*row, *col);
        }
        captured
    }

    /// Win condition from `player`'s point of view, evaluated fresh each
    /// call. Only meaningful once the game is in the `Play` phase.
    pub fn defeat_of(&self, player: Player) -> Option<Defeat> {
        if self.is_setup_phase() {
            return None;
        }
        if self.board.count(player) == 0 {
            Some(Defeat::NoPieces)
        } else if !self.has_valid_moves(player) {
            Some(Defeat::NoMoves)
        } else {
            None
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
