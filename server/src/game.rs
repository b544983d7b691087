//! Server-side view of the game in progress.
//!
//! The server runs the same rule engine as the clients so that it can decide
//! whose turn it is during the two-pieces-per-turn setup phase and refuse
//! moves that no honest client would send. Captures are applied here too,
//! but never transmitted: clients derive them from the relayed coordinates.

use log::debug;
use shared::{notices, GamePhase, GameState, Move, Player};
use thiserror::Error;

/// Reasons a MOVE is refused. The display text is what goes back to the
/// sender in the `ERROR` reply.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RuleViolation {
    #[error("{}", notices::WAITING_FOR_OPPONENT)]
    GameNotActive,
    #[error("{}", notices::NOT_YOUR_TURN)]
    NotYourTurn,
    #[error("{}", notices::INVALID_PLACEMENT)]
    InvalidPlacement,
    #[error("{}", notices::INVALID_MOVE)]
    InvalidMove,
    #[error("{}", notices::MALFORMED_MOVE)]
    MalformedMove,
}

#[derive(Debug, Clone, Default)]
pub struct ServerGame {
    state: GameState,
}

impl ServerGame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn current_turn(&self) -> Player {
        self.state.current_turn
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Checks turn ownership, then legality, then applies the move.
    ///
    /// The turn check comes first and nothing is mutated on any error, so a
    /// rejected MOVE leaves `current_turn` exactly as it was.
    pub fn apply(&mut self, player: Player, data: &str) -> Result<Move, RuleViolation> {
        if player != self.state.current_turn {
            return Err(RuleViolation::NotYourTurn);
        }

        let mv: Move = data.parse().map_err(|_| RuleViolation::MalformedMove)?;

        match mv {
            Move::Place { row, col } => {
                if !self.state.place_piece(row, col, player) {
                    return Err(RuleViolation::InvalidPlacement);
                }
                if self.state.should_change_turn() {
                    self.state.reset_turn_counter();
                    self.state.pass_turn();
                }
                if !self.state.is_setup_phase() {
                    debug!("Setup complete, {} moves first", self.state.current_turn);
                }
            }
            Move::Step {
                from_row,
                from_col,
                to_row,
                to_col,
            } => {
                if !self
                    .state
                    .is_valid_move(from_row, from_col, to_row, to_col, player)
                {
                    return Err(RuleViolation::InvalidMove);
                }
                let captured = self
                    .state
                    .apply_move(from_row, from_col, to_row, to_col, player);
                if !captured.is_empty() {
                    debug!("{} captured {:?}", player, captured);
                }
                self.state.pass_turn();
            }
        }

        Ok(mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Owner;

    fn place(game: &mut ServerGame, player: Player, row: i32, col: i32) {
        let data = Move::Place { row, col }.to_string();
        assert_eq!(game.apply(player, &data), Ok(Move::Place { row, col }));
    }

    /// Plays the whole setup phase: row-major, skipping the centre.
    fn complete_setup(game: &mut ServerGame) {
        let cells: Vec<(i32, i32)> = (0..5)
            .flat_map(|r| (0..5).map(move |c| (r, c)))
            .filter(|&cell| cell != (2, 2))
            .collect();
        for (r, c) in cells {
            let player = game.current_turn();
            place(game, player, r, c);
        }
    }

    #[test]
    fn test_first_player_starts() {
        let game = ServerGame::new();
        assert_eq!(game.current_turn(), Player::One);
        assert_eq!(game.phase(), GamePhase::Setup);
    }

    #[test]
    fn test_out_of_turn_rejected_without_state_change() {
        let mut game = ServerGame::new();
        let before = game.state().clone();

        assert_eq!(
            game.apply(Player::Two, "-1,-1,0,0"),
            Err(RuleViolation::NotYourTurn)
        );
        assert_eq!(game.state(), &before);
        assert_eq!(game.current_turn(), Player::One);
    }

    #[test]
    fn test_turn_flips_after_two_placements() {
        let mut game = ServerGame::new();
        place(&mut game, Player::One, 0, 0);
        assert_eq!(game.current_turn(), Player::One);
        place(&mut game, Player::One, 0, 1);
        assert_eq!(game.current_turn(), Player::Two);
        assert_eq!(
            game.apply(Player::One, "-1,-1,0,2"),
            Err(RuleViolation::NotYourTurn)
        );
    }

    #[test]
    fn test_setup_completes_with_first_player_to_move() {
        let mut game = ServerGame::new();
        complete_setup(&mut game);

        assert_eq!(game.phase(), GamePhase::Play);
        assert_eq!(game.current_turn(), Player::One);
        assert_eq!(game.state().board.count(Player::One), 12);
        assert_eq!(game.state().board.count(Player::Two), 12);
    }

    #[test]
    fn test_invalid_placements() {
        let mut game = ServerGame::new();
        assert_eq!(
            game.apply(Player::One, "-1,-1,2,2"),
            Err(RuleViolation::InvalidPlacement)
        );
        place(&mut game, Player::One, 0, 0);
        assert_eq!(
            game.apply(Player::One, "-1,-1,0,0"),
            Err(RuleViolation::InvalidPlacement)
        );
        assert_eq!(game.state().pieces_placed_this_turn(), 1);
    }

    #[test]
    fn test_movement_during_setup_rejected() {
        let mut game = ServerGame::new();
        place(&mut game, Player::One, 1, 2);
        assert_eq!(
            game.apply(Player::One, "1,2,2,2"),
            Err(RuleViolation::InvalidMove)
        );
    }

    #[test]
    fn test_malformed_payload() {
        let mut game = ServerGame::new();
        assert_eq!(
            game.apply(Player::One, "not a move"),
            Err(RuleViolation::MalformedMove)
        );
        assert_eq!(game.current_turn(), Player::One);
    }

    #[test]
    fn test_movement_alternates_turns() {
        let mut game = ServerGame::new();
        complete_setup(&mut game);

        // Row-major pairs leave PLAYER1 at (2,3) next to the empty centre.
        assert_eq!(game.state().board.get(2, 3), Some(Owner::Player1));
        assert!(game.apply(Player::One, "2,3,2,2").is_ok());
        assert_eq!(game.current_turn(), Player::Two);
        assert_eq!(game.state().board.get(2, 2), Some(Owner::Player1));

        assert_eq!(
            game.apply(Player::One, "2,2,2,3"),
            Err(RuleViolation::NotYourTurn)
        );
    }

    #[test]
    fn test_placement_after_setup_rejected() {
        let mut game = ServerGame::new();
        complete_setup(&mut game);
        assert_eq!(
            game.apply(Player::One, "-1,-1,2,2"),
            Err(RuleViolation::InvalidPlacement)
        );
    }

    #[test]
    fn test_violation_messages() {
        assert_eq!(RuleViolation::NotYourTurn.to_string(), "Não é sua vez");
        assert_eq!(
            RuleViolation::GameNotActive.to_string(),
            "Aguardando oponente"
        );
    }
}
