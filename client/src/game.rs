//! Client-side mirror of the game.
//!
//! Each client runs the shared rule engine on its own copy of the board. Local
//! actions are validated and applied here before they are sent, and the
//! opponent's relayed coordinates are replayed through the same code, so both
//! mirrors reach the same captures, phase changes and turn order without any
//! of it crossing the wire.

use log::{debug, warn};
use shared::{notices, Defeat, GameState, Move, Player};
use thiserror::Error;

/// Why a local action was refused before anything was sent
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LocalMoveError {
    #[error("O jogo ainda não começou")]
    NotStarted,
    #[error("O jogo já terminou")]
    GameOver,
    #[error("{}", notices::NOT_YOUR_TURN)]
    NotYourTurn,
    #[error("{}", notices::INVALID_PLACEMENT)]
    IllegalPlacement,
    #[error("{}", notices::INVALID_MOVE)]
    IllegalMove,
}

/// Result of a local action that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalOutcome {
    /// Coordinates to send to the server
    pub mv: Move,
    pub captured: Vec<(i32, i32)>,
    /// Set when this action leaves the opponent beaten
    pub victory: Option<Defeat>,
}

/// Result of replaying the opponent's move
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteOutcome {
    pub captured: Vec<(i32, i32)>,
    /// Set when the opponent's move leaves us beaten
    pub defeat: Option<Defeat>,
}

#[derive(Debug, Clone)]
pub struct ClientGame {
    me: Player,
    state: GameState,
    finished: bool,
}

impl ClientGame {
    pub fn new(me: Player) -> Self {
        Self {
            me,
            state: GameState::new(),
            finished: false,
        }
    }

    /// Mirror resumed from a known position.
    #[cfg(test)]
    pub(crate) fn from_state(me: Player, state: GameState) -> Self {
        Self {
            me,
            state,
            finished: false,
        }
    }

    pub fn me(&self) -> Player {
        self.me
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_my_turn(&self) -> bool {
        !self.finished && self.state.current_turn == self.me
    }

    pub fn finish(&mut self) {
        self.finished = true;
    }

    fn ensure_my_turn(&self) -> Result<(), LocalMoveError> {
        if self.finished {
            Err(LocalMoveError::GameOver)
        } else if self.state.current_turn != self.me {
            Err(LocalMoveError::NotYourTurn)
        } else {
            Ok(())
        }
    }

    /// Hands the turn over once a setup turn's two placements are in.
    fn end_placement_turn_if_done(&mut self) -> bool {
        if self.state.should_change_turn() {
            self.state.reset_turn_counter();
            self.state.pass_turn();
            true
        } else {
            false
        }
    }

    pub fn place(&mut self, row: i32, col: i32) -> Result<LocalOutcome, LocalMoveError> {
        self.ensure_my_turn()?;
        if !self.state.place_piece(row, col, self.me) {
            return Err(LocalMoveError::IllegalPlacement);
        }
        if self.end_placement_turn_if_done() {
            debug!("Placement turn over");
        }

        // The last placement of the setup can already leave the opponent
        // without a legal first move.
        let victory = self.state.defeat_of(self.me.opponent());
        if victory.is_some() {
            self.finished = true;
        }

        Ok(LocalOutcome {
            mv: Move::Place { row, col },
            captured: Vec::new(),
            victory,
        })
    }

    pub fn step(
        &mut self,
        from_row: i32,
        from_col: i32,
        to_row: i32,
        to_col: i32,
    ) -> Result<LocalOutcome, LocalMoveError> {
        self.ensure_my_turn()?;
        if !self
            .state
            .is_valid_move(from_row, from_col, to_row, to_col, self.me)
        {
            return Err(LocalMoveError::IllegalMove);
        }

        let captured = self
            .state
            .apply_move(from_row, from_col, to_row, to_col, self.me);
        self.state.pass_turn();

        let victory = self.state.defeat_of(self.me.opponent());
        if victory.is_some() {
            self.finished = true;
        }

        Ok(LocalOutcome {
            mv: Move::Step {
                from_row,
                from_col,
                to_row,
                to_col,
            },
            captured,
            victory,
        })
    }

    /// Replays a move the server relayed from the opponent.
    ///
    /// The server only relays moves it accepted, so a refusal here means the
    /// two mirrors have drifted apart; it is reported rather than forced.
    pub fn apply_remote(&mut self, mv: Move) -> Result<RemoteOutcome, LocalMoveError> {
        let opponent = self.me.opponent();
        if self.state.current_turn != opponent {
            warn!("Received a move from {} out of turn", opponent);
        }

        let captured = match mv {
            Move::Place { row, col } => {
                if !self.state.place_piece(row, col, opponent) {
                    return Err(LocalMoveError::IllegalPlacement);
                }
                self.end_placement_turn_if_done();
                Vec::new()
            }
            Move::Step {
                from_row,
                from_col,
                to_row,
                to_col,
            } => {
                if !self
                    .state
                    .is_valid_move(from_row, from_col, to_row, to_col, opponent)
                {
                    return Err(LocalMoveError::IllegalMove);
                }
                let captured = self
                    .state
                    .apply_move(from_row, from_col, to_row, to_col, opponent);
                self.state.pass_turn();
                captured
            }
        };

        Ok(RemoteOutcome {
            captured,
            defeat: self.state.defeat_of(self.me),
        })
    }

    pub fn pieces_remaining_this_turn(&self) -> u8 {
        self.state.pieces_remaining_this_turn()
    }

    /// One-line status for the UI
    pub fn status(&self) -> String {
        if self.finished {
            "Fim de jogo".to_string()
        } else if self.state.is_setup_phase() {
            if self.is_my_turn() {
                format!(
                    "Fase de preparação - Coloque {} peça(s)",
                    self.pieces_remaining_this_turn()
                )
            } else {
                "Fase de preparação - Aguardando oponente".to_string()
            }
        } else if self.is_my_turn() {
            "Sua vez".to_string()
        } else {
            "Aguardando oponente...".to_string()
        }
    }
}

/// Setup order where PLAYER2 ends up holding every cell around the
/// empty centre, so PLAYER1 opens the movement phase with no legal move.
#[cfg(test)]
pub(crate) fn blockading_setup() -> Vec<(Player, i32, i32)> {
    let p1 = [
        (1, 4), (2, 0), (2, 4), (3, 0), (3, 1), (3, 3),
        (3, 4), (4, 0), (4, 1), (4, 2), (4, 3), (4, 4),
    ];
    let p2 = [
        (0, 0), (0, 1), (0, 2), (0, 3), (0, 4), (1, 0),
        (1, 1), (1, 3), (1, 2), (2, 1), (2, 3), (3, 2),
    ];

    p1.chunks(2)
        .zip(p2.chunks(2))
        .flat_map(|(a, b)| {
            a.iter()
                .map(|&(r, c)| (Player::One, r, c))
                .chain(b.iter().map(|&(r, c)| (Player::Two, r, c)))
        })
        .collect()
}
