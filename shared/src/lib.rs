//! Types and rules shared by the Seega server and client.
//!
//! Both sides link this crate so that placement, movement and capture are
//! decided by the very same code. Only move coordinates travel over the
//! wire; each side derives captures and phase changes locally.

pub mod board;
pub mod protocol;
pub mod rules;

pub use board::{Board, Owner, Player};
pub use protocol::{Command, Message, Move, ProtocolError};
pub use rules::{Defeat, GamePhase, GameState};

pub const BOARD_SIZE: usize = 5;
pub const PIECES_PER_PLAYER: u8 = 12;
pub const PIECES_PER_TURN: u8 = 2;
pub const DEFAULT_PORT: u16 = 12345;

/// Wire texts shown to players.
pub mod notices {
    pub const SERVER_FULL: &str = "Servidor cheio";
    pub const NOT_YOUR_TURN: &str = "Não é sua vez";
    pub const WAITING_FOR_OPPONENT: &str = "Aguardando oponente";
    pub const INVALID_PLACEMENT: &str = "Colocação inválida";
    pub const INVALID_MOVE: &str = "Movimento inválido";
    pub const MALFORMED_MOVE: &str = "Dados de movimento inválidos";
    pub const OPPONENT_DISCONNECTED: &str = "Oponente desconectou";
    pub const YOU_SURRENDERED: &str = "Você desistiu, o seu oponente é o vencedor!";
    pub const OPPONENT_SURRENDERED: &str = "Seu oponente desistiu! Você é o vencedor!";
}
