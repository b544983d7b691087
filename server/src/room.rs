//! Room management: pairing two connections into one game and relaying
//! their traffic.
//!
//! This module holds the server's only mutable shared state:
//! - Which connection sits in which seat (first to arrive is PLAYER1)
//! - The lifecycle `Empty -> WaitingForSecond -> Active`, back to `Empty` on
//!   surrender, victory or any disconnect
//! - Turn ownership for incoming moves, via [`ServerGame`]
//!
//! The room never touches sockets. Each seat carries the sending half of that
//! connection's outgoing queue; dropping it on reset lets the writer task
//! flush whatever is queued and then close the stream.

use crate::game::{RuleViolation, ServerGame};
use log::{debug, info, warn};
use shared::{notices, Command, Defeat, GamePhase, Message, Player};
use std::net::SocketAddr;
use tokio::sync::mpsc;

/// Server-assigned identifier of one accepted TCP connection.
pub type ConnectionId = u32;

/// A connection occupying one of the two seats
#[derive(Debug)]
pub struct Seat {
    /// Connection this seat belongs to
    pub id: ConnectionId,
    /// Remote address, for logging
    pub addr: SocketAddr,
    /// Outgoing queue drained by the connection's writer task
    sender: mpsc::UnboundedSender<Message>,
}

impl Seat {
    pub fn new(id: ConnectionId, addr: SocketAddr, sender: mpsc::UnboundedSender<Message>) -> Self {
        Self { id, addr, sender }
    }

    /// Queues a message for this connection. A closed queue means the
    /// connection is already going away; its reader will report that.
    pub fn send(&self, message: Message) {
        if self.sender.send(message).is_err() {
            debug!("Connection {} is gone, dropping outgoing message", self.id);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomState {
    Empty,
    WaitingForSecond,
    Active,
}

/// The single game room hosted by a server process.
///
/// All methods are synchronous and expect to be called from one owner at a
/// time, which makes a turn check and the following turn flip atomic.
#[derive(Debug, Default)]
pub struct Room {
    first: Option<Seat>,
    second: Option<Seat>,
    game: ServerGame,
}

impl Room {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> RoomState {
        match (&self.first, &self.second) {
            (Some(_), Some(_)) => RoomState::Active,
            (None, None) => RoomState::Empty,
            _ => RoomState::WaitingForSecond,
        }
    }

    pub fn is_full(&self) -> bool {
        self.state() == RoomState::Active
    }

    pub fn current_turn(&self) -> Player {
        self.game.current_turn()
    }

    pub fn phase(&self) -> GamePhase {
        self.game.phase()
    }

    pub fn game(&self) -> &ServerGame {
        &self.game
    }

    /// Which seat a connection occupies, if any
    pub fn player_of(&self, id: ConnectionId) -> Option<Player> {
        if self.first.as_ref().is_some_and(|seat| seat.id == id) {
            Some(Player::One)
        } else if self.second.as_ref().is_some_and(|seat| seat.id == id) {
            Some(Player::Two)
        } else {
            None
        }
    }

    fn seat(&self, player: Player) -> Option<&Seat> {
        match player {
            Player::One => self.first.as_ref(),
            Player::Two => self.second.as_ref(),
        }
    }

    fn send_to(&self, player: Player, message: Message) {
        if let Some(seat) = self.seat(player) {
            seat.send(message);
        }
    }

    /// Seats a new connection.
    ///
    /// Returns the assigned role, or hands the seat back when the room is
    /// already running a game. Filling the second seat starts the game and
    /// tells each side its role.
    pub fn join(&mut self, seat: Seat) -> Result<Player, Seat> {
        if self.first.is_none() {
            info!("Connection {} from {} is PLAYER1", seat.id, seat.addr);
            self.first = Some(seat);
            return Ok(Player::One);
        }

        if self.second.is_some() {
            return Err(seat);
        }

        info!("Connection {} from {} is PLAYER2", seat.id, seat.addr);
        self.second = Some(seat);
        self.game = ServerGame::new();

        for player in [Player::One, Player::Two] {
            self.send_to(player, Message::game_start(player));
        }
        info!("Game started");

        Ok(Player::Two)
    }

    /// Dispatches one decoded message from a connection.
    pub fn handle_message(&mut self, id: ConnectionId, message: Message) {
        let Some(player) = self.player_of(id) else {
            debug!(
                "Ignoring {} from connection {} outside the room",
                message.command, id
            );
            return;
        };

        match message.command {
            Command::Move => self.handle_move(player, message.data),
            Command::Chat => {
                self.send_to(player.opponent(), message);
            }
            Command::Surrender => self.handle_surrender(player),
            Command::GameEnd => self.handle_game_end(player, &message.data),
            Command::Connect | Command::GameStart | Command::Error => {
                debug!("Ignoring {} from {}", message.command, player);
            }
        }
    }

    fn handle_move(&mut self, player: Player, data: String) {
        if !self.is_full() {
            self.reject(player, RuleViolation::GameNotActive);
            return;
        }

        match self.game.apply(player, &data) {
            Ok(mv) => {
                debug!("Relaying {} from {}", mv, player);
                self.send_to(player.opponent(), Message::new(Command::Move, data));
            }
            Err(violation) => self.reject(player, violation),
        }
    }

    fn reject(&self, player: Player, violation: RuleViolation) {
        warn!("Rejected MOVE from {}: {}", player, violation);
        self.send_to(player, Message::error(violation.to_string()));
    }

    fn handle_surrender(&mut self, player: Player) {
        info!("{} surrendered", player);
        self.send_to(player, Message::game_end(notices::YOU_SURRENDERED));
        self.send_to(
            player.opponent(),
            Message::game_end(notices::OPPONENT_SURRENDERED),
        );
        self.reset();
    }

    /// The sender has already shown its own victory; only the loser is told.
    fn handle_game_end(&mut self, winner: Player, reason: &str) {
        let defeat = Defeat::from_victory_code(reason);
        info!("{} won ({:?})", winner, defeat);
        self.send_to(winner.opponent(), Message::game_end(defeat.loss_notice()));
        self.reset();
    }

    /// Handles a connection going away for any reason.
    ///
    /// Returns false when the connection held no seat, e.g. a leftover socket
    /// from a game that already ended; those never disturb the current room.
    pub fn handle_disconnect(&mut self, id: ConnectionId) -> bool {
        let Some(player) = self.player_of(id) else {
            return false;
        };

        info!("{} (connection {}) disconnected", player, id);
        self.send_to(
            player.opponent(),
            Message::game_end(notices::OPPONENT_DISCONNECTED),
        );
        self.reset();
        true
    }

    /// Empties both seats and starts over from a fresh setup phase.
    pub fn reset(&mut self) {
        self.first = None;
        self.second = None;
        self.game = ServerGame::new();
        info!("Room reset, waiting for players");
    }
}
