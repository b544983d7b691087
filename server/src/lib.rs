//! # Seega Game Server Library
//!
//! Authoritative server for two-player Seega over TCP. It pairs the first two
//! connections into a room, owns turn order, and relays moves, chat and
//! lifecycle events between the two players.
//!
//! ## Core Responsibilities
//!
//! ### Matchmaking
//! The first connection becomes PLAYER1 and waits; the second becomes
//! PLAYER2 and both receive `GAME_START` with their role. Any further
//! connection is answered with `ERROR|Servidor cheio` and dropped.
//!
//! ### Turn Gatekeeping
//! A MOVE is only relayed when it comes from the player whose turn it is and
//! the shared rule engine accepts it. The server keeps its own copy of the
//! board for this, so it knows when the setup phase's two-placements-per-turn
//! rhythm hands the turn over.
//!
//! ### Session Teardown
//! Surrender, a victory notice or either side disconnecting ends the game:
//! the other side is told why, both connections are closed and the room is
//! ready for the next pair.
//!
//! ## Module Organization
//!
//! ### Room Module (`room`)
//! Seat assignment, room lifecycle, relay and teardown. Pure state, no I/O.
//!
//! ### Game Module (`game`)
//! Turn and phase bookkeeping over the shared rule engine.
//!
//! ### Network Module (`network`)
//! TCP listener, per-connection reader and writer tasks, and the loop that
//! owns the room and applies events to it one at a time.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut server = Server::bind("0.0.0.0:12345").await?;
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod game;
pub mod network;
pub mod room;
