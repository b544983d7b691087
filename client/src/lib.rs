//! # Seega Client Library
//!
//! Client side of two-player Seega over the line-based TCP protocol. The
//! server only seats players, checks turns and relays coordinates, so each
//! client keeps its own copy of the board and runs the shared rule engine on
//! it. Both copies see the same moves in the same order and stay identical.
//!
//! ## Module Organization
//!
//! ### Transport (`transport`)
//! The [`transport::Transport`] capability (connect, send, receive,
//! disconnect) and its TCP implementation, one `COMMAND|DATA` line per
//! message.
//!
//! ### Game (`game`)
//! The client-side mirror:
//! - validates local placements and moves before they are sent
//! - replays the opponent's relayed coordinates, captures included
//! - evaluates the win condition after every move
//! - exposes the status line shown to the player
//!
//! ### Network (`network`)
//! The event loop tying the transport, the mirror and the UI together. It
//! publishes [`network::ClientEvent`]s on a channel and takes
//! [`input::UserCommand`]s from another.
//!
//! ### Input and Rendering (`input`, `rendering`)
//! The terminal front end: command parsing and the text board.
//!
//! ## Usage Example
//!
//! ```no_run
//! use client::network::Client;
//! use client::transport::{TcpTransport, Transport};
//! use tokio::sync::mpsc;
//!
//! # async fn example() -> std::io::Result<()> {
//! let transport = TcpTransport::connect("127.0.0.1:12345").await?;
//! let (events_tx, mut events_rx) = mpsc::unbounded_channel();
//! let (commands_tx, commands_rx) = mpsc::unbounded_channel();
//!
//! tokio::spawn(async move {
//!     while let Some(event) = events_rx.recv().await {
//!         println!("{}", client::rendering::render_event(&event));
//!     }
//! });
//!
//! let mut client = Client::new(transport, events_tx);
//! client.run(commands_rx).await;
//! # drop(commands_tx);
//! # Ok(())
//! # }
//! ```

pub mod game;
pub mod input;
pub mod network;
pub mod rendering;
pub mod transport;
