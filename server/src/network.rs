//! Server network layer: TCP accept loop, per-connection tasks and the
//! single loop that owns the room

use crate::room::{ConnectionId, Room, Seat};
use log::{debug, error, info, warn};
use shared::{notices, Message};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

/// Messages sent from connection tasks to the main server loop
#[derive(Debug)]
pub enum ServerMessage {
    MessageReceived {
        id: ConnectionId,
        message: Message,
    },
    ConnectionClosed {
        id: ConnectionId,
    },
}

/// Reports the end of a connection's reader task however it exits,
/// including by panic or cancellation.
struct ConnectionGuard {
    id: ConnectionId,
    server_tx: mpsc::UnboundedSender<ServerMessage>,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        let _ = self
            .server_tx
            .send(ServerMessage::ConnectionClosed { id: self.id });
    }
}

/// Seega game server hosting one room at a time
pub struct Server {
    listener: TcpListener,
    room: Room,
    next_connection_id: ConnectionId,

    server_tx: mpsc::UnboundedSender<ServerMessage>,
    server_rx: mpsc::UnboundedReceiver<ServerMessage>,
}

impl Server {
    /// Binds the listening socket. Failing here is fatal for the process.
    pub async fn bind(addr: &str) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!("Server listening on {}", listener.local_addr()?);

        let (server_tx, server_rx) = mpsc::unbounded_channel();

        Ok(Server {
            listener,
            room: Room::new(),
            next_connection_id: 1,
            server_tx,
            server_rx,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    /// Ids only need to differ between the two seats, so they wrap around.
    fn allocate_connection_id(&mut self) -> ConnectionId {
        let id = self.next_connection_id;
        self.next_connection_id = self.next_connection_id.wrapping_add(1);
        id
    }

    /// Seats a fresh connection, or tells it the server is full and lets it go
    /// without spawning any task for it.
    async fn accept_connection(&mut self, stream: TcpStream, addr: SocketAddr) {
        let id = self.allocate_connection_id();

        let (read_half, mut write_half) = stream.into_split();
        let (tx, rx) = mpsc::unbounded_channel();

        match self.room.join(Seat::new(id, addr, tx)) {
            Ok(player) => {
                debug!("Connection {} seated as {}", id, player);
                Self::spawn_writer(id, write_half, rx);
                self.spawn_reader(id, read_half);
            }
            Err(_) => {
                warn!("Refusing connection {} from {}: room is full", id, addr);
                let line = format!("{}\n", Message::error(notices::SERVER_FULL));
                if let Err(e) = write_half.write_all(line.as_bytes()).await {
                    debug!("Failed to notify refused connection {}: {}", id, e);
                }
                let _ = write_half.shutdown().await;
            }
        }
    }

    /// Spawns the task reading lines from one connection until it closes
    fn spawn_reader(&self, id: ConnectionId, read_half: OwnedReadHalf) {
        let server_tx = self.server_tx.clone();

        tokio::spawn(async move {
            let _guard = ConnectionGuard {
                id,
                server_tx: server_tx.clone(),
            };
            let mut lines = BufReader::new(read_half).lines();

            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if line.is_empty() {
                            continue;
                        }
                        match Message::decode(&line) {
                            Ok(message) => {
                                if server_tx
                                    .send(ServerMessage::MessageReceived { id, message })
                                    .is_err()
                                {
                                    break;
                                }
                            }
                            Err(e) => warn!("Ignoring line from connection {}: {}", id, e),
                        }
                    }
                    Ok(None) => {
                        debug!("Connection {} closed by peer", id);
                        break;
                    }
                    Err(e) => {
                        warn!("Error reading from connection {}: {}", id, e);
                        break;
                    }
                }
            }
        });
    }

    /// Spawns the task writing queued messages to one connection, in order.
    /// When the queue is closed the stream's write side is shut down.
    fn spawn_writer(
        id: ConnectionId,
        mut write_half: OwnedWriteHalf,
        mut rx: mpsc::UnboundedReceiver<Message>,
    ) {
        tokio::spawn(async move {
            while let Some(message) = rx.recv().await {
                let mut line = message.encode();
                line.push('\n');
                if let Err(e) = write_half.write_all(line.as_bytes()).await {
                    warn!("Failed to send to connection {}: {}", id, e);
                    break;
                }
            }
            let _ = write_half.shutdown().await;
            debug!("Writer for connection {} finished", id);
        });
    }

    fn handle_server_message(&mut self, message: ServerMessage) {
        match message {
            ServerMessage::MessageReceived { id, message } => {
                debug!("Connection {}: {}", id, message);
                self.room.handle_message(id, message);
            }
            ServerMessage::ConnectionClosed { id } => {
                if !self.room.handle_disconnect(id) {
                    debug!("Connection {} closed outside the room", id);
                }
            }
        }
    }

    /// Main server loop: accepts connections and applies room events one at
    /// a time
    pub async fn run(&mut self) -> std::io::Result<()> {
        info!("Server started successfully");

        loop {
            tokio::select! {
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((stream, addr)) => {
                            info!("Accepted connection from {}", addr);
                            self.accept_connection(stream, addr).await;
                        }
                        Err(e) => {
                            error!("Error accepting connection: {}", e);
                            tokio::time::sleep(Duration::from_millis(10)).await;
                        }
                    }
                },

                message = self.server_rx.recv() => {
                    match message {
                        Some(message) => self.handle_server_message(message),
                        None => {
                            info!("Server shutting down");
                            break;
                        }
                    }
                },
            }
        }

        Ok(())
    }
}
