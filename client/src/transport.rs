//! Transport capability used by the client loop.
//!
//! The client only ever needs to connect, send a message, wait for the next
//! message and disconnect. [`TcpTransport`] is the line-per-message TCP
//! implementation; another transport can be dropped in behind the same
//! trait without touching the mirror or the event loop.

use async_trait::async_trait;
use log::{debug, warn};
use shared::Message;
use std::io;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

#[async_trait]
pub trait Transport: Send + Sized {
    async fn connect(addr: &str) -> io::Result<Self>;

    async fn send(&mut self, message: &Message) -> io::Result<()>;

    /// Next message from the server, or `None` once the server has closed
    /// the connection. Must be safe to cancel between messages.
    async fn recv(&mut self) -> io::Result<Option<Message>>;

    async fn disconnect(&mut self) -> io::Result<()>;
}

pub struct TcpTransport {
    lines: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,
}

impl TcpTransport {
    pub fn from_stream(stream: TcpStream) -> Self {
        let (read_half, writer) = stream.into_split();
        Self {
            lines: BufReader::new(read_half).lines(),
            writer,
        }
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn connect(addr: &str) -> io::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        debug!("Connected to {}", stream.peer_addr()?);
        Ok(Self::from_stream(stream))
    }

    async fn send(&mut self, message: &Message) -> io::Result<()> {
        let mut line = message.encode();
        line.push('\n');
        self.writer.write_all(line.as_bytes()).await
    }

    async fn recv(&mut self) -> io::Result<Option<Message>> {
        while let Some(line) = self.lines.next_line().await? {
            if line.is_empty() {
                continue;
            }
            match Message::decode(&line) {
                Ok(message) => return Ok(Some(message)),
                Err(e) => warn!("Ignoring line from server: {}", e),
            }
        }
        Ok(None)
    }

    async fn disconnect(&mut self) -> io::Result<()> {
        self.writer.shutdown().await
    }
}
