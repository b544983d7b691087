//! Integration tests for the Seega server and client
//!
//! Every test runs a real server on an ephemeral loopback port and talks to it
//! over TCP, either with raw line-based sockets or with the library client.

use server::network::Server;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(2);

async fn start_server() -> SocketAddr {
    let mut server = Server::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = server.local_addr().unwrap();
    tokio::spawn(async move { server.run().await });
    addr
}

/// A player speaking the wire protocol by hand
struct RawPlayer {
    stream: BufReader<TcpStream>,
}

impl RawPlayer {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr)
            .await
            .expect("Failed to connect to test server");
        Self {
            stream: BufReader::new(stream),
        }
    }

    async fn send(&mut self, line: &str) {
        let line = format!("{}\n", line);
        self.stream.get_mut().write_all(line.as_bytes()).await.unwrap();
    }

    /// Next line from the server, or `None` at end of stream.
    async fn recv(&mut self) -> Option<String> {
        let mut line = String::new();
        let read = timeout(WAIT, self.stream.read_line(&mut line))
            .await
            .expect("Timed out waiting for the server")
            .unwrap();
        if read == 0 {
            None
        } else {
            Some(line.trim_end_matches(&['\r', '\n'][..]).to_string())
        }
    }
}

/// Connects two raw players and consumes their GAME_START lines.
async fn start_game(addr: SocketAddr) -> (RawPlayer, RawPlayer) {
    let mut first = RawPlayer::connect(addr).await;
    let mut second = RawPlayer::connect(addr).await;
    assert_eq!(first.recv().await.as_deref(), Some("GAME_START|FIRST"));
    assert_eq!(second.recv().await.as_deref(), Some("GAME_START|SECOND"));
    (first, second)
}

/// MATCHMAKING AND SESSION TESTS
mod session_tests {
    use super::*;

    /// Roles are handed out in connection order
    #[tokio::test]
    async fn roles_follow_connection_order() {
        let addr = start_server().await;
        start_game(addr).await;
    }

    /// A lone player's moves are refused until an opponent joins
    #[tokio::test]
    async fn first_player_waits_for_opponent() {
        let addr = start_server().await;
        let mut first = RawPlayer::connect(addr).await;

        first.send("MOVE|-1,-1,0,0").await;
        assert_eq!(
            first.recv().await.as_deref(),
            Some("ERROR|Aguardando oponente")
        );

        let mut second = RawPlayer::connect(addr).await;
        assert_eq!(first.recv().await.as_deref(), Some("GAME_START|FIRST"));
        assert_eq!(second.recv().await.as_deref(), Some("GAME_START|SECOND"));
    }

    /// The opponent of a dropped player gets exactly one GAME_END, then the
    /// room takes a fresh pair from the beginning
    #[tokio::test]
    async fn disconnect_ends_game_and_frees_room() {
        let addr = start_server().await;
        let (mut first, mut second) = start_game(addr).await;

        first.send("MOVE|-1,-1,0,0").await;
        assert_eq!(second.recv().await.as_deref(), Some("MOVE|-1,-1,0,0"));

        drop(first);
        assert_eq!(
            second.recv().await.as_deref(),
            Some("GAME_END|Oponente desconectou")
        );
        assert_eq!(second.recv().await, None);

        let (mut third, mut fourth) = start_game(addr).await;

        // Fresh game: setup again, PLAYER1 to place, (0,0) free.
        fourth.send("MOVE|-1,-1,0,0").await;
        assert_eq!(fourth.recv().await.as_deref(), Some("ERROR|Não é sua vez"));
        third.send("MOVE|-1,-1,0,0").await;
        assert_eq!(fourth.recv().await.as_deref(), Some("MOVE|-1,-1,0,0"));
    }

    /// Surrender notifies both sides with their own text and closes the game
    #[tokio::test]
    async fn surrender_notifies_both_players() {
        let addr = start_server().await;
        let (mut first, mut second) = start_game(addr).await;

        second.send("SURRENDER|").await;
        assert_eq!(
            second.recv().await.as_deref(),
            Some("GAME_END|Você desistiu, o seu oponente é o vencedor!")
        );
        assert_eq!(
            first.recv().await.as_deref(),
            Some("GAME_END|Seu oponente desistiu! Você é o vencedor!")
        );
        assert_eq!(first.recv().await, None);
        assert_eq!(second.recv().await, None);
    }

    /// A victory claim reaches the loser as a loss notice
    #[tokio::test]
    async fn victory_claim_reaches_loser() {
        let addr = start_server().await;
        let (mut first, mut second) = start_game(addr).await;

        first.send("GAME_END|VICTORY_NO_MOVES").await;
        assert_eq!(
            second.recv().await.as_deref(),
            Some("GAME_END|Você perdeu! Não há movimentos válidos disponíveis!")
        );
        assert_eq!(first.recv().await, None);
    }
}

/// RELAY AND TURN TESTS
mod relay_tests {
    use super::*;

    /// Out-of-turn moves are refused and never reach the opponent
    #[tokio::test]
    async fn out_of_turn_move_rejected_without_relay() {
        let addr = start_server().await;
        let (mut first, mut second) = start_game(addr).await;

        second.send("MOVE|-1,-1,0,0").await;
        assert_eq!(second.recv().await.as_deref(), Some("ERROR|Não é sua vez"));

        second.send("CHAT|desculpe").await;
        assert_eq!(first.recv().await.as_deref(), Some("CHAT|desculpe"));

        // A third placement in the same setup turn is out of turn as well.
        first.send("MOVE|-1,-1,0,0").await;
        first.send("MOVE|-1,-1,0,1").await;
        first.send("MOVE|-1,-1,0,2").await;
        assert_eq!(first.recv().await.as_deref(), Some("ERROR|Não é sua vez"));
        first.send("CHAT|pronto").await;

        assert_eq!(second.recv().await.as_deref(), Some("MOVE|-1,-1,0,0"));
        assert_eq!(second.recv().await.as_deref(), Some("MOVE|-1,-1,0,1"));
        assert_eq!(second.recv().await.as_deref(), Some("CHAT|pronto"));
    }

    /// Chat text is relayed verbatim, separators included
    #[tokio::test]
    async fn chat_relayed_verbatim() {
        let addr = start_server().await;
        let (mut first, mut second) = start_game(addr).await;

        first.send("CHAT|boa sorte | divirta-se").await;
        assert_eq!(
            second.recv().await.as_deref(),
            Some("CHAT|boa sorte | divirta-se")
        );
    }

    /// Twelve placements each, two per turn, then PLAYER1 moves first
    #[tokio::test]
    async fn full_setup_hands_first_move_to_player_one() {
        let addr = start_server().await;
        let (mut first, mut second) = start_game(addr).await;

        let cells: Vec<(i32, i32)> = (0..5)
            .flat_map(|r| (0..5).map(move |c| (r, c)))
            .filter(|&cell| cell != (2, 2))
            .collect();

        for (turn, pair) in cells.chunks(2).enumerate() {
            let (mover, watcher) = if turn % 2 == 0 {
                (&mut first, &mut second)
            } else {
                (&mut second, &mut first)
            };
            for (r, c) in pair {
                let line = format!("MOVE|-1,-1,{},{}", r, c);
                mover.send(&line).await;
                assert_eq!(watcher.recv().await.as_deref(), Some(line.as_str()));
            }
        }

        // PLAYER2 placed last, but the first move belongs to PLAYER1.
        second.send("MOVE|-1,-1,2,2").await;
        assert_eq!(second.recv().await.as_deref(), Some("ERROR|Não é sua vez"));

        first.send("MOVE|2,3,2,2").await;
        assert_eq!(second.recv().await.as_deref(), Some("MOVE|2,3,2,2"));

        first.send("MOVE|2,2,2,3").await;
        assert_eq!(first.recv().await.as_deref(), Some("ERROR|Não é sua vez"));
    }

    /// Illegal coordinates are refused with the rule's message
    #[tokio::test]
    async fn illegal_moves_rejected() {
        let addr = start_server().await;
        let (mut first, mut second) = start_game(addr).await;

        first.send("MOVE|-1,-1,2,2").await;
        assert_eq!(
            first.recv().await.as_deref(),
            Some("ERROR|Colocação inválida")
        );
        first.send("MOVE|não,é,um,movimento").await;
        assert_eq!(
            first.recv().await.as_deref(),
            Some("ERROR|Dados de movimento inválidos")
        );

        first.send("MOVE|-1,-1,0,0").await;
        assert_eq!(second.recv().await.as_deref(), Some("MOVE|-1,-1,0,0"));
    }
}

/// LIBRARY CLIENT TESTS
mod client_tests {
    use super::*;
    use client::input::UserCommand;
    use client::network::{Client, ClientEvent};
    use client::transport::{TcpTransport, Transport};
    use shared::Player;
    use tokio::sync::mpsc;
    use tokio_test::assert_ok;

    async fn next_matching(
        events: &mut mpsc::UnboundedReceiver<ClientEvent>,
        wanted: impl Fn(&ClientEvent) -> bool,
    ) -> ClientEvent {
        loop {
            let event = timeout(WAIT, events.recv())
                .await
                .expect("Timed out waiting for a client event")
                .expect("Client event channel closed");
            if wanted(&event) {
                return event;
            }
        }
    }

    /// The library client plays against a raw opponent through a real server
    #[tokio::test]
    async fn library_client_plays_through_server() {
        let addr = start_server().await;

        let transport = assert_ok!(TcpTransport::connect(&addr.to_string()).await);
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let mut client = Client::new(transport, events_tx);

        let script = async {
            let mut opponent = RawPlayer::connect(addr).await;
            assert_eq!(
                opponent.recv().await.as_deref(),
                Some("GAME_START|SECOND")
            );

            let started =
                next_matching(&mut events_rx, |e| matches!(e, ClientEvent::GameStarted { .. }))
                    .await;
            assert_eq!(started, ClientEvent::GameStarted { role: Player::One });

            commands_tx.send(UserCommand::Place { row: 0, col: 0 }).unwrap();
            commands_tx.send(UserCommand::Place { row: 0, col: 1 }).unwrap();
            assert_eq!(opponent.recv().await.as_deref(), Some("MOVE|-1,-1,0,0"));
            assert_eq!(opponent.recv().await.as_deref(), Some("MOVE|-1,-1,0,1"));

            opponent.send("MOVE|-1,-1,4,4").await;
            let notice =
                next_matching(&mut events_rx, |e| matches!(e, ClientEvent::Notice(_))).await;
            assert_eq!(
                notice,
                ClientEvent::Notice("Oponente colocou peça em (4, 4)".to_string())
            );

            opponent.send("CHAT|olá").await;
            let chat =
                next_matching(&mut events_rx, |e| matches!(e, ClientEvent::ChatReceived(_)))
                    .await;
            assert_eq!(chat, ClientEvent::ChatReceived("olá".to_string()));

            commands_tx.send(UserCommand::Surrender).unwrap();
            assert_eq!(
                opponent.recv().await.as_deref(),
                Some("GAME_END|Seu oponente desistiu! Você é o vencedor!")
            );

            let over =
                next_matching(&mut events_rx, |e| matches!(e, ClientEvent::GameOver(_))).await;
            assert_eq!(
                over,
                ClientEvent::GameOver("Você desistiu, o seu oponente é o vencedor!".to_string())
            );
        };

        let (run, ()) = tokio::join!(
            timeout(Duration::from_secs(5), client.run(commands_rx)),
            script
        );
        assert!(run.is_ok(), "Client did not stop after surrendering");

        let game = client.game().expect("Game should have started");
        assert_eq!(game.me(), Player::One);
        assert!(game.is_finished());
    }

    /// A third library client is told the server is full and sees the
    /// connection close
    #[tokio::test]
    async fn library_client_refused_when_full() {
        let addr = start_server().await;
        let (_first, _second) = start_game(addr).await;

        let transport = assert_ok!(TcpTransport::connect(&addr.to_string()).await);
        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let (_commands_tx, commands_rx) = mpsc::unbounded_channel();
        let mut client = Client::new(transport, events_tx);

        timeout(WAIT, client.run(commands_rx))
            .await
            .expect("Client did not stop");

        assert_eq!(
            events_rx.recv().await,
            Some(ClientEvent::Error("Servidor cheio".to_string()))
        );
        assert_eq!(events_rx.recv().await, Some(ClientEvent::Disconnected));
        assert!(client.game().is_none());
    }
}
