//! Client event loop: relays between the transport, the local mirror and
//! whatever UI listens on the event channel.

use crate::game::{ClientGame, LocalMoveError, LocalOutcome};
use crate::input::UserCommand;
use crate::transport::Transport;
use log::{debug, error, info, warn};
use shared::{notices, Command, GameState, Message, Move, Player};
use std::io;
use tokio::sync::mpsc;

/// Everything the UI needs to know about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    GameStarted {
        role: Player,
    },
    BoardUpdated {
        state: GameState,
        me: Player,
        status: String,
    },
    ChatReceived(String),
    Notice(String),
    Error(String),
    GameOver(String),
    Disconnected,
}

/// Whether the loop keeps going after handling something
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

pub struct Client<T: Transport> {
    transport: T,
    game: Option<ClientGame>,
    events: mpsc::UnboundedSender<ClientEvent>,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T, events: mpsc::UnboundedSender<ClientEvent>) -> Self {
        Self {
            transport,
            game: None,
            events,
        }
    }

    pub fn game(&self) -> Option<&ClientGame> {
        self.game.as_ref()
    }

    fn emit(&self, event: ClientEvent) {
        if self.events.send(event).is_err() {
            debug!("No one is listening for client events");
        }
    }

    fn emit_board(&self) {
        if let Some(game) = &self.game {
            self.emit(ClientEvent::BoardUpdated {
                state: game.state().clone(),
                me: game.me(),
                status: game.status(),
            });
        }
    }

    pub async fn handle_server_message(&mut self, message: Message) -> Flow {
        match message.command {
            Command::GameStart => match Player::from_role(&message.data) {
                Some(role) => {
                    info!("Game started as {}", role);
                    self.game = Some(ClientGame::new(role));
                    self.emit(ClientEvent::GameStarted { role });
                    self.emit_board();
                }
                None => warn!("GAME_START with unknown role: {:?}", message.data),
            },

            Command::Move => self.handle_remote_move(&message.data),

            Command::Chat => self.emit(ClientEvent::ChatReceived(message.data)),

            Command::GameEnd => {
                info!("Game over: {}", message.data);
                if let Some(game) = &mut self.game {
                    game.finish();
                }
                self.emit(ClientEvent::GameOver(message.data));
                return Flow::Stop;
            }

            Command::Error => {
                warn!("Server error: {}", message.data);
                self.emit(ClientEvent::Error(message.data));
            }

            Command::Connect | Command::Surrender => {
                debug!("Ignoring {} from server", message.command);
            }
        }

        Flow::Continue
    }

    fn handle_remote_move(&mut self, data: &str) {
        let mv: Move = match data.parse() {
            Ok(mv) => mv,
            Err(e) => {
                warn!("Ignoring relayed move: {}", e);
                return;
            }
        };
        let Some(game) = self.game.as_mut() else {
            warn!("Move received before the game started");
            return;
        };

        match game.apply_remote(mv) {
            Ok(outcome) => {
                if let Some(defeat) = outcome.defeat {
                    // The winner announces the result through the server.
                    debug!("Mirror reports defeat: {:?}", defeat);
                    game.finish();
                }
                let notice = match mv {
                    Move::Place { row, col } => {
                        format!("Oponente colocou peça em ({}, {})", row, col)
                    }
                    Move::Step {
                        from_row,
                        from_col,
                        to_row,
                        to_col,
                    } => format!(
                        "Movimento do oponente: ({}, {}) -> ({}, {})",
                        from_row, from_col, to_row, to_col
                    ),
                };
                self.emit(ClientEvent::Notice(notice));
                for (row, col) in outcome.captured {
                    self.emit(ClientEvent::Notice(format!(
                        "Peça capturada em ({}, {})",
                        row, col
                    )));
                }
                self.emit_board();
            }
            Err(e) => {
                error!("Relayed move {} does not fit the local board: {}", mv, e);
                self.emit(ClientEvent::Error(e.to_string()));
            }
        }
    }

    /// Applies a local action to the mirror and sends it on once it passes.
    async fn play(
        &mut self,
        action: impl FnOnce(&mut ClientGame) -> Result<LocalOutcome, LocalMoveError>,
    ) -> io::Result<Flow> {
        let outcome = match self.game.as_mut() {
            Some(game) => action(game),
            None => Err(LocalMoveError::NotStarted),
        };
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                self.emit(ClientEvent::Error(e.to_string()));
                return Ok(Flow::Continue);
            }
        };

        self.transport.send(&Message::movement(&outcome.mv)).await?;
        for (row, col) in &outcome.captured {
            self.emit(ClientEvent::Notice(format!(
                "Peça capturada em ({}, {})",
                row, col
            )));
        }
        self.emit_board();

        if let Some(defeat) = outcome.victory {
            info!("Victory: {}", defeat.victory_code());
            self.transport
                .send(&Message::game_end(defeat.victory_code()))
                .await?;
            self.emit(ClientEvent::GameOver(defeat.victory_notice().to_string()));
            return Ok(Flow::Stop);
        }

        Ok(Flow::Continue)
    }

    pub async fn handle_user_command(&mut self, command: UserCommand) -> io::Result<Flow> {
        match command {
            UserCommand::Place { row, col } => self.play(|game| game.place(row, col)).await,

            UserCommand::Move {
                from_row,
                from_col,
                to_row,
                to_col,
            } => {
                self.play(|game| game.step(from_row, from_col, to_row, to_col))
                    .await
            }

            UserCommand::Chat(text) => {
                if self.game.is_none() {
                    self.emit(ClientEvent::Error(LocalMoveError::NotStarted.to_string()));
                } else {
                    self.transport.send(&Message::chat(text)).await?;
                }
                Ok(Flow::Continue)
            }

            UserCommand::Surrender => {
                if let Some(game) = &mut self.game {
                    game.finish();
                }
                self.emit(ClientEvent::GameOver(notices::YOU_SURRENDERED.to_string()));
                self.transport.send(&Message::surrender()).await?;
                Ok(Flow::Stop)
            }

            UserCommand::Quit => Ok(Flow::Stop),
        }
    }

    /// Runs until the game ends, the player quits or the connection drops,
    /// then closes the transport.
    pub async fn run(&mut self, mut commands: mpsc::UnboundedReceiver<UserCommand>) {
        let mut commands_open = true;

        loop {
            tokio::select! {
                received = self.transport.recv() => {
                    match received {
                        Ok(Some(message)) => {
                            debug!("Received: {}", message);
                            if self.handle_server_message(message).await == Flow::Stop {
                                break;
                            }
                        }
                        Ok(None) => {
                            info!("Server closed the connection");
                            self.emit(ClientEvent::Disconnected);
                            break;
                        }
                        Err(e) => {
                            error!("Connection error: {}", e);
                            self.emit(ClientEvent::Error(format!("Conexão perdida: {}", e)));
                            self.emit(ClientEvent::Disconnected);
                            break;
                        }
                    }
                },

                command = commands.recv(), if commands_open => {
                    match command {
                        Some(command) => match self.handle_user_command(command).await {
                            Ok(Flow::Continue) => {}
                            Ok(Flow::Stop) => break,
                            Err(e) => {
                                error!("Failed to send: {}", e);
                                self.emit(ClientEvent::Error(format!("Conexão perdida: {}", e)));
                                self.emit(ClientEvent::Disconnected);
                                break;
                            }
                        },
                        None => {
                            debug!("Command source closed");
                            commands_open = false;
                        }
                    }
                },
            }
        }

        if let Err(e) = self.transport.disconnect().await {
            debug!("Error while disconnecting: {}", e);
        }
    }
}
