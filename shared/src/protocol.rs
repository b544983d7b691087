//! Line-delimited `COMMAND|DATA` wire protocol

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const SEPARATOR: char = '|';

/// Sentinel used in the `from` half of a MOVE payload for placements.
pub const PLACEMENT_SENTINEL: i32 = -1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("malformed move payload: {0}")]
    MalformedMove(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Connect,
    GameStart,
    Move,
    Chat,
    Surrender,
    GameEnd,
    Error,
}

impl Command {
    pub fn as_str(self) -> &'static str {
        match self {
            Command::Connect => "CONNECT",
            Command::GameStart => "GAME_START",
            Command::Move => "MOVE",
            Command::Chat => "CHAT",
            Command::Surrender => "SURRENDER",
            Command::GameEnd => "GAME_END",
            Command::Error => "ERROR",
        }
    }
}

impl FromStr for Command {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CONNECT" => Ok(Command::Connect),
            "GAME_START" => Ok(Command::GameStart),
            "MOVE" => Ok(Command::Move),
            "CHAT" => Ok(Command::Chat),
            "SURRENDER" => Ok(Command::Surrender),
            "GAME_END" => Ok(Command::GameEnd),
            "ERROR" => Ok(Command::Error),
            other => Err(ProtocolError::UnknownCommand(other.to_string())),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One protocol line. `data` is always present, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub command: Command,
    pub data: String,
}

impl Message {
    pub fn new(command: Command, data: impl Into<String>) -> Self {
        Self {
            command,
            data: data.into(),
        }
    }

    pub fn game_start(role: crate::Player) -> Self {
        Self::new(Command::GameStart, role.role())
    }

    pub fn movement(mv: &Move) -> Self {
        Self::new(Command::Move, mv.to_string())
    }

    pub fn chat(text: impl Into<String>) -> Self {
        Self::new(Command::Chat, text)
    }

    pub fn surrender() -> Self {
        Self::new(Command::Surrender, "")
    }

    pub fn game_end(reason: impl Into<String>) -> Self {
        Self::new(Command::GameEnd, reason)
    }

    pub fn error(reason: impl Into<String>) -> Self {
        Self::new(Command::Error, reason)
    }

    /// Encodes without the trailing newline; writers append it.
    pub fn encode(&self) -> String {
        format!("{}{}{}", self.command, SEPARATOR, self.data)
    }

    /// Splits on the first separator only. A line with no separator is a
    /// bare command with empty data; line terminators are stripped.
    pub fn decode(line: &str) -> Result<Message, ProtocolError> {
        let line = line.trim_end_matches(&['\r', '\n'][..]);
        let (command, data) = line.split_once(SEPARATOR).unwrap_or((line, ""));

        Ok(Message {
            command: command.parse()?,
            data: data.to_string(),
        })
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Decoded MOVE payload: `fromRow,fromCol,toRow,toCol`, with placements
/// carrying `-1,-1` as the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Place {
        row: i32,
        col: i32,
    },
    Step {
        from_row: i32,
        from_col: i32,
        to_row: i32,
        to_col: i32,
    },
}

impl Move {
    pub fn destination(&self) -> (i32, i32) {
        match *self {
            Move::Place { row, col } => (row, col),
            Move::Step { to_row, to_col, .. } => (to_row, to_col),
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Move::Place { row, col } => write!(
                f,
                "{},{},{},{}",
                PLACEMENT_SENTINEL, PLACEMENT_SENTINEL, row, col
            ),
            Move::Step {
                from_row,
                from_col,
                to_row,
                to_col,
            } => write!(f, "{},{},{},{}", from_row, from_col, to_row, to_col),
        }
    }
}

impl FromStr for Move {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ProtocolError::MalformedMove(s.to_string());

        let values = s
            .split(',')
            .map(|part| part.trim().parse::<i32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| malformed())?;

        match values.as_slice() {
            [PLACEMENT_SENTINEL, PLACEMENT_SENTINEL, row, col] => Ok(Move::Place {
                row: *row,
                col: *col,
            }),
            [from_row, from_col, to_row, to_col] => Ok(Move::Step {
                from_row: *from_row,
                from_col: *from_col,
                to_row: *to_row,
                to_col: *to_col,
            }),
            _ => Err(malformed()),
        }
    }
}
