//! Terminal input parsing

use thiserror::Error;

/// Something the local player asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    Place {
        row: i32,
        col: i32,
    },
    Move {
        from_row: i32,
        from_col: i32,
        to_row: i32,
        to_col: i32,
    },
    Chat(String),
    Surrender,
    Quit,
}

/// One parsed line of terminal input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputLine {
    Command(UserCommand),
    Help,
    Blank,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Comando desconhecido: {0}")]
    UnknownCommand(String),
    #[error("Uso: {0}")]
    Usage(&'static str),
}

pub const HELP: &str = "\
Comandos:
  place <linha> <coluna>                 coloca uma peça (fase de preparação)
  move <linha> <coluna> <linha> <coluna> move uma peça uma casa
  chat <mensagem>                        envia uma mensagem ao oponente
  surrender                              desiste da partida
  quit                                   sai do jogo
  help                                   mostra esta ajuda";

const PLACE_USAGE: &str = "place <linha> <coluna>";
const MOVE_USAGE: &str = "move <linha> <coluna> <linha> <coluna>";
const CHAT_USAGE: &str = "chat <mensagem>";

fn coordinates<const N: usize>(
    args: &str,
    usage: &'static str,
) -> Result<[i32; N], InputError> {
    let parts: Vec<&str> = args
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .collect();
    if parts.len() != N {
        return Err(InputError::Usage(usage));
    }

    let mut values = [0; N];
    for (value, part) in values.iter_mut().zip(parts) {
        *value = part.parse().map_err(|_| InputError::Usage(usage))?;
    }
    Ok(values)
}

/// Parses a line typed by the player. Coordinates may be separated by spaces
/// or commas.
pub fn parse_line(line: &str) -> Result<InputLine, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(InputLine::Blank);
    }

    let (word, args) = match line.split_once(char::is_whitespace) {
        Some((word, args)) => (word, args.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "place" | "p" => {
            let [row, col] = coordinates::<2>(args, PLACE_USAGE)?;
            UserCommand::Place { row, col }
        }
        "move" | "m" => {
            let [from_row, from_col, to_row, to_col] = coordinates::<4>(args, MOVE_USAGE)?;
            UserCommand::Move {
                from_row,
                from_col,
                to_row,
                to_col,
            }
        }
        "chat" | "say" => {
            if args.is_empty() {
                return Err(InputError::Usage(CHAT_USAGE));
            }
            UserCommand::Chat(args.to_string())
        }
        "surrender" => UserCommand::Surrender,
        "quit" | "exit" => UserCommand::Quit,
        "help" | "?" => return Ok(InputLine::Help),
        other => return Err(InputError::UnknownCommand(other.to_string())),
    };

    Ok(InputLine::Command(command))
}
