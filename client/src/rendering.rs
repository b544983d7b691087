//! Text rendering of the board and client events for the terminal front end

use crate::network::ClientEvent;
use shared::{GamePhase, GameState, Owner, Player};
use std::fmt::Write;

/// Board grid followed by piece counts and the status line.
pub fn render_board(state: &GameState, me: Player, status: &str) -> String {
    let mut out = state.board.to_string();

    let mine = Owner::from(me).symbol();
    let theirs = Owner::from(me.opponent()).symbol();
    match state.phase {
        GamePhase::Setup => {
            let _ = writeln!(
                out,
                "Você: {} ({} a colocar)  Oponente: {} ({} a colocar)",
                mine,
                state.pieces_to_place(me),
                theirs,
                state.pieces_to_place(me.opponent())
            );
        }
        GamePhase::Play => {
            let _ = writeln!(
                out,
                "Você: {} ({} peças)  Oponente: {} ({} peças)",
                mine,
                state.board.count(me),
                theirs,
                state.board.count(me.opponent())
            );
        }
    }
    out.push_str(status);

    out
}

/// Text printed for one client event.
pub fn render_event(event: &ClientEvent) -> String {
    match event {
        ClientEvent::GameStarted { role } => format!(
            "Partida iniciada! Você é o {} ({})",
            match role {
                Player::One => "primeiro jogador",
                Player::Two => "segundo jogador",
            },
            Owner::from(*role).symbol()
        ),
        ClientEvent::BoardUpdated { state, me, status } => render_board(state, *me, status),
        ClientEvent::ChatReceived(text) => format!("[Oponente] {}", text),
        ClientEvent::Notice(text) => text.clone(),
        ClientEvent::Error(text) => format!("Erro: {}", text),
        ClientEvent::GameOver(text) => format!("*** {} ***", text),
        ClientEvent::Disconnected => "Desconectado do servidor".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty_board() {
        let state = GameState::new();
        let text = render_board(&state, Player::One, "Sua vez");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "   0 1 2 3 4");
        assert_eq!(lines[1], "0  . . . . .");
        assert_eq!(lines[5], "4  . . . . .");
        assert_eq!(
            lines[6],
            "Você: X (12 a colocar)  Oponente: O (12 a colocar)"
        );
        assert_eq!(lines[7], "Sua vez");
    }

    #[test]
    fn test_render_uses_board_grid() {
        let mut state = GameState::new();
        state.board.set(1, 3, Owner::Player1);
        state.board.set(3, 1, Owner::Player2);

        let text = render_board(&state, Player::One, "Sua vez");
        assert!(text.starts_with(&state.board.to_string()));
    }

    #[test]
    fn test_render_pieces_in_play() {
        let mut state = GameState::new();
        state.phase = GamePhase::Play;
        state.board.set(0, 0, Owner::Player1);
        state.board.set(2, 2, Owner::Player2);
        state.board.set(4, 4, Owner::Player2);

        let text = render_board(&state, Player::Two, "Aguardando oponente...");
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[1], "0  X . . . .");
        assert_eq!(lines[3], "2  . . O . .");
        assert_eq!(lines[6], "Você: O (2 peças)  Oponente: X (1 peças)");
    }

    #[test]
    fn test_render_events() {
        assert_eq!(
            render_event(&ClientEvent::ChatReceived("oi".to_string())),
            "[Oponente] oi"
        );
        assert_eq!(
            render_event(&ClientEvent::Error("Não é sua vez".to_string())),
            "Erro: Não é sua vez"
        );
        assert_eq!(
            render_event(&ClientEvent::GameStarted { role: Player::Two }),
            "Partida iniciada! Você é o segundo jogador (O)"
        );
    }
}
