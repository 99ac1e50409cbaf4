//! Line-based terminal front-end.
//!
//! Reads commands from stdin, turns them into intents for a running room
//! client, and prints the board whenever the view changes.

use crate::games::gomoku::{GameStatus, Intent, index_of};
use crate::session::GameView;
use crate::sync::ClientHandle;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, instrument};

/// A parsed console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Forward an intent to the client.
    Intent(Intent),
    /// Print the help text.
    Help,
    /// Leave the room.
    Quit,
}

/// Help text printed on `help`.
pub const HELP: &str = "\
Commands:
  h8        place a stone (column a-o, row 1-15)
  u, undo   take back the last stone
  r, reset  clear the board for everyone in the room
  q, quit   leave and clear the room
  help      show this text";

/// Parses one line of input.
pub fn parse_command(line: &str) -> Option<ConsoleCommand> {
    let line = line.trim().to_ascii_lowercase();
    match line.as_str() {
        "u" | "undo" => return Some(ConsoleCommand::Intent(Intent::Undo)),
        "r" | "reset" => return Some(ConsoleCommand::Intent(Intent::Reset)),
        "q" | "quit" | "exit" => return Some(ConsoleCommand::Quit),
        "?" | "h" | "help" => return Some(ConsoleCommand::Help),
        _ => {}
    }

    let mut chars = line.chars();
    let letter = chars.next()?;
    if !letter.is_ascii_lowercase() {
        return None;
    }
    let col = (letter as u8 - b'a') as usize;
    let row: usize = chars.as_str().parse().ok()?;
    let pos = index_of(col, row.checked_sub(1)?)?;
    Some(ConsoleCommand::Intent(Intent::Place(pos)))
}

/// Renders a view as the board plus a status line.
pub fn render(view: &GameView) -> String {
    let status = match view.status {
        GameStatus::Won(winner) => format!("{} wins!", winner),
        GameStatus::Empty | GameStatus::InProgress => {
            format!("{} to move ({} stones)", view.turn, view.history.len())
        }
    };
    format!(
        "\nRoom {}\n{}\n{}",
        view.room,
        view.board.display(&view.winning_line),
        status
    )
}

/// Runs the console until stdin closes or the player quits.
///
/// Leaving either way quits the room, which deletes its document.
#[instrument(skip(handle))]
pub async fn run(handle: ClientHandle) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut views = handle.views();

    println!("{}", render(&views.borrow_and_update()));
    println!("Type `help` for commands.");

    loop {
        tokio::select! {
            changed = views.changed() => {
                if changed.is_err() {
                    break;
                }
                println!("{}", render(&views.borrow_and_update()));
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_command(&line) {
                    Some(ConsoleCommand::Intent(intent)) => {
                        debug!(%intent, "Console intent");
                        if !handle.send(intent) {
                            break;
                        }
                    }
                    Some(ConsoleCommand::Help) => println!("{}", HELP),
                    Some(ConsoleCommand::Quit) => break,
                    None if line.trim().is_empty() => {}
                    None => println!("Unrecognized command {:?}. Type `help`.", line.trim()),
                }
            }
        }
    }

    handle.quit().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::RoomId;
    use crate::session::GameSession;

    #[test]
    fn test_parse_placements() {
        assert_eq!(
            parse_command("h8"),
            Some(ConsoleCommand::Intent(Intent::Place(112)))
        );
        assert_eq!(
            parse_command(" A1 "),
            Some(ConsoleCommand::Intent(Intent::Place(0)))
        );
        assert_eq!(
            parse_command("o15"),
            Some(ConsoleCommand::Intent(Intent::Place(224)))
        );
        assert_eq!(parse_command("p1"), None);
        assert_eq!(parse_command("a0"), None);
        assert_eq!(parse_command("a16"), None);
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(parse_command("u"), Some(ConsoleCommand::Intent(Intent::Undo)));
        assert_eq!(parse_command("reset"), Some(ConsoleCommand::Intent(Intent::Reset)));
        assert_eq!(parse_command("q"), Some(ConsoleCommand::Quit));
        assert_eq!(parse_command("help"), Some(ConsoleCommand::Help));
        assert_eq!(parse_command(""), None);
    }

    #[test]
    fn test_render_reports_winner() {
        let mut session = GameSession::new(RoomId::DEFAULT);
        for pos in [0, 15, 1, 16, 2, 17, 3, 18, 4] {
            session.dispatch(Intent::Place(pos));
        }
        let text = render(&session.view());
        assert!(text.ends_with("Black wins!"));
        assert!(text.contains(" 1  X X X X X"));
    }
}
