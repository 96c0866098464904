//! Line-oriented console over a game session.
//!
//! Reads one command per line and writes the engine's messages back. Works
//! on any async reader/writer pair so tests can drive it from byte buffers.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::config::AppConfig;
use crate::engine::{ChessError, Move, Position};
use crate::session::{GameHandle, SessionError};

const HELP: &str = "\
Commands:
  <from> <to>     move a piece, e.g. `e2 e4` or `e2e4`
  undo            take back the last move
  board           show the board
  moves [square]  list available moves, for one square if given
  history         list the moves played so far
  help            show this text
  quit            leave and print the game record";

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move { from: Position, to: Position },
    Undo,
    Board,
    Moves(Option<Position>),
    History,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command `{0}`, type `help` for a list")]
    Unknown(String),
    #[error(transparent)]
    Square(#[from] ChessError),
}

impl Command {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let cmd = match words.as_slice() {
            [] => return Ok(None),
            [w] if w.eq_ignore_ascii_case("undo") => Command::Undo,
            [w] if w.eq_ignore_ascii_case("board") => Command::Board,
            [w] if w.eq_ignore_ascii_case("history") => Command::History,
            [w] if w.eq_ignore_ascii_case("help") || *w == "?" => Command::Help,
            [w] if w.eq_ignore_ascii_case("quit") || w.eq_ignore_ascii_case("exit") => {
                Command::Quit
            }
            [w] if w.eq_ignore_ascii_case("moves") => Command::Moves(None),
            [w, sq] if w.eq_ignore_ascii_case("moves") => {
                Command::Moves(Some(Position::parse(sq)?))
            }
            [mv] if mv.len() == 4 && mv.is_ascii() => {
                let mv = Move::parse(mv)?;
                Command::Move {
                    from: mv.from,
                    to: mv.to,
                }
            }
            [from, to] if from.len() == 2 && to.len() == 2 => Command::Move {
                from: Position::parse(from)?,
                to: Position::parse(to)?,
            },
            _ => return Err(CommandError::Unknown(line.trim().to_string())),
        };
        Ok(Some(cmd))
    }
}

// ---------------------------------------------------------------------------
// Loop
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("failed to encode game record: {0}")]
    Record(#[from] serde_json::Error),
}

/// Drive `handle` from `reader` until `quit` or end of input.
pub async fn run<R, W>(
    handle: &GameHandle,
    config: &AppConfig,
    reader: R,
    writer: &mut W,
) -> Result<(), ConsoleError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    say(writer, "Type `help` for commands.").await?;
    if config.show_board {
        show_board(handle, writer).await?;
    }

    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let cmd = match Command::parse(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(err) => {
                say(writer, &err.to_string()).await?;
                continue;
            }
        };
        debug!(game_id = handle.game_id(), ?cmd, "console command");

        match cmd {
            Command::Quit => break,
            Command::Move { from, to } => {
                let accepted = played(handle.submit_move(from, to).await)?;
                flush_messages(handle, writer).await?;
                if accepted && config.show_board {
                    show_board(handle, writer).await?;
                }
            }
            Command::Undo => {
                let undone = played(handle.undo_last_move().await)?;
                flush_messages(handle, writer).await?;
                if undone && config.show_board {
                    show_board(handle, writer).await?;
                }
            }
            Command::Board => show_board(handle, writer).await?,
            Command::Moves(from) => {
                let moves = handle.legal_moves(from).await?;
                if moves.is_empty() {
                    say(writer, "No moves available.").await?;
                } else {
                    let list: Vec<String> = moves.iter().map(Move::to_string).collect();
                    say(writer, &list.join(" ")).await?;
                }
            }
            Command::History => {
                let history = handle.move_history().await?;
                if history.is_empty() {
                    say(writer, "No moves yet.").await?;
                }
                for (i, record) in history.iter().enumerate() {
                    say(writer, &format!("{}. {record} ({})", i + 1, record.moved_piece)).await?;
                }
            }
            Command::Help => say(writer, HELP).await?,
        }
    }

    if config.print_record {
        let record = handle.game_record().await?;
        say(writer, &record.to_json_pretty()?).await?;
    }
    writer.flush().await?;
    Ok(())
}

/// A rule rejection is reported through the message log, not as a failure.
fn played<T>(outcome: Result<T, SessionError>) -> Result<bool, SessionError> {
    match outcome {
        Ok(_) => Ok(true),
        Err(SessionError::Chess(_)) => Ok(false),
        Err(err) => Err(err),
    }
}

async fn flush_messages<W>(handle: &GameHandle, writer: &mut W) -> Result<(), ConsoleError>
where
    W: AsyncWrite + Unpin,
{
    for message in handle.drain_messages().await? {
        say(writer, &message).await?;
    }
    Ok(())
}

async fn show_board<W>(handle: &GameHandle, writer: &mut W) -> Result<(), ConsoleError>
where
    W: AsyncWrite + Unpin,
{
    let snapshot = handle.snapshot().await?;
    say(writer, &snapshot.board.board_string()).await?;
    say(writer, &format!("{} to move.", snapshot.side_to_move().name())).await?;
    Ok(())
}

async fn say<W>(writer: &mut W, text: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(text.as_bytes()).await?;
    writer.write_all(b"\n").await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::GameEngine;

    fn sq(s: &str) -> Position {
        Position::parse(s).unwrap()
    }

    fn quiet() -> AppConfig {
        AppConfig {
            show_board: false,
            print_record: false,
            ..AppConfig::default()
        }
    }

    async fn drive(input: &str, config: &AppConfig) -> String {
        let handle = GameHandle::spawn(GameEngine::new(), 8);
        let mut out = Vec::new();
        run(&handle, config, input.as_bytes(), &mut out)
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parse_move_forms() {
        let expected = Some(Command::Move {
            from: sq("e2"),
            to: sq("e4"),
        });
        assert_eq!(Command::parse("e2 e4").unwrap(), expected);
        assert_eq!(Command::parse("  e2e4 ").unwrap(), expected);
    }

    #[test]
    fn parse_keywords() {
        assert_eq!(Command::parse("UNDO").unwrap(), Some(Command::Undo));
        assert_eq!(Command::parse("board").unwrap(), Some(Command::Board));
        assert_eq!(Command::parse("moves").unwrap(), Some(Command::Moves(None)));
        assert_eq!(
            Command::parse("moves g1").unwrap(),
            Some(Command::Moves(Some(sq("g1"))))
        );
        assert_eq!(Command::parse("exit").unwrap(), Some(Command::Quit));
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            Command::parse("castle kingside"),
            Err(CommandError::Unknown(_))
        ));
        assert!(matches!(
            Command::parse("e9 e4"),
            Err(CommandError::Square(ChessError::OutOfBounds(_)))
        ));
        assert!(matches!(
            Command::parse("moves z1"),
            Err(CommandError::Square(_))
        ));
    }

    #[tokio::test]
    async fn plays_and_reports_moves() {
        let out = drive("e2 e4\ne7e5\nquit\n", &quiet()).await;
        assert!(out.contains("White pawn moved from e2 to e4."));
        assert!(out.contains("Black pawn moved from e7 to e5."));
    }

    #[tokio::test]
    async fn reports_rejections_and_keeps_going() {
        let out = drive("e7 e5\nb1 b3\ng1 f3\n", &quiet()).await;
        assert!(out.contains("It is white's turn"));
        assert!(out.contains("Illegal knight move: b1 -> b3"));
        assert!(out.contains("White knight moved from g1 to f3."));
    }

    #[tokio::test]
    async fn undo_and_history() {
        let out = drive("undo\nd2 d4\nhistory\nundo\nhistory\n", &quiet()).await;
        assert!(out.contains("No moves to undo"));
        assert!(out.contains("1. d2d4 (White pawn)"));
        assert!(out.contains("Undid White pawn d2d4."));
        assert!(out.contains("No moves yet."));
    }

    #[tokio::test]
    async fn lists_moves_for_a_square() {
        let out = drive("moves b1\nmoves e4\n", &quiet()).await;
        assert!(out.contains("b1a3 b1c3"));
        assert!(out.contains("No moves available."));
    }

    #[tokio::test]
    async fn shows_board_and_record_when_enabled() {
        let out = drive("e2e4\n", &AppConfig::default()).await;
        assert!(out.contains("8 r n b q k b n r"));
        assert!(out.contains("4 . . . . P . . ."));
        assert!(out.contains("Black to move."));
        assert!(out.contains("\"moves\""));
        assert!(out.contains("\"from\": \"e2\""));
    }

    #[tokio::test]
    async fn input_after_quit_is_ignored() {
        let out = drive("quit\ne2 e4\n", &quiet()).await;
        assert!(!out.contains("moved"));
    }
}
