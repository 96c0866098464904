//! Integration tests for concurrent game sessions.
//!
//! Several callers share one game through cloned handles; the game task
//! must apply their moves one at a time.

use std::time::Duration;

use chess_referee::config::AppConfig;
use chess_referee::engine::{ChessError, Color, Position};
use chess_referee::session::{SessionError, SessionRegistry};

fn sq(s: &str) -> Position {
    Position::parse(s).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_white_moves_are_serialized() {
    let registry = SessionRegistry::new(&AppConfig::default());
    let game = registry.create().await;

    let a = game.clone();
    let b = game.clone();
    let (ra, rb) = tokio::join!(
        tokio::spawn(async move { a.submit_move(sq("e2"), sq("e4")).await }),
        tokio::spawn(async move { b.submit_move(sq("d2"), sq("d4")).await }),
    );
    let outcomes = [ra.unwrap(), rb.unwrap()];

    // Exactly one move lands; the other finds it is Black's turn.
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(outcomes.iter().any(|r| matches!(
        r,
        Err(SessionError::Chess(ChessError::WrongTurn {
            to_move: Color::Black,
            ..
        }))
    )));

    let history = game.move_history().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(game.snapshot().await.unwrap().side_to_move(), Color::Black);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn many_callers_one_game() {
    let registry = SessionRegistry::new(&AppConfig::default());
    let game = registry.create().await;

    // Every knight hop for both sides, fired at once. Whatever order the
    // task sees them in, the turn alternates and history stays consistent.
    let hops = [
        ("g1", "f3"),
        ("b1", "c3"),
        ("g8", "f6"),
        ("b8", "c6"),
        ("g1", "h3"),
        ("g8", "h6"),
    ];
    let mut tasks = Vec::new();
    for (from, to) in hops {
        let g = game.clone();
        tasks.push(tokio::spawn(async move { g.submit_move(sq(from), sq(to)).await }));
    }
    let mut accepted = 0;
    for t in tasks {
        if t.await.unwrap().is_ok() {
            accepted += 1;
        }
    }

    let history = game.move_history().await.unwrap();
    assert_eq!(history.len(), accepted);
    for (i, record) in history.iter().enumerate() {
        let expected = if i % 2 == 0 { Color::White } else { Color::Black };
        assert_eq!(record.color(), expected);
    }
    let snap = game.snapshot().await.unwrap();
    assert_eq!(snap.white_to_move, accepted % 2 == 0);
}

#[tokio::test]
async fn games_are_independent() {
    let registry = SessionRegistry::new(&AppConfig::default());
    let first = registry.create().await;
    let second = registry.create().await;

    first.submit_move(sq("e2"), sq("e4")).await.unwrap();
    second.submit_move(sq("d2"), sq("d4")).await.unwrap();
    second.submit_move(sq("d7"), sq("d5")).await.unwrap();

    assert_eq!(first.move_history().await.unwrap().len(), 1);
    assert_eq!(second.move_history().await.unwrap().len(), 2);
    assert_eq!(registry.active_games().await.len(), 2);
}

#[tokio::test]
async fn finish_hands_back_record() {
    let registry = SessionRegistry::new(&AppConfig::default());
    let game = registry.create().await;
    let id = game.game_id().to_string();
    for (from, to) in [("e2", "e4"), ("d7", "d5"), ("e4", "d5")] {
        game.submit_move(sq(from), sq(to)).await.unwrap();
    }

    let record = registry.finish(&id).await.unwrap();
    assert_eq!(record.moves_count(), 3);
    assert_eq!(record.captures_count(), 1);
    assert_eq!(record.captures[0].captured_piece, "bP");

    assert!(registry.is_empty().await);
    assert_eq!(
        registry.get(&id).await.unwrap_err(),
        SessionError::NotFound(id.clone())
    );
    assert_eq!(
        game.submit_move(sq("d8"), sq("d5")).await.unwrap_err(),
        SessionError::Closed(id)
    );
}

#[tokio::test]
async fn small_command_buffer_delivers_in_order() {
    let config = AppConfig {
        command_buffer: 1,
        ..AppConfig::default()
    };
    let registry = SessionRegistry::new(&config);
    let game = registry.create().await;
    for (from, to) in [("a2", "a3"), ("a7", "a6"), ("b2", "b3"), ("b7", "b6")] {
        tokio::time::timeout(Duration::from_secs(1), game.submit_move(sq(from), sq(to)))
            .await
            .expect("command stalled")
            .unwrap();
    }
    assert_eq!(game.move_history().await.unwrap().len(), 4);
}
