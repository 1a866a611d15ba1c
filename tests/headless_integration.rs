use std::sync::mpsc::{self, Sender};
use std::time::{Duration, SystemTime};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tempfile::tempdir;

use vedaquiz::leaderboard::{FileLeaderboardStore, LeaderboardStore};
use vedaquiz::question::{BuiltinQuestionStore, QuestionStore};
use vedaquiz::runtime::{FixedTicker, ManualClock, QuizEvent, Runner, TestEventSource};
use vedaquiz::session::{Flow, Phase, Session, SessionConfig, SubmitReason};

// Headless integration using the runtime + Session without a TTY.
// Keys go through the same Runner path the binary uses.

fn send_key(tx: &Sender<QuizEvent>, code: KeyCode) {
    tx.send(QuizEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
        .unwrap();
}

fn send_text(tx: &Sender<QuizEvent>, text: &str) {
    for c in text.chars() {
        send_key(tx, KeyCode::Char(c));
    }
}

fn rig_veda(timed: bool) -> Session {
    let questions = BuiltinQuestionStore::default().load().unwrap();
    Session::new(
        questions,
        SessionConfig {
            timed,
            ..SessionConfig::default()
        },
    )
}

/// Play one session: name, then one key per question ('-' skips), then Enter
fn play(store: &dyn LeaderboardStore, name: &str, answers: &str) -> Session {
    let mut session = rig_veda(false);
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    send_text(&tx, name);
    send_key(&tx, KeyCode::Enter);
    for c in answers.chars() {
        if c != '-' {
            send_key(&tx, KeyCode::Char(c));
        }
        send_key(&tx, KeyCode::Down);
    }
    send_key(&tx, KeyCode::Enter);

    for _ in 0..100u32 {
        runner.advance(&mut session, store).unwrap();
        if session.phase() == Phase::Submitted {
            break;
        }
    }
    assert_eq!(session.phase(), Phase::Submitted, "session should be submitted");
    session
}

#[test]
fn all_correct_scores_full_marks() {
    let dir = tempdir().unwrap();
    let store = FileLeaderboardStore::with_path(dir.path().join("leaderboard.json"));

    let session = play(&store, "Alice", "bcbbb");

    let outcome = session.outcome().unwrap();
    assert_eq!(outcome.result.display(), "10/10");
    assert_eq!(outcome.standings.len(), 1);
    assert_eq!(outcome.standings[0].to_string(), "1. Alice - 10 points");
}

#[test]
fn mixed_answers_score_partial_credit() {
    let dir = tempdir().unwrap();
    let store = FileLeaderboardStore::with_path(dir.path().join("leaderboard.json"));

    // correct, correct, wrong, wrong, unanswered
    let session = play(&store, "Alice", "bcaa-");

    let outcome = session.outcome().unwrap();
    assert_eq!(outcome.result.display(), "2.68/10");
    assert!((store.load().unwrap().get("Alice").unwrap() - 2.68).abs() < 0.005);
}

#[test]
fn leaderboard_ranks_across_sessions() {
    let dir = tempdir().unwrap();
    let store = FileLeaderboardStore::with_path(dir.path().join("leaderboard.json"));

    play(&store, "Alice", "bb---"); // 2 - 0.66 = 1.34
    let session = play(&store, "Bob", "bcbb-"); // 8

    let names: Vec<&str> = session
        .outcome()
        .unwrap()
        .standings
        .iter()
        .map(|e| e.name.as_str())
        .collect();
    assert_eq!(names, vec!["Bob", "Alice"]);
}

#[test]
fn same_name_replays_overwrite() {
    let dir = tempdir().unwrap();
    let store = FileLeaderboardStore::with_path(dir.path().join("leaderboard.json"));

    play(&store, "Alice", "bcbbb");
    play(&store, "Alice", "b----");

    let board = store.load().unwrap();
    assert_eq!(board.len(), 1);
    assert_eq!(board.get("Alice"), Some(2.0));
}

#[test]
fn timed_session_submits_on_expiry() {
    let dir = tempdir().unwrap();
    let store = FileLeaderboardStore::with_path(dir.path().join("leaderboard.json"));

    let mut session = rig_veda(true);
    let (tx, rx) = mpsc::channel();
    let start = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
    let runner = Runner::with_clock(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(1)),
        ManualClock::new(start),
    );

    send_text(&tx, "Tim");
    send_key(&tx, KeyCode::Enter);
    send_key(&tx, KeyCode::Char('b'));
    for _ in 0..5 {
        runner.advance(&mut session, &store).unwrap();
    }
    assert_eq!(session.phase(), Phase::AwaitingResponses);

    // tick without input until the 75 second allotment runs out
    for _ in 0..74 {
        runner.clock().advance(Duration::from_secs(1));
        runner.advance(&mut session, &store).unwrap();
        assert_eq!(session.phase(), Phase::AwaitingResponses);
    }
    runner.clock().advance(Duration::from_secs(1));
    runner.advance(&mut session, &store).unwrap();

    assert_eq!(session.phase(), Phase::Submitted);
    let outcome = session.outcome().unwrap();
    assert_eq!(outcome.reason, SubmitReason::TimeUp);
    assert_eq!(outcome.result.display(), "2/10");
    assert_eq!(store.load().unwrap().get("Tim"), Some(2.0));

    // later keys after submission must not change anything
    send_key(&tx, KeyCode::Char('c'));
    send_key(&tx, KeyCode::Enter);
    runner.advance(&mut session, &store).unwrap();
    runner.advance(&mut session, &store).unwrap();
    assert_eq!(store.load().unwrap().get("Tim"), Some(2.0));
}

#[test]
fn quitting_mid_session_saves_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("leaderboard.json");
    let store = FileLeaderboardStore::with_path(&path);

    let mut session = rig_veda(false);
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    send_text(&tx, "Quinn");
    send_key(&tx, KeyCode::Enter);
    send_key(&tx, KeyCode::Char('b'));
    send_key(&tx, KeyCode::Esc);

    let mut flow = Flow::Continue;
    for _ in 0..20u32 {
        flow = runner.advance(&mut session, &store).unwrap();
        if flow == Flow::Quit {
            break;
        }
    }
    assert_eq!(flow, Flow::Quit);
    assert!(!path.exists());
}
