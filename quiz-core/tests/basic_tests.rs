mod common;

use common::*;
use quiz_core::{GameSession, MovieCatalog, ScoringEngine};
use uuid::Uuid;

#[test]
fn test_fresh_session() {
    let session = GameSession::new();
    assert!(!session.state.game_started);
    assert_eq!(session.state.current_week, 1);
}

#[test]
fn test_default_catalog_is_seeded() {
    let catalog = MovieCatalog::with_default_movies();
    assert!(!catalog.is_empty());
    assert!(catalog.active().is_some());
}

#[test]
fn test_scoring_smoke() {
    assert!(ScoringEngine::is_correct(" the matrix ", "The Matrix"));
    assert_eq!(ScoringEngine::points_for_clue(0), 6);
}

#[test]
fn test_started_session_exposes_first_clue_only() {
    let session = create_started_session("The Matrix");
    let view = session.view();
    assert!(view.game_started);
    assert_eq!(view.visible_images.len(), 1);
    assert!(view.next_clue_release.is_some());
}

// Full weekly flow: an early correct guess earns 6 points, a later wrong
// guess from another player earns nothing, and the ledger records both.
#[test]
fn test_weekly_game_flow() {
    let now = tuesday_morning();
    let mut session = GameSession::new();
    session.start_game(create_test_movie("Inception", 1), now);

    let alice = Uuid::new_v4();
    let outcome = session.submit_guess(alice, "inception", now).unwrap();
    assert!(outcome.is_correct);
    assert_eq!(outcome.points, 6);
    assert_eq!(session.ledger.len(), 1);

    assert!(session.release_next_clue(now));
    assert_eq!(session.state.current_clue_index, 1);

    let bob = Uuid::new_v4();
    let outcome = session.submit_guess(bob, "Interstellar", now).unwrap();
    assert!(!outcome.is_correct);
    assert_eq!(outcome.points, 0);
    assert_eq!(session.ledger.len(), 2);
}

#[test]
fn test_two_weeks_back_to_back() {
    let now = tuesday_morning();
    let mut session = GameSession::new();

    session.start_game(create_test_movie("The Matrix", 1), now);
    assert_eq!(session.state.current_week, 1);

    session.release_next_clue(now);
    session.release_next_clue(now);
    assert!(session.state.next_clue_release.is_none());

    session.start_game(create_test_movie("Inception", 2), now);
    assert_eq!(session.state.current_week, 2);
    assert_eq!(session.state.current_clue_index, 0);
    assert!(session.state.next_clue_release.unwrap() > now);
}
