use chrono::{DateTime, TimeZone, Utc};
use quiz_core::GameSession;
use quiz_types::Movie;
use uuid::Uuid;

/// Creates a movie with three clue images and a known title
pub fn create_test_movie(title: &str, week: i32) -> Movie {
    Movie {
        id: Uuid::new_v4(),
        title: title.to_string(),
        week,
        images: vec![
            format!("{}-clue-1.jpg", week),
            format!("{}-clue-2.jpg", week),
            format!("{}-clue-3.jpg", week),
        ],
        is_active: week == 1,
        start_date: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
        end_date: Utc.with_ymd_and_hms(2024, 1, 21, 0, 0, 0).unwrap(),
    }
}

/// A Tuesday morning, two days into the game week
pub fn tuesday_morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 16, 10, 0, 0).unwrap()
}

/// Creates a session with a started game for the given title
pub fn create_started_session(title: &str) -> GameSession {
    let mut session = GameSession::new();
    session.start_game(create_test_movie(title, 1), tuesday_morning());
    session
}
