use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Number of clue images every movie carries.
pub const CLUE_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub week: i32,
    pub images: Vec<String>, // exactly CLUE_COUNT entries
    pub is_active: bool,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameState {
    pub current_week: i32,
    pub current_movie: Option<Movie>,
    pub game_started: bool,
    pub current_clue_index: u8, // invariant: 0 ..= 2
    pub next_clue_release: Option<DateTime<Utc>>,
}

impl GameState {
    /// Initial state before any game has been started.
    pub fn new() -> Self {
        Self {
            current_week: 1,
            current_movie: None,
            game_started: false,
            current_clue_index: 0,
            next_clue_release: None,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

/// Safe version of GameState that doesn't expose the movie title
/// Used for HTTP responses where we need to protect game integrity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameStateView {
    pub current_week: i32,
    pub movie_id: Option<Uuid>,
    pub game_started: bool,
    pub current_clue_index: u8,
    pub visible_images: Vec<String>,
    pub next_clue_release: Option<DateTime<Utc>>,
}

impl From<&GameState> for GameStateView {
    fn from(state: &GameState) -> Self {
        let visible_images = state
            .current_movie
            .as_ref()
            .map(|movie| {
                movie
                    .images
                    .iter()
                    .take(state.current_clue_index as usize + 1)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        GameStateView {
            current_week: state.current_week,
            movie_id: state.current_movie.as_ref().map(|movie| movie.id),
            game_started: state.game_started,
            current_clue_index: state.current_clue_index,
            visible_images,
            next_clue_release: state.next_clue_release,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Guess {
    pub id: Uuid,
    pub user_id: Uuid,
    pub movie_id: Uuid,
    pub guess: String,
    pub is_correct: bool,
    pub points: i32,
    pub submitted_at: DateTime<Utc>,
    pub clue_index: u8, // which clue was visible when they guessed
}

/// Result of a guess submission returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessOutcome {
    pub is_correct: bool,
    pub points: i32,
}

impl GuessOutcome {
    pub fn missed() -> Self {
        Self {
            is_correct: false,
            points: 0,
        }
    }
}
