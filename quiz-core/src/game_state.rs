use chrono::{DateTime, Utc};
use quiz_types::{CLUE_COUNT, GameError, GameState, GameStateView, Guess, GuessOutcome, Movie};
use tracing::info;
use uuid::Uuid;

use crate::ScoringEngine;
use crate::schedule;

const LAST_CLUE_INDEX: u8 = (CLUE_COUNT - 1) as u8;

/// The game progression state machine plus the append-only guess ledger.
///
/// Owns every mutation of the weekly quiz: which movie is active, which
/// clues are visible, when the next one unlocks, and which guesses exist.
/// Callers are responsible for serializing access (single writer) and for
/// persisting the session after each mutating call.
pub struct GameSession {
    pub state: GameState,
    pub ledger: Vec<Guess>,
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            state: GameState::new(),
            ledger: Vec::new(),
        }
    }

    /// Rebuild a session from persisted parts.
    pub fn from_parts(state: GameState, ledger: Vec<Guess>) -> Self {
        Self { state, ledger }
    }

    /// Start a new weekly game with the given movie.
    ///
    /// Valid from any state: resets the clue index to 0 and schedules the
    /// next release. The very first game plays at week 1; every later
    /// start advances the week counter.
    pub fn start_game(&mut self, movie: Movie, now: DateTime<Utc>) {
        if self.state.game_started {
            self.state.current_week += 1;
        }

        info!(
            "starting week {} with movie {}",
            self.state.current_week, movie.id
        );

        self.state.current_movie = Some(movie);
        self.state.game_started = true;
        self.state.current_clue_index = 0;
        self.state.next_clue_release = Some(schedule::next_release_after(now));
    }

    /// Reveal the next clue image.
    ///
    /// Returns false without any state change once all clues are visible.
    /// Reaching the last clue clears the release schedule for the week.
    pub fn release_next_clue(&mut self, now: DateTime<Utc>) -> bool {
        if self.state.current_clue_index >= LAST_CLUE_INDEX {
            return false;
        }

        self.state.current_clue_index += 1;
        self.state.next_clue_release = if self.state.current_clue_index < LAST_CLUE_INDEX {
            Some(schedule::next_release_after(now))
        } else {
            None
        };

        info!("released clue {}", self.state.current_clue_index);
        true
    }

    /// Whether the stored next-release timestamp has come due.
    pub fn is_release_due(&self, now: DateTime<Utc>) -> bool {
        self.state
            .next_clue_release
            .is_some_and(|release_at| now >= release_at)
    }

    /// Apply a due release, if any, returning the newly visible clue index.
    pub fn release_due_clue(&mut self, now: DateTime<Utc>) -> Option<u8> {
        if self.is_release_due(now) && self.release_next_clue(now) {
            Some(self.state.current_clue_index)
        } else {
            None
        }
    }

    pub fn has_guessed(&self, user_id: Uuid, movie_id: Uuid) -> bool {
        self.ledger
            .iter()
            .any(|guess| guess.user_id == user_id && guess.movie_id == movie_id)
    }

    /// Record a guess against the active movie.
    ///
    /// With no active movie the guess simply misses (0 points) and is not
    /// recorded. Each user gets one guess per movie; the first one wins.
    /// The clue index is captured at call time, never retroactively.
    pub fn submit_guess(
        &mut self,
        user_id: Uuid,
        text: &str,
        now: DateTime<Utc>,
    ) -> Result<GuessOutcome, GameError> {
        let (movie_id, title) = match &self.state.current_movie {
            Some(movie) => (movie.id, movie.title.clone()),
            None => return Ok(GuessOutcome::missed()),
        };

        if self.has_guessed(user_id, movie_id) {
            return Err(GameError::AlreadyGuessed {
                user_id: user_id.to_string(),
                movie_id: movie_id.to_string(),
            });
        }

        let clue_index = self.state.current_clue_index;
        let (is_correct, points) = ScoringEngine::score_guess(text, &title, clue_index);

        self.ledger.push(Guess {
            id: Uuid::new_v4(),
            user_id,
            movie_id,
            guess: text.to_string(),
            is_correct,
            points,
            submitted_at: now,
            clue_index,
        });

        Ok(GuessOutcome { is_correct, points })
    }

    pub fn guesses_for_user(&self, user_id: Uuid) -> Vec<Guess> {
        self.ledger
            .iter()
            .filter(|guess| guess.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Public projection of the state: no title, released images only.
    pub fn view(&self) -> GameStateView {
        GameStateView::from(&self.state)
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
