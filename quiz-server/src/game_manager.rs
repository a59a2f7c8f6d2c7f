use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info};
use uuid::Uuid;

use quiz_core::{GameEvent, GameEventBus, GameEventHandler, GameSession, MovieCatalog};
use quiz_persistence::repositories::{StateRepository, UserRepository};
use quiz_types::{GameError, GameState, GameStateView, Guess, GuessOutcome, Movie};

/// Single-writer owner of the weekly game.
///
/// Every load-modify-save cycle of the persisted state goes through the
/// session write lock here; route handlers never touch the session
/// directly. Persistence failures are logged and the in-memory state is
/// retained.
pub struct GameManager {
    session: RwLock<GameSession>,
    catalog: RwLock<MovieCatalog>,
    state_repository: Arc<StateRepository>,
    user_repository: Arc<UserRepository>,
    event_bus: Mutex<GameEventBus>,
    upload_delay: Duration,
}

impl GameManager {
    /// Restore the session from persistence, or initialize week 1 with the
    /// catalog's active movie on a fresh install.
    pub async fn load(
        catalog: MovieCatalog,
        state_repository: Arc<StateRepository>,
        user_repository: Arc<UserRepository>,
        upload_delay: Duration,
    ) -> anyhow::Result<Self> {
        let session = match state_repository.load_game_state().await? {
            Some(state) => {
                let ledger = state_repository.load_guesses().await?;
                info!(
                    "Restored game state: week {}, {} recorded guesses",
                    state.current_week,
                    ledger.len()
                );
                GameSession::from_parts(state, ledger)
            }
            None => {
                let mut session = GameSession::new();
                if let Some(movie) = catalog.active() {
                    session.start_game(movie.clone(), Utc::now());
                }
                state_repository.save_game_state(&session.state).await?;
                info!("Initialized fresh game state for week 1");
                session
            }
        };

        Ok(Self {
            session: RwLock::new(session),
            catalog: RwLock::new(catalog),
            state_repository,
            user_repository,
            event_bus: Mutex::new(GameEventBus::new()),
            upload_delay,
        })
    }

    pub async fn add_event_handler(&self, handler: Box<dyn GameEventHandler>) {
        self.event_bus.lock().await.add_handler(handler);
    }

    async fn publish(&self, event: GameEvent) {
        self.event_bus.lock().await.publish(event);
    }

    /// Public projection of the game state: no title, released images only.
    pub async fn view(&self) -> GameStateView {
        self.session.read().await.view()
    }

    /// Full game state including the answer. Admin eyes only.
    pub async fn full_state(&self) -> GameState {
        self.session.read().await.state.clone()
    }

    pub async fn guesses_for_user(&self, user_id: Uuid) -> Vec<Guess> {
        self.session.read().await.guesses_for_user(user_id)
    }

    /// Record a guess, persist the ledger, and credit points on a hit.
    pub async fn submit_guess(
        &self,
        user_id: Uuid,
        text: &str,
    ) -> Result<GuessOutcome, GameError> {
        let now = Utc::now();
        let mut session = self.session.write().await;

        let outcome = session.submit_guess(user_id, text, now)?;
        let Some(movie_id) = session.state.current_movie.as_ref().map(|movie| movie.id) else {
            // No active movie: nothing was recorded
            return Ok(outcome);
        };

        if let Err(err) = self.state_repository.save_guesses(&session.ledger).await {
            error!("Failed to persist guess ledger: {err:#}");
        }

        self.publish(GameEvent::GuessSubmitted {
            user_id,
            movie_id,
            is_correct: outcome.is_correct,
            points: outcome.points,
            at: now,
        })
        .await;

        if outcome.is_correct {
            if let Err(err) = self.user_repository.add_points(user_id, outcome.points).await {
                error!("Failed to update user stats: {err:#}");
            }
            self.publish(GameEvent::LeaderboardUpdated {
                user_id,
                points_gained: outcome.points,
                at: now,
            })
            .await;
        }

        Ok(outcome)
    }

    /// Start a new weekly game with a movie from the catalog.
    pub async fn start_game(&self, movie_id: Uuid) -> Result<GameStateView, GameError> {
        let movie = {
            let catalog = self.catalog.read().await;
            catalog
                .find(movie_id)
                .cloned()
                .ok_or_else(|| GameError::MovieNotFound {
                    movie_id: movie_id.to_string(),
                })?
        };

        let now = Utc::now();
        let mut session = self.session.write().await;
        session.start_game(movie, now);

        if let Err(err) = self.state_repository.save_game_state(&session.state).await {
            error!("Failed to persist game state: {err:#}");
        }
        if let Err(err) = self.user_repository.reset_weekly_points().await {
            error!("Failed to reset weekly points: {err:#}");
        }

        self.publish(GameEvent::GameStarted {
            week: session.state.current_week,
            movie_id,
            at: now,
        })
        .await;

        Ok(session.view())
    }

    /// Manually reveal the next clue (admin path).
    pub async fn release_next_clue(&self) -> Result<GameStateView, GameError> {
        let now = Utc::now();
        let mut session = self.session.write().await;

        let Some(movie_id) = session.state.current_movie.as_ref().map(|movie| movie.id) else {
            return Err(GameError::NoActiveMovie);
        };

        if !session.release_next_clue(now) {
            return Err(GameError::AllCluesReleased);
        }

        if let Err(err) = self.state_repository.save_game_state(&session.state).await {
            error!("Failed to persist game state: {err:#}");
        }

        self.publish(GameEvent::ClueReleased {
            movie_id,
            clue_index: session.state.current_clue_index,
            next_release: session.state.next_clue_release,
            at: now,
        })
        .await;

        Ok(session.view())
    }

    /// Scheduler seam: apply at most one due release per tick.
    pub async fn release_due_clue(&self) -> Option<u8> {
        let now = Utc::now();
        let mut session = self.session.write().await;

        let movie_id = session.state.current_movie.as_ref().map(|movie| movie.id)?;
        let clue_index = session.release_due_clue(now)?;

        if let Err(err) = self.state_repository.save_game_state(&session.state).await {
            error!("Failed to persist game state: {err:#}");
        }

        self.publish(GameEvent::ClueReleased {
            movie_id,
            clue_index,
            next_release: session.state.next_clue_release,
            at: now,
        })
        .await;

        Some(clue_index)
    }

    pub async fn movies(&self) -> Vec<Movie> {
        self.catalog.read().await.movies().to_vec()
    }

    /// Add a movie to the catalog, simulating the backend upload delay.
    pub async fn upload_movie(
        &self,
        title: &str,
        images: Vec<String>,
    ) -> Result<Movie, GameError> {
        // Stand-in for the real upload round-trip
        tokio::time::sleep(self.upload_delay).await;

        let mut catalog = self.catalog.write().await;
        catalog
            .add_movie(title, images, Utc::now())
            .map(|movie| movie.clone())
    }
}
