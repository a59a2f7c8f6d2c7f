use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, thiserror::Error)]
#[ts(export)]
pub enum GameError {
    #[error("no movie is currently active")]
    NoActiveMovie,
    #[error("movie not found: {movie_id}")]
    MovieNotFound { movie_id: String },
    #[error("user {user_id} already guessed for movie {movie_id}")]
    AlreadyGuessed { user_id: String, movie_id: String },
    #[error("all clues have already been released")]
    AllCluesReleased,
    #[error("invalid movie: {reason}")]
    InvalidMovie { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS, thiserror::Error)]
#[ts(export)]
pub enum AuthError {
    #[error("invalid token")]
    InvalidToken,
    #[error("token expired")]
    TokenExpired,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("username already taken: {username}")]
    UsernameTaken { username: String },
    #[error("missing credentials")]
    MissingCredentials,
}
