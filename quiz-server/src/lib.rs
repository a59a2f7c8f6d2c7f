use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use warp::Filter;
use warp::http::StatusCode;

use crate::auth::{AuthContext, AuthService};
use crate::game_manager::GameManager;
use crate::notifications::NotificationLog;
use quiz_persistence::repositories::{StateRepository, UserRepository};
use quiz_types::{
    AuthError, AuthResponse, GameError, GuessRequest, GuessResponse, LoginRequest,
    NotificationSettings, RegisterRequest, StartGameRequest, UploadMovieRequest, User,
};

pub mod auth;
pub mod config;
pub mod game_manager;
pub mod notifications;
pub mod scheduler;

#[derive(Deserialize)]
struct LeaderboardQuery {
    limit: Option<u64>,
}

#[derive(serde::Serialize)]
struct UserStatsResponse {
    user: User,
    rank: Option<u32>,
}

type JsonReply = warp::reply::WithStatus<warp::reply::Json>;

fn json_reply<T: serde::Serialize>(value: &T, status: StatusCode) -> JsonReply {
    warp::reply::with_status(warp::reply::json(value), status)
}

fn error_reply(message: &str, status: StatusCode) -> JsonReply {
    warp::reply::with_status(
        warp::reply::json(&serde_json::json!({ "error": message })),
        status,
    )
}

fn authenticate(
    auth_header: Option<String>,
    auth_service: &AuthService,
) -> Result<AuthContext, AuthError> {
    let header = auth_header.ok_or(AuthError::MissingCredentials)?;
    let token = header.strip_prefix("Bearer ").unwrap_or(&header);
    auth_service.validate_token(token)
}

fn require_admin(
    auth_header: Option<String>,
    auth_service: &AuthService,
) -> Result<AuthContext, JsonReply> {
    match authenticate(auth_header, auth_service) {
        Ok(context) if context.is_admin => Ok(context),
        Ok(_) => Err(error_reply("Admin access required", StatusCode::FORBIDDEN)),
        Err(err) => Err(error_reply(&err.to_string(), StatusCode::UNAUTHORIZED)),
    }
}

pub fn create_routes(
    game_manager: Arc<GameManager>,
    auth_service: Arc<AuthService>,
    user_repository: Arc<UserRepository>,
    state_repository: Arc<StateRepository>,
    notification_log: NotificationLog,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    // Clone for filters
    let game_manager_filter = warp::any().map({
        let game_manager = game_manager.clone();
        move || game_manager.clone()
    });

    let auth_filter = warp::any().map({
        let auth_service = auth_service.clone();
        move || auth_service.clone()
    });

    let user_repository_filter = warp::any().map({
        let user_repository = user_repository.clone();
        move || user_repository.clone()
    });

    let state_repository_filter = warp::any().map({
        let state_repository = state_repository.clone();
        move || state_repository.clone()
    });

    let notification_log_filter = warp::any().map({
        let notification_log = notification_log.clone();
        move || notification_log.clone()
    });

    let auth_header = warp::header::optional::<String>("authorization");

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    let register = warp::path!("auth" / "register")
        .and(warp::post())
        .and(warp::body::json())
        .and(user_repository_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_register);

    let login = warp::path!("auth" / "login")
        .and(warp::post())
        .and(warp::body::json())
        .and(user_repository_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_login);

    // Public game state - the movie title and unreleased clues stay hidden
    let game_state = warp::path!("game" / "state")
        .and(warp::get())
        .and(game_manager_filter.clone())
        .and_then(handle_game_state);

    let submit_guess = warp::path!("game" / "guess")
        .and(warp::post())
        .and(auth_header)
        .and(warp::body::json())
        .and(game_manager_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_submit_guess);

    let my_guesses = warp::path!("game" / "guesses")
        .and(warp::get())
        .and(auth_header)
        .and(game_manager_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_my_guesses);

    let leaderboard = warp::path("leaderboard")
        .and(warp::get())
        .and(warp::query::<LeaderboardQuery>())
        .and(user_repository_filter.clone())
        .and_then(handle_leaderboard);

    let user_stats = warp::path!("user" / String / "stats")
        .and(warp::get())
        .and(auth_header)
        .and(user_repository_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_user_stats);

    let settings_get = warp::path!("settings" / "notifications")
        .and(warp::get())
        .and(auth_header)
        .and(state_repository_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_settings_get);

    let settings_put = warp::path!("settings" / "notifications")
        .and(warp::put())
        .and(auth_header)
        .and(warp::body::json())
        .and(state_repository_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_settings_put);

    let notifications = warp::path("notifications")
        .and(warp::get())
        .and(auth_header)
        .and(state_repository_filter.clone())
        .and(notification_log_filter)
        .and(auth_filter.clone())
        .and_then(handle_notifications);

    let admin_game_state = warp::path!("admin" / "game" / "state")
        .and(warp::get())
        .and(auth_header)
        .and(game_manager_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_admin_game_state);

    let admin_start_game = warp::path!("admin" / "game" / "start")
        .and(warp::post())
        .and(auth_header)
        .and(warp::body::json())
        .and(game_manager_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_admin_start_game);

    let admin_release_clue = warp::path!("admin" / "game" / "release")
        .and(warp::post())
        .and(auth_header)
        .and(game_manager_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_admin_release_clue);

    let admin_list_movies = warp::path!("admin" / "movies")
        .and(warp::get())
        .and(auth_header)
        .and(game_manager_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_admin_list_movies);

    let admin_upload_movie = warp::path!("admin" / "movies")
        .and(warp::post())
        .and(auth_header)
        .and(warp::body::json())
        .and(game_manager_filter.clone())
        .and(auth_filter.clone())
        .and_then(handle_admin_upload_movie);

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type", "authorization"])
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE"]);

    health
        .or(register)
        .or(login)
        .or(game_state)
        .or(submit_guess)
        .or(my_guesses)
        .or(leaderboard)
        .or(user_stats)
        .or(settings_get)
        .or(settings_put)
        .or(notifications)
        .or(admin_game_state)
        .or(admin_start_game)
        .or(admin_release_clue)
        .or(admin_list_movies)
        .or(admin_upload_movie)
        .with(cors)
        .with(warp::log("movie_quiz"))
}

async fn handle_register(
    request: RegisterRequest,
    user_repository: Arc<UserRepository>,
    auth_service: Arc<AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let username = request.username.trim().to_string();
    let email = request.email.trim().to_string();

    if username.is_empty() || email.is_empty() {
        return Ok(error_reply(
            "Username and email are required",
            StatusCode::BAD_REQUEST,
        ));
    }
    if AuthService::check_password(&request.password).is_err() {
        return Ok(error_reply(
            "Password must not be empty",
            StatusCode::BAD_REQUEST,
        ));
    }

    match user_repository.find_by_username(&username).await {
        Ok(Some(_)) => {
            return Ok(error_reply("Username already taken", StatusCode::CONFLICT));
        }
        Ok(None) => {}
        Err(err) => {
            tracing::error!("Failed to look up username: {err:#}");
            return Ok(error_reply(
                "Registration failed",
                StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }
    }

    let user = User {
        id: Uuid::new_v4(),
        username,
        email,
        is_admin: false,
        total_points: 0,
        weekly_points: 0,
        created_at: Utc::now(),
    };

    let user = match user_repository.create_user(user).await {
        Ok(user) => user,
        Err(err) => {
            tracing::error!("Failed to create user: {err:#}");
            return Ok(error_reply(
                "Registration failed",
                StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }
    };

    match auth_service.issue_token(&user) {
        Ok(token) => Ok(json_reply(
            &AuthResponse { token, user },
            StatusCode::CREATED,
        )),
        Err(err) => {
            tracing::error!("Failed to issue token: {err}");
            Ok(error_reply(
                "Registration failed",
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

async fn handle_login(
    request: LoginRequest,
    user_repository: Arc<UserRepository>,
    auth_service: Arc<AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    if AuthService::check_password(&request.password).is_err() {
        return Ok(error_reply(
            "Password must not be empty",
            StatusCode::BAD_REQUEST,
        ));
    }

    let user = match user_repository.find_by_username(request.username.trim()).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return Ok(error_reply("Invalid credentials", StatusCode::UNAUTHORIZED));
        }
        Err(err) => {
            tracing::error!("Failed to look up user: {err:#}");
            return Ok(error_reply(
                "Login failed",
                StatusCode::INTERNAL_SERVER_ERROR,
            ));
        }
    };

    match auth_service.issue_token(&user) {
        Ok(token) => Ok(json_reply(&AuthResponse { token, user }, StatusCode::OK)),
        Err(err) => {
            tracing::error!("Failed to issue token: {err}");
            Ok(error_reply(
                "Login failed",
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

async fn handle_game_state(
    game_manager: Arc<GameManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let view = game_manager.view().await;
    Ok(json_reply(&view, StatusCode::OK))
}

async fn handle_submit_guess(
    auth_header: Option<String>,
    request: GuessRequest,
    game_manager: Arc<GameManager>,
    auth_service: Arc<AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let context = match authenticate(auth_header, &auth_service) {
        Ok(context) => context,
        Err(err) => return Ok(error_reply(&err.to_string(), StatusCode::UNAUTHORIZED)),
    };

    if request.guess.trim().is_empty() {
        return Ok(error_reply("Guess must not be empty", StatusCode::BAD_REQUEST));
    }

    match game_manager.submit_guess(context.user_id, &request.guess).await {
        Ok(outcome) => Ok(json_reply(&GuessResponse { outcome }, StatusCode::OK)),
        Err(err @ GameError::AlreadyGuessed { .. }) => {
            Ok(error_reply(&err.to_string(), StatusCode::CONFLICT))
        }
        Err(err) => Ok(error_reply(&err.to_string(), StatusCode::BAD_REQUEST)),
    }
}

async fn handle_my_guesses(
    auth_header: Option<String>,
    game_manager: Arc<GameManager>,
    auth_service: Arc<AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let context = match authenticate(auth_header, &auth_service) {
        Ok(context) => context,
        Err(err) => return Ok(error_reply(&err.to_string(), StatusCode::UNAUTHORIZED)),
    };

    let guesses = game_manager.guesses_for_user(context.user_id).await;
    Ok(json_reply(&guesses, StatusCode::OK))
}

async fn handle_leaderboard(
    query: LeaderboardQuery,
    user_repository: Arc<UserRepository>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let limit = query.limit.unwrap_or(10).min(100); // Default 10, max 100

    match user_repository.get_leaderboard(limit).await {
        Ok(leaderboard) => Ok(json_reply(&leaderboard, StatusCode::OK)),
        Err(err) => {
            tracing::error!("Failed to fetch leaderboard: {err:#}");
            Ok(error_reply(
                "Failed to fetch leaderboard",
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

async fn handle_user_stats(
    user_id: String,
    auth_header: Option<String>,
    user_repository: Arc<UserRepository>,
    auth_service: Arc<AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let user_uuid = match Uuid::parse_str(&user_id) {
        Ok(uuid) => uuid,
        Err(_) => {
            return Ok(error_reply("Invalid user ID format", StatusCode::BAD_REQUEST));
        }
    };

    let context = match authenticate(auth_header, &auth_service) {
        Ok(context) => context,
        Err(err) => return Ok(error_reply(&err.to_string(), StatusCode::UNAUTHORIZED)),
    };

    // Users may only view their own stats
    if context.user_id != user_uuid && !context.is_admin {
        return Ok(error_reply(
            "Not authorized to view this user's stats",
            StatusCode::FORBIDDEN,
        ));
    }

    match user_repository.find_by_id(user_uuid).await {
        Ok(Some(user)) => {
            let rank = match user_repository.get_user_rank(user_uuid).await {
                Ok(rank) => rank,
                Err(err) => {
                    tracing::error!("Failed to get user rank: {err:#}");
                    None
                }
            };

            Ok(json_reply(&UserStatsResponse { user, rank }, StatusCode::OK))
        }
        Ok(None) => Ok(error_reply("User not found", StatusCode::NOT_FOUND)),
        Err(err) => {
            tracing::error!("Failed to fetch user stats: {err:#}");
            Ok(error_reply(
                "Failed to fetch user stats",
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

async fn handle_settings_get(
    auth_header: Option<String>,
    state_repository: Arc<StateRepository>,
    auth_service: Arc<AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let context = match authenticate(auth_header, &auth_service) {
        Ok(context) => context,
        Err(err) => return Ok(error_reply(&err.to_string(), StatusCode::UNAUTHORIZED)),
    };

    match state_repository.load_notification_settings(context.user_id).await {
        Ok(settings) => Ok(json_reply(&settings, StatusCode::OK)),
        Err(err) => {
            tracing::error!("Failed to load notification settings: {err:#}");
            Ok(error_reply(
                "Failed to load settings",
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

async fn handle_settings_put(
    auth_header: Option<String>,
    settings: NotificationSettings,
    state_repository: Arc<StateRepository>,
    auth_service: Arc<AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let context = match authenticate(auth_header, &auth_service) {
        Ok(context) => context,
        Err(err) => return Ok(error_reply(&err.to_string(), StatusCode::UNAUTHORIZED)),
    };

    match state_repository
        .save_notification_settings(context.user_id, &settings)
        .await
    {
        Ok(()) => Ok(json_reply(&settings, StatusCode::OK)),
        Err(err) => {
            tracing::error!("Failed to save notification settings: {err:#}");
            Ok(error_reply(
                "Failed to save settings",
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

async fn handle_notifications(
    auth_header: Option<String>,
    state_repository: Arc<StateRepository>,
    notification_log: NotificationLog,
    auth_service: Arc<AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let context = match authenticate(auth_header, &auth_service) {
        Ok(context) => context,
        Err(err) => return Ok(error_reply(&err.to_string(), StatusCode::UNAUTHORIZED)),
    };

    let settings = match state_repository.load_notification_settings(context.user_id).await {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!("Failed to load notification settings, using defaults: {err:#}");
            NotificationSettings::default()
        }
    };

    Ok(json_reply(
        &notification_log.filtered_for(&settings),
        StatusCode::OK,
    ))
}

async fn handle_admin_game_state(
    auth_header: Option<String>,
    game_manager: Arc<GameManager>,
    auth_service: Arc<AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    if let Err(reply) = require_admin(auth_header, &auth_service) {
        return Ok(reply);
    }

    let state = game_manager.full_state().await;
    Ok(json_reply(&state, StatusCode::OK))
}

async fn handle_admin_start_game(
    auth_header: Option<String>,
    request: StartGameRequest,
    game_manager: Arc<GameManager>,
    auth_service: Arc<AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    if let Err(reply) = require_admin(auth_header, &auth_service) {
        return Ok(reply);
    }

    match game_manager.start_game(request.movie_id).await {
        Ok(view) => Ok(json_reply(&view, StatusCode::OK)),
        Err(err @ GameError::MovieNotFound { .. }) => {
            Ok(error_reply(&err.to_string(), StatusCode::NOT_FOUND))
        }
        Err(err) => Ok(error_reply(&err.to_string(), StatusCode::BAD_REQUEST)),
    }
}

async fn handle_admin_release_clue(
    auth_header: Option<String>,
    game_manager: Arc<GameManager>,
    auth_service: Arc<AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    if let Err(reply) = require_admin(auth_header, &auth_service) {
        return Ok(reply);
    }

    match game_manager.release_next_clue().await {
        Ok(view) => Ok(json_reply(&view, StatusCode::OK)),
        Err(err) => Ok(error_reply(&err.to_string(), StatusCode::CONFLICT)),
    }
}

async fn handle_admin_list_movies(
    auth_header: Option<String>,
    game_manager: Arc<GameManager>,
    auth_service: Arc<AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    if let Err(reply) = require_admin(auth_header, &auth_service) {
        return Ok(reply);
    }

    let movies = game_manager.movies().await;
    Ok(json_reply(&movies, StatusCode::OK))
}

async fn handle_admin_upload_movie(
    auth_header: Option<String>,
    request: UploadMovieRequest,
    game_manager: Arc<GameManager>,
    auth_service: Arc<AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    if let Err(reply) = require_admin(auth_header, &auth_service) {
        return Ok(reply);
    }

    match game_manager.upload_movie(&request.title, request.images).await {
        Ok(movie) => Ok(json_reply(&movie, StatusCode::CREATED)),
        Err(err) => Ok(error_reply(&err.to_string(), StatusCode::BAD_REQUEST)),
    }
}
