use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::signal;
use tracing::info;
use uuid::Uuid;

use quiz_core::MovieCatalog;
use quiz_persistence::connection::connect_and_migrate;
use quiz_persistence::repositories::{StateRepository, UserRepository};
use quiz_server::{
    auth::AuthService, config::Config, create_routes, game_manager::GameManager,
    notifications::NotificationLog, scheduler::spawn_release_scheduler,
};
use quiz_types::User;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting movie quiz server...");

    let config = Config::new();

    // Initialize database connection and run migrations
    let db = match connect_and_migrate().await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to connect to database and run migrations: {}", e);
            std::process::exit(1);
        }
    };
    let user_repository = Arc::new(UserRepository::new(db.clone()));
    let state_repository = Arc::new(StateRepository::new(db));

    if let Err(e) = ensure_admin_user(&user_repository).await {
        tracing::error!("Failed to seed admin user: {}", e);
        std::process::exit(1);
    }

    let auth_service = Arc::new(AuthService::new(
        &config.auth_secret,
        chrono::Duration::hours(config.token_ttl_hours),
    ));

    let notification_log = NotificationLog::new(100);

    let game_manager = match GameManager::load(
        MovieCatalog::with_default_movies(),
        state_repository.clone(),
        user_repository.clone(),
        Duration::from_millis(config.upload_delay_ms),
    )
    .await
    {
        Ok(gm) => Arc::new(gm),
        Err(e) => {
            tracing::error!("Failed to load game state: {}", e);
            std::process::exit(1);
        }
    };
    game_manager
        .add_event_handler(Box::new(notification_log.clone()))
        .await;

    // Apply due clue releases whether or not any client is watching
    spawn_release_scheduler(
        game_manager.clone(),
        Duration::from_secs(config.release_check_interval_seconds),
    );

    let routes = create_routes(
        game_manager,
        auth_service,
        user_repository,
        state_repository,
        notification_log,
    );

    info!("Server starting on {}:{}", config.host, config.port);

    let addr = (
        config.host.parse::<std::net::IpAddr>().unwrap(),
        config.port,
    );

    let (addr, server) = warp::serve(routes).bind_with_graceful_shutdown(addr, async {
        // Wait for SIGINT (Ctrl+C) or SIGTERM
        #[cfg(unix)]
        {
            let mut sigint = signal::unix::signal(signal::unix::SignalKind::interrupt()).unwrap();
            let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate()).unwrap();

            tokio::select! {
                _ = sigint.recv() => {
                    info!("Received SIGINT, shutting down gracefully...");
                }
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down gracefully...");
                }
            }
        }

        #[cfg(not(unix))]
        {
            signal::ctrl_c().await.expect("Failed to listen for ctrl+c");
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    });

    info!(
        "Server started successfully on {}. Press Ctrl+C to stop.",
        addr
    );
    server.await;
    info!("Server shutdown complete.");
}

/// Seed the built-in admin account on first boot.
async fn ensure_admin_user(user_repository: &UserRepository) -> anyhow::Result<()> {
    if user_repository.find_by_username("Admin").await?.is_some() {
        return Ok(());
    }

    user_repository
        .create_user(User {
            id: Uuid::new_v4(),
            username: "Admin".to_string(),
            email: "admin@example.com".to_string(),
            is_admin: true,
            total_points: 0,
            weekly_points: 0,
            created_at: Utc::now(),
        })
        .await?;

    info!("Seeded admin account");
    Ok(())
}
