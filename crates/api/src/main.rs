use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lms_api::auth::otp::OtpService;
use lms_api::config::ServerConfig;
use lms_api::router::build_app_router;
use lms_api::state::AppState;
use lms_cache::redis_store::RedisKv;
use lms_mail::{MailConfig, Mailer};
use lms_media::{MediaStorage, MediaStorageConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lms_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = lms_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    lms_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    lms_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- OTP store (Redis) ---
    let redis_url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1/".into());
    let kv = RedisKv::connect(&redis_url)
        .await
        .expect("Failed to connect to Redis");
    let otp = OtpService::new(Arc::new(kv));
    tracing::info!("Redis connection established");

    // --- Mail (optional) ---
    let mailer = match MailConfig::from_env() {
        Some(mail_config) => {
            tracing::info!("SMTP transport configured");
            Some(Mailer::new(mail_config))
        }
        None => {
            tracing::warn!("SMTP_HOST not set, verification mail disabled");
            None
        }
    };

    // --- Media storage (optional) ---
    let storage = match MediaStorageConfig::from_env() {
        Some(media_config) => {
            let storage = MediaStorage::new(media_config).expect("Failed to build media client");
            tracing::info!("Media storage configured");
            Some(storage)
        }
        None => {
            tracing::warn!("MEDIA_BASE_URL not set, avatar/thumbnail uploads disabled");
            None
        }
    };

    // --- App state + router ---
    let state = AppState::new(pool, config.clone(), otp, mailer, storage);
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
