//! Account service entry point
//!
//! Reads configuration from a TOML file (default:
//! `~/.config/account-service/config.toml`, overridable with the
//! `ACCOUNT_CONFIG` environment variable), runs migrations and serves the
//! REST API.

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use account_service::application::UserService;
use account_service::auth::jwt::JwtConfig;
use account_service::auth::password::hash_password;
use account_service::domain::{CreateUserDto, UserRepositoryInterface};
use account_service::infrastructure::database::migrator::Migrator;
use account_service::infrastructure::database::repositories::UserRepository;
use account_service::infrastructure::MediaStore;
use account_service::{create_api_router, default_config_path, init_database, AppConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("ACCOUNT_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting account service...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");

    // ── Token signing configuration ────────────────────────────
    // Resolution order: config file, then JWT_SECRET env; there is no
    // built-in constant. An ephemeral secret keeps a dev instance usable
    // but invalidates all tokens on restart.
    let jwt_secret = if !app_cfg.security.jwt_secret.is_empty() {
        app_cfg.security.jwt_secret.clone()
    } else {
        match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                warn!("No JWT secret configured; generated an ephemeral one. Tokens will not survive a restart.");
                uuid::Uuid::new_v4().to_string()
            }
        }
    };
    let jwt_config = JwtConfig {
        secret: jwt_secret,
        expiration_hours: app_cfg.security.jwt_expiration_hours,
        issuer: "account-service".to_string(),
    };
    info!(
        "JWT configured with {}h token expiration",
        jwt_config.expiration_hours
    );

    // ── Database ───────────────────────────────────────────────
    let db = match init_database(&app_cfg.database.url).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // ── Dependency wiring (explicit injection, no globals) ─────
    let repo = Arc::new(UserRepository::new(db.clone()));
    let user_service = Arc::new(UserService::new(repo.clone(), jwt_config.clone()));

    let media = match MediaStore::from_settings(&app_cfg.media) {
        Ok(media) => Arc::new(media),
        Err(e) => {
            error!("Failed to initialize media store: {}", e);
            return Err(e.into());
        }
    };

    // Create default admin account if the users table is empty
    create_default_admin(repo.as_ref(), &app_cfg).await;

    let router = create_api_router(
        user_service,
        repo,
        jwt_config,
        media,
        &app_cfg,
        prometheus_handle,
    );

    // ── Serve with graceful shutdown ───────────────────────────
    let addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs/", addr);
    info!("Prometheus metrics at http://{}/metrics", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Performing final cleanup...");
    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("Account service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}

/// Create the bootstrap admin account when no users exist
async fn create_default_admin(repo: &UserRepository, app_cfg: &AppConfig) {
    let existing = match repo.list_users().await {
        Ok(users) => users,
        Err(e) => {
            error!("Failed to check for existing users: {}", e);
            return;
        }
    };
    if !existing.is_empty() {
        return;
    }

    info!("Creating default admin user...");

    let password_hash = match hash_password(&app_cfg.admin.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!("Failed to hash admin password: {}", e);
            return;
        }
    };

    let dto = CreateUserDto {
        email: app_cfg.admin.email.clone(),
        name: app_cfg.admin.name.clone(),
        password_hash,
        is_admin: true,
        is_public: false,
    };

    match repo.create_user(dto).await {
        Ok(admin) => {
            info!("Default admin created: {}", admin.email);
            warn!("Please change the admin password immediately!");
        }
        Err(e) => {
            error!("Failed to create admin user: {}", e);
        }
    }
}
