use passport_server::core::{AppState, Config};
use passport_server::dtos::CreateUserDTO;
use passport_server::entities::{User, UserRole};
use passport_server::monitoring::{CpuMonitorConfig, start_cpu_monitoring};
use passport_server::repositories::Create;
use passport_server::create_router;
use sqlx::sqlite::SqlitePoolOptions;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "passport_server=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    config.print_info();

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .max_lifetime(Duration::from_secs(config.connection_lifetime_secs))
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!().run(&pool).await?;
    info!("Database migrations applied");

    let upload_dir = PathBuf::from(&config.upload_dir);
    tokio::fs::create_dir_all(&upload_dir).await?;

    let state = Arc::new(AppState::new(
        pool,
        config.jwt_secret.clone(),
        upload_dir,
    ));

    bootstrap_admin(&state).await?;

    if config.app_env != "test" {
        tokio::spawn(start_cpu_monitoring(CpuMonitorConfig::default()));
    }

    let app = create_router(state);

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Creates the first admin account from ADMIN_EMAIL / ADMIN_PASSWORD when the
/// users table does not have one yet. Without this there is no way to create
/// mentors or assignments on a fresh database.
async fn bootstrap_admin(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let (email, password) = match (
        std::env::var("ADMIN_EMAIL"),
        std::env::var("ADMIN_PASSWORD"),
    ) {
        (Ok(email), Ok(password)) => (email, password),
        _ => return Ok(()),
    };

    if state.user.find_by_email(&email).await?.is_some() {
        return Ok(());
    }

    let password_hash = match User::hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Could not hash bootstrap admin password: {}", e);
            return Ok(());
        }
    };

    let admin = state
        .user
        .create(&CreateUserDTO {
            email,
            name: "Administrator".to_string(),
            password: password_hash,
            role: Some(UserRole::Admin),
        })
        .await?;

    info!(user_id = admin.user_id, "Bootstrap admin account created");
    Ok(())
}
