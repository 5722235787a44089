use std::sync::Arc;

use auth::PasswordHasher;
use auth::TokenCodec;
use auth::TokenLifetimes;
use auth::TokenProvider;
use identity_service::config::Config;
use identity_service::config::StorageBackend;
use identity_service::domain::auth::ports::AuthServicePort;
use identity_service::domain::auth::service::AuthService;
use identity_service::inbound::http::router::create_router;
use identity_service::outbound::repositories::InMemoryRefreshTokenRepository;
use identity_service::outbound::repositories::InMemoryUserRepository;
use identity_service::outbound::repositories::PostgresRefreshTokenRepository;
use identity_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "identity_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "identity-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        storage_backend = ?config.storage.backend,
        access_expiration_ms = config.jwt.access_expiration_ms,
        refresh_expiration_ms = config.jwt.refresh_expiration_ms,
        "Configuration loaded"
    );

    let tokens = Arc::new(TokenCodec::new(
        config.jwt.secret.as_bytes(),
        TokenLifetimes::from_millis(
            config.jwt.access_expiration_ms,
            config.jwt.refresh_expiration_ms,
        ),
    ));
    let password_hasher = PasswordHasher::with_cost(
        config.password.memory_kib,
        config.password.iterations,
        config.password.parallelism,
    )?;

    let auth_service: Arc<dyn AuthServicePort> = match config.storage.backend {
        StorageBackend::Postgres => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(&config.database.url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            Arc::new(AuthService::new(
                Arc::new(PostgresUserRepository::new(pg_pool.clone())),
                Arc::new(PostgresRefreshTokenRepository::new(pg_pool)),
                password_hasher,
                Arc::clone(&tokens),
            ))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; all users and sessions are lost on exit");

            Arc::new(AuthService::new(
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryRefreshTokenRepository::new()),
                password_hasher,
                Arc::clone(&tokens),
            ))
        }
    };

    let tokens: Arc<dyn TokenProvider> = tokens;

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service, tokens);

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}
