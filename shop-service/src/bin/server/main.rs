use std::sync::Arc;

use auth::Authenticator;
use shop_service::config::Config;
use shop_service::config::StorageBackend;
use shop_service::inbound::http::router::create_router;
use shop_service::inbound::http::router::AppState;
use shop_service::outbound::repositories::InMemoryStore;
use shop_service::outbound::repositories::PostgresAccountRepository;
use shop_service::outbound::repositories::PostgresCartRepository;
use shop_service::outbound::repositories::PostgresCatalog;
use shop_service::outbound::repositories::PostgresOrderRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shop_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "shop-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        storage = config.storage.backend.as_str(),
        session_hours = config.jwt.expiration_hours,
        "Configuration loaded"
    );

    let authenticator = Arc::new(Authenticator::with_session_hours(
        config.jwt.secret.as_bytes(),
        config.jwt.expiration_hours,
    ));

    let state = match config.storage.backend {
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

            AppState::new(
                Arc::new(PostgresAccountRepository::new(pg_pool.clone())),
                Arc::new(PostgresCartRepository::new(pg_pool.clone())),
                Arc::new(PostgresOrderRepository::new(pg_pool.clone())),
                Arc::new(PostgresCatalog::new(pg_pool)),
                authenticator,
                StorageBackend::Postgres,
            )
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; state is lost on restart");
            let store = Arc::new(InMemoryStore::new());

            AppState::new(
                Arc::clone(&store),
                Arc::clone(&store),
                Arc::clone(&store),
                store,
                authenticator,
                StorageBackend::Memory,
            )
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, create_router(state)).await?;
    tracing::info!("Server exited");

    Ok(())
}
