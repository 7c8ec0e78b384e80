use product_api::{
    AppState,
    config::{AppConfig, Env},
    create_router,
    repository::{MongoProductRepository, RepositoryState},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Loads configuration, sets up logging, connects to MongoDB and serves the router.
#[tokio::main]
async fn main() {
    // 1. Configuration. `.env` is optional; every variable has a development default.
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging. RUST_LOG wins over the defaults below.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "product_api=debug,tower_http=info".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);

    if config.env == Env::Production && config.uses_dev_token() {
        tracing::warn!("API_TOKEN is not set; mutating routes accept the development token");
    }

    // 3. Persistence. One client for the whole process; the driver pools connections.
    let repo = MongoProductRepository::connect(&config.mongo_url, &config.database_name)
        .await
        .expect("FATAL: Failed to connect to MongoDB. Check MONGO_URL.");
    let repo = Arc::new(repo) as RepositoryState;

    tracing::info!(database = %config.database_name, "MongoDB connection established");

    // 4. Router and server.
    let bind_addr = config.bind_addr.clone();
    let app = create_router(AppState { repo, config });

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: Failed to bind BIND_ADDR.");

    tracing::info!("Listening on {}", bind_addr);

    axum::serve(listener, app)
        .await
        .expect("FATAL: HTTP server terminated unexpectedly.");
}
