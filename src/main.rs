use std::sync::Arc;

use learnpath_api::{
    config::Config,
    db::{self, InMemoryStore, PgStore},
    routes::{create_router, AppState},
    services::{CatalogReader, EnrollmentReader, Recommender},
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("learnpath_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    let settings = config.recommendation_settings();

    let (catalog, enrollments) = match &config.database_url {
        Some(database_url) => {
            let pool = db::create_pool(database_url).await?;
            db::run_migrations(&pool).await?;
            let store = Arc::new(PgStore::new(pool));
            tracing::info!("Connected to PostgreSQL");
            (
                store.clone() as Arc<dyn CatalogReader>,
                store as Arc<dyn EnrollmentReader>,
            )
        }
        None => {
            tracing::warn!("DATABASE_URL not set, serving from an empty in-memory store");
            let store = Arc::new(InMemoryStore::new());
            (
                store.clone() as Arc<dyn CatalogReader>,
                store as Arc<dyn EnrollmentReader>,
            )
        }
    };

    tracing::info!(
        completion_threshold = settings.completion_threshold,
        trending_window_days = settings.trending_window_days,
        max_results = settings.max_results,
        "Recommendation engine configured"
    );

    let state = AppState::new(Recommender::new(catalog, enrollments, settings));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!(address = %config.bind_address(), "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
