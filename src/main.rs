use rental_booking::{
    adapters::memory::InMemoryBookingStore,
    adapters::mock::{ItemDirectory as InMemoryItemDirectory, UserDirectory as InMemoryUserDirectory},
    adapters::postgres::PostgresBookingStore,
    api::{handlers::AppState, router::create_router},
    application::booking::ServiceDependencies,
    config::AppConfig,
    ports::{BookingStore, SystemClock},
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rental_booking=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // Booking store: PostgreSQL when DATABASE_URL is set, in-memory otherwise
    let booking_store: Arc<dyn BookingStore> = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Using PostgreSQL booking store");

            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .connect(database_url)
                .await?;

            sqlx::migrate!("./migrations").run(&pool).await?;

            Arc::new(PostgresBookingStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL is not set; bookings are kept in memory");
            Arc::new(InMemoryBookingStore::new())
        }
    };

    // User and item directories live in other services; in-memory stand-ins for now
    let service_deps = ServiceDependencies {
        booking_store,
        user_directory: Arc::new(InMemoryUserDirectory::new()),
        item_directory: Arc::new(InMemoryItemDirectory::new()),
        clock: Arc::new(SystemClock),
    };

    // Create application state
    let app_state = Arc::new(AppState { service_deps });

    // Create router
    let app = create_router(app_state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app).await?;

    Ok(())
}
