use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use travelbuddy::api::RestClient;
use travelbuddy::config::AppConfig;
use travelbuddy::error::AppError;
use travelbuddy::routes::create_router;
use travelbuddy::services::profiles::ProfileStore;
use travelbuddy::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;

    let profiles = ProfileStore::open(&config.storage_root).await?;
    info!("profile store at {}", profiles.path().display());

    let api = RestClient::new(&config.api_base_url, config.api_timeout)?;
    info!("using TravelBuddy API at {}", config.api_base_url);

    let state = AppState::new(config.clone(), Arc::new(api), profiles);
    let app = create_router(state);

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,travelbuddy=debug,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
