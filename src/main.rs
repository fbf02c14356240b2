use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coursehub::backend::BackendHttpClient;
use coursehub::config::AppConfig;
use coursehub::routes::router;
use coursehub::state::AppState;
use coursehub::storage::S3UploadSigner;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "coursehub=debug,tower_http=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    info!("proxying to {}", config.backend.base_url);

    let backend = Arc::new(BackendHttpClient::new(config.backend.clone())?);
    let mut state = AppState::new(backend);

    match &config.storage {
        Some(storage) => {
            state = state.with_uploads(Arc::new(S3UploadSigner::new(storage)?));
            info!("pre-signed uploads enabled for bucket {}", storage.bucket);
        }
        None => warn!("S3 settings incomplete; upload routes will answer 503"),
    }
    if let Some(media) = config.media.clone() {
        state = state.with_media(media);
    }

    let app = router(state);

    info!("listening on http://{}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
