use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tripwise_core::assistant::ChatAssistant;
use tripwise_core::geo::maptiler::MapTilerClient;
use tripwise_core::geo::Geocoder;
use tripwise_core::llm::gemini::GeminiClient;
use tripwise_core::llm::LlmClient;
use tripwise_core::planner::TripPlanner;
use tripwise_core::storage::ItineraryStore;

mod error;
mod routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = tripwise_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let store = Arc::new(ItineraryStore::new());

    let llm: Option<Arc<dyn LlmClient>> = match GeminiClient::from_settings(&settings) {
        Ok(client) => {
            tracing::info!(model = client.model(), "Gemini client ready");
            Some(Arc::new(client))
        }
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "AI provider unavailable; starting API in degraded mode");
            None
        }
    };

    let planner = llm.clone().and_then(|llm| {
        match TripPlanner::from_settings(&settings, llm, store.clone()) {
            Ok(planner) => Some(Arc::new(planner)),
            Err(e) => {
                sentry_anyhow::capture_anyhow(&e);
                tracing::error!(error = %e, "trip planner unavailable; starting API in degraded mode");
                None
            }
        }
    });
    let assistant = llm.map(|llm| Arc::new(ChatAssistant::new(llm)));

    let maps: Option<Arc<dyn Geocoder>> = match MapTilerClient::from_settings(&settings) {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            sentry_anyhow::capture_anyhow(&e);
            tracing::error!(error = %e, "map provider unavailable; map endpoint disabled");
            None
        }
    };

    let state = routes::AppState {
        store,
        planner,
        assistant,
        maps,
    };
    let app = routes::router(state);

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "api listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

fn init_sentry(settings: &tripwise_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
