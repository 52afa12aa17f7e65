use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tripwise_core::domain::trip::TripRequest;
use tripwise_core::itinerary::fallback::fallback_itinerary;
use tripwise_core::llm::gemini::GeminiClient;
use tripwise_core::planner::TripPlanner;
use tripwise_core::storage::ItineraryStore;

#[derive(Debug, Parser)]
#[command(name = "tripwise", about = "Plan a trip itinerary from the command line")]
struct Args {
    /// Place to travel to, e.g. "Lisbon, Portugal".
    #[arg(long)]
    destination: String,

    /// Total budget as free text, e.g. "$1400".
    #[arg(long)]
    budget: String,

    /// Trip length in days (1-30).
    #[arg(long)]
    days: String,

    /// Validate input and print the offline template itinerary without calling any API.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = tripwise_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    let request = TripRequest::new(args.destination, args.budget, args.days);

    if args.dry_run {
        let trip = request.validate()?;
        tracing::info!(destination = %trip.destination, days = trip.days, dry_run = true, "printing template itinerary");
        let itinerary = fallback_itinerary(&trip.destination, &trip.budget, trip.days);
        println!("{}", serde_json::to_string_pretty(&itinerary)?);
        return Ok(());
    }

    let llm = Arc::new(GeminiClient::from_settings(&settings)?);
    let planner = TripPlanner::from_settings(&settings, llm, Arc::new(ItineraryStore::new()))?;

    match planner.plan(&request).await {
        Ok(planned) => {
            tracing::info!(id = %planned.id, days = planned.itinerary.days.len(), "itinerary generated");
            println!(
                "{}",
                serde_json::to_string_pretty(&planned).context("failed to serialize itinerary")?
            );
            Ok(())
        }
        Err(err) => {
            let err = anyhow::Error::new(err);
            sentry_anyhow::capture_anyhow(&err);
            tracing::error!(error = %err, "itinerary run failed");
            Err(err)
        }
    }
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
