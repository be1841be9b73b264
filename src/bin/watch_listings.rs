//! Polls a listings search and logs listings that appear while it runs.
//!
//! Usage: `watch_listings [QUERY]`, e.g. `watch_listings "type=rent&offer=true"`.
//! `APP_PUBLIC_URL` selects the server (defaults to `http://localhost:8080`)
//! and `APP_WATCH_INTERVAL_SECS` the polling period.

use std::env;
use std::time::Duration;

use dotenvy::dotenv;

use squarefeet::client::{ListingsClient, NewListingsWatcher, WatcherConfig};
use squarefeet::domain::filter::FilterState;

#[tokio::main]
async fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let base_url = env::var("APP_PUBLIC_URL").unwrap_or_else(|_| "http://localhost:8080".into());
    let mut config = WatcherConfig::default();
    if let Some(secs) = env::var("APP_WATCH_INTERVAL_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
    {
        config.interval = Duration::from_secs(secs);
    }

    // Normalise the query the same way the search page does.
    let raw_query = env::args().nth(1).unwrap_or_default();
    let query = FilterState::decode(&raw_query)
        .map(|state| state.encode())
        .unwrap_or_else(|| FilterState::default().encode());

    let client = match ListingsClient::new(&base_url) {
        Ok(client) => client,
        Err(err) => {
            log::error!("Error building HTTP client: {err}");
            std::process::exit(1);
        }
    };

    let (mut watcher, mut new_listings) =
        NewListingsWatcher::new(client.clone(), query.clone(), config);
    log::info!(
        "Watching {base_url} for `{query}` every {}s",
        config.interval.as_secs()
    );
    watcher.start();

    loop {
        tokio::select! {
            ids = new_listings.recv() => {
                let Some(ids) = ids else { break };
                for id in ids {
                    match client.get_listing(id.get()).await {
                        Ok(listing) => log::info!(
                            "New listing #{}: {} ({}, {})",
                            listing.id,
                            listing.name,
                            listing.listing_type,
                            listing.regular_price
                        ),
                        Err(err) => log::warn!("New listing #{id} could not be loaded: {err}"),
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                log::info!("Stopping listings watcher");
                break;
            }
        }
    }

    watcher.stop();
}
