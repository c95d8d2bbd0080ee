use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

mod bot;
mod config;
mod fixtures;
mod messenger;
mod webhook;

use bot::CommandHandler;
use config::Config;
use fixtures::{
    Clock, MatchCache, MatchFetcher, ProviderRegistry, ReqwestTransport, SystemClock,
};
use messenger::{start_goal_watch, GraphClient};
use webhook::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;
    let tz = config.tz()?;

    // Provider lineup, in priority order
    let registry = ProviderRegistry::from_credentials(&config.provider_credentials());
    info!(
        "Configured {} provider(s), enabled: {:?}",
        registry.len(),
        registry.enabled_names()
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let ttl = chrono::Duration::seconds(config.cache_ttl_secs as i64);
    let cache = MatchCache::new(ttl, Arc::clone(&clock));
    let transport = ReqwestTransport::new(Duration::from_secs(config.provider_timeout_secs))?;
    let fetcher = MatchFetcher::new(registry, Arc::new(transport), cache.clone(), clock, tz);
    info!(
        "Fixture cache TTL {}s, time zone {}",
        cache.ttl().num_seconds(),
        tz
    );

    let graph = Arc::new(GraphClient::new(
        &config.graph_api_url,
        config.fb_page_id.clone(),
        config.fb_page_token.clone(),
    )?);
    if !graph.can_send() {
        warn!("FB_PAGE_TOKEN not set – replies will be logged but not delivered");
    }

    // Goal announcements to the page feed
    if config.goal_watch_interval_secs > 0 {
        if graph.can_publish() {
            start_goal_watch(
                fetcher.clone(),
                graph.clone(),
                Duration::from_secs(config.goal_watch_interval_secs),
            );
        } else {
            warn!("Goal watch needs FB_PAGE_ID and FB_PAGE_TOKEN – disabled");
        }
    }

    // Stale cache sweep; reads never serve expired entries, this only frees memory
    {
        let cache = cache.clone();
        let every = Duration::from_secs(config.cache_ttl_secs.max(60) * 10);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                let purged = cache.purge_expired().await;
                if purged > 0 {
                    info!(
                        "Purged {} expired cache entr(ies), {} remain",
                        purged,
                        cache.len().await
                    );
                }
            }
        });
    }

    let state = AppState {
        handler: CommandHandler::new(fetcher, config.max_listed),
        sender: graph.clone(),
        publisher: graph,
        verify_token: config.verify_token.clone(),
        app_secret: config.app_secret.clone(),
        admin_token: config.admin_token.clone(),
    };
    if state.verify_token.is_none() {
        warn!("VERIFY_TOKEN not set – webhook subscription cannot be verified");
    }

    let app = webhook::router(state);
    let addr: SocketAddr = config.listen_addr.parse()?;
    info!("Webhook listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
