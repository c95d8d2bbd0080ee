//! Background goal watch: polls today's fixtures and posts each goal to the page feed.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{announce, PagePublisher};
use crate::fixtures::{FetchOutcome, GoalDetector, MatchFetcher};

/// Spawns a background task that re-reads today's fixtures every
/// `poll_interval` and posts a bilingual announcement to the page feed for
/// every goal it sees.
///
/// Reads go through the fetcher, so the cache TTL bounds upstream traffic
/// regardless of how short the interval is.
pub fn start_goal_watch(
    fetcher: MatchFetcher,
    publisher: Arc<dyn PagePublisher>,
    poll_interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        info!("Goal watch started (interval={:?})", poll_interval);

        let mut detector = GoalDetector::new();
        let mut interval = tokio::time::interval(poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            poll_once(&fetcher, &mut detector, publisher.as_ref()).await;
        }
    })
}

/// One watch cycle. Returns how many goal posts went out.
async fn poll_once(
    fetcher: &MatchFetcher,
    detector: &mut GoalDetector,
    publisher: &dyn PagePublisher,
) -> usize {
    let listing = match fetcher.fetch_today().await {
        FetchOutcome::Found(listing) => listing,
        FetchOutcome::NoDataAvailable => return 0,
    };

    let mut posted = 0;
    for event in detector.observe(&listing.records) {
        info!(
            "Goal: {} {}-{} {}",
            event.home_team, event.home_score, event.away_score, event.away_team
        );
        let post = announce::goal(&event).render();
        match publisher.publish_post(&post).await {
            Ok(_) => posted += 1,
            Err(e) => warn!("Failed to post goal announcement: {}", e),
        }
    }
    detector.retain_only(&listing.records);
    debug!("Goal watch tracking {} match(es)", detector.tracked());
    posted
}
