//! Walks the provider registry in priority order until one source has fixtures.
//!
//! Policy per provider:
//! - keyed provider without a credential → skipped, no request
//! - transport failure or unexpected body shape → logged, next provider
//! - non-empty parse → accepted, walk stops
//! - empty parse → remembered as "confirmed empty", walk continues
//!
//! Confirmed-empty and non-empty results are cached for the day; a walk where
//! every provider failed is not, so the next request retries immediately.

use chrono::NaiveDate;
use chrono_tz::Tz;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::cache::{Clock, MatchCache};
use super::models::{FetchOutcome, MatchListing, MatchRecord, ProviderConfig};
use super::provider::{ParseContext, ParseFailure};
use super::providers::adapter_for;
use super::registry::ProviderRegistry;
use super::transport::{HttpTransport, TransportError};

/// Why a single provider attempt yielded nothing usable.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no credential configured")]
    CredentialMissing,
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Parse(#[from] ParseFailure),
}

/// Fetch-with-failover over every configured provider, fronted by the day cache.
#[derive(Clone)]
pub struct MatchFetcher {
    registry: Arc<ProviderRegistry>,
    transport: Arc<dyn HttpTransport>,
    cache: MatchCache,
    clock: Arc<dyn Clock>,
    tz: Tz,
}

impl MatchFetcher {
    pub fn new(
        registry: ProviderRegistry,
        transport: Arc<dyn HttpTransport>,
        cache: MatchCache,
        clock: Arc<dyn Clock>,
        tz: Tz,
    ) -> Self {
        MatchFetcher {
            registry: Arc::new(registry),
            transport,
            cache,
            clock,
            tz,
        }
    }

    /// Calendar day "now" falls on in the configured zone.
    pub fn today(&self) -> NaiveDate {
        self.clock.now().with_timezone(&self.tz).date_naive()
    }

    pub fn cache(&self) -> &MatchCache {
        &self.cache
    }

    /// Today's fixtures from the cache or the first provider that has any.
    pub async fn fetch_today(&self) -> FetchOutcome {
        self.fetch_for(self.today()).await
    }

    pub async fn fetch_for(&self, day: NaiveDate) -> FetchOutcome {
        if let Some(entry) = self.cache.get(day).await {
            debug!(
                "Cache hit for {} ({} matches from {})",
                day,
                entry.records.len(),
                entry.source
            );
            return FetchOutcome::Found(self.listing(entry.source, entry.records, true));
        }

        let mut confirmed_empty: Option<String> = None;

        for config in self.registry.iter() {
            match self.try_provider(config, day).await {
                Ok(records) if !records.is_empty() => {
                    info!(
                        "Provider '{}' returned {} matches for {}",
                        config.name,
                        records.len(),
                        day
                    );
                    self.cache.put(day, &config.name, records.clone()).await;
                    return FetchOutcome::Found(self.listing(config.name.clone(), records, false));
                }
                Ok(_) => {
                    info!("Provider '{}' reports no matches for {}", config.name, day);
                    if confirmed_empty.is_none() {
                        confirmed_empty = Some(config.name.clone());
                    }
                }
                Err(ProviderError::CredentialMissing) => {
                    debug!("Skipping provider '{}': no credential configured", config.name);
                }
                Err(ProviderError::Transport(e)) => {
                    warn!("Provider '{}' request failed: {}", config.name, e);
                }
                Err(ProviderError::Parse(e)) => {
                    warn!("Provider '{}' returned an unusable body: {}", config.name, e);
                }
            }
        }

        match confirmed_empty {
            Some(source) => {
                self.cache.put(day, &source, vec![]).await;
                FetchOutcome::Found(self.listing(source, vec![], false))
            }
            None => {
                warn!(
                    "No provider could answer for {} (tried {:?})",
                    day,
                    self.registry.names()
                );
                FetchOutcome::NoDataAvailable
            }
        }
    }

    fn listing(&self, source: String, records: Vec<MatchRecord>, cached: bool) -> MatchListing {
        let date_scoped = self
            .registry
            .get(&source)
            .map(ProviderConfig::is_date_scoped)
            .unwrap_or(true);
        MatchListing {
            source,
            records,
            cached,
            date_scoped,
        }
    }

    async fn try_provider(
        &self,
        config: &ProviderConfig,
        day: NaiveDate,
    ) -> Result<Vec<MatchRecord>, ProviderError> {
        if config.is_missing_credential() {
            return Err(ProviderError::CredentialMissing);
        }
        let adapter = adapter_for(config.kind);
        let request = adapter.build_request(config, day);
        let body = self.transport.get_json(&request).await?;
        let ctx = ParseContext {
            source: config.name.clone(),
            tz: self.tz,
        };
        Ok(adapter.parse_response(&body, &ctx)?)
    }
}
