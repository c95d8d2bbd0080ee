use chrono::{DateTime, Utc};

/// Placeholder for a score the provider did not report.
pub const UNKNOWN_SCORE: &str = "?-?";
/// Placeholder for a missing kickoff time.
pub const UNKNOWN_KICKOFF: &str = "TBD";
/// Placeholder for a missing team name.
pub const UNKNOWN_TEAM: &str = "Unknown";

/// One fixture, normalized from whichever provider reported it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    /// Name of the provider that reported this fixture
    pub source: String,
    pub home_team: String,
    pub away_team: String,
    /// Free-form, e.g. "2-1", or `UNKNOWN_SCORE`
    pub score: String,
    /// "HH:MM" in the configured zone, raw provider text, or `UNKNOWN_KICKOFF`
    pub kickoff: String,
    pub competition: Option<String>,
}

/// A provider's answer for one day: the records it returned, tagged with its name.
/// An empty `records` means the provider confirmed there are no fixtures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchListing {
    pub source: String,
    pub records: Vec<MatchRecord>,
    /// True when served from the result cache
    pub cached: bool,
    /// False when the source picks its own window (e.g. the current matchday)
    /// instead of answering for the requested day
    pub date_scoped: bool,
}

impl MatchListing {
    pub fn is_confirmed_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Result of one orchestrator invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Found(MatchListing),
    /// Every provider failed at the transport or parse level.
    NoDataAvailable,
}

/// How a provider expects its credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthMode {
    None,
    /// Credential goes in the named request header
    Header(String),
    /// Credential goes in the named query parameter
    Query(String),
}

/// How a provider expects the target date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateParams {
    /// Provider decides what "current" means
    None,
    Single(String),
    /// Providers that only expose range queries get the same date twice
    Range { from: String, to: String },
}

/// Selects the adapter that understands a provider's wire shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenLigaDb,
    FootballData,
    ApiFootball,
    AllSportsApi,
    ScoreBat,
}

/// Static descriptor for one upstream data source.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub name: String,
    pub kind: ProviderKind,
    pub base_url: String,
    /// Appended to `base_url`; `{date}` is replaced with the formatted target date
    pub path: String,
    pub auth: AuthMode,
    pub credential: Option<String>,
    pub date_params: DateParams,
    /// strftime pattern, only used when a date is sent
    pub date_format: String,
    /// Fixed parameters every request carries
    pub static_query: Vec<(String, String)>,
}

impl ProviderConfig {
    /// Whether requests carry the target date.
    pub fn is_date_scoped(&self) -> bool {
        self.date_params != DateParams::None || self.path.contains("{date}")
    }

    /// A provider that needs a credential but has none configured is skipped.
    pub fn is_missing_credential(&self) -> bool {
        self.auth != AuthMode::None
            && self
                .credential
                .as_deref()
                .map(|c| c.trim().is_empty())
                .unwrap_or(true)
    }
}

/// A fully-resolved GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    /// Base URL plus resolved path, without the query string
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
}

#[cfg(test)]
impl RequestSpec {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// What the cache stores for one day.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub captured_at: DateTime<Utc>,
    pub source: String,
    pub records: Vec<MatchRecord>,
}
