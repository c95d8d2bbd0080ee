use chrono_tz::Tz;
use clap::Parser;

use crate::fixtures::ProviderCredentials;

/// Messenger football bot with multi-provider fixture failover
#[derive(Parser, Debug, Clone)]
#[command(name = "goalixy-bot", version, about)]
pub struct Config {
    /// Webhook listen address
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:5000")]
    pub listen_addr: String,

    /// Token echoed back during the Messenger webhook handshake
    #[arg(long, env = "VERIFY_TOKEN")]
    pub verify_token: Option<String>,

    /// App secret for X-Hub-Signature-256 checks (unset disables the check)
    #[arg(long, env = "APP_SECRET")]
    pub app_secret: Option<String>,

    /// Page access token for the Send API and page feed
    #[arg(long, env = "FB_PAGE_TOKEN")]
    pub fb_page_token: Option<String>,

    /// Page ID announcements are posted to
    #[arg(long, env = "FB_PAGE_ID")]
    pub fb_page_id: Option<String>,

    /// Graph API base URL
    #[arg(
        long,
        env = "GRAPH_API_URL",
        default_value = "https://graph.facebook.com/v18.0"
    )]
    pub graph_api_url: String,

    /// Bearer token for POST /announce/today (unset disables the endpoint)
    #[arg(long, env = "ADMIN_TOKEN")]
    pub admin_token: Option<String>,

    /// OpenLigaDB league shortcut
    #[arg(long, env = "OPENLIGADB_LEAGUE", default_value = "bl1")]
    pub openligadb_league: String,

    /// football-data.org API key
    #[arg(long, env = "FOOTBALL_DATA_KEY")]
    pub football_data_key: Option<String>,

    /// API-Football (API-Sports) key
    #[arg(long, env = "API_FOOTBALL_KEY")]
    pub api_football_key: Option<String>,

    /// AllSportsAPI key
    #[arg(long, env = "ALLSPORTS_API_KEY")]
    pub allsports_api_key: Option<String>,

    /// ScoreBat video API token
    #[arg(long, env = "SCOREBAT_TOKEN")]
    pub scorebat_token: Option<String>,

    /// IANA time zone that defines "today" and kickoff times
    #[arg(long, env = "TIMEZONE", default_value = "Africa/Cairo")]
    pub timezone: String,

    /// How long a day's fixtures are reused before re-fetching
    #[arg(long, env = "CACHE_TTL_SECS", default_value = "120")]
    pub cache_ttl_secs: u64,

    /// Per-provider request timeout
    #[arg(long, env = "PROVIDER_TIMEOUT_SECS", default_value = "10")]
    pub provider_timeout_secs: u64,

    /// Maximum matches listed in one reply
    #[arg(long, env = "MAX_LISTED", default_value = "15")]
    pub max_listed: usize,

    /// Goal-watch polling interval; 0 disables goal announcements
    #[arg(long, env = "GOAL_WATCH_INTERVAL_SECS", default_value = "0")]
    pub goal_watch_interval_secs: u64,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.cache_ttl_secs == 0 {
            anyhow::bail!("cache_ttl_secs must be positive");
        }
        if self.provider_timeout_secs == 0 {
            anyhow::bail!("provider_timeout_secs must be positive");
        }
        if self.max_listed == 0 {
            anyhow::bail!("max_listed must be positive");
        }
        self.tz()?;
        Ok(())
    }

    pub fn tz(&self) -> anyhow::Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("unknown TIMEZONE '{}': {}", self.timezone, e))
    }

    pub fn provider_credentials(&self) -> ProviderCredentials {
        ProviderCredentials {
            openligadb_league: self.openligadb_league.clone(),
            football_data_key: self.football_data_key.clone(),
            api_football_key: self.api_football_key.clone(),
            allsports_key: self.allsports_api_key.clone(),
            scorebat_token: self.scorebat_token.clone(),
        }
    }
}
