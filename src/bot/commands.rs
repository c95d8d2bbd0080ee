use tracing::{debug, info};

use crate::fixtures::render::render_outcome;
use crate::fixtures::{FetchOutcome, MatchFetcher};

pub const HELP_TEXT: &str = "🤖 Goalixy\n\
اكتب: مباريات اليوم\n\
Type: matches today";

pub const HINT_TEXT: &str = "اكتب: مباريات اليوم\nType: matches today";

/// The fixed set of things the bot understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    TodayMatches,
    Help,
    Unknown,
}

const TODAY_PHRASES: &[&str] = &[
    "مباريات اليوم",
    "مباريات",
    "matches today",
    "today matches",
    "today's matches",
    "today",
    "matches",
];

const HELP_PHRASES: &[&str] = &["help", "مساعدة", "start", "/start"];

/// Trim, lowercase and collapse whitespace.
fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub fn parse_command(text: &str) -> Command {
    let normalized = normalize(text);
    if TODAY_PHRASES.contains(&normalized.as_str()) {
        Command::TodayMatches
    } else if HELP_PHRASES.contains(&normalized.as_str()) {
        Command::Help
    } else {
        Command::Unknown
    }
}

/// Turns an inbound command into the reply text.
#[derive(Clone)]
pub struct CommandHandler {
    fetcher: MatchFetcher,
    max_listed: usize,
}

impl CommandHandler {
    pub fn new(fetcher: MatchFetcher, max_listed: usize) -> Self {
        CommandHandler {
            fetcher,
            max_listed,
        }
    }

    pub fn fetcher(&self) -> &MatchFetcher {
        &self.fetcher
    }

    pub fn max_listed(&self) -> usize {
        self.max_listed
    }

    pub async fn reply(&self, sender_id: &str, text: &str) -> String {
        let command = parse_command(text);
        info!("Command from {}: {:?}", sender_id, command);
        match command {
            Command::TodayMatches => {
                let day = self.fetcher.today();
                let outcome = self.fetcher.fetch_for(day).await;
                if let FetchOutcome::Found(listing) = &outcome {
                    debug!(
                        "Answering with {} match(es) from {} (cached={})",
                        listing.records.len(),
                        listing.source,
                        listing.cached
                    );
                }
                render_outcome(&outcome, day, self.max_listed)
            }
            Command::Help => HELP_TEXT.to_string(),
            Command::Unknown => HINT_TEXT.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::cache::ManualClock;
    use crate::fixtures::failover::tests::{
        base, fetcher, provider, start, two_openliga_matches, Scripted, ScriptedTransport,
    };
    use crate::fixtures::models::{AuthMode, ProviderKind};
    use std::sync::Arc;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("مباريات اليوم"), Command::TodayMatches);
        assert_eq!(parse_command("  Matches   TODAY "), Command::TodayMatches);
        assert_eq!(parse_command("Help"), Command::Help);
        assert_eq!(parse_command("مساعدة"), Command::Help);
        assert_eq!(parse_command("who won yesterday?"), Command::Unknown);
        assert_eq!(parse_command(""), Command::Unknown);
    }

    fn handler(transport: Arc<ScriptedTransport>) -> CommandHandler {
        let clock = ManualClock::new(start());
        let providers = vec![provider("Gamma", ProviderKind::OpenLigaDb, AuthMode::None, None)];
        CommandHandler::new(fetcher(providers, transport, &clock), 1)
    }

    #[tokio::test]
    async fn test_today_reply_lists_matches() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.route(&base("Gamma"), Scripted::Json(two_openliga_matches()));

        let reply = handler(transport).reply("psid", "matches today").await;
        assert!(reply.contains("Source: Gamma"));
        assert!(reply.contains("1. [Gamma] Bayern vs Mainz (2-0)"));
        assert!(reply.contains("and 1 more"));
    }

    #[tokio::test]
    async fn test_today_reply_when_everything_fails() {
        let transport = Arc::new(ScriptedTransport::default());
        let reply = handler(transport).reply("psid", "مباريات اليوم").await;
        assert!(reply.contains("try again later"));
    }

    #[tokio::test]
    async fn test_unknown_command_gets_hint_without_fetching() {
        let transport = Arc::new(ScriptedTransport::default());
        let reply = handler(transport.clone()).reply("psid", "hello").await;
        assert_eq!(reply, HINT_TEXT);
        assert_eq!(transport.call_count(), 0);
    }
}
