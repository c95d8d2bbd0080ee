pub mod announce;
pub mod client;
pub mod watch;

pub use client::GraphClient;
pub use watch::start_goal_watch;

use anyhow::Result;
use async_trait::async_trait;

/// Delivers a chat reply to one user.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_text(&self, recipient_id: &str, text: &str) -> Result<()>;
}

/// Posts to the page's public feed. Returns the created post ID.
#[async_trait]
pub trait PagePublisher: Send + Sync {
    async fn publish_post(&self, text: &str) -> Result<String>;
}
