use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use super::{MessageSender, PagePublisher};

/// Send API rejects texts longer than this.
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Client for the Facebook Graph API: Messenger Send API and page feed.
#[derive(Clone)]
pub struct GraphClient {
    http: Client,
    api_url: String,
    page_id: Option<String>,
    page_token: Option<String>,
}

impl GraphClient {
    pub fn new(api_url: &str, page_id: Option<String>, page_token: Option<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(GraphClient {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            page_id: page_id.filter(|s| !s.is_empty()),
            page_token: page_token.filter(|s| !s.is_empty()),
        })
    }

    /// Whether replies can be delivered at all.
    pub fn can_send(&self) -> bool {
        self.page_token.is_some()
    }

    /// Whether page feed posts are possible.
    pub fn can_publish(&self) -> bool {
        self.page_token.is_some() && self.page_id.is_some()
    }
}

/// Cut `text` to the Send API limit on a char boundary.
pub fn clamp_message(text: &str) -> String {
    if text.chars().count() <= MAX_MESSAGE_CHARS {
        return text.to_string();
    }
    let mut out: String = text.chars().take(MAX_MESSAGE_CHARS - 1).collect();
    out.push('…');
    out
}

#[async_trait]
impl MessageSender for GraphClient {
    async fn send_text(&self, recipient_id: &str, text: &str) -> Result<()> {
        let Some(token) = self.page_token.as_deref() else {
            debug!("No page token configured; dropping reply to {}", recipient_id);
            return Ok(());
        };

        let payload = serde_json::json!({
            "recipient": { "id": recipient_id },
            "messaging_type": "RESPONSE",
            "message": { "text": clamp_message(text) },
        });

        let url = format!("{}/me/messages", self.api_url);
        let resp = self
            .http
            .post(&url)
            .query(&[("access_token", token)])
            .json(&payload)
            .send()
            .await
            .context("Send API request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Send API error {}: {}", status, body);
        }
        Ok(())
    }
}

#[async_trait]
impl PagePublisher for GraphClient {
    async fn publish_post(&self, text: &str) -> Result<String> {
        let (Some(page_id), Some(token)) = (self.page_id.as_deref(), self.page_token.as_deref())
        else {
            anyhow::bail!("page posting requires FB_PAGE_ID and FB_PAGE_TOKEN");
        };

        let url = format!("{}/{}/feed", self.api_url, page_id);
        let resp = self
            .http
            .post(&url)
            .query(&[("access_token", token)])
            .json(&serde_json::json!({ "message": text }))
            .send()
            .await
            .context("Page feed request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Page feed error {}: {}", status, body);
        }

        let result: serde_json::Value = resp.json().await?;
        let post_id = result["id"].as_str().unwrap_or("unknown").to_string();
        info!("Published page post, id={}", post_id);
        Ok(post_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_send_text_posts_to_send_api() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/me/messages"))
            .and(query_param("access_token", "page-token"))
            .and(body_json(json!({
                "recipient": {"id": "psid-1"},
                "messaging_type": "RESPONSE",
                "message": {"text": "hello"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message_id": "m1"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = GraphClient::new(&server.uri(), None, Some("page-token".into())).unwrap();
        client.send_text("psid-1", "hello").await.unwrap();
    }

    #[tokio::test]
    async fn test_send_without_token_is_noop() {
        let client = GraphClient::new("http://127.0.0.1:9", None, None).unwrap();
        assert!(!client.can_send());
        client.send_text("psid-1", "hello").await.unwrap();
    }

    #[tokio::test]
    async fn test_send_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad psid"))
            .mount(&server)
            .await;

        let client = GraphClient::new(&server.uri(), None, Some("t".into())).unwrap();
        let err = client.send_text("x", "hi").await.unwrap_err();
        assert!(err.to_string().contains("400"));
    }

    #[tokio::test]
    async fn test_publish_post_returns_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/12345/feed"))
            .and(body_json(json!({"message": "⚽ GOAL!"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "12345_678"})))
            .expect(1)
            .mount(&server)
            .await;

        let client =
            GraphClient::new(&server.uri(), Some("12345".into()), Some("t".into())).unwrap();
        assert!(client.can_publish());
        assert_eq!(client.publish_post("⚽ GOAL!").await.unwrap(), "12345_678");
    }

    #[tokio::test]
    async fn test_publish_requires_page_id() {
        let client = GraphClient::new("http://127.0.0.1:9", None, Some("t".into())).unwrap();
        assert!(client.publish_post("x").await.is_err());
    }

    #[test]
    fn test_clamp_message() {
        let long = "م".repeat(MAX_MESSAGE_CHARS + 10);
        let clamped = clamp_message(&long);
        assert_eq!(clamped.chars().count(), MAX_MESSAGE_CHARS);
        assert!(clamped.ends_with('…'));
        assert_eq!(clamp_message("short"), "short");
    }
}
