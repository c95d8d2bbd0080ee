pub mod signature;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::bot::CommandHandler;
use crate::fixtures::FetchOutcome;
use crate::messenger::{announce, MessageSender, PagePublisher};
use signature::{verify_signature, SIGNATURE_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub handler: CommandHandler,
    pub sender: Arc<dyn MessageSender>,
    pub publisher: Arc<dyn PagePublisher>,
    /// Token the platform echoes back during subscription
    pub verify_token: Option<String>,
    /// When set, every POST must carry a valid X-Hub-Signature-256
    pub app_secret: Option<String>,
    /// Bearer token for the announcement endpoint; unset disables it
    pub admin_token: Option<String>,
}

/// Build the Axum router for the webhook.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/webhook", get(verify_handler).post(receive_handler))
        .route("/announce/today", post(announce_today_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

// ── Inbound payload ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
struct WebhookPayload {
    #[serde(default)]
    entry: Vec<Entry>,
}

#[derive(Debug, Deserialize, Default)]
struct Entry {
    #[serde(default)]
    messaging: Vec<MessagingEvent>,
}

#[derive(Debug, Deserialize)]
struct MessagingEvent {
    sender: Option<Party>,
    message: Option<IncomingMessage>,
}

#[derive(Debug, Deserialize)]
struct Party {
    id: String,
}

#[derive(Debug, Deserialize)]
struct IncomingMessage {
    text: Option<String>,
    #[serde(default)]
    is_echo: bool,
}

/// (sender, text) pairs worth answering: text messages that are not our own echoes.
fn extract_commands(payload: WebhookPayload) -> Vec<(String, String)> {
    payload
        .entry
        .into_iter()
        .flat_map(|e| e.messaging)
        .filter_map(|ev| {
            let sender = ev.sender?.id;
            let message = ev.message?;
            if message.is_echo {
                return None;
            }
            Some((sender, message.text?))
        })
        .collect()
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /webhook?hub.mode=subscribe&hub.verify_token=...&hub.challenge=...
async fn verify_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let mode = params.get("hub.mode").map(String::as_str);
    let token = params.get("hub.verify_token").map(String::as_str);
    let challenge = params.get("hub.challenge").cloned().unwrap_or_default();

    match (mode, token, state.verify_token.as_deref()) {
        (Some("subscribe"), Some(given), Some(expected)) if given == expected => {
            info!("Webhook subscription verified");
            (StatusCode::OK, challenge)
        }
        _ => {
            warn!("Webhook verification rejected");
            (StatusCode::FORBIDDEN, "Forbidden".to_string())
        }
    }
}

/// POST /webhook
async fn receive_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    if let Some(secret) = state.app_secret.as_deref() {
        let header = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok());
        if let Err(e) = verify_signature(secret, &body, header) {
            warn!("Rejected webhook POST: {}", e);
            return (StatusCode::FORBIDDEN, "Forbidden");
        }
    }

    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(p) => p,
        Err(e) => {
            warn!("Malformed webhook body: {}", e);
            return (StatusCode::BAD_REQUEST, "Bad Request");
        }
    };

    for (sender_id, text) in extract_commands(payload) {
        let reply = state.handler.reply(&sender_id, &text).await;
        // Delivery is best-effort; a failed send never fails the webhook
        if let Err(e) = state.sender.send_text(&sender_id, &reply).await {
            warn!("Failed to send reply to {}: {}", sender_id, e);
        } else {
            debug!("Replied to {}", sender_id);
        }
    }

    (StatusCode::OK, "ok")
}

/// POST /announce/today: publish today's fixtures to the page feed.
async fn announce_today_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let Some(expected) = state.admin_token.as_deref() else {
        return Err((StatusCode::NOT_FOUND, "Not Found".into()));
    };
    let given = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    if given != Some(expected) {
        return Err((StatusCode::UNAUTHORIZED, "Unauthorized".into()));
    }

    let fetcher = state.handler.fetcher();
    let day = fetcher.today();
    let listing = match fetcher.fetch_for(day).await {
        FetchOutcome::Found(listing) => listing,
        FetchOutcome::NoDataAvailable => {
            return Err((
                StatusCode::SERVICE_UNAVAILABLE,
                "no provider could answer".into(),
            ))
        }
    };

    let post = announce::fixtures(&listing, day, state.handler.max_listed()).render();
    state
        .publisher
        .publish_post(&post)
        .await
        .map(|post_id| Json(serde_json::json!({ "post_id": post_id })))
        .map_err(|e| (StatusCode::BAD_GATEWAY, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::cache::ManualClock;
    use crate::fixtures::failover::tests::{
        base, fetcher, provider, start, two_openliga_matches, Scripted, ScriptedTransport,
    };
    use crate::fixtures::models::{AuthMode, ProviderKind};
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::sync::Mutex;
    use tower::ServiceExt;

    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<(String, String)>>,
        posts: Mutex<Vec<String>>,
        fail: bool,
    }

    #[async_trait]
    impl MessageSender for Recorder {
        async fn send_text(&self, recipient_id: &str, text: &str) -> anyhow::Result<()> {
            self.sent
                .lock()
                .unwrap()
                .push((recipient_id.to_string(), text.to_string()));
            if self.fail {
                anyhow::bail!("send api down");
            }
            Ok(())
        }
    }

    #[async_trait]
    impl PagePublisher for Recorder {
        async fn publish_post(&self, text: &str) -> anyhow::Result<String> {
            self.posts.lock().unwrap().push(text.to_string());
            Ok("page_1".into())
        }
    }

    fn app(recorder: Arc<Recorder>, app_secret: Option<&str>) -> Router {
        let transport = Arc::new(ScriptedTransport::default());
        transport.route(&base("Gamma"), Scripted::Json(two_openliga_matches()));
        let clock = ManualClock::new(start());
        let providers = vec![provider("Gamma", ProviderKind::OpenLigaDb, AuthMode::None, None)];
        router(AppState {
            handler: CommandHandler::new(fetcher(providers, transport, &clock), 10),
            sender: recorder.clone(),
            publisher: recorder,
            verify_token: Some("verify-me".into()),
            app_secret: app_secret.map(str::to_string),
            admin_token: Some("admin".into()),
        })
    }

    fn message_body(text: &str) -> String {
        serde_json::json!({
            "object": "page",
            "entry": [{
                "id": "page",
                "messaging": [
                    {"sender": {"id": "user-1"}, "message": {"text": text}},
                    {"sender": {"id": "page"}, "message": {"text": "echo", "is_echo": true}},
                    {"sender": {"id": "user-2"}, "delivery": {"watermark": 1}}
                ]
            }]
        })
        .to_string()
    }

    async fn body_text(resp: axum::response::Response) -> String {
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_verify_handshake() {
        let app = app(Arc::new(Recorder::default()), None);
        let resp = app
            .oneshot(
                Request::get("/webhook?hub.mode=subscribe&hub.verify_token=verify-me&hub.challenge=42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_text(resp).await, "42");
    }

    #[tokio::test]
    async fn test_verify_wrong_token_forbidden() {
        let app = app(Arc::new(Recorder::default()), None);
        let resp = app
            .oneshot(
                Request::get("/webhook?hub.mode=subscribe&hub.verify_token=nope&hub.challenge=42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_message_gets_listing_reply() {
        let recorder = Arc::new(Recorder::default());
        let resp = app(recorder.clone(), None)
            .oneshot(
                Request::post("/webhook")
                    .header("content-type", "application/json")
                    .body(Body::from(message_body("مباريات اليوم")))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let sent = recorder.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1, "echoes and deliveries are ignored");
        assert_eq!(sent[0].0, "user-1");
        assert!(sent[0].1.contains("[Gamma] Bayern vs Mainz"));
    }

    #[tokio::test]
    async fn test_failed_send_still_acknowledged() {
        let recorder = Arc::new(Recorder {
            fail: true,
            ..Default::default()
        });
        let resp = app(recorder.clone(), None)
            .oneshot(
                Request::post("/webhook")
                    .body(Body::from(message_body("help")))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(recorder.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_signature_enforced_when_secret_set() {
        let recorder = Arc::new(Recorder::default());
        let body = message_body("today");

        let unsigned = app(recorder.clone(), Some("app-secret"))
            .oneshot(Request::post("/webhook").body(Body::from(body.clone())).unwrap())
            .await
            .unwrap();
        assert_eq!(unsigned.status(), StatusCode::FORBIDDEN);
        assert!(recorder.sent.lock().unwrap().is_empty());

        let signed = app(recorder.clone(), Some("app-secret"))
            .oneshot(
                Request::post("/webhook")
                    .header(SIGNATURE_HEADER, signature::sign("app-secret", body.as_bytes()))
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(signed.status(), StatusCode::OK);
        assert_eq!(recorder.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let resp = app(Arc::new(Recorder::default()), None)
            .oneshot(Request::post("/webhook").body(Body::from("{not json")).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_announce_requires_bearer() {
        let recorder = Arc::new(Recorder::default());
        let resp = app(recorder.clone(), None)
            .oneshot(
                Request::post("/announce/today")
                    .header("authorization", "Bearer wrong")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(recorder.posts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_announce_today_posts_bilingual_listing() {
        let recorder = Arc::new(Recorder::default());
        let resp = app(recorder.clone(), None)
            .oneshot(
                Request::post("/announce/today")
                    .header("authorization", "Bearer admin")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_text(resp).await.contains("page_1"));

        let posts = recorder.posts.lock().unwrap().clone();
        assert_eq!(posts.len(), 1);
        assert!(posts[0].contains("مباريات اليوم"));
        assert!(posts[0].contains("Today's matches"));
        assert!(posts[0].contains("Bayern vs Mainz"));
    }

    #[tokio::test]
    async fn test_health() {
        let resp = app(Arc::new(Recorder::default()), None)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(body_text(resp).await, "ok");
    }
}
