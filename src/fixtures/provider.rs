use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde_json::Value;
use thiserror::Error;

use super::models::{
    AuthMode, DateParams, MatchRecord, ProviderConfig, RequestSpec, UNKNOWN_KICKOFF, UNKNOWN_TEAM,
};

/// The response body did not have the envelope this provider documents.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unexpected response shape: {0}")]
pub struct ParseFailure(pub String);

impl ParseFailure {
    pub fn new(msg: impl Into<String>) -> Self {
        ParseFailure(msg.into())
    }
}

/// Per-call context handed to a parser.
#[derive(Debug, Clone)]
pub struct ParseContext {
    /// Provider name stamped on every record
    pub source: String,
    /// Zone used to render kickoff times
    pub tz: Tz,
}

/// Translates between one provider's wire shape and `MatchRecord`.
pub trait MatchAdapter: Send + Sync {
    /// Build the GET request for `date`. Providers with extra quirks override this.
    fn build_request(&self, config: &ProviderConfig, date: NaiveDate) -> RequestSpec {
        build_request(config, date)
    }

    /// Parse a decoded JSON body. An empty `Vec` means "confirmed no fixtures".
    fn parse_response(
        &self,
        body: &Value,
        ctx: &ParseContext,
    ) -> Result<Vec<MatchRecord>, ParseFailure>;
}

/// Resolve auth, date parameters and path template into a request.
pub fn build_request(config: &ProviderConfig, date: NaiveDate) -> RequestSpec {
    let formatted = date.format(&config.date_format).to_string();
    let path = config.path.replace("{date}", &formatted);
    let url = format!("{}{}", config.base_url.trim_end_matches('/'), path);

    let mut headers = Vec::new();
    let mut query = config.static_query.clone();

    match &config.date_params {
        DateParams::None => {}
        DateParams::Single(name) => query.push((name.clone(), formatted.clone())),
        DateParams::Range { from, to } => {
            query.push((from.clone(), formatted.clone()));
            query.push((to.clone(), formatted));
        }
    }

    if let Some(credential) = config.credential.as_deref() {
        match &config.auth {
            AuthMode::None => {}
            AuthMode::Header(name) => headers.push((name.clone(), credential.to_string())),
            AuthMode::Query(name) => query.push((name.clone(), credential.to_string())),
        }
    }

    RequestSpec { url, headers, query }
}

// ── Field alias helpers ──────────────────────────────────────────────────────
//
// Each adapter lists the accepted dotted paths for a logical attribute, most
// specific first. A numeric path segment indexes into an array; `-1` means the
// last element.

/// Follow a dotted path such as `"matchResults.-1.pointsTeam1"`.
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => {
                let idx: i64 = segment.parse().ok()?;
                let idx = if idx < 0 {
                    items.len().checked_sub(idx.unsigned_abs() as usize)?
                } else {
                    idx as usize
                };
                items.get(idx)?
            }
            _ => return None,
        };
    }
    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// First alias that resolves to a non-empty string or a number, as text.
pub fn first_text(value: &Value, aliases: &[&str]) -> Option<String> {
    aliases.iter().find_map(|path| match lookup(value, path)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// First alias that resolves to an array.
pub fn first_array<'a>(value: &'a Value, aliases: &[&str]) -> Option<&'a Vec<Value>> {
    aliases
        .iter()
        .find_map(|path| lookup(value, path).and_then(Value::as_array))
}

/// First alias that resolves to an integer, accepting numeric strings.
pub fn first_int(value: &Value, aliases: &[&str]) -> Option<i64> {
    aliases.iter().find_map(|path| {
        let v = lookup(value, path)?;
        v.as_i64()
            .or_else(|| v.as_str().and_then(|s| s.trim().parse().ok()))
    })
}

pub fn team_or_placeholder(value: &Value, aliases: &[&str]) -> String {
    first_text(value, aliases).unwrap_or_else(|| UNKNOWN_TEAM.to_string())
}

/// "h-a" when both sides are known, otherwise `None`.
pub fn score_from_parts(home: Option<i64>, away: Option<i64>) -> Option<String> {
    match (home, away) {
        (Some(h), Some(a)) => Some(format!("{}-{}", h, a)),
        _ => None,
    }
}

/// Render a provider timestamp as local "HH:MM".
///
/// RFC 3339 and `+0000`-style offsets are converted into `tz`; naive "YYYY-MM-DDTHH:MM:SS" values
/// are taken as already local. Anything else is passed through verbatim.
pub fn kickoff_text(raw: Option<String>, tz: Tz) -> String {
    let Some(raw) = raw else {
        return UNKNOWN_KICKOFF.to_string();
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return ts.with_timezone(&Utc).with_timezone(&tz).format("%H:%M").to_string();
    }
    if let Ok(ts) = DateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%z") {
        return ts.with_timezone(&Utc).with_timezone(&tz).format("%H:%M").to_string();
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S") {
        return naive.format("%H:%M").to_string();
    }
    raw
}
