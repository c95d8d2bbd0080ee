//! AllSportsAPI football fixtures.
//! Docs: <https://allsportsapi.com/soccer-football-socket-documentation>
//!
//! Auth: `APIkey` query parameter, `met=Fixtures`, `from`/`to` range.
//! A day without fixtures comes back as `{"success": 1}` with no `result` key.

use serde_json::Value;

use crate::fixtures::models::{MatchRecord, UNKNOWN_SCORE};
use crate::fixtures::provider::{
    first_array, first_int, first_text, kickoff_text, team_or_placeholder, MatchAdapter,
    ParseContext, ParseFailure,
};

const EVENTS: &[&str] = &["result"];
/// Names only; `home_team_key`/`away_team_key` are numeric ids, not names
const HOME_TEAM: &[&str] = &["event_home_team"];
const AWAY_TEAM: &[&str] = &["event_away_team"];
const SCORE: &[&str] = &["event_final_result", "event_ft_result", "event_halftime_result"];
const KICKOFF: &[&str] = &["event_time"];
const COMPETITION: &[&str] = &["league_name", "country_name"];

pub struct AllSportsApi;

/// "2 - 1" → "2-1"; " - " and "" → unknown.
fn normalize_score(raw: Option<String>) -> String {
    let Some(raw) = raw else {
        return UNKNOWN_SCORE.to_string();
    };
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let mut parts = compact.splitn(2, '-');
    match (parts.next(), parts.next()) {
        (Some(h), Some(a)) if !h.is_empty() && !a.is_empty() => format!("{}-{}", h, a),
        _ => UNKNOWN_SCORE.to_string(),
    }
}

impl MatchAdapter for AllSportsApi {
    fn parse_response(
        &self,
        body: &Value,
        ctx: &ParseContext,
    ) -> Result<Vec<MatchRecord>, ParseFailure> {
        if !body.is_object() {
            return Err(ParseFailure::new("AllSportsAPI: expected an object envelope"));
        }
        if first_int(body, &["success"]) != Some(1) {
            return Err(ParseFailure::new(format!(
                "AllSportsAPI: request not successful: {}",
                body.get("error").cloned().unwrap_or(Value::Null)
            )));
        }
        let events = match body.get("result") {
            None | Some(Value::Null) => return Ok(vec![]),
            Some(_) => first_array(body, EVENTS)
                .ok_or_else(|| ParseFailure::new("AllSportsAPI: `result` is not a list"))?,
        };

        Ok(events
            .iter()
            .map(|ev| MatchRecord {
                source: ctx.source.clone(),
                home_team: team_or_placeholder(ev, HOME_TEAM),
                away_team: team_or_placeholder(ev, AWAY_TEAM),
                score: normalize_score(first_text(ev, SCORE)),
                kickoff: kickoff_text(first_text(ev, KICKOFF), ctx.tz),
                competition: first_text(ev, COMPETITION),
            })
            .collect())
    }
}
