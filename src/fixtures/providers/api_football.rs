//! API-Football (API-Sports) v3 fixtures.
//! Docs: <https://www.api-football.com/documentation-v3#tag/Fixtures>
//!
//! Auth: `x-apisports-key` header. Free tier: 100 req/day.
//! Quota and key problems come back as HTTP 200 with a non-empty `errors`.

use serde_json::Value;

use crate::fixtures::models::{MatchRecord, UNKNOWN_SCORE};
use crate::fixtures::provider::{
    first_array, first_int, first_text, kickoff_text, lookup, score_from_parts,
    team_or_placeholder, MatchAdapter, ParseContext, ParseFailure,
};

const FIXTURES: &[&str] = &["response"];
const HOME_TEAM: &[&str] = &["teams.home.name"];
const AWAY_TEAM: &[&str] = &["teams.away.name"];
const HOME_GOALS: &[&str] = &["goals.home", "score.fulltime.home"];
const AWAY_GOALS: &[&str] = &["goals.away", "score.fulltime.away"];
const KICKOFF: &[&str] = &["fixture.date"];
const COMPETITION: &[&str] = &["league.name"];

pub struct ApiFootball;

fn has_errors(body: &Value) -> bool {
    match lookup(body, "errors") {
        Some(Value::Object(map)) => !map.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        _ => false,
    }
}

impl MatchAdapter for ApiFootball {
    fn parse_response(
        &self,
        body: &Value,
        ctx: &ParseContext,
    ) -> Result<Vec<MatchRecord>, ParseFailure> {
        if !body.is_object() {
            return Err(ParseFailure::new("API-Football: expected an object envelope"));
        }
        if has_errors(body) {
            return Err(ParseFailure::new(format!(
                "API-Football: errors reported: {}",
                body["errors"]
            )));
        }
        let fixtures = first_array(body, FIXTURES)
            .ok_or_else(|| ParseFailure::new("API-Football: missing `response` array"))?;

        Ok(fixtures
            .iter()
            .map(|f| MatchRecord {
                source: ctx.source.clone(),
                home_team: team_or_placeholder(f, HOME_TEAM),
                away_team: team_or_placeholder(f, AWAY_TEAM),
                score: score_from_parts(first_int(f, HOME_GOALS), first_int(f, AWAY_GOALS))
                    .unwrap_or_else(|| UNKNOWN_SCORE.to_string()),
                kickoff: kickoff_text(first_text(f, KICKOFF), ctx.tz),
                competition: first_text(f, COMPETITION),
            })
            .collect())
    }
}
