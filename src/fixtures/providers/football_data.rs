//! football-data.org v4.
//! Docs: <https://docs.football-data.org/general/v4/match.html>
//!
//! Auth: `X-Auth-Token` header. Dates only as a `dateFrom`/`dateTo` range.

use serde_json::Value;

use crate::fixtures::models::{MatchRecord, UNKNOWN_SCORE};
use crate::fixtures::provider::{
    first_array, first_int, first_text, kickoff_text, score_from_parts, team_or_placeholder,
    MatchAdapter, ParseContext, ParseFailure,
};

const MATCHES: &[&str] = &["matches"];
const HOME_TEAM: &[&str] = &["homeTeam.name", "homeTeam.shortName", "homeTeam.tla"];
const AWAY_TEAM: &[&str] = &["awayTeam.name", "awayTeam.shortName", "awayTeam.tla"];
/// `fullTime` is filled in live by the API; `halfTime` survives when it is not.
const HOME_GOALS: &[&str] = &["score.fullTime.home", "score.halfTime.home"];
const AWAY_GOALS: &[&str] = &["score.fullTime.away", "score.halfTime.away"];
const KICKOFF: &[&str] = &["utcDate"];
const COMPETITION: &[&str] = &["competition.name", "competition.code"];

pub struct FootballData;

impl MatchAdapter for FootballData {
    fn parse_response(
        &self,
        body: &Value,
        ctx: &ParseContext,
    ) -> Result<Vec<MatchRecord>, ParseFailure> {
        if !body.is_object() {
            return Err(ParseFailure::new("Football-Data: expected an object envelope"));
        }
        let matches = first_array(body, MATCHES).ok_or_else(|| {
            let message = first_text(body, &["message"]).unwrap_or_default();
            ParseFailure::new(format!("Football-Data: missing `matches` array {}", message))
        })?;

        Ok(matches
            .iter()
            .map(|m| MatchRecord {
                source: ctx.source.clone(),
                home_team: team_or_placeholder(m, HOME_TEAM),
                away_team: team_or_placeholder(m, AWAY_TEAM),
                score: score_from_parts(first_int(m, HOME_GOALS), first_int(m, AWAY_GOALS))
                    .unwrap_or_else(|| UNKNOWN_SCORE.to_string()),
                kickoff: kickoff_text(first_text(m, KICKOFF), ctx.tz),
                competition: first_text(m, COMPETITION),
            })
            .collect())
    }
}
