//! OpenLigaDB: free, keyless Bundesliga data.
//! Docs: <https://api.openligadb.de/index.html>
//!
//! `getmatchdata/{league}` returns the current matchday as a bare JSON array.

use serde_json::Value;

use crate::fixtures::models::{MatchRecord, UNKNOWN_SCORE};
use crate::fixtures::provider::{
    first_int, first_text, kickoff_text, score_from_parts, team_or_placeholder, MatchAdapter,
    ParseContext, ParseFailure,
};

const HOME_TEAM: &[&str] = &["team1.teamName", "team1.shortName"];
const AWAY_TEAM: &[&str] = &["team2.teamName", "team2.shortName"];
/// The last entry in `matchResults` is the most recent (final after half-time).
const HOME_GOALS: &[&str] = &["matchResults.-1.pointsTeam1"];
const AWAY_GOALS: &[&str] = &["matchResults.-1.pointsTeam2"];
const KICKOFF: &[&str] = &["matchDateTimeUTC", "matchDateTime"];
const COMPETITION: &[&str] = &["leagueName"];

pub struct OpenLigaDb;

impl MatchAdapter for OpenLigaDb {
    fn parse_response(
        &self,
        body: &Value,
        ctx: &ParseContext,
    ) -> Result<Vec<MatchRecord>, ParseFailure> {
        let matches = body
            .as_array()
            .ok_or_else(|| ParseFailure::new("OpenLigaDB: expected a top-level array"))?;

        let records = matches
            .iter()
            .filter(|m| m.is_object())
            .map(|m| MatchRecord {
                source: ctx.source.clone(),
                home_team: team_or_placeholder(m, HOME_TEAM),
                away_team: team_or_placeholder(m, AWAY_TEAM),
                score: score_from_parts(first_int(m, HOME_GOALS), first_int(m, AWAY_GOALS))
                    .unwrap_or_else(|| UNKNOWN_SCORE.to_string()),
                kickoff: kickoff_text(first_text(m, KICKOFF), ctx.tz),
                competition: first_text(m, COMPETITION),
            })
            .collect();

        Ok(records)
    }
}
