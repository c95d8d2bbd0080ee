//! ScoreBat video API v3 feed.
//! Docs: <https://www.scorebat.com/video-api/>
//!
//! Auth: `token` query parameter. The feed lists recent matches with
//! highlights, keyed by a "Home - Away" title; it never carries a score.

use serde_json::Value;

use crate::fixtures::models::{MatchRecord, UNKNOWN_SCORE, UNKNOWN_TEAM};
use crate::fixtures::provider::{
    first_array, first_text, kickoff_text, MatchAdapter, ParseContext, ParseFailure,
};

/// v3 puts the list directly under `response`; older payloads nest it in `response.list`.
const ITEMS: &[&str] = &["response", "response.list"];
const TITLE: &[&str] = &["title", "name"];
const KICKOFF: &[&str] = &["date"];
const COMPETITION: &[&str] = &["competition", "competition.name"];
const TITLE_SEPARATORS: &[&str] = &[" - ", " vs ", " v "];

pub struct ScoreBat;

fn split_title(title: &str) -> Option<(String, String)> {
    TITLE_SEPARATORS.iter().find_map(|sep| {
        let (home, away) = title.split_once(sep)?;
        let (home, away) = (home.trim(), away.trim());
        if home.is_empty() || away.is_empty() {
            None
        } else {
            Some((home.to_string(), away.to_string()))
        }
    })
}

impl MatchAdapter for ScoreBat {
    fn parse_response(
        &self,
        body: &Value,
        ctx: &ParseContext,
    ) -> Result<Vec<MatchRecord>, ParseFailure> {
        if !body.is_object() {
            return Err(ParseFailure::new("ScoreBat: expected an object envelope"));
        }
        let items = first_array(body, ITEMS)
            .ok_or_else(|| ParseFailure::new("ScoreBat: missing `response` list"))?;

        Ok(items
            .iter()
            .map(|item| {
                let (home_team, away_team) = first_text(item, TITLE)
                    .and_then(|t| split_title(&t))
                    .unwrap_or_else(|| (UNKNOWN_TEAM.to_string(), UNKNOWN_TEAM.to_string()));
                MatchRecord {
                    source: ctx.source.clone(),
                    home_team,
                    away_team,
                    score: UNKNOWN_SCORE.to_string(),
                    kickoff: kickoff_text(first_text(item, KICKOFF), ctx.tz),
                    competition: first_text(item, COMPETITION),
                }
            })
            .collect())
    }
}
