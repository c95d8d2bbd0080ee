use chrono::NaiveDate;
use std::fmt::Write;

use super::models::{FetchOutcome, MatchListing, MatchRecord};

pub const NO_DATA_MESSAGE: &str =
    "⚠️ تعذر جلب المباريات حالياً، حاول لاحقاً\nCouldn't fetch matches right now, please try again later.";

/// One line: `N. [Source] Home vs Away (score) 🕒 kickoff · competition`.
pub fn render_record(index: usize, record: &MatchRecord) -> String {
    let mut line = format!(
        "{}. [{}] {} vs {} ({}) 🕒 {}",
        index, record.source, record.home_team, record.away_team, record.score, record.kickoff
    );
    if let Some(comp) = &record.competition {
        let _ = write!(line, " · {}", comp);
    }
    line
}

/// Numbered listing capped at `max_listed` lines, always naming the source.
///
/// Sources that answer with their current matchday rather than the asked-for
/// day get a "latest fixtures" header, since their list may span other days.
pub fn render_listing(listing: &MatchListing, day: NaiveDate, max_listed: usize) -> String {
    if listing.is_confirmed_empty() {
        let headline = if listing.date_scoped {
            "📅 لا توجد مباريات اليوم\nNo matches today"
        } else {
            "📅 لا توجد مباريات حالية\nNo current fixtures"
        };
        return format!(
            "{} ({})\nالمصدر | Source: {}",
            headline, day, listing.source
        );
    }

    let mut out = if listing.date_scoped {
        format!(
            "📅 مباريات اليوم | Today's matches ({})\nالمصدر | Source: {}\n",
            day, listing.source
        )
    } else {
        format!(
            "📅 أحدث المباريات | Latest fixtures (as of {})\nالمصدر | Source: {}\n",
            day, listing.source
        )
    };
    for (i, record) in listing.records.iter().take(max_listed).enumerate() {
        out.push('\n');
        out.push_str(&render_record(i + 1, record));
    }
    let hidden = listing.records.len().saturating_sub(max_listed);
    if hidden > 0 {
        let _ = write!(out, "\n\n… و {} مباريات أخرى | and {} more", hidden, hidden);
    }
    out
}

pub fn render_outcome(outcome: &FetchOutcome, day: NaiveDate, max_listed: usize) -> String {
    match outcome {
        FetchOutcome::Found(listing) => render_listing(listing, day, max_listed),
        FetchOutcome::NoDataAvailable => NO_DATA_MESSAGE.to_string(),
    }
}
