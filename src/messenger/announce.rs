//! Bilingual (Arabic first, then English) page announcements.

use chrono::NaiveDate;

use crate::fixtures::render::render_record;
use crate::fixtures::{GoalEvent, MatchListing, ScoringSide};

const HASHTAGS: &str = "#Goalixy #كرة_القدم #Football";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub headline_ar: String,
    pub headline_en: String,
    pub body_ar: Vec<String>,
    pub body_en: Vec<String>,
    /// Lines shared by both languages, e.g. team names or a fixture list
    pub shared: Vec<String>,
}

impl Announcement {
    pub fn render(&self) -> String {
        let mut blocks = Vec::new();

        let mut ar = vec![self.headline_ar.clone()];
        ar.extend(self.body_ar.iter().cloned());
        blocks.push(ar.join("\n"));

        let mut en = vec![self.headline_en.clone()];
        en.extend(self.body_en.iter().cloned());
        blocks.push(en.join("\n"));

        if !self.shared.is_empty() {
            blocks.push(self.shared.join("\n"));
        }
        blocks.push(HASHTAGS.to_string());
        blocks.join("\n\n")
    }
}

/// "⚽ هدف! / GOAL!" post for one scoreline change.
pub fn goal(event: &GoalEvent) -> Announcement {
    let scorer = match event.side {
        ScoringSide::Home => &event.home_team,
        ScoringSide::Away => &event.away_team,
    };
    let line = format!(
        "{} {}-{} {}",
        event.home_team, event.home_score, event.away_score, event.away_team
    );
    let mut shared = vec![line];
    if let Some(comp) = &event.competition {
        shared.push(format!("🏆 {}", comp));
    }
    Announcement {
        headline_ar: "⚽ هدف!".into(),
        headline_en: "⚽ GOAL!".into(),
        body_ar: vec![format!("سجّل {}", scorer)],
        body_en: vec![format!("{} score!", scorer)],
        shared,
    }
}

/// Today's fixture list as a page post, capped like a chat reply.
pub fn fixtures(listing: &MatchListing, day: NaiveDate, max_listed: usize) -> Announcement {
    let shared = listing
        .records
        .iter()
        .take(max_listed)
        .enumerate()
        .map(|(i, r)| render_record(i + 1, r))
        .collect::<Vec<_>>();

    if shared.is_empty() {
        let (headline_ar, headline_en) = if listing.date_scoped {
            (
                format!("📅 لا توجد مباريات اليوم ({})", day),
                format!("📅 No matches today ({})", day),
            )
        } else {
            (
                format!("📅 لا توجد مباريات حالية ({})", day),
                format!("📅 No current fixtures ({})", day),
            )
        };
        return Announcement {
            headline_ar,
            headline_en,
            body_ar: vec![],
            body_en: vec![],
            shared: vec![],
        };
    }

    let (headline_ar, headline_en) = if listing.date_scoped {
        (
            format!("📅 مباريات اليوم ({})", day),
            format!("📅 Today's matches ({})", day),
        )
    } else {
        (
            format!("📅 أحدث المباريات ({})", day),
            format!("📅 Latest fixtures (as of {})", day),
        )
    };
    Announcement {
        headline_ar,
        headline_en,
        body_ar: vec![format!("المصدر: {}", listing.source)],
        body_en: vec![format!("Source: {}", listing.source)],
        shared,
    }
}
