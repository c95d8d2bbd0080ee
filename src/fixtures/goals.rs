use std::collections::HashMap;

use super::models::MatchRecord;

/// Which side scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringSide {
    Home,
    Away,
}

/// A scoreline increase between two snapshots of the same match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalEvent {
    pub side: ScoringSide,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
    pub competition: Option<String>,
}

/// "2-1" → (2, 1). Placeholders and free text give `None`.
pub fn parse_score(score: &str) -> Option<(u32, u32)> {
    let (h, a) = score.split_once('-')?;
    Some((h.trim().parse().ok()?, a.trim().parse().ok()?))
}

fn match_key(record: &MatchRecord) -> String {
    format!("{}|{}|{}", record.source, record.home_team, record.away_team)
}

/// Remembers the last known score per match and reports increases.
#[derive(Debug, Default)]
pub struct GoalDetector {
    last: HashMap<String, (u32, u32)>,
}

impl GoalDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compare `records` against the previous snapshot.
    ///
    /// The first sighting of a match only seeds the snapshot. A score that
    /// goes down (provider correction) updates silently.
    pub fn observe(&mut self, records: &[MatchRecord]) -> Vec<GoalEvent> {
        let mut events = Vec::new();
        for record in records {
            let Some((home, away)) = parse_score(&record.score) else {
                continue;
            };
            let key = match_key(record);
            if let Some(&(prev_home, prev_away)) = self.last.get(&key) {
                // Both sides can score between two polls; each gets its own event
                let sides = [
                    (home > prev_home, ScoringSide::Home),
                    (away > prev_away, ScoringSide::Away),
                ];
                for (_, side) in sides.into_iter().filter(|(scored, _)| *scored) {
                    events.push(GoalEvent {
                        side,
                        home_team: record.home_team.clone(),
                        away_team: record.away_team.clone(),
                        home_score: home,
                        away_score: away,
                        competition: record.competition.clone(),
                    });
                }
            }
            self.last.insert(key, (home, away));
        }
        events
    }

    /// Forget every match not in `records`, so finished days do not pile up.
    pub fn retain_only(&mut self, records: &[MatchRecord]) {
        let live: std::collections::HashSet<String> = records.iter().map(match_key).collect();
        self.last.retain(|k, _| live.contains(k));
    }

    pub fn tracked(&self) -> usize {
        self.last.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(home: u32, away: u32) -> MatchRecord {
        MatchRecord {
            source: "Football-Data".into(),
            home_team: "Arsenal".into(),
            away_team: "Chelsea".into(),
            score: format!("{}-{}", home, away),
            kickoff: "17:30".into(),
            competition: Some("Premier League".into()),
        }
    }

    #[test]
    fn test_first_sighting_is_silent() {
        let mut d = GoalDetector::new();
        assert!(d.observe(&[game(1, 0)]).is_empty());
        assert_eq!(d.tracked(), 1);
    }

    #[test]
    fn test_detect_no_change() {
        let mut d = GoalDetector::new();
        d.observe(&[game(1, 0)]);
        assert!(d.observe(&[game(1, 0)]).is_empty());
    }

    #[test]
    fn test_detect_home_goal() {
        let mut d = GoalDetector::new();
        d.observe(&[game(0, 0)]);
        let events = d.observe(&[game(1, 0)]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].side, ScoringSide::Home);
        assert_eq!((events[0].home_score, events[0].away_score), (1, 0));
    }

    #[test]
    fn test_detect_away_goal() {
        let mut d = GoalDetector::new();
        d.observe(&[game(1, 0)]);
        let events = d.observe(&[game(1, 1)]);
        assert_eq!(events[0].side, ScoringSide::Away);
    }

    #[test]
    fn test_both_sides_scoring_between_polls() {
        let mut d = GoalDetector::new();
        d.observe(&[game(0, 0)]);
        let events = d.observe(&[game(1, 1)]);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].side, ScoringSide::Home);
        assert_eq!(events[1].side, ScoringSide::Away);
        assert!(events.iter().all(|e| (e.home_score, e.away_score) == (1, 1)));
    }

    #[test]
    fn test_correction_on_one_side_still_reports_the_other() {
        let mut d = GoalDetector::new();
        d.observe(&[game(2, 0)]);
        let events = d.observe(&[game(1, 1)]);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].side, ScoringSide::Away);
    }

    #[test]
    fn test_correction_downwards_is_silent() {
        let mut d = GoalDetector::new();
        d.observe(&[game(2, 0)]);
        assert!(d.observe(&[game(1, 0)]).is_empty());
        // next increase is measured from the corrected score
        assert_eq!(d.observe(&[game(2, 0)]).len(), 1);
    }

    #[test]
    fn test_unknown_scores_are_ignored() {
        let mut d = GoalDetector::new();
        let mut g = game(0, 0);
        g.score = "?-?".into();
        assert!(d.observe(&[g]).is_empty());
        assert_eq!(d.tracked(), 0);
    }

    #[test]
    fn test_retain_only_drops_missing() {
        let mut d = GoalDetector::new();
        let mut other = game(0, 0);
        other.home_team = "Spurs".into();
        d.observe(&[game(0, 0), other]);
        d.retain_only(&[game(0, 0)]);
        assert_eq!(d.tracked(), 1);
    }

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score("3-2"), Some((3, 2)));
        assert_eq!(parse_score(" 1 - 0 "), Some((1, 0)));
        assert_eq!(parse_score("?-?"), None);
        assert_eq!(parse_score("TBD"), None);
    }
}
