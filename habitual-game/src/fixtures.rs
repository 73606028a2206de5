//! Single round-robin fixture scheduling.
use serde::{Deserialize, Serialize};

use crate::match_sim::{MatchOutcome, MatchResult};

/// A scheduled match, optionally carrying its result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    pub matchday: u32,
    pub home_team_id: String,
    pub away_team_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<MatchResult>,
}

impl Fixture {
    #[must_use]
    pub fn new(matchday: u32, home_team_id: impl Into<String>, away_team_id: impl Into<String>) -> Self {
        Self {
            matchday,
            home_team_id: home_team_id.into(),
            away_team_id: away_team_id.into(),
            result: None,
        }
    }

    #[must_use]
    pub const fn is_played(&self) -> bool {
        self.result.is_some()
    }

    #[must_use]
    pub fn involves(&self, team_id: &str) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }

    #[must_use]
    pub fn opponent_of(&self, team_id: &str) -> Option<&str> {
        if self.home_team_id == team_id {
            Some(&self.away_team_id)
        } else if self.away_team_id == team_id {
            Some(&self.home_team_id)
        } else {
            None
        }
    }

    /// Outcome for `team_id`, if the fixture is played and involves the team.
    #[must_use]
    pub fn outcome_for(&self, team_id: &str) -> Option<MatchOutcome> {
        let result = self.result?;
        if self.home_team_id == team_id {
            Some(result.home_outcome())
        } else if self.away_team_id == team_id {
            Some(result.away_outcome())
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot<'a> {
    Team(&'a str),
    Bye,
}

/// Matchdays needed for a single round-robin of `team_count` teams.
#[must_use]
pub fn matchday_count(team_count: usize) -> u32 {
    let count = u32::try_from(team_count).unwrap_or(u32::MAX);
    match count {
        0 | 1 => 0,
        n if n % 2 == 0 => n - 1,
        n => n,
    }
}

/// Schedule every pair of `team_ids` exactly once.
///
/// Uses the circle method: slot 0 stays put while the others rotate one
/// position per matchday. Odd counts are padded with a bye; whoever draws the
/// bye is idle that matchday and no fixture is emitted for it. The fixed slot
/// alternates home and away by matchday and every other pairing by board
/// position, so home counts differ by at most one (two with a bye). Ids are
/// expected to be distinct.
#[must_use]
pub fn generate_fixtures(team_ids: &[String]) -> Vec<Fixture> {
    if team_ids.len() < 2 {
        return Vec::new();
    }

    let mut slots: Vec<Slot<'_>> = team_ids.iter().map(|id| Slot::Team(id)).collect();
    if slots.len() % 2 != 0 {
        slots.push(Slot::Bye);
    }
    let size = slots.len();
    let rounds = size - 1;
    let mut fixtures = Vec::with_capacity(team_ids.len() * (team_ids.len() - 1) / 2);

    for round in 0..rounds {
        let matchday = u32::try_from(round + 1).unwrap_or(u32::MAX);
        for i in 0..size / 2 {
            let (Slot::Team(first), Slot::Team(second)) = (slots[i], slots[size - 1 - i]) else {
                continue;
            };
            let first_at_home = if i == 0 { round % 2 == 1 } else { i % 2 == 1 };
            let (home, away) = if first_at_home {
                (first, second)
            } else {
                (second, first)
            };
            fixtures.push(Fixture::new(matchday, home, away));
        }
        slots[1..].rotate_right(1);
    }

    fixtures
}

/// Fixtures scheduled on `matchday`, in schedule order.
pub fn fixtures_for_matchday(fixtures: &[Fixture], matchday: u32) -> impl Iterator<Item = &Fixture> {
    fixtures.iter().filter(move |fixture| fixture.matchday == matchday)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    fn ids(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("team-{i}")).collect()
    }

    #[test]
    fn every_pair_meets_once() {
        for count in 2..=12 {
            let teams = ids(count);
            let fixtures = generate_fixtures(&teams);
            assert_eq!(fixtures.len(), count * (count - 1) / 2, "count {count}");

            let mut pairs = HashSet::new();
            for fixture in &fixtures {
                assert_ne!(fixture.home_team_id, fixture.away_team_id);
                let mut pair = [fixture.home_team_id.clone(), fixture.away_team_id.clone()];
                pair.sort();
                assert!(pairs.insert(pair), "pair repeated for count {count}");
            }

            let max_day = fixtures.iter().map(|f| f.matchday).max().unwrap();
            assert_eq!(max_day, matchday_count(count));
        }
    }

    #[test]
    fn one_match_per_team_per_matchday() {
        let teams = ids(7);
        let fixtures = generate_fixtures(&teams);
        let mut seen: HashMap<(u32, &str), usize> = HashMap::new();
        for fixture in &fixtures {
            *seen.entry((fixture.matchday, fixture.home_team_id.as_str())).or_default() += 1;
            *seen.entry((fixture.matchday, fixture.away_team_id.as_str())).or_default() += 1;
        }
        assert!(seen.values().all(|&n| n == 1));
        // With 7 teams each matchday has exactly one idle team.
        for day in 1..=7 {
            assert_eq!(fixtures_for_matchday(&fixtures, day).count(), 3);
        }
    }

    #[test]
    fn fixtures_are_grouped_by_matchday() {
        let fixtures = generate_fixtures(&ids(6));
        assert!(fixtures.windows(2).all(|w| w[0].matchday <= w[1].matchday));
        assert!(fixtures.iter().all(|f| !f.is_played()));
    }

    #[test]
    fn home_games_are_spread() {
        for count in 2..=16 {
            let teams = ids(count);
            let fixtures = generate_fixtures(&teams);
            let mut home: HashMap<&str, u32> = HashMap::new();
            for fixture in &fixtures {
                *home.entry(fixture.home_team_id.as_str()).or_default() += 1;
            }
            let counts: Vec<u32> = teams
                .iter()
                .map(|id| home.get(id.as_str()).copied().unwrap_or(0))
                .collect();
            let spread = counts.iter().max().unwrap() - counts.iter().min().unwrap();
            let allowed = if count % 2 == 0 { 1 } else { 2 };
            assert!(spread <= allowed, "count {count}: home counts {counts:?}");
        }
    }

    #[test]
    fn degenerate_rosters_have_no_fixtures() {
        assert!(generate_fixtures(&[]).is_empty());
        assert!(generate_fixtures(&ids(1)).is_empty());
        assert_eq!(matchday_count(0), 0);
        assert_eq!(matchday_count(5), 5);
        assert_eq!(matchday_count(10), 9);
    }

    #[test]
    fn fixture_perspective_helpers() {
        let mut fixture = Fixture::new(1, "a", "b");
        assert_eq!(fixture.opponent_of("a"), Some("b"));
        assert_eq!(fixture.opponent_of("z"), None);
        assert_eq!(fixture.outcome_for("a"), None);
        fixture.result = Some(MatchResult::new(0, 2));
        assert_eq!(fixture.outcome_for("a"), Some(MatchOutcome::Loss));
        assert_eq!(fixture.outcome_for("b"), Some(MatchOutcome::Win));
        assert!(fixture.involves("b"));
    }

    #[test]
    fn unplayed_fixture_omits_result_in_json() {
        let json = serde_json::to_string(&Fixture::new(3, "a", "b")).unwrap();
        assert_eq!(json, r#"{"matchday":3,"homeTeamId":"a","awayTeamId":"b"}"#);
    }
}
