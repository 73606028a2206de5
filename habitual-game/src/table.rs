//! League table accumulation and ranking.
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::constants::{POINTS_FOR_DRAW, POINTS_FOR_WIN};
use crate::data::AiTeam;
use crate::error::CareerError;
use crate::fixtures::Fixture;
use crate::match_sim::MatchOutcome;

/// One row of the standings.
///
/// Counters only move through [`TableEntry::record`], which keeps goal
/// difference and points in step with the raw tallies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableEntry {
    team_id: String,
    team_name: String,
    is_player: bool,
    played: u32,
    wins: u32,
    draws: u32,
    losses: u32,
    goals_for: u32,
    goals_against: u32,
    goal_difference: i32,
    points: u32,
}

impl TableEntry {
    /// A zeroed row.
    #[must_use]
    pub fn new(team_id: impl Into<String>, team_name: impl Into<String>, is_player: bool) -> Self {
        Self {
            team_id: team_id.into(),
            team_name: team_name.into(),
            is_player,
            played: 0,
            wins: 0,
            draws: 0,
            losses: 0,
            goals_for: 0,
            goals_against: 0,
            goal_difference: 0,
            points: 0,
        }
    }

    /// A row with prior tallies, deriving played, goal difference and points.
    #[must_use]
    pub fn with_record(
        team_id: impl Into<String>,
        team_name: impl Into<String>,
        wins: u32,
        draws: u32,
        losses: u32,
        goals_for: u32,
        goals_against: u32,
    ) -> Self {
        let mut entry = Self::new(team_id, team_name, false);
        entry.wins = wins;
        entry.draws = draws;
        entry.losses = losses;
        entry.played = wins + draws + losses;
        entry.goals_for = goals_for;
        entry.goals_against = goals_against;
        entry.refresh_derived();
        entry
    }

    /// Fold one match into this row.
    pub fn record(&mut self, scored: u8, conceded: u8) {
        self.played += 1;
        self.goals_for += u32::from(scored);
        self.goals_against += u32::from(conceded);
        match scored.cmp(&conceded) {
            Ordering::Greater => self.wins += 1,
            Ordering::Equal => self.draws += 1,
            Ordering::Less => self.losses += 1,
        }
        self.refresh_derived();
    }

    #[allow(clippy::cast_possible_wrap)]
    fn refresh_derived(&mut self) {
        self.goal_difference = self.goals_for as i32 - self.goals_against as i32;
        self.points = self.wins * POINTS_FOR_WIN + self.draws * POINTS_FOR_DRAW;
    }

    #[must_use]
    pub fn team_id(&self) -> &str {
        &self.team_id
    }

    #[must_use]
    pub fn team_name(&self) -> &str {
        &self.team_name
    }

    #[must_use]
    pub const fn is_player(&self) -> bool {
        self.is_player
    }

    #[must_use]
    pub const fn played(&self) -> u32 {
        self.played
    }

    #[must_use]
    pub const fn wins(&self) -> u32 {
        self.wins
    }

    #[must_use]
    pub const fn draws(&self) -> u32 {
        self.draws
    }

    #[must_use]
    pub const fn losses(&self) -> u32 {
        self.losses
    }

    #[must_use]
    pub const fn goals_for(&self) -> u32 {
        self.goals_for
    }

    #[must_use]
    pub const fn goals_against(&self) -> u32 {
        self.goals_against
    }

    #[must_use]
    pub const fn goal_difference(&self) -> i32 {
        self.goal_difference
    }

    #[must_use]
    pub const fn points(&self) -> u32 {
        self.points
    }

    /// `wins + draws + losses == played` and the derived columns agree.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn is_consistent(&self) -> bool {
        self.wins + self.draws + self.losses == self.played
            && self.goal_difference == self.goals_for as i32 - self.goals_against as i32
            && self.points == self.wins * POINTS_FOR_WIN + self.draws * POINTS_FOR_DRAW
    }
}

/// Zeroed standings for a league roster plus the player's club, roster first.
#[must_use]
pub fn initial_table(roster: &[AiTeam], player_team: &str) -> Vec<TableEntry> {
    roster
        .iter()
        .map(|team| TableEntry::new(&team.id, &team.name, false))
        .chain(std::iter::once(TableEntry::new(player_team, player_team, true)))
        .collect()
}

/// Ranking order: points, then goal difference, then goals scored, all descending.
#[must_use]
pub fn compare_standing(a: &TableEntry, b: &TableEntry) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.goal_difference.cmp(&a.goal_difference))
        .then_with(|| b.goals_for.cmp(&a.goals_for))
}

/// Stable sort; rows tied on every key keep their prior order.
pub fn sort_standings(entries: &mut [TableEntry]) {
    entries.sort_by(compare_standing);
}

/// Fold a resolved fixture into `entries` without re-ranking.
///
/// # Errors
///
/// Returns an error if the fixture has no result or names a team absent from
/// the table.
pub fn record_fixture(entries: &mut [TableEntry], fixture: &Fixture) -> Result<(), CareerError> {
    let Some(result) = fixture.result else {
        return Err(CareerError::UnplayedFixture {
            matchday: fixture.matchday,
            home: fixture.home_team_id.clone(),
            away: fixture.away_team_id.clone(),
        });
    };
    let home = index_of(entries, &fixture.home_team_id)?;
    let away = index_of(entries, &fixture.away_team_id)?;

    entries[home].record(result.home_goals, result.away_goals);
    entries[away].record(result.away_goals, result.home_goals);
    Ok(())
}

/// Return new standings with `fixture` applied and re-ranked.
///
/// # Errors
///
/// Returns an error if the fixture has no result or names a team absent from
/// the table.
pub fn apply_result(entries: &[TableEntry], fixture: &Fixture) -> Result<Vec<TableEntry>, CareerError> {
    let mut next = entries.to_vec();
    record_fixture(&mut next, fixture)?;
    sort_standings(&mut next);
    Ok(next)
}

fn index_of(entries: &[TableEntry], team_id: &str) -> Result<usize, CareerError> {
    entries
        .iter()
        .position(|entry| entry.team_id == team_id)
        .ok_or_else(|| CareerError::UnknownTeam(team_id.to_string()))
}

/// 1-based rank of `team_id`.
#[must_use]
pub fn position_of(entries: &[TableEntry], team_id: &str) -> Option<usize> {
    entries
        .iter()
        .position(|entry| entry.team_id == team_id)
        .map(|index| index + 1)
}

/// Aggregate counts used to audit a table against its fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableTotals {
    pub points: u32,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

impl TableTotals {
    #[must_use]
    pub fn from_entries(entries: &[TableEntry]) -> Self {
        entries.iter().fold(Self::default(), |acc, entry| Self {
            points: acc.points + entry.points,
            played: acc.played + entry.played,
            wins: acc.wins + entry.wins,
            draws: acc.draws + entry.draws,
            losses: acc.losses + entry.losses,
            goals_for: acc.goals_for + entry.goals_for,
            goals_against: acc.goals_against + entry.goals_against,
        })
    }

    /// Points a set of resolved fixtures must have produced.
    #[must_use]
    pub fn expected_points<'a>(fixtures: impl IntoIterator<Item = &'a Fixture>) -> u32 {
        fixtures
            .into_iter()
            .filter_map(|fixture| fixture.result)
            .map(|result| match result.home_outcome() {
                MatchOutcome::Draw => 2 * POINTS_FOR_DRAW,
                MatchOutcome::Win | MatchOutcome::Loss => POINTS_FOR_WIN,
            })
            .sum()
    }
}
