//! Persistent career state.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::data::{League, LeagueCatalog};
use crate::error::CareerError;
use crate::fixtures::{Fixture, matchday_count};
use crate::table::{TableEntry, position_of};

/// Where a finished season left the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonRecord {
    pub league_id: String,
    pub final_position: usize,
}

/// The player's club and its progression across seasons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    /// Doubles as the club's team id in fixtures and the table.
    pub team_name: String,
    pub strength: u8,
    pub morale: u8,
    pub current_league_id: String,
    /// Append-only, keyed by season number.
    #[serde(default)]
    pub season_history: BTreeMap<u32, SeasonRecord>,
}

/// Coarse phase of a career.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareerStatus {
    SeasonInProgress,
    SeasonOver,
    GameWon,
}

impl fmt::Display for CareerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SeasonInProgress => write!(f, "season in progress"),
            Self::SeasonOver => write!(f, "season over"),
            Self::GameWon => write!(f, "game won"),
        }
    }
}

/// A complete career snapshot; every transition returns a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub player: PlayerState,
    pub leagues: LeagueCatalog,
    pub current_season: u32,
    pub current_matchday: u32,
    pub fixtures: Vec<Fixture>,
    /// Kept sorted by standing.
    pub table: Vec<TableEntry>,
    #[serde(default)]
    pub game_won: bool,
}

impl GameState {
    /// The league the player is currently in.
    ///
    /// # Errors
    ///
    /// Returns [`CareerError::UnknownLeague`] if the state names a league
    /// missing from its catalog.
    pub fn current_league(&self) -> Result<&League, CareerError> {
        self.leagues.get(&self.player.current_league_id)
    }

    /// Matchdays in the current season, from the number of clubs in the table.
    #[must_use]
    pub fn total_matchdays(&self) -> u32 {
        matchday_count(self.table.len())
    }

    #[must_use]
    pub fn is_season_over(&self) -> bool {
        self.current_matchday > self.total_matchdays()
    }

    #[must_use]
    pub fn status(&self) -> CareerStatus {
        if self.game_won {
            CareerStatus::GameWon
        } else if self.is_season_over() {
            CareerStatus::SeasonOver
        } else {
            CareerStatus::SeasonInProgress
        }
    }

    /// Current 1-based rank of the player's club.
    #[must_use]
    pub fn player_position(&self) -> Option<usize> {
        position_of(&self.table, &self.player.team_name)
    }

    #[must_use]
    pub fn player_entry(&self) -> Option<&TableEntry> {
        self.table
            .iter()
            .find(|entry| entry.team_id() == self.player.team_name)
    }

    /// Display name for a team id in the current league.
    #[must_use]
    pub fn team_name<'a>(&'a self, team_id: &'a str) -> &'a str {
        if team_id == self.player.team_name {
            return &self.player.team_name;
        }
        self.current_league()
            .ok()
            .and_then(|league| league.team(team_id))
            .map_or(team_id, |team| team.name.as_str())
    }
}

/// Free-function form of [`GameState::is_season_over`].
#[must_use]
pub fn is_season_over(state: &GameState) -> bool {
    state.is_season_over()
}
