//! League and team reference data.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::error::CareerError;

const DEFAULT_LEAGUE_DATA: &str = include_str!("../assets/leagues.json");

/// An AI-controlled club with a fixed strength rating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiTeam {
    pub id: String,
    pub name: String,
    /// Rating on a 0-100 scale.
    pub strength: u8,
}

/// One tier of the league pyramid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    pub id: String,
    pub name: String,
    /// Tier in the pyramid, 1 is the lowest.
    pub level: u8,
    #[serde(default)]
    pub teams: Vec<AiTeam>,
}

impl League {
    #[must_use]
    pub fn team(&self, team_id: &str) -> Option<&AiTeam> {
        self.teams.iter().find(|team| team.id == team_id)
    }

    /// Number of clubs in a season of this league once the player joins.
    #[must_use]
    pub fn season_size(&self) -> usize {
        self.teams.len() + 1
    }
}

/// Problems found while loading or validating a league catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("league catalog could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("league catalog is empty")]
    Empty,
    #[error("league id `{0}` appears more than once")]
    DuplicateLeague(String),
    #[error("league level {0} appears more than once")]
    DuplicateLevel(u8),
    #[error("league `{0}` has no teams")]
    EmptyRoster(String),
    #[error("team `{team}` appears more than once in league `{league}`")]
    DuplicateTeam { league: String, team: String },
    #[error("team `{team}` in league `{league}` has strength {strength} (max 100)")]
    StrengthOutOfRange {
        league: String,
        team: String,
        strength: u8,
    },
}

/// Immutable, ordered set of leagues shared by every career.
///
/// Serialized as a plain array of leagues. Deserializing goes through
/// [`LeagueCatalog::new`], so a saved catalog is re-sorted and re-validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(try_from = "Vec<League>", into = "Vec<League>")]
pub struct LeagueCatalog {
    leagues: Vec<League>,
}

impl TryFrom<Vec<League>> for LeagueCatalog {
    type Error = CatalogError;

    fn try_from(leagues: Vec<League>) -> Result<Self, Self::Error> {
        Self::new(leagues)
    }
}

impl From<LeagueCatalog> for Vec<League> {
    fn from(catalog: LeagueCatalog) -> Self {
        catalog.leagues
    }
}

impl LeagueCatalog {
    /// Build a catalog, sorting leagues by level and validating the pyramid.
    ///
    /// # Errors
    ///
    /// Returns an error if ids or levels repeat, a roster is empty, or a
    /// strength rating is out of range.
    pub fn new(mut leagues: Vec<League>) -> Result<Self, CatalogError> {
        leagues.sort_by_key(|league| league.level);
        let catalog = Self { leagues };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse and validate a catalog from a JSON array of leagues.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the catalog is invalid.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let leagues: Vec<League> = serde_json::from_str(json)?;
        Self::new(leagues)
    }

    /// Load the catalog bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled data fails validation.
    pub fn load_from_static() -> Result<Self, CatalogError> {
        Self::from_json(DEFAULT_LEAGUE_DATA)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if self.leagues.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut ids = HashSet::new();
        let mut levels = HashSet::new();
        for league in &self.leagues {
            if !ids.insert(league.id.as_str()) {
                return Err(CatalogError::DuplicateLeague(league.id.clone()));
            }
            if !levels.insert(league.level) {
                return Err(CatalogError::DuplicateLevel(league.level));
            }
            if league.teams.is_empty() {
                return Err(CatalogError::EmptyRoster(league.id.clone()));
            }
            let mut team_ids = HashSet::new();
            for team in &league.teams {
                if !team_ids.insert(team.id.as_str()) {
                    return Err(CatalogError::DuplicateTeam {
                        league: league.id.clone(),
                        team: team.id.clone(),
                    });
                }
                if team.strength > crate::constants::STRENGTH_MAX {
                    return Err(CatalogError::StrengthOutOfRange {
                        league: league.id.clone(),
                        team: team.id.clone(),
                        strength: team.strength,
                    });
                }
            }
        }
        Ok(())
    }

    /// Leagues ordered from the lowest tier to the highest.
    #[must_use]
    pub fn leagues(&self) -> &[League] {
        &self.leagues
    }

    #[must_use]
    pub fn find(&self, league_id: &str) -> Option<&League> {
        self.leagues.iter().find(|league| league.id == league_id)
    }

    /// Look up a league, failing loudly when the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`CareerError::UnknownLeague`] if no league has this id.
    pub fn get(&self, league_id: &str) -> Result<&League, CareerError> {
        self.find(league_id)
            .ok_or_else(|| CareerError::UnknownLeague(league_id.to_string()))
    }

    #[must_use]
    pub fn by_level(&self, level: u8) -> Option<&League> {
        self.leagues.iter().find(|league| league.level == level)
    }

    /// The entry tier new careers start in.
    #[must_use]
    pub fn lowest(&self) -> Option<&League> {
        self.leagues.first()
    }

    #[must_use]
    pub fn top_level(&self) -> u8 {
        self.leagues.last().map_or(0, |league| league.level)
    }

    #[must_use]
    pub fn is_top_tier(&self, league: &League) -> bool {
        league.level == self.top_level()
    }

    /// The tier above `league`, or `league` itself at the top.
    #[must_use]
    pub fn promoted_from<'a>(&'a self, league: &'a League) -> &'a League {
        self.leagues
            .iter()
            .find(|candidate| candidate.level > league.level)
            .unwrap_or(league)
    }

    /// The tier below `league`, or `league` itself at the bottom.
    #[must_use]
    pub fn relegated_from<'a>(&'a self, league: &'a League) -> &'a League {
        self.leagues
            .iter()
            .rev()
            .find(|candidate| candidate.level < league.level)
            .unwrap_or(league)
    }
}
