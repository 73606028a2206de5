//! Career trajectory shown once the career ends.
use serde::{Deserialize, Serialize};

use crate::state::GameState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonSummaryRow {
    pub season: u32,
    pub league_id: String,
    pub league_name: String,
    pub level: u8,
    pub final_position: usize,
}

/// Aggregate view of a career's season history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerSummary {
    pub team_name: String,
    pub seasons_played: usize,
    /// First-place finishes in any tier.
    pub titles: usize,
    pub promotions: usize,
    pub relegations: usize,
    pub best_finish: Option<usize>,
    pub highest_level: Option<u8>,
    pub final_strength: u8,
    pub game_won: bool,
    pub seasons: Vec<SeasonSummaryRow>,
}

impl CareerSummary {
    #[must_use]
    pub fn from_state(state: &GameState) -> Self {
        let seasons: Vec<SeasonSummaryRow> = state
            .player
            .season_history
            .iter()
            .map(|(&season, record)| {
                let league = state.leagues.find(&record.league_id);
                SeasonSummaryRow {
                    season,
                    league_id: record.league_id.clone(),
                    league_name: league.map_or_else(|| record.league_id.clone(), |l| l.name.clone()),
                    level: league.map_or(0, |l| l.level),
                    final_position: record.final_position,
                }
            })
            .collect();

        // Moves are read off consecutive seasons; the move out of the last
        // recorded season shows up in the current league.
        let mut levels: Vec<u8> = seasons.iter().map(|row| row.level).collect();
        if !state.game_won
            && let Some(current) = state.leagues.find(&state.player.current_league_id)
            && !seasons.is_empty()
        {
            levels.push(current.level);
        }
        let promotions = levels.windows(2).filter(|w| w[1] > w[0]).count();
        let relegations = levels.windows(2).filter(|w| w[1] < w[0]).count();

        Self {
            team_name: state.player.team_name.clone(),
            seasons_played: seasons.len(),
            titles: seasons.iter().filter(|row| row.final_position == 1).count(),
            promotions,
            relegations,
            best_finish: seasons.iter().map(|row| row.final_position).min(),
            highest_level: seasons.iter().map(|row| row.level).max(),
            final_strength: state.player.strength,
            game_won: state.game_won,
            seasons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::career::initialize_career;
    use crate::data::LeagueCatalog;
    use crate::state::SeasonRecord;

    #[test]
    fn summarizes_a_winding_career() {
        let catalog = LeagueCatalog::load_from_static().unwrap();
        let mut state = initialize_career(&catalog, "Habit FC", None, None).unwrap();
        let history = [
            (1, "lpf", 2),
            (2, "mls", 9),
            (3, "mls", 10),
            (4, "lpf", 1),
            (5, "mls", 1),
        ];
        for (season, league, position) in history {
            state.player.season_history.insert(
                season,
                SeasonRecord {
                    league_id: league.into(),
                    final_position: position,
                },
            );
        }
        state.player.current_league_id = "eredivisie".into();

        let summary = CareerSummary::from_state(&state);
        assert_eq!(summary.seasons_played, 5);
        assert_eq!(summary.titles, 2);
        assert_eq!(summary.promotions, 3);
        assert_eq!(summary.relegations, 1);
        assert_eq!(summary.best_finish, Some(1));
        assert_eq!(summary.highest_level, Some(2));
        assert_eq!(summary.seasons[1].league_name, "Major League");
        assert!(!summary.game_won);
    }

    #[test]
    fn fresh_career_is_empty() {
        let catalog = LeagueCatalog::load_from_static().unwrap();
        let state = initialize_career(&catalog, "Habit FC", None, None).unwrap();
        let summary = CareerSummary::from_state(&state);
        assert_eq!(summary.seasons_played, 0);
        assert_eq!(summary.promotions, 0);
        assert_eq!(summary.best_finish, None);
    }
}
