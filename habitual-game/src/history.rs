//! Read-only views over a career's played fixtures.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::RECENT_FORM_LEN;
use crate::match_sim::{MatchOutcome, MatchResult};
use crate::state::GameState;

pub use crate::fixtures::fixtures_for_matchday;

/// One of the player's played matches, seen from the player's side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResult {
    pub matchday: u32,
    pub opponent_id: String,
    pub opponent_name: String,
    pub at_home: bool,
    pub goals_for: u8,
    pub goals_against: u8,
    pub outcome: MatchOutcome,
}

impl PlayerResult {
    fn from_result(state: &GameState, matchday: u32, opponent: &str, at_home: bool, result: MatchResult) -> Self {
        let (goals_for, goals_against, outcome) = if at_home {
            (result.home_goals, result.away_goals, result.home_outcome())
        } else {
            (result.away_goals, result.home_goals, result.away_outcome())
        };
        Self {
            matchday,
            opponent_id: opponent.to_string(),
            opponent_name: state.team_name(opponent).to_string(),
            at_home,
            goals_for,
            goals_against,
            outcome,
        }
    }
}

/// The player's played fixtures this season, most recent first.
#[must_use]
pub fn player_results(state: &GameState) -> Vec<PlayerResult> {
    let player = state.player.team_name.as_str();
    let mut results: Vec<PlayerResult> = state
        .fixtures
        .iter()
        .filter_map(|fixture| {
            let result = fixture.result?;
            let opponent = fixture.opponent_of(player)?;
            let at_home = fixture.home_team_id == player;
            Some(PlayerResult::from_result(
                state,
                fixture.matchday,
                opponent,
                at_home,
                result,
            ))
        })
        .collect();
    results.sort_by(|a, b| b.matchday.cmp(&a.matchday));
    results
}

/// Up to the last `n` outcomes, most recent first.
pub type Form = SmallVec<[MatchOutcome; RECENT_FORM_LEN]>;

#[must_use]
pub fn recent_form(state: &GameState, n: usize) -> Form {
    player_results(state)
        .into_iter()
        .take(n)
        .map(|result| result.outcome)
        .collect()
}

/// Render form as a compact string such as `WWDLW`.
#[must_use]
pub fn form_string(form: &[MatchOutcome]) -> String {
    form.iter().map(ToString::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::career::{initialize_career, simulate_matchday};
    use crate::data::LeagueCatalog;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn played(days: u32) -> GameState {
        let catalog = LeagueCatalog::load_from_static().unwrap();
        let mut state = initialize_career(&catalog, "Habit FC", None, None).unwrap();
        let mut rng = SmallRng::seed_from_u64(2024);
        for _ in 0..days {
            state = simulate_matchday(&state, 1, true, &mut rng).unwrap();
        }
        state
    }

    #[test]
    fn results_are_newest_first_and_player_centric() {
        let state = played(6);
        let results = player_results(&state);
        assert_eq!(results.len(), 6);
        assert!(results.windows(2).all(|w| w[0].matchday > w[1].matchday));
        for result in &results {
            assert_ne!(result.opponent_id, "Habit FC");
            let expected = match result.goals_for.cmp(&result.goals_against) {
                std::cmp::Ordering::Greater => MatchOutcome::Win,
                std::cmp::Ordering::Equal => MatchOutcome::Draw,
                std::cmp::Ordering::Less => MatchOutcome::Loss,
            };
            assert_eq!(result.outcome, expected);
        }
        let entry = state.player_entry().unwrap();
        let scored: u32 = results.iter().map(|r| u32::from(r.goals_for)).sum();
        assert_eq!(scored, entry.goals_for());
    }

    #[test]
    fn form_is_bounded_and_ordered() {
        let state = played(7);
        let form = recent_form(&state, RECENT_FORM_LEN);
        assert_eq!(form.len(), RECENT_FORM_LEN);
        assert!(!form.spilled());
        let newest = player_results(&state)[0].outcome;
        assert_eq!(form[0], newest);
        assert_eq!(form_string(&form).len(), RECENT_FORM_LEN);
    }

    #[test]
    fn fresh_career_has_no_history() {
        let state = played(0);
        assert!(player_results(&state).is_empty());
        assert!(recent_form(&state, 5).is_empty());
        assert_eq!(fixtures_for_matchday(&state.fixtures, 1).count(), 5);
    }
}
