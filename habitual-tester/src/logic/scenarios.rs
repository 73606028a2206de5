use anyhow::Result;
use habitual_game::{
    CareerStatus, GameState, SeasonTransition, generate_fixtures, matchday_count,
};
use std::collections::HashSet;

use super::career_tester::{CareerPlan, CareerRunSummary, HabitPolicy, TESTER_CLUB, ensure};

/// A named logic scenario.
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: CareerPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(name: impl Into<String>, plan: CareerPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

const SCENARIOS: &[(&str, &str)] = &[
    ("smoke", "Create a career and play a single matchday"),
    ("full-season", "Play one complete season and advance"),
    ("career-climb", "Diligent habits climb out of the lowest tier"),
    ("idle-career", "Idle habits drain morale; tier one is a floor"),
    ("top-flight", "Start in the top tier and play until the title or the hard stop"),
    ("deterministic-replay", "Save halfway, reload, and replay identically"),
    ("schedule-integrity", "Every bundled league schedules a clean round-robin"),
];

pub fn list_scenarios() -> &'static [(&'static str, &'static str)] {
    SCENARIOS
}

/// Every scenario name, for the `all` keyword.
pub fn all_scenario_names() -> Vec<String> {
    SCENARIOS.iter().map(|(name, _)| (*name).to_string()).collect()
}

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    let plan = match name {
        "smoke" => CareerPlan::new(HabitPolicy::Casual)
            .with_max_matchdays(1)
            .with_expectation(smoke_expectation),
        "full-season" => CareerPlan::new(HabitPolicy::Casual)
            .with_max_seasons(1)
            .with_expectation(full_season_expectation),
        "career-climb" => CareerPlan::new(HabitPolicy::Diligent)
            .with_max_seasons(20)
            .with_expectation(no_violations)
            .with_expectation(climb_expectation),
        "idle-career" => CareerPlan::new(HabitPolicy::Idle)
            .with_max_seasons(3)
            .with_expectation(no_violations)
            .with_expectation(idle_expectation),
        "top-flight" => CareerPlan::new(HabitPolicy::Diligent)
            .starting_in("premier-league")
            .with_setup(max_out_strength)
            .with_expectation(no_violations)
            .with_expectation(top_flight_expectation),
        "deterministic-replay" => CareerPlan::new(HabitPolicy::Casual)
            .with_max_seasons(2)
            .with_replay_check()
            .with_expectation(no_violations),
        "schedule-integrity" => CareerPlan::new(HabitPolicy::Idle)
            .with_max_matchdays(0)
            .with_expectation(schedule_expectation),
        _ => return None,
    };
    Some(TestScenario::simulation(name, plan))
}

fn max_out_strength(state: &mut GameState) {
    state.player.strength = 100;
}

fn no_violations(summary: &CareerRunSummary) -> Result<()> {
    ensure(summary.violations.is_empty(), || {
        format!("invariants broken: {}", summary.violations.join("; "))
    })
}

fn smoke_expectation(summary: &CareerRunSummary) -> Result<()> {
    ensure(summary.days.len() == 1, || {
        format!("expected one matchday, played {}", summary.days.len())
    })?;
    let state = &summary.final_state;
    ensure(state.current_matchday == 2, || {
        format!("matchday pointer at {}", state.current_matchday)
    })?;
    ensure(summary.days[0].outcome.is_some(), || {
        "player did not play on matchday 1".to_string()
    })?;
    no_violations(summary)
}

fn full_season_expectation(summary: &CareerRunSummary) -> Result<()> {
    no_violations(summary)?;
    ensure(summary.seasons.len() == 1, || {
        format!("expected one finished season, saw {}", summary.seasons.len())
    })?;
    let report = &summary.seasons[0];
    let record = summary.final_state.player.season_history.get(&1);
    ensure(
        record.is_some_and(|r| r.final_position == report.final_position),
        || "season 1 missing from history".to_string(),
    )?;
    let played = summary.days.iter().filter(|day| day.outcome.is_some()).count();
    ensure(played == 9, || format!("player played {played} of 9 matches"))?;
    ensure(
        summary.final_state.current_season == 2 && summary.final_state.current_matchday == 1,
        || "next season not started".to_string(),
    )
}

fn climb_expectation(summary: &CareerRunSummary) -> Result<()> {
    let highest = summary.career.highest_level.unwrap_or(0);
    ensure(highest >= 2 || summary.final_state.game_won, || {
        format!(
            "diligent club never left tier one in {} seasons",
            summary.seasons.len()
        )
    })?;
    ensure(summary.final_state.player.strength <= 100, || {
        "strength exceeded cap".to_string()
    })?;
    let mut previous = 0;
    for report in &summary.seasons {
        ensure(report.strength_bonus >= 1 || report.transition == SeasonTransition::Champion, || {
            format!("season {} awarded no strength", report.season)
        })?;
        ensure(report.season > previous, || "season numbers repeat".to_string())?;
        previous = report.season;
    }
    Ok(())
}

fn idle_expectation(summary: &CareerRunSummary) -> Result<()> {
    let state = &summary.final_state;
    ensure(state.player.morale == 0, || {
        format!("idle morale ended at {}", state.player.morale)
    })?;
    let days = &summary.days;
    ensure(days.iter().all(|day| day.input.training_points == 0), || {
        "idle habits logged training".to_string()
    })?;
    ensure(days.windows(2).all(|w| w[1].morale <= w[0].morale), || {
        "morale rose without training".to_string()
    })?;
    ensure(
        summary.seasons.iter().all(|report| {
            report.transition != SeasonTransition::Relegated || report.league_id != "lpf"
        }),
        || "relegated out of the lowest tier".to_string(),
    )
}

fn top_flight_expectation(summary: &CareerRunSummary) -> Result<()> {
    let state = &summary.final_state;
    if state.status() == CareerStatus::GameWon {
        let last = summary.seasons.last();
        ensure(
            last.is_some_and(|report| {
                report.transition == SeasonTransition::Champion && report.final_position == 1
            }),
            || "won without a championship season".to_string(),
        )?;
        ensure(state.player.current_league_id == "premier-league", || {
            "won outside the top tier".to_string()
        })?;
    }
    Ok(())
}

fn schedule_expectation(summary: &CareerRunSummary) -> Result<()> {
    for league in summary.final_state.leagues.leagues() {
        let mut ids: Vec<String> = league.teams.iter().map(|t| t.id.clone()).collect();
        ids.push(TESTER_CLUB.to_string());
        let fixtures = generate_fixtures(&ids);
        let n = ids.len();
        ensure(fixtures.len() == n * (n - 1) / 2, || {
            format!("{}: {} fixtures for {n} clubs", league.id, fixtures.len())
        })?;
        let mut pairs = HashSet::new();
        for fixture in &fixtures {
            let key = if fixture.home_team_id < fixture.away_team_id {
                (&fixture.home_team_id, &fixture.away_team_id)
            } else {
                (&fixture.away_team_id, &fixture.home_team_id)
            };
            ensure(pairs.insert(key), || format!("{}: repeated pairing", league.id))?;
        }
        let last = fixtures.iter().map(|f| f.matchday).max().unwrap_or(0);
        ensure(last == matchday_count(n), || {
            format!("{}: {last} matchdays for {n} clubs", league.id)
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_scenario_resolves() {
        for name in all_scenario_names() {
            assert!(get_scenario(&name).is_some(), "{name}");
        }
        assert!(get_scenario("nonexistent").is_none());
    }
}
