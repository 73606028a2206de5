//! Season and career state machine.
//!
//! Every operation takes the prior [`GameState`] by reference and returns the
//! next one; the caller's copy is never touched. Randomness is always supplied
//! by the caller.
use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::config::CareerConfig;
use crate::constants::{MORALE_MAX, MORALE_NEUTRAL, STRENGTH_MAX};
use crate::data::{League, LeagueCatalog};
use crate::error::CareerError;
use crate::fixtures::{Fixture, generate_fixtures};
use crate::match_sim::{MatchModifiers, SideModifiers, resolve_match};
use crate::state::{GameState, PlayerState, SeasonRecord};
use crate::table::{initial_table, record_fixture, sort_standings};

/// What the player brings to a matchday from their habits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MatchdayInput {
    /// Flat strength bonus earned by the day's training.
    pub training_points: u32,
    /// Full-stadium bonus; only counts when the player is at home.
    pub home_bonus: bool,
}

impl MatchdayInput {
    #[must_use]
    pub const fn new(training_points: u32, home_bonus: bool) -> Self {
        Self {
            training_points,
            home_bonus,
        }
    }
}

/// How a finished season moves the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonTransition {
    /// Won the top tier; the career ends.
    Champion,
    Promoted,
    Stayed,
    Relegated,
}

impl fmt::Display for SeasonTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Champion => write!(f, "champion"),
            Self::Promoted => write!(f, "promoted"),
            Self::Stayed => write!(f, "stayed"),
            Self::Relegated => write!(f, "relegated"),
        }
    }
}

/// Decision taken at the end of a season, before it is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonReport {
    pub season: u32,
    pub league_id: String,
    pub final_position: usize,
    pub transition: SeasonTransition,
    /// `None` once the career is won.
    pub next_league_id: Option<String>,
    pub strength_bonus: u8,
}

/// Start a career with default rules.
///
/// Without a league id the player starts in the lowest tier; without a
/// strength the configured starting strength is used.
///
/// # Errors
///
/// Returns an error if the league id is unknown, its roster is empty, or the
/// team name is empty or clashes with a team id anywhere in the catalog.
pub fn initialize_career(
    catalog: &LeagueCatalog,
    team_name: &str,
    league_id: Option<&str>,
    strength: Option<u8>,
) -> Result<GameState, CareerError> {
    initialize_career_with_config(&CareerConfig::default(), catalog, team_name, league_id, strength)
}

/// Start a career using `cfg` for starting strength and morale.
///
/// # Errors
///
/// See [`initialize_career`].
pub fn initialize_career_with_config(
    cfg: &CareerConfig,
    catalog: &LeagueCatalog,
    team_name: &str,
    league_id: Option<&str>,
    strength: Option<u8>,
) -> Result<GameState, CareerError> {
    let team_name = team_name.trim();
    // The player's name doubles as its team id in every tier it may reach.
    if !team_name.is_empty()
        && catalog
            .leagues()
            .iter()
            .any(|league| league.team(team_name).is_some())
    {
        return Err(CareerError::TeamNameConflict(team_name.to_string()));
    }
    let league_id = match league_id {
        Some(id) => catalog.get(id)?.id.clone(),
        None => catalog
            .lowest()
            .map(|league| league.id.clone())
            .ok_or_else(|| CareerError::UnknownLeague(String::new()))?,
    };
    let player = PlayerState {
        team_name: team_name.to_string(),
        strength: strength.unwrap_or(cfg.starting_strength).min(STRENGTH_MAX),
        morale: cfg.starting_morale.min(MORALE_MAX),
        current_league_id: league_id,
        season_history: BTreeMap::new(),
    };
    let state = start_season(catalog, player, 1)?;
    info!(
        "career started for {} in {} (strength {})",
        state.player.team_name, state.player.current_league_id, state.player.strength
    );
    Ok(state)
}

fn start_season(
    catalog: &LeagueCatalog,
    player: PlayerState,
    season: u32,
) -> Result<GameState, CareerError> {
    if player.team_name.is_empty() {
        return Err(CareerError::EmptyTeamName);
    }
    let league = catalog.get(&player.current_league_id)?;
    if league.teams.is_empty() {
        return Err(CareerError::EmptyLeague(league.id.clone()));
    }
    if league.team(&player.team_name).is_some() {
        return Err(CareerError::TeamNameConflict(player.team_name));
    }

    let team_ids: Vec<String> = league
        .teams
        .iter()
        .map(|team| team.id.clone())
        .chain(std::iter::once(player.team_name.clone()))
        .collect();

    Ok(GameState {
        fixtures: generate_fixtures(&team_ids),
        table: initial_table(&league.teams, &player.team_name),
        leagues: catalog.clone(),
        current_season: season,
        current_matchday: 1,
        game_won: false,
        player,
    })
}

fn ensure_playable(state: &GameState) -> Result<(), CareerError> {
    if state.game_won {
        warn!("matchday requested after the career was won");
        return Err(CareerError::GameAlreadyWon);
    }
    if state.is_season_over() {
        warn!(
            "matchday {} requested after season {} ended",
            state.current_matchday, state.current_season
        );
        return Err(CareerError::SeasonOver {
            season: state.current_season,
            total_matchdays: state.total_matchdays(),
        });
    }
    Ok(())
}

/// Play the current matchday with default rules and a single random source.
///
/// AI-only fixtures draw from a stream forked off `rng`, so the player's
/// matches do not depend on how many AI fixtures share the matchday.
///
/// # Errors
///
/// Returns an error if the career is won, the season is over, or a fixture
/// names a team outside the current league.
pub fn simulate_matchday<R: Rng + ?Sized>(
    state: &GameState,
    training_points: u32,
    home_bonus: bool,
    rng: &mut R,
) -> Result<GameState, CareerError> {
    let mut ai_rng = SmallRng::seed_from_u64(rng.next_u64());
    simulate_matchday_with(
        state,
        &CareerConfig::default(),
        MatchdayInput::new(training_points, home_bonus),
        rng,
        &mut ai_rng,
    )
}

/// Play the current matchday.
///
/// Morale moves first, then every unplayed fixture of the matchday is
/// resolved and folded into the table. Fixtures that already carry a result
/// are left alone, so replaying a reloaded matchday changes nothing but the
/// matchday pointer and morale.
///
/// # Errors
///
/// See [`simulate_matchday`].
pub fn simulate_matchday_with<P, A>(
    state: &GameState,
    cfg: &CareerConfig,
    input: MatchdayInput,
    player_rng: &mut P,
    ai_rng: &mut A,
) -> Result<GameState, CareerError>
where
    P: Rng + ?Sized,
    A: Rng + ?Sized,
{
    ensure_playable(state)?;
    let league = state.current_league()?;
    let mut next = state.clone();

    next.player.morale = next_morale(state.player.morale, input.training_points, cfg);
    let player_bonus = player_flat_bonus(&next.player, input.training_points, cfg);
    let matchday = state.current_matchday;

    for fixture in next
        .fixtures
        .iter_mut()
        .filter(|fixture| fixture.matchday == matchday && !fixture.is_played())
    {
        let involves_player = fixture.involves(&next.player.team_name);
        let result = if involves_player {
            let ctx = FixtureContext {
                league,
                player: &next.player,
                player_bonus,
                home_bonus: input.home_bonus,
            };
            ctx.resolve(fixture, cfg, player_rng)?
        } else {
            let ctx = FixtureContext {
                league,
                player: &next.player,
                player_bonus,
                home_bonus: false,
            };
            ctx.resolve(fixture, cfg, ai_rng)?
        };
        debug!(
            "matchday {matchday}: {} {result} {}",
            fixture.home_team_id, fixture.away_team_id
        );
        fixture.result = Some(result);
        record_fixture(&mut next.table, fixture)?;
    }

    sort_standings(&mut next.table);
    next.current_matchday = matchday + 1;
    debug!(
        "season {} matchday {matchday} done; player at {:?}, morale {}",
        next.current_season,
        next.player_position(),
        next.player.morale
    );
    Ok(next)
}

struct FixtureContext<'a> {
    league: &'a League,
    player: &'a PlayerState,
    player_bonus: f32,
    home_bonus: bool,
}

impl FixtureContext<'_> {
    fn resolve<R: Rng + ?Sized>(
        &self,
        fixture: &Fixture,
        cfg: &CareerConfig,
        rng: &mut R,
    ) -> Result<crate::match_sim::MatchResult, CareerError> {
        let (home_base, home) = self.side(&fixture.home_team_id, true, cfg, rng)?;
        let (away_base, away) = self.side(&fixture.away_team_id, false, cfg, rng)?;
        Ok(resolve_match(
            home_base,
            away_base,
            MatchModifiers { home, away },
            &cfg.goal_bands,
            rng,
        ))
    }

    fn side<R: Rng + ?Sized>(
        &self,
        team_id: &str,
        at_home: bool,
        cfg: &CareerConfig,
        rng: &mut R,
    ) -> Result<(f32, SideModifiers), CareerError> {
        if team_id == self.player.team_name {
            let multiplier = if at_home && self.home_bonus {
                cfg.player_home_advantage
            } else {
                1.0
            };
            return Ok((
                f32::from(self.player.strength),
                SideModifiers::new(self.player_bonus, multiplier),
            ));
        }

        let team = self
            .league
            .team(team_id)
            .ok_or_else(|| CareerError::UnknownTeam(team_id.to_string()))?;
        let jitter = if cfg.ai_strength_jitter > 0.0 {
            rng.gen_range(0.0..cfg.ai_strength_jitter)
        } else {
            0.0
        };
        let multiplier = if at_home && rng.gen_bool(cfg.ai_home_advantage_chance) {
            cfg.ai_home_advantage
        } else {
            1.0
        };
        Ok((f32::from(team.strength), SideModifiers::new(jitter, multiplier)))
    }
}

fn next_morale(morale: u8, training_points: u32, cfg: &CareerConfig) -> u8 {
    if training_points > 0 {
        morale.saturating_add(cfg.morale_trained_gain).min(MORALE_MAX)
    } else {
        morale.saturating_sub(cfg.morale_idle_loss)
    }
}

#[allow(clippy::cast_precision_loss)]
fn player_flat_bonus(player: &PlayerState, training_points: u32, cfg: &CareerConfig) -> f32 {
    let morale_bonus = if cfg.morale_coupling {
        (f32::from(player.morale) - MORALE_NEUTRAL) / cfg.morale_strength_divisor
    } else {
        0.0
    };
    training_points as f32 + morale_bonus
}

/// Decide how the finished season moves the player, without applying it.
///
/// # Errors
///
/// Returns an error if the career is already won, the season is still in
/// progress, or the player is missing from the table or catalog.
pub fn conclude_season(state: &GameState, cfg: &CareerConfig) -> Result<SeasonReport, CareerError> {
    if state.game_won {
        return Err(CareerError::GameAlreadyWon);
    }
    if !state.is_season_over() {
        return Err(CareerError::SeasonInProgress {
            season: state.current_season,
            matchday: state.current_matchday,
            total_matchdays: state.total_matchdays(),
        });
    }

    let league = state.current_league()?;
    let final_position = state
        .player_position()
        .ok_or_else(|| CareerError::UnknownTeam(state.player.team_name.clone()))?;
    let table_len = state.table.len();
    let in_relegation_zone =
        final_position + cfg.relegation_slots > table_len && league.level > 1;

    let (transition, next_league, strength_bonus) =
        if state.leagues.is_top_tier(league) && final_position == 1 {
            (SeasonTransition::Champion, None, 0)
        } else if final_position <= cfg.promotion_slots {
            let target = state.leagues.promoted_from(league);
            let transition = if target.id == league.id {
                SeasonTransition::Stayed
            } else {
                SeasonTransition::Promoted
            };
            (transition, Some(target), cfg.promotion_strength_bonus)
        } else if in_relegation_zone {
            let target = state.leagues.relegated_from(league);
            (
                SeasonTransition::Relegated,
                Some(target),
                cfg.relegation_strength_bonus,
            )
        } else {
            (SeasonTransition::Stayed, Some(league), cfg.stay_strength_bonus)
        };

    Ok(SeasonReport {
        season: state.current_season,
        league_id: league.id.clone(),
        final_position,
        transition,
        next_league_id: next_league.map(|league| league.id.clone()),
        strength_bonus,
    })
}

/// Close the season with default rules and start the next one.
///
/// # Errors
///
/// See [`advance_season_with_config`].
pub fn advance_season(state: &GameState) -> Result<GameState, CareerError> {
    advance_season_with_config(state, &CareerConfig::default()).map(|(next, _)| next)
}

/// Close the season: record history, then either end the career as champion
/// or start the next season in the league chosen by [`conclude_season`].
///
/// # Errors
///
/// Returns an error if the career is already won, the season is still in
/// progress, or the player is missing from the table or catalog.
pub fn advance_season_with_config(
    state: &GameState,
    cfg: &CareerConfig,
) -> Result<(GameState, SeasonReport), CareerError> {
    let report = conclude_season(state, cfg)?;

    let mut player = state.player.clone();
    player.season_history.insert(
        report.season,
        SeasonRecord {
            league_id: report.league_id.clone(),
            final_position: report.final_position,
        },
    );

    let Some(next_league_id) = report.next_league_id.clone() else {
        info!(
            "{} won {} in season {}; career complete",
            player.team_name, report.league_id, report.season
        );
        let mut won = state.clone();
        won.player = player;
        won.game_won = true;
        return Ok((won, report));
    };

    player.strength = player
        .strength
        .saturating_add(report.strength_bonus)
        .min(STRENGTH_MAX);
    player.current_league_id = next_league_id;
    info!(
        "season {} finished {} in {}: {} to {} (strength {})",
        report.season,
        report.final_position,
        report.league_id,
        report.transition,
        player.current_league_id,
        player.strength
    );

    let next = start_season(&state.leagues, player, state.current_season + 1)?;
    Ok((next, report))
}
