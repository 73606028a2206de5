//! Seeded career sessions.
use crate::career::{
    MatchdayInput, SeasonReport, advance_season_with_config, initialize_career_with_config,
    simulate_matchday_with,
};
use crate::config::CareerConfig;
use crate::data::LeagueCatalog;
use crate::error::CareerError;
use crate::fixtures::Fixture;
use crate::rng::RngBundle;
use crate::state::{CareerStatus, GameState};

/// What happened on a simulated matchday, from the player's side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchdayOutcome {
    pub season: u32,
    pub matchday: u32,
    /// `None` when the player sat out the matchday.
    pub player_fixture: Option<Fixture>,
    pub position: Option<usize>,
    pub season_over: bool,
}

/// High-level session binding a career state to its rules and seed.
///
/// Each matchday draws from streams derived from `(seed, season, matchday)`,
/// so a career is fully replayable from the seed and the daily inputs.
#[derive(Debug, Clone)]
pub struct CareerSession {
    state: GameState,
    cfg: CareerConfig,
    seed: u64,
    draws: u64,
}

impl CareerSession {
    /// Start a fresh career.
    ///
    /// # Errors
    ///
    /// Returns an error if `cfg` fails validation or the career cannot be
    /// initialized.
    pub fn new(
        catalog: &LeagueCatalog,
        team_name: &str,
        league_id: Option<&str>,
        seed: u64,
        cfg: CareerConfig,
    ) -> Result<Self, CareerError> {
        cfg.validate()?;
        let state = initialize_career_with_config(&cfg, catalog, team_name, league_id, None)?;
        Self::from_state(state, seed, cfg)
    }

    /// Resume a career from a saved state.
    ///
    /// # Errors
    ///
    /// Returns [`CareerError::InvalidConfig`] if `cfg` fails validation.
    pub fn from_state(state: GameState, seed: u64, cfg: CareerConfig) -> Result<Self, CareerError> {
        cfg.validate()?;
        Ok(Self {
            state,
            cfg,
            seed,
            draws: 0,
        })
    }

    /// Play the current matchday with the day's habit inputs.
    ///
    /// # Errors
    ///
    /// Returns an error if the season is over or the career is won; the
    /// session state is left unchanged.
    pub fn simulate_day(&mut self, input: MatchdayInput) -> Result<MatchdayOutcome, CareerError> {
        let season = self.state.current_season;
        let matchday = self.state.current_matchday;
        let bundle = RngBundle::for_matchday(self.seed, season, matchday);
        let next = simulate_matchday_with(
            &self.state,
            &self.cfg,
            input,
            &mut *bundle.player_match(),
            &mut *bundle.ai_match(),
        )?;
        self.draws = self.draws.saturating_add(bundle.draws());
        self.state = next;

        let player = &self.state.player.team_name;
        let player_fixture = self
            .state
            .fixtures
            .iter()
            .find(|fixture| fixture.matchday == matchday && fixture.involves(player))
            .cloned();
        Ok(MatchdayOutcome {
            season,
            matchday,
            player_fixture,
            position: self.state.player_position(),
            season_over: self.state.is_season_over(),
        })
    }

    /// Close the finished season and move to the next one.
    ///
    /// # Errors
    ///
    /// Returns an error if the season is still in progress or the career is
    /// already won.
    pub fn advance_season(&mut self) -> Result<SeasonReport, CareerError> {
        let (next, report) = advance_season_with_config(&self.state, &self.cfg)?;
        self.state = next;
        Ok(report)
    }

    /// Throw the career away and start over with the same club and seed.
    ///
    /// # Errors
    ///
    /// Returns an error if the career cannot be initialized.
    pub fn reset(&mut self, league_id: Option<&str>) -> Result<(), CareerError> {
        let fresh = initialize_career_with_config(
            &self.cfg,
            &self.state.leagues,
            &self.state.player.team_name,
            league_id,
            None,
        )?;
        self.state = fresh;
        self.draws = 0;
        Ok(())
    }

    /// Deterministically reseed future matchdays.
    pub const fn reseed(&mut self, seed: u64) {
        self.seed = seed;
    }

    #[must_use]
    pub fn status(&self) -> CareerStatus {
        self.state.status()
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub const fn config(&self) -> &CareerConfig {
        &self.cfg
    }

    /// Random draws consumed since the session started or was reset.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Apply a closure to the mutable game state.
    pub fn with_state_mut<R>(&mut self, f: impl FnOnce(&mut GameState) -> R) -> R {
        f(&mut self.state)
    }

    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }
}
