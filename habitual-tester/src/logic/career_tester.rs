use anyhow::{Context, Result, bail};
use colored::Colorize;
use habitual_game::{
    CareerConfig, CareerSession, CareerStatus, CareerSummary, GameState, LeagueCatalog,
    MatchOutcome, MatchdayInput, SeasonReport, TableTotals,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::sync::Arc;

/// Club name used for every simulated career.
pub const TESTER_CLUB: &str = "Habit Tester FC";

/// Hard stop so a career that never ends cannot hang the run.
pub const DEFAULT_MAX_SEASONS: u32 = 60;

/// How the simulated user keeps their habits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HabitPolicy {
    /// Trains every day and always fills the stadium.
    Diligent,
    /// Trains about half the days.
    Casual,
    /// Never trains.
    Idle,
}

impl HabitPolicy {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Diligent => "diligent",
            Self::Casual => "casual",
            Self::Idle => "idle",
        }
    }

    fn daily_input<R: Rng>(self, rng: &mut R) -> MatchdayInput {
        match self {
            Self::Diligent => MatchdayInput::new(rng.gen_range(3..=6), true),
            Self::Casual => {
                let trained = rng.gen_bool(0.5);
                let points = if trained { rng.gen_range(1..=4) } else { 0 };
                MatchdayInput::new(points, rng.gen_bool(0.5))
            }
            Self::Idle => MatchdayInput::new(0, false),
        }
    }
}

/// Declarative plan for running a career simulation.
#[derive(Debug, Clone)]
pub struct CareerPlan {
    pub policy: HabitPolicy,
    pub start_league: Option<&'static str>,
    /// Seasons to complete; `None` runs until the career is won or the hard stop.
    pub max_seasons: Option<u32>,
    /// Stop after this many matchdays in total.
    pub max_matchdays: Option<u32>,
    pub setup: Option<fn(&mut GameState)>,
    /// Save halfway, reload, and require the resumed run to match.
    pub verify_replay: bool,
    pub expectations: Vec<CareerExpectation>,
}

impl CareerPlan {
    #[must_use]
    pub const fn new(policy: HabitPolicy) -> Self {
        Self {
            policy,
            start_league: None,
            max_seasons: None,
            max_matchdays: None,
            setup: None,
            verify_replay: false,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_max_seasons(mut self, max_seasons: u32) -> Self {
        self.max_seasons = Some(max_seasons);
        self
    }

    #[must_use]
    pub const fn with_max_matchdays(mut self, max_matchdays: u32) -> Self {
        self.max_matchdays = Some(max_matchdays);
        self
    }

    #[must_use]
    pub const fn starting_in(mut self, league_id: &'static str) -> Self {
        self.start_league = Some(league_id);
        self
    }

    #[must_use]
    pub fn with_setup(mut self, setup: fn(&mut GameState)) -> Self {
        self.setup = Some(setup);
        self
    }

    #[must_use]
    pub const fn with_replay_check(mut self) -> Self {
        self.verify_replay = true;
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<CareerExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Assertion hook run after a career simulation completes.
type CareerExpectationFn = Arc<dyn Fn(&CareerRunSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct CareerExpectation(CareerExpectationFn);

impl std::fmt::Debug for CareerExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CareerExpectation").finish()
    }
}

impl CareerExpectation {
    pub fn evaluate(&self, summary: &CareerRunSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for CareerExpectation
where
    F: Fn(&CareerRunSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// One simulated habit day.
#[derive(Debug, Clone)]
pub struct DayRecord {
    pub season: u32,
    pub matchday: u32,
    pub input: MatchdayInput,
    /// `None` when the player sat out.
    pub outcome: Option<MatchOutcome>,
    pub position: Option<usize>,
    pub morale: u8,
}

/// Complete record of a career run.
#[derive(Debug, Clone)]
pub struct CareerRunSummary {
    pub seed: u64,
    pub policy: HabitPolicy,
    pub days: Vec<DayRecord>,
    pub seasons: Vec<SeasonReport>,
    pub final_state: GameState,
    pub career: CareerSummary,
    pub draws: u64,
    /// Table or replay invariants broken during the run.
    pub violations: Vec<String>,
}

impl CareerRunSummary {
    #[must_use]
    pub fn status(&self) -> CareerStatus {
        self.final_state.status()
    }
}

/// Headless deterministic runner for the career engine.
#[derive(Clone)]
pub struct CareerTester {
    verbose: bool,
    catalog: Arc<LeagueCatalog>,
    cfg: CareerConfig,
}

impl CareerTester {
    /// Build a tester around the bundled league catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled catalog fails validation.
    pub fn try_new(verbose: bool) -> Result<Self> {
        let catalog = LeagueCatalog::load_from_static().context("loading bundled leagues")?;
        Ok(Self::new(Arc::new(catalog), CareerConfig::default(), verbose))
    }

    pub const fn new(catalog: Arc<LeagueCatalog>, cfg: CareerConfig, verbose: bool) -> Self {
        Self {
            verbose,
            catalog,
            cfg,
        }
    }

    fn start_session(&self, plan: &CareerPlan, seed: u64) -> Result<CareerSession> {
        let mut session = CareerSession::new(
            &self.catalog,
            TESTER_CLUB,
            plan.start_league,
            seed,
            self.cfg.clone(),
        )?;
        if let Some(setup) = plan.setup {
            session.with_state_mut(setup);
        }
        Ok(session)
    }

    /// Run `plan` for `seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine refuses a step the runner considered
    /// legal.
    pub fn run_plan(&self, plan: &CareerPlan, seed: u64) -> Result<CareerRunSummary> {
        let mut session = self.start_session(plan, seed)?;
        let mut habits = ChaCha20Rng::seed_from_u64(seed);
        let mut run = RunLog::default();
        self.drive(plan, &mut session, &mut habits, &mut run, None)?;

        if plan.verify_replay {
            self.check_replay(plan, seed, &session, &mut run)?;
        }

        let final_state = session.state().clone();
        if self.verbose {
            println!(
                "  🏟️  seed {seed}: {} seasons, {} matchdays, {} draws, status {}",
                run.seasons.len(),
                run.days.len(),
                session.draws(),
                final_state.status().to_string().bright_white()
            );
        }
        Ok(CareerRunSummary {
            seed,
            policy: plan.policy,
            career: CareerSummary::from_state(&final_state),
            draws: session.draws(),
            days: run.days,
            seasons: run.seasons,
            violations: run.violations,
            final_state,
        })
    }

    /// Advance `session` until the plan's limits, or `stop_after` matchdays.
    fn drive(
        &self,
        plan: &CareerPlan,
        session: &mut CareerSession,
        habits: &mut ChaCha20Rng,
        run: &mut RunLog,
        stop_after: Option<usize>,
    ) -> Result<()> {
        let max_seasons = plan.max_seasons.unwrap_or(DEFAULT_MAX_SEASONS);
        let max_days = plan.max_matchdays.map(|days| days as usize);
        loop {
            if stop_after.is_some_and(|limit| run.days.len() >= limit)
                || max_days.is_some_and(|limit| run.days.len() >= limit)
            {
                return Ok(());
            }
            match session.status() {
                CareerStatus::GameWon => return Ok(()),
                CareerStatus::SeasonOver => {
                    let report = session.advance_season()?;
                    log::info!(
                        "season {} ended {} in {} ({})",
                        report.season,
                        report.final_position,
                        report.league_id,
                        report.transition
                    );
                    run.seasons.push(report);
                    if run.seasons.len() >= max_seasons as usize {
                        return Ok(());
                    }
                }
                CareerStatus::SeasonInProgress => {
                    let input = plan.policy.daily_input(habits);
                    let outcome = session.simulate_day(input)?;
                    let state = session.state();
                    run.violations.extend(table_violations(state));
                    run.days.push(DayRecord {
                        season: outcome.season,
                        matchday: outcome.matchday,
                        input,
                        outcome: outcome
                            .player_fixture
                            .as_ref()
                            .and_then(|fixture| fixture.outcome_for(&state.player.team_name)),
                        position: outcome.position,
                        morale: state.player.morale,
                    });
                }
            }
        }
    }

    fn check_replay(
        &self,
        plan: &CareerPlan,
        seed: u64,
        straight: &CareerSession,
        run: &mut RunLog,
    ) -> Result<()> {
        let halfway = (run.days.len() / 2).max(1);
        let mut first_half = self.start_session(plan, seed)?;
        let mut habits = ChaCha20Rng::seed_from_u64(seed);
        let mut replay = RunLog::default();
        self.drive(plan, &mut first_half, &mut habits, &mut replay, Some(halfway))?;

        let saved = serde_json::to_string(first_half.state()).context("saving career")?;
        let restored: GameState = serde_json::from_str(&saved).context("reloading career")?;
        let mut resumed = CareerSession::from_state(restored, seed, self.cfg.clone())?;
        self.drive(plan, &mut resumed, &mut habits, &mut replay, None)?;

        if resumed.state() != straight.state() {
            run.violations.push(format!(
                "resumed career diverged after reload at matchday {halfway}"
            ));
        }
        Ok(())
    }
}

#[derive(Default)]
struct RunLog {
    days: Vec<DayRecord>,
    seasons: Vec<SeasonReport>,
    violations: Vec<String>,
}

/// Audit a table against the fixtures resolved so far.
pub fn table_violations(state: &GameState) -> Vec<String> {
    let mut violations = Vec::new();
    let totals = TableTotals::from_entries(&state.table);
    let expected = TableTotals::expected_points(&state.fixtures);
    if totals.points != expected {
        violations.push(format!(
            "season {} matchday {}: table has {} points, fixtures imply {expected}",
            state.current_season, state.current_matchday, totals.points
        ));
    }
    if totals.wins != totals.losses || totals.goals_for != totals.goals_against {
        violations.push(format!(
            "season {}: unbalanced totals {totals:?}",
            state.current_season
        ));
    }
    for entry in state.table.iter().filter(|entry| !entry.is_consistent()) {
        violations.push(format!(
            "season {}: inconsistent row for {}",
            state.current_season,
            entry.team_id()
        ));
    }
    violations
}

pub fn ensure(condition: bool, message: impl FnOnce() -> String) -> Result<()> {
    if condition {
        Ok(())
    } else {
        bail!(message())
    }
}
