//! Habitual Football Career Engine
//!
//! Platform-agnostic core of the habit-tracker football career: match outcome
//! generation, round-robin scheduling, league tables, and the season/career
//! state machine. No UI, storage, or platform-specific dependencies.

pub mod career;
pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod fixtures;
pub mod history;
pub mod match_sim;
pub mod rng;
pub mod session;
pub mod state;
pub mod summary;
pub mod table;

use anyhow::Context;

// Re-export commonly used types
pub use career::{
    MatchdayInput, SeasonReport, SeasonTransition, advance_season, advance_season_with_config,
    conclude_season, initialize_career, initialize_career_with_config, simulate_matchday,
    simulate_matchday_with,
};
pub use config::{CareerConfig, CareerConfigError};
pub use data::{AiTeam, CatalogError, League, LeagueCatalog};
pub use error::CareerError;
pub use fixtures::{Fixture, fixtures_for_matchday, generate_fixtures, matchday_count};
pub use history::{PlayerResult, form_string, player_results, recent_form};
pub use match_sim::{
    BandRule, GoalBandTable, GoalRange, MatchModifiers, MatchOutcome, MatchResult, OutcomeBand,
    SideModifiers, resolve_match, simulate_match,
};
pub use rng::{CountingRng, RngBundle};
pub use session::{CareerSession, MatchdayOutcome};
pub use state::{CareerStatus, GameState, PlayerState, SeasonRecord, is_season_over};
pub use summary::{CareerSummary, SeasonSummaryRow};
pub use table::{TableEntry, TableTotals, apply_result, position_of, sort_standings};

/// Trait for abstracting league catalog loading
/// Platform-specific implementations should provide this
pub trait CatalogLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the league catalog from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or parsed.
    fn load_catalog(&self) -> Result<LeagueCatalog, Self::Error>;
}

/// Loader for the catalog compiled into the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCatalog;

impl CatalogLoader for StaticCatalog {
    type Error = CatalogError;

    fn load_catalog(&self) -> Result<LeagueCatalog, Self::Error> {
        LeagueCatalog::load_from_static()
    }
}

/// Trait for abstracting save/load operations
/// Platform-specific implementations should provide this
pub trait GameStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Save career state
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be saved.
    fn save_game(&self, save_name: &str, game_state: &GameState) -> Result<(), Self::Error>;

    /// Load career state
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be loaded.
    fn load_game(&self, save_name: &str) -> Result<Option<GameState>, Self::Error>;

    /// Delete saved career
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    fn delete_save(&self, save_name: &str) -> Result<(), Self::Error>;
}

/// Main engine for creating and persisting careers
pub struct CareerEngine<L, S>
where
    L: CatalogLoader,
    S: GameStorage,
{
    catalog_loader: L,
    storage: S,
    cfg: CareerConfig,
}

impl<L, S> CareerEngine<L, S>
where
    L: CatalogLoader,
    S: GameStorage,
{
    /// Create a new engine with default career rules
    pub fn new(catalog_loader: L, storage: S) -> Self {
        Self {
            catalog_loader,
            storage,
            cfg: CareerConfig::default(),
        }
    }

    /// Create an engine with custom career rules.
    ///
    /// # Errors
    ///
    /// Returns an error if `cfg` fails [`CareerConfig::validate`].
    pub fn with_config(
        catalog_loader: L,
        storage: S,
        cfg: CareerConfig,
    ) -> Result<Self, anyhow::Error> {
        cfg.validate().context("invalid career config")?;
        Ok(Self {
            catalog_loader,
            storage,
            cfg,
        })
    }

    /// Start a new career in the lowest tier
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or the career cannot
    /// be initialized.
    pub fn create_career(&self, team_name: &str) -> Result<GameState, anyhow::Error>
    where
        L::Error: Into<anyhow::Error>,
    {
        let catalog = self.catalog_loader.load_catalog().map_err(Into::into)?;
        let state =
            initialize_career_with_config(&self.cfg, &catalog, team_name, None, None)?;
        Ok(state)
    }

    /// Construct a seeded session for a new career.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or the career cannot
    /// be initialized.
    pub fn create_session(
        &self,
        team_name: &str,
        league_id: Option<&str>,
        seed: u64,
    ) -> Result<CareerSession, anyhow::Error>
    where
        L::Error: Into<anyhow::Error>,
    {
        let catalog = self.catalog_loader.load_catalog().map_err(Into::into)?;
        let session = CareerSession::new(&catalog, team_name, league_id, seed, self.cfg.clone())?;
        Ok(session)
    }

    /// Save a career state
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be saved.
    pub fn save_career(&self, save_name: &str, game_state: &GameState) -> Result<(), S::Error> {
        self.storage.save_game(save_name, game_state)
    }

    /// Load a career state
    ///
    /// Saved states carry their own catalog; it is checked against the
    /// current one so a save never points at a league that no longer exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be loaded or names an unknown league.
    pub fn load_career(&self, save_name: &str) -> Result<Option<GameState>, anyhow::Error>
    where
        L::Error: Into<anyhow::Error>,
        S::Error: Into<anyhow::Error>,
    {
        let Some(mut game_state) = self.storage.load_game(save_name).map_err(Into::into)? else {
            return Ok(None);
        };
        if game_state.current_league().is_err() {
            // Refresh from the loader when the embedded catalog is stale.
            let catalog = self.catalog_loader.load_catalog().map_err(Into::into)?;
            catalog.get(&game_state.player.current_league_id)?;
            log::warn!("save `{save_name}` had a stale league catalog; refreshed");
            game_state.leagues = catalog;
        }
        Ok(Some(game_state))
    }

    /// Delete a saved career
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    pub fn delete_career(&self, save_name: &str) -> Result<(), S::Error> {
        self.storage.delete_save(save_name)
    }
}
