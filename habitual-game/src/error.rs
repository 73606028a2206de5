//! Contract violations raised by the career core.
use thiserror::Error;

use crate::config::CareerConfigError;

/// Errors raised when a caller breaks the career contract.
///
/// Apart from a rejected [`CareerConfigError`], every variant is either an
/// invalid reference (something missing from the league catalog) or an invalid
/// invocation (an operation requested in the wrong career state). A normal end
/// of season is never an error; use [`crate::GameState::status`] to observe it.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CareerError {
    #[error("league `{0}` is not in the catalog")]
    UnknownLeague(String),
    #[error("team `{0}` has no entry in the current table")]
    UnknownTeam(String),
    #[error("league `{0}` has no teams")]
    EmptyLeague(String),
    #[error("team name must not be empty")]
    EmptyTeamName,
    #[error("team name `{0}` clashes with a team in the league pyramid")]
    TeamNameConflict(String),
    #[error("season {season} is over after matchday {total_matchdays}")]
    SeasonOver { season: u32, total_matchdays: u32 },
    #[error("season {season} is still in progress (matchday {matchday} of {total_matchdays})")]
    SeasonInProgress {
        season: u32,
        matchday: u32,
        total_matchdays: u32,
    },
    #[error("the career has already been won")]
    GameAlreadyWon,
    #[error("fixture {home} vs {away} on matchday {matchday} has no result")]
    UnplayedFixture {
        matchday: u32,
        home: String,
        away: String,
    },
    #[error("career config rejected: {0}")]
    InvalidConfig(#[from] CareerConfigError),
}

impl CareerError {
    /// True for errors caused by a reference missing from the catalog or table.
    #[must_use]
    pub const fn is_invalid_reference(&self) -> bool {
        matches!(
            self,
            Self::UnknownLeague(_)
                | Self::UnknownTeam(_)
                | Self::EmptyLeague(_)
                | Self::TeamNameConflict(_)
                | Self::EmptyTeamName
        )
    }

    /// True for errors caused by calling an operation in the wrong career state.
    #[must_use]
    pub const fn is_invalid_invocation(&self) -> bool {
        matches!(
            self,
            Self::SeasonOver { .. }
                | Self::SeasonInProgress { .. }
                | Self::GameAlreadyWon
                | Self::UnplayedFixture { .. }
        )
    }
}
