//! Centralized balance and tuning constants for the career simulation.
//!
//! These are the defaults behind [`crate::config::CareerConfig`] and the goal
//! band table. Keeping them together means balance changes go through code
//! review instead of drifting across modules.

// Player club ---------------------------------------------------------------
pub const DEFAULT_PLAYER_STRENGTH: u8 = 40;
pub const DEFAULT_PLAYER_MORALE: u8 = 50;
pub const STRENGTH_MAX: u8 = 100;
pub const MORALE_MAX: u8 = 100;
pub const MORALE_NEUTRAL: f32 = 50.0;
pub const MORALE_STRENGTH_DIVISOR: f32 = 5.0;
pub const MORALE_TRAINED_GAIN: u8 = 5;
pub const MORALE_IDLE_LOSS: u8 = 3;

// Home advantage and AI variance ---------------------------------------------
pub const PLAYER_HOME_ADVANTAGE: f32 = 1.20;
pub const AI_HOME_ADVANTAGE: f32 = 1.10;
pub const AI_HOME_ADVANTAGE_CHANCE: f64 = 0.30;
pub const AI_STRENGTH_JITTER: f32 = 5.0;

// Goal bands -----------------------------------------------------------------
pub const BIG_WIN_THRESHOLD: f32 = 15.0;
pub const CLEAR_WIN_THRESHOLD: f32 = 5.0;
pub const CLOSE_MATCH_THRESHOLD: f32 = -5.0;
pub const CLEAR_LOSS_THRESHOLD: f32 = -15.0;
pub const CLOSE_MATCH_EDGE: f32 = 2.0;
pub const CLOSE_MATCH_EXTRA_GOAL_CHANCE: f64 = 0.25;

// Table ------------------------------------------------------------------------
pub const POINTS_FOR_WIN: u32 = 3;
pub const POINTS_FOR_DRAW: u32 = 1;

// Season transitions ---------------------------------------------------------
pub const PROMOTION_SLOTS: usize = 3;
pub const RELEGATION_SLOTS: usize = 3;
pub const PROMOTION_STRENGTH_BONUS: u8 = 5;
pub const STAY_STRENGTH_BONUS: u8 = 2;
pub const RELEGATION_STRENGTH_BONUS: u8 = 1;

// Queries ----------------------------------------------------------------------
pub const RECENT_FORM_LEN: usize = 5;
