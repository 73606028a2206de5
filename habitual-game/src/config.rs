//! Tunable career rules.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants;
use crate::match_sim::{BandTableError, GoalBandTable};

/// Errors raised when career configuration invariants are violated.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CareerConfigError {
    #[error("{field} must be positive (got {value:.2})")]
    NonPositive { field: &'static str, value: f32 },
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("promotion and relegation need at least one slot each")]
    NoTransitionSlots,
    #[error("goal bands invalid: {0}")]
    GoalBands(#[from] BandTableError),
}

/// Rules applied by the career state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerConfig {
    #[serde(default = "CareerConfig::default_player_home_advantage")]
    pub player_home_advantage: f32,
    #[serde(default = "CareerConfig::default_ai_home_advantage")]
    pub ai_home_advantage: f32,
    #[serde(default = "CareerConfig::default_ai_home_advantage_chance")]
    pub ai_home_advantage_chance: f64,
    /// AI sides get `U[0, jitter)` added to their strength each match.
    #[serde(default = "CareerConfig::default_ai_strength_jitter")]
    pub ai_strength_jitter: f32,
    #[serde(default = "CareerConfig::default_morale_trained_gain")]
    pub morale_trained_gain: u8,
    #[serde(default = "CareerConfig::default_morale_idle_loss")]
    pub morale_idle_loss: u8,
    /// When set, morale shifts effective strength by `(morale - 50) / divisor`.
    #[serde(default = "CareerConfig::default_morale_coupling")]
    pub morale_coupling: bool,
    #[serde(default = "CareerConfig::default_morale_strength_divisor")]
    pub morale_strength_divisor: f32,
    #[serde(default = "CareerConfig::default_promotion_slots")]
    pub promotion_slots: usize,
    #[serde(default = "CareerConfig::default_relegation_slots")]
    pub relegation_slots: usize,
    #[serde(default = "CareerConfig::default_promotion_strength_bonus")]
    pub promotion_strength_bonus: u8,
    #[serde(default = "CareerConfig::default_stay_strength_bonus")]
    pub stay_strength_bonus: u8,
    #[serde(default = "CareerConfig::default_relegation_strength_bonus")]
    pub relegation_strength_bonus: u8,
    #[serde(default = "CareerConfig::default_starting_strength")]
    pub starting_strength: u8,
    #[serde(default = "CareerConfig::default_starting_morale")]
    pub starting_morale: u8,
    #[serde(default)]
    pub goal_bands: GoalBandTable,
}

impl CareerConfig {
    const fn default_player_home_advantage() -> f32 {
        constants::PLAYER_HOME_ADVANTAGE
    }

    const fn default_ai_home_advantage() -> f32 {
        constants::AI_HOME_ADVANTAGE
    }

    const fn default_ai_home_advantage_chance() -> f64 {
        constants::AI_HOME_ADVANTAGE_CHANCE
    }

    const fn default_ai_strength_jitter() -> f32 {
        constants::AI_STRENGTH_JITTER
    }

    const fn default_morale_trained_gain() -> u8 {
        constants::MORALE_TRAINED_GAIN
    }

    const fn default_morale_idle_loss() -> u8 {
        constants::MORALE_IDLE_LOSS
    }

    const fn default_morale_coupling() -> bool {
        true
    }

    const fn default_morale_strength_divisor() -> f32 {
        constants::MORALE_STRENGTH_DIVISOR
    }

    const fn default_promotion_slots() -> usize {
        constants::PROMOTION_SLOTS
    }

    const fn default_relegation_slots() -> usize {
        constants::RELEGATION_SLOTS
    }

    const fn default_promotion_strength_bonus() -> u8 {
        constants::PROMOTION_STRENGTH_BONUS
    }

    const fn default_stay_strength_bonus() -> u8 {
        constants::STAY_STRENGTH_BONUS
    }

    const fn default_relegation_strength_bonus() -> u8 {
        constants::RELEGATION_STRENGTH_BONUS
    }

    const fn default_starting_strength() -> u8 {
        constants::DEFAULT_PLAYER_STRENGTH
    }

    const fn default_starting_morale() -> u8 {
        constants::DEFAULT_PLAYER_MORALE
    }

    /// Parse a config from JSON; missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check that multipliers, probabilities and slot counts make sense.
    ///
    /// # Errors
    ///
    /// Returns the first invariant violation found.
    pub fn validate(&self) -> Result<(), CareerConfigError> {
        for (field, value) in [
            ("player_home_advantage", self.player_home_advantage),
            ("ai_home_advantage", self.ai_home_advantage),
            ("morale_strength_divisor", self.morale_strength_divisor),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(CareerConfigError::NonPositive { field, value });
            }
        }
        if !(0.0..=1.0).contains(&self.ai_home_advantage_chance) {
            return Err(CareerConfigError::RangeViolation {
                field: "ai_home_advantage_chance",
                min: 0.0,
                max: 1.0,
                value: self.ai_home_advantage_chance,
            });
        }
        if self.ai_strength_jitter.is_nan() || self.ai_strength_jitter < 0.0 {
            return Err(CareerConfigError::RangeViolation {
                field: "ai_strength_jitter",
                min: 0.0,
                max: f64::from(constants::STRENGTH_MAX),
                value: f64::from(self.ai_strength_jitter),
            });
        }
        for (field, value) in [
            ("starting_strength", self.starting_strength),
            ("starting_morale", self.starting_morale),
        ] {
            if value > constants::STRENGTH_MAX {
                return Err(CareerConfigError::RangeViolation {
                    field,
                    min: 0.0,
                    max: f64::from(constants::STRENGTH_MAX),
                    value: f64::from(value),
                });
            }
        }
        if self.promotion_slots == 0 || self.relegation_slots == 0 {
            return Err(CareerConfigError::NoTransitionSlots);
        }
        self.goal_bands.validate()?;
        Ok(())
    }
}

impl Default for CareerConfig {
    fn default() -> Self {
        Self {
            player_home_advantage: Self::default_player_home_advantage(),
            ai_home_advantage: Self::default_ai_home_advantage(),
            ai_home_advantage_chance: Self::default_ai_home_advantage_chance(),
            ai_strength_jitter: Self::default_ai_strength_jitter(),
            morale_trained_gain: Self::default_morale_trained_gain(),
            morale_idle_loss: Self::default_morale_idle_loss(),
            morale_coupling: Self::default_morale_coupling(),
            morale_strength_divisor: Self::default_morale_strength_divisor(),
            promotion_slots: Self::default_promotion_slots(),
            relegation_slots: Self::default_relegation_slots(),
            promotion_strength_bonus: Self::default_promotion_strength_bonus(),
            stay_strength_bonus: Self::default_stay_strength_bonus(),
            relegation_strength_bonus: Self::default_relegation_strength_bonus(),
            starting_strength: Self::default_starting_strength(),
            starting_morale: Self::default_starting_morale(),
            goal_bands: GoalBandTable::default(),
        }
    }
}
