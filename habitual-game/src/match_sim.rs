//! Match outcome generation.
//!
//! A match is reduced to the difference between two effective strengths. The
//! difference is classified into one of five ordered bands and each band draws
//! goals for both sides from its own ranges. All randomness comes from the
//! caller-supplied [`Rng`], so a seeded generator replays a match exactly.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::constants::{
    BIG_WIN_THRESHOLD, CLEAR_LOSS_THRESHOLD, CLEAR_WIN_THRESHOLD, CLOSE_MATCH_EDGE,
    CLOSE_MATCH_EXTRA_GOAL_CHANCE, CLOSE_MATCH_THRESHOLD,
};

/// Final score of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub home_goals: u8,
    pub away_goals: u8,
}

impl MatchResult {
    #[must_use]
    pub const fn new(home_goals: u8, away_goals: u8) -> Self {
        Self {
            home_goals,
            away_goals,
        }
    }

    #[must_use]
    pub const fn is_draw(&self) -> bool {
        self.home_goals == self.away_goals
    }

    /// Outcome from the home side's point of view.
    #[must_use]
    pub const fn home_outcome(&self) -> MatchOutcome {
        if self.home_goals > self.away_goals {
            MatchOutcome::Win
        } else if self.home_goals < self.away_goals {
            MatchOutcome::Loss
        } else {
            MatchOutcome::Draw
        }
    }

    #[must_use]
    pub const fn away_outcome(&self) -> MatchOutcome {
        self.home_outcome().reversed()
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.home_goals, self.away_goals)
    }
}

/// Result of a match for one participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchOutcome {
    Win,
    Draw,
    Loss,
}

impl MatchOutcome {
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Win => Self::Loss,
            Self::Draw => Self::Draw,
            Self::Loss => Self::Win,
        }
    }
}

impl fmt::Display for MatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Win => write!(f, "W"),
            Self::Draw => write!(f, "D"),
            Self::Loss => write!(f, "L"),
        }
    }
}

/// Strength differential classes, ordered from the home side's best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeBand {
    BigWin,
    ClearWin,
    Close,
    ClearLoss,
    BigLoss,
}

/// Goals drawn as `base + floor(U[0, 1) * span)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalRange {
    pub base: u8,
    pub span: f32,
}

impl GoalRange {
    #[must_use]
    pub const fn new(base: u8, span: f32) -> Self {
        Self { base, span }
    }

    /// Highest value [`GoalRange::sample`] can return.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn max(&self) -> u8 {
        let extra = (self.span.ceil() - 1.0).max(0.0) as u8;
        self.base.saturating_add(extra)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u8 {
        let roll: f32 = rng.r#gen();
        let extra = (roll * self.span).floor().max(0.0) as u8;
        self.base.saturating_add(extra)
    }
}

/// One row of the band table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandRule {
    pub band: OutcomeBand,
    /// The rule applies when the differential is strictly above this value.
    /// `None` marks the catch-all last row.
    pub above: Option<f32>,
    pub home: GoalRange,
    pub away: GoalRange,
}

/// Problems with a custom band table.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BandTableError {
    #[error("band table has no rules")]
    Empty,
    #[error("the last band rule must be a catch-all without a threshold")]
    MissingCatchAll,
    #[error("only the last band rule may omit its threshold")]
    EarlyCatchAll,
    #[error("band thresholds must strictly decrease ({previous} then {next})")]
    UnorderedThresholds { previous: f32, next: f32 },
    #[error("goal range span must be positive (got {0})")]
    NonPositiveSpan(f32),
    #[error("extra goal chance must be within 0..=1 (got {0})")]
    ChanceOutOfRange(f64),
}

/// Lookup table from strength differential to goal ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalBandTable {
    pub rules: Vec<BandRule>,
    /// In the close band, a side leading by more than this may score once more.
    #[serde(default = "GoalBandTable::default_close_edge")]
    pub close_edge: f32,
    #[serde(default = "GoalBandTable::default_close_extra_goal_chance")]
    pub close_extra_goal_chance: f64,
}

impl GoalBandTable {
    const fn default_close_edge() -> f32 {
        CLOSE_MATCH_EDGE
    }

    const fn default_close_extra_goal_chance() -> f64 {
        CLOSE_MATCH_EXTRA_GOAL_CHANCE
    }

    /// Check ordering and ranges.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> Result<(), BandTableError> {
        let Some((last, rest)) = self.rules.split_last() else {
            return Err(BandTableError::Empty);
        };
        if last.above.is_some() {
            return Err(BandTableError::MissingCatchAll);
        }
        let mut previous: Option<f32> = None;
        for rule in rest {
            let Some(above) = rule.above else {
                return Err(BandTableError::EarlyCatchAll);
            };
            if let Some(prev) = previous
                && above >= prev
            {
                return Err(BandTableError::UnorderedThresholds {
                    previous: prev,
                    next: above,
                });
            }
            previous = Some(above);
        }
        for rule in &self.rules {
            for range in [rule.home, rule.away] {
                if range.span.is_nan() || range.span <= 0.0 {
                    return Err(BandTableError::NonPositiveSpan(range.span));
                }
            }
        }
        if !(0.0..=1.0).contains(&self.close_extra_goal_chance) {
            return Err(BandTableError::ChanceOutOfRange(
                self.close_extra_goal_chance,
            ));
        }
        Ok(())
    }

    /// Find the rule for a differential (`home - away`).
    #[must_use]
    pub fn rule_for(&self, differential: f32) -> Option<&BandRule> {
        self.rules
            .iter()
            .find(|rule| rule.above.is_none_or(|above| differential > above))
    }

    #[must_use]
    pub fn classify(&self, differential: f32) -> Option<OutcomeBand> {
        self.rule_for(differential).map(|rule| rule.band)
    }
}

impl Default for GoalBandTable {
    fn default() -> Self {
        Self {
            rules: vec![
                BandRule {
                    band: OutcomeBand::BigWin,
                    above: Some(BIG_WIN_THRESHOLD),
                    home: GoalRange::new(2, 3.0),
                    away: GoalRange::new(0, 2.0),
                },
                BandRule {
                    band: OutcomeBand::ClearWin,
                    above: Some(CLEAR_WIN_THRESHOLD),
                    home: GoalRange::new(1, 2.0),
                    away: GoalRange::new(0, 1.5),
                },
                BandRule {
                    band: OutcomeBand::Close,
                    above: Some(CLOSE_MATCH_THRESHOLD),
                    home: GoalRange::new(0, 2.5),
                    away: GoalRange::new(0, 2.5),
                },
                BandRule {
                    band: OutcomeBand::ClearLoss,
                    above: Some(CLEAR_LOSS_THRESHOLD),
                    home: GoalRange::new(0, 1.5),
                    away: GoalRange::new(1, 2.0),
                },
                BandRule {
                    band: OutcomeBand::BigLoss,
                    above: None,
                    home: GoalRange::new(0, 2.0),
                    away: GoalRange::new(2, 3.0),
                },
            ],
            close_edge: CLOSE_MATCH_EDGE,
            close_extra_goal_chance: CLOSE_MATCH_EXTRA_GOAL_CHANCE,
        }
    }
}

/// Situational adjustments for one side of a match.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideModifiers {
    /// Added to the base strength (training, morale, jitter).
    pub flat_bonus: f32,
    /// Applied after the flat bonus (home advantage).
    pub multiplier: f32,
}

impl SideModifiers {
    #[must_use]
    pub const fn new(flat_bonus: f32, multiplier: f32) -> Self {
        Self {
            flat_bonus,
            multiplier,
        }
    }
}

impl Default for SideModifiers {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchModifiers {
    pub home: SideModifiers,
    pub away: SideModifiers,
}

/// Strength after modifiers, never negative.
#[must_use]
pub fn effective_strength(base: f32, modifiers: SideModifiers) -> f32 {
    ((base + modifiers.flat_bonus) * modifiers.multiplier).max(0.0)
}

/// Draw a score from two effective strengths.
pub fn simulate_match<R: Rng + ?Sized>(
    home_strength: f32,
    away_strength: f32,
    table: &GoalBandTable,
    rng: &mut R,
) -> MatchResult {
    let differential = home_strength.max(0.0) - away_strength.max(0.0);
    let Some(rule) = table.rule_for(differential) else {
        return MatchResult::new(0, 0);
    };

    let mut home_goals = rule.home.sample(rng);
    let mut away_goals = rule.away.sample(rng);

    if rule.band == OutcomeBand::Close {
        if differential > table.close_edge && rng.gen_bool(table.close_extra_goal_chance) {
            home_goals = home_goals.saturating_add(1);
        }
        if differential < -table.close_edge && rng.gen_bool(table.close_extra_goal_chance) {
            away_goals = away_goals.saturating_add(1);
        }
    }

    MatchResult::new(home_goals, away_goals)
}

/// Apply modifiers to two base strengths and draw a score.
pub fn resolve_match<R: Rng + ?Sized>(
    home_base: f32,
    away_base: f32,
    modifiers: MatchModifiers,
    table: &GoalBandTable,
    rng: &mut R,
) -> MatchResult {
    let home = effective_strength(home_base, modifiers.home);
    let away = effective_strength(away_base, modifiers.away);
    simulate_match(home, away, table, rng)
}
