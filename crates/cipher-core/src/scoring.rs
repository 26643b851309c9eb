//! Point awards for a solved round.
//!
//! Which rule applies is chosen at configuration time through
//! [`ScoringRule`]; callers that want a different award can hand the engine
//! their own [`ScoringPolicy`].

use crate::cipher::CipherFamily;
use serde::{Deserialize, Serialize};

/// Points every solve earns
pub const BASE_POINTS: u32 = 100;
/// Family bonus for a shift cipher under the time-remaining rule
pub const SHIFT_BONUS: u32 = 50;
/// Family bonus for a substitution cipher under the time-remaining rule
pub const SUBSTITUTION_BONUS: u32 = 100;
/// Seconds of remaining time worth one point
pub const SECONDS_PER_POINT: f64 = 10.0;
/// Points per unused hint under the hints-preserved rule
pub const POINTS_PER_HINT: u32 = 50;

/// Facts about a round at the moment it was solved
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreContext {
    pub family: CipherFamily,
    /// Countdown time left, `None` on a stopwatch
    pub time_remaining_secs: Option<f64>,
    /// Stopwatch time used, `None` on a countdown
    pub elapsed_secs: Option<f64>,
    pub hints_remaining: u32,
}

/// Strategy that turns a solved round into points
pub trait ScoringPolicy: std::fmt::Debug {
    fn award(&self, ctx: &ScoreContext) -> u32;

    /// Name for display and logs
    fn name(&self) -> &'static str;
}

/// `100 + floor(remaining / 10) + family bonus`
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeRemainingRule;

impl ScoringPolicy for TimeRemainingRule {
    fn award(&self, ctx: &ScoreContext) -> u32 {
        let remaining = ctx.time_remaining_secs.unwrap_or(0.0).max(0.0);
        // `as` saturates at u32::MAX for huge budgets
        let time_points = (remaining / SECONDS_PER_POINT).floor() as u32;
        let family_bonus = match ctx.family {
            CipherFamily::Shift => SHIFT_BONUS,
            CipherFamily::Substitution => SUBSTITUTION_BONUS,
        };
        BASE_POINTS
            .saturating_add(time_points)
            .saturating_add(family_bonus)
    }

    fn name(&self) -> &'static str {
        "time-remaining"
    }
}

/// `100 + hints_remaining * 50`
#[derive(Debug, Clone, Copy, Default)]
pub struct HintsPreservedRule;

impl ScoringPolicy for HintsPreservedRule {
    fn award(&self, ctx: &ScoreContext) -> u32 {
        BASE_POINTS.saturating_add(ctx.hints_remaining.saturating_mul(POINTS_PER_HINT))
    }

    fn name(&self) -> &'static str {
        "hints-preserved"
    }
}

/// Configurable choice between the built-in rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringRule {
    TimeRemaining,
    HintsPreserved,
}

impl ScoringRule {
    pub fn policy(&self) -> Box<dyn ScoringPolicy> {
        match self {
            ScoringRule::TimeRemaining => Box::new(TimeRemainingRule),
            ScoringRule::HintsPreserved => Box::new(HintsPreservedRule),
        }
    }
}
