use crate::cipher::{CipherFamily, ALPHABET_LEN, MAX_FIXED_POINTS};
use crate::error::{EngineError, Result};
use crate::scoring::ScoringRule;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Countdown budget for a round, in seconds (5 minutes)
pub const DEFAULT_TIME_BUDGET_SECS: f64 = 300.0;
/// Hints granted at the start of each round
pub const DEFAULT_HINTS: u32 = 3;

/// How the round clock runs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimerMode {
    /// Count down from a fixed budget; the round expires at zero
    Countdown { budget_secs: f64 },
    /// Count up with no limit
    Stopwatch,
}

/// Which cipher family new puzzles use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CipherChoice {
    /// Shift or substitution with equal probability
    Random,
    Shift,
    Substitution,
}

impl CipherChoice {
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> CipherFamily {
        match self {
            CipherChoice::Random => {
                if rng.gen_bool(0.5) {
                    CipherFamily::Shift
                } else {
                    CipherFamily::Substitution
                }
            }
            CipherChoice::Shift => CipherFamily::Shift,
            CipherChoice::Substitution => CipherFamily::Substitution,
        }
    }
}

/// Configuration for a game session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Round clock
    pub timer: TimerMode,
    /// Hints available at the start of each round
    pub hints_per_round: u32,
    /// Award rule applied on solve
    pub scoring: ScoringRule,
    /// Cipher family selection
    pub cipher: CipherChoice,
    /// Maximum letters a substitution key may leave unchanged
    pub max_fixed_points: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::countdown()
    }
}

impl GameConfig {
    /// Five-minute countdown, scored on time left and cipher family
    pub fn countdown() -> Self {
        Self {
            timer: TimerMode::Countdown {
                budget_secs: DEFAULT_TIME_BUDGET_SECS,
            },
            hints_per_round: DEFAULT_HINTS,
            scoring: ScoringRule::TimeRemaining,
            cipher: CipherChoice::Random,
            max_fixed_points: MAX_FIXED_POINTS,
        }
    }

    /// Untimed stopwatch, scored on hints left unused
    pub fn stopwatch() -> Self {
        Self {
            timer: TimerMode::Stopwatch,
            hints_per_round: DEFAULT_HINTS,
            scoring: ScoringRule::HintsPreserved,
            cipher: CipherChoice::Random,
            max_fixed_points: MAX_FIXED_POINTS,
        }
    }

    /// Parse a JSON config; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if let TimerMode::Countdown { budget_secs } = self.timer {
            if !budget_secs.is_finite() || budget_secs <= 0.0 {
                return Err(EngineError::InvalidConfig(format!(
                    "countdown budget must be a positive number of seconds, got {}",
                    budget_secs
                )));
            }
        }

        if self.max_fixed_points > ALPHABET_LEN {
            return Err(EngineError::InvalidConfig(format!(
                "max_fixed_points must be at most {}, got {}",
                ALPHABET_LEN, self.max_fixed_points
            )));
        }

        if self.scoring == ScoringRule::TimeRemaining && self.timer == TimerMode::Stopwatch {
            return Err(EngineError::InvalidConfig(
                "time-remaining scoring needs a countdown timer".to_string(),
            ));
        }

        Ok(())
    }
}
