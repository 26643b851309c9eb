use crate::config::TimerMode;

/// Time model for a single round
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoundClock {
    /// Counts down from a budget and stops at zero
    Countdown { remaining: f64 },
    /// Counts up without limit
    Stopwatch { elapsed: f64 },
}

impl RoundClock {
    pub fn from_mode(mode: TimerMode) -> Self {
        match mode {
            // NaN and negative budgets start exhausted
            TimerMode::Countdown { budget_secs } => RoundClock::Countdown {
                remaining: budget_secs.max(0.0),
            },
            TimerMode::Stopwatch => RoundClock::Stopwatch { elapsed: 0.0 },
        }
    }

    /// Advance by `dt` seconds. Negative or NaN deltas count as zero.
    ///
    /// Returns true while the countdown is exhausted, including a clock that
    /// started with no time; callers stop ticking once the round is over.
    pub fn advance(&mut self, dt: f64) -> bool {
        let dt = dt.max(0.0);
        match self {
            RoundClock::Countdown { remaining } => {
                *remaining = (*remaining - dt).max(0.0);
                *remaining <= 0.0
            }
            RoundClock::Stopwatch { elapsed } => {
                *elapsed += dt;
                false
            }
        }
    }

    pub fn remaining_secs(&self) -> Option<f64> {
        match self {
            RoundClock::Countdown { remaining } => Some(*remaining),
            RoundClock::Stopwatch { .. } => None,
        }
    }

    pub fn elapsed_secs(&self) -> Option<f64> {
        match self {
            RoundClock::Countdown { .. } => None,
            RoundClock::Stopwatch { elapsed } => Some(*elapsed),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, RoundClock::Countdown { remaining } if *remaining <= 0.0)
    }

    /// Whole seconds to show: remaining for a countdown, elapsed for a stopwatch
    pub fn display_secs(&self) -> u64 {
        match self {
            RoundClock::Countdown { remaining } => remaining.max(0.0) as u64,
            RoundClock::Stopwatch { elapsed } => elapsed.max(0.0) as u64,
        }
    }
}

/// Format seconds as MM:SS or HH:MM:SS
pub fn format_time(secs: u64) -> String {
    if secs >= 3600 {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        let secs = secs % 60;
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{:02}:{:02}", mins, secs)
    }
}
