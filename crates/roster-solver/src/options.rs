//! Solver options
//!
//! Every knob of a run lives in [`SolverOptions`]. The CLI deserializes it
//! from a TOML file and layers the environment and flags on top.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Time bound used when nothing valid is configured
pub const DEFAULT_MAX_SECONDS: f64 = 10.0;

/// Environment variable that overrides the time bound
pub const MAX_SECONDS_ENV: &str = "MAX_SOLVER_SECONDS";

/// How a slot may end up without staff
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnfilledMode {
    /// Every slot gets an unfilled sentinel variable, penalized in the objective
    #[default]
    Sentinel,
    /// No sentinel: every slot needs exactly one staff member or the run is infeasible
    Reject,
}

/// Availability of staff who recorded no weekly windows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityDefault {
    #[default]
    Available,
    Unavailable,
}

/// Objective weights; coverage is made to dominate stability regardless
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectiveWeights {
    /// Cost of one unfilled slot
    pub unfilled: i64,
    /// Cost of one slot whose last approved assignee is not kept
    pub change: i64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            unfilled: 1000,
            change: 10,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Wall-clock bound of one solve, in seconds
    pub max_seconds: f64,
    pub unfilled_mode: UnfilledMode,
    pub availability_default: AvailabilityDefault,
    /// Permit one person on overlapping slots of the same date
    pub allow_overlap: bool,
    pub weights: ObjectiveWeights,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_seconds: DEFAULT_MAX_SECONDS,
            unfilled_mode: UnfilledMode::default(),
            availability_default: AvailabilityDefault::default(),
            allow_overlap: false,
            weights: ObjectiveWeights::default(),
        }
    }
}

impl SolverOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_seconds(mut self, seconds: f64) -> Self {
        self.max_seconds = seconds;
        self
    }

    pub fn unfilled_mode(mut self, mode: UnfilledMode) -> Self {
        self.unfilled_mode = mode;
        self
    }

    pub fn availability_default(mut self, default: AvailabilityDefault) -> Self {
        self.availability_default = default;
        self
    }

    pub fn allow_overlap(mut self, allow: bool) -> Self {
        self.allow_overlap = allow;
        self
    }

    pub fn weights(mut self, unfilled: i64, change: i64) -> Self {
        self.weights = ObjectiveWeights { unfilled, change };
        self
    }

    /// The time bound as a duration; invalid values fall back to the default
    pub fn time_limit(&self) -> Duration {
        let seconds = valid_seconds(self.max_seconds).unwrap_or(DEFAULT_MAX_SECONDS);
        Duration::try_from_secs_f64(seconds)
            .unwrap_or_else(|_| Duration::from_secs_f64(DEFAULT_MAX_SECONDS))
    }

    /// Effective time bound in seconds, as used in fallback reasons
    pub fn effective_seconds(&self) -> f64 {
        valid_seconds(self.max_seconds).unwrap_or(DEFAULT_MAX_SECONDS)
    }

    /// Override the time bound from an environment value, if it is usable
    pub fn apply_env_seconds(&mut self, value: Option<&str>) {
        if let Some(seconds) = value.and_then(seconds_from_str) {
            self.max_seconds = seconds;
        }
    }
}

fn valid_seconds(seconds: f64) -> Option<f64> {
    (seconds.is_finite() && seconds > 0.0).then_some(seconds)
}

fn seconds_from_str(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().and_then(valid_seconds)
}

/// Lenient reading of `MAX_SOLVER_SECONDS`: anything unusable means 10 seconds
pub fn parse_max_seconds(value: Option<&str>) -> f64 {
    value.and_then(seconds_from_str).unwrap_or(DEFAULT_MAX_SECONDS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_seconds_parsing_is_lenient() {
        assert_eq!(parse_max_seconds(None), 10.0);
        assert_eq!(parse_max_seconds(Some("2.5")), 2.5);
        assert_eq!(parse_max_seconds(Some(" 30 ")), 30.0);
        assert_eq!(parse_max_seconds(Some("abc")), 10.0);
        assert_eq!(parse_max_seconds(Some("0")), 10.0);
        assert_eq!(parse_max_seconds(Some("-4")), 10.0);
        assert_eq!(parse_max_seconds(Some("NaN")), 10.0);
        assert_eq!(parse_max_seconds(Some("inf")), 10.0);
    }

    #[test]
    fn env_override_keeps_configured_value_when_unusable() {
        let mut options = SolverOptions::new().max_seconds(3.0);
        options.apply_env_seconds(Some("junk"));
        assert_eq!(options.max_seconds, 3.0);
        options.apply_env_seconds(Some("7"));
        assert_eq!(options.max_seconds, 7.0);
        options.apply_env_seconds(None);
        assert_eq!(options.max_seconds, 7.0);
    }

    #[test]
    fn time_limit_never_panics_on_bad_values() {
        assert_eq!(
            SolverOptions::new().max_seconds(-1.0).time_limit(),
            Duration::from_secs(10)
        );
        assert_eq!(
            SolverOptions::new().max_seconds(f64::INFINITY).time_limit(),
            Duration::from_secs(10)
        );
        assert_eq!(
            SolverOptions::new().max_seconds(0.5).time_limit(),
            Duration::from_millis(500)
        );
    }

    #[test]
    fn defaults() {
        let options = SolverOptions::default();
        assert_eq!(options.unfilled_mode, UnfilledMode::Sentinel);
        assert_eq!(options.availability_default, AvailabilityDefault::Available);
        assert!(!options.allow_overlap);
        assert_eq!(options.weights.unfilled, 1000);
        assert_eq!(options.weights.change, 10);
    }
}
