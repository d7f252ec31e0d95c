//! Confidence scores and their prompt tiers.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A writer's confidence in an entry, always within `[0, 1]`.
///
/// Out-of-range values are clamped; non-finite values fall back to the
/// default of `0.5`.
///
/// # Examples
///
/// ```
/// use concord::blackboard::domain::{Confidence, ConfidenceTier};
///
/// assert_eq!(Confidence::new(1.7).value(), 1.0);
/// assert_eq!(Confidence::new(f64::NAN), Confidence::default());
/// assert_eq!(Confidence::new(0.8).tier(), ConfidenceTier::High);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Confidence(f64);

impl Confidence {
    /// Confidence assumed when a writer gives none.
    pub const DEFAULT: Self = Self(0.5);

    /// Creates a confidence score, clamping into `[0, 1]`.
    #[must_use]
    pub const fn new(value: f64) -> Self {
        if value.is_finite() {
            Self(value.clamp(0.0, 1.0))
        } else {
            Self::DEFAULT
        }
    }

    /// Returns the score.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Returns the prompt tier this score falls into.
    #[must_use]
    pub const fn tier(self) -> ConfidenceTier {
        if self.0 >= 0.8 {
            ConfidenceTier::High
        } else if self.0 >= 0.5 {
            ConfidenceTier::Medium
        } else {
            ConfidenceTier::Low
        }
    }

    /// Orders two scores; clamping rules out NaN so the order is total.
    #[must_use]
    pub fn cmp_score(self, other: Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<f64> for Confidence {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl From<Confidence> for f64 {
    fn from(value: Confidence) -> Self {
        value.0
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Confidence bands used when rendering the blackboard into a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConfidenceTier {
    /// At least `0.8`.
    High,
    /// At least `0.5` and below `0.8`.
    Medium,
    /// Below `0.5`.
    Low,
}

impl ConfidenceTier {
    /// Tiers in rendering order.
    pub const ALL: [Self; 3] = [Self::High, Self::Medium, Self::Low];

    /// Returns the section label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "[HIGH CONFIDENCE]",
            Self::Medium => "[MEDIUM]",
            Self::Low => "[LOW]",
        }
    }
}
