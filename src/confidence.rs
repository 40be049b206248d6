use std::fmt;

use serde::{Deserialize, Serialize};

/// Qualitative confidence shared by dialect detection and field mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    VeryHigh,
    High,
    Medium,
    Low,
    VeryLow,
}

impl Confidence {
    /// Maps a 0–1 heuristic score onto the five-level scale.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.9 {
            Confidence::VeryHigh
        } else if score >= 0.75 {
            Confidence::High
        } else if score >= 0.5 {
            Confidence::Medium
        } else if score >= 0.25 {
            Confidence::Low
        } else {
            Confidence::VeryLow
        }
    }

    /// Numeric weight used when blending confidences into a quality score.
    pub fn weight(self) -> f64 {
        match self {
            Confidence::VeryHigh => 1.0,
            Confidence::High => 0.8,
            Confidence::Medium => 0.6,
            Confidence::Low => 0.4,
            Confidence::VeryLow => 0.2,
        }
    }

    pub fn is_low(self) -> bool {
        matches!(self, Confidence::Low | Confidence::VeryLow)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Confidence::VeryHigh => "very_high",
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
            Confidence::VeryLow => "very_low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
