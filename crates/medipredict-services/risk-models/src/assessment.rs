use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Lowest possible risk score.
pub const MIN_SCORE: f64 = 0.0;
/// Highest possible risk score.
pub const MAX_SCORE: f64 = 100.0;

/// Risk level category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Scores at or above this are at least `Moderate`.
    pub const MODERATE_THRESHOLD: f64 = 30.0;
    /// Scores at or above this are `High`.
    pub const HIGH_THRESHOLD: f64 = 60.0;

    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score < Self::MODERATE_THRESHOLD {
            RiskLevel::Low
        } else if score < Self::HIGH_THRESHOLD {
            RiskLevel::Moderate
        } else {
            RiskLevel::High
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Moderate => "MODERATE",
            RiskLevel::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contribution of each risk factor to the score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RiskFactors {
    pub age_factor: f64,
    pub bmi_factor: f64,
    pub smoker_factor: f64,
}

impl RiskFactors {
    /// Factor names in the order they are computed.
    pub const NAMES: [&'static str; 3] = ["age_factor", "bmi_factor", "smoker_factor"];

    /// `(name, contribution)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        Self::NAMES
            .into_iter()
            .zip([self.age_factor, self.bmi_factor, self.smoker_factor])
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }

    /// Unclamped sum of all contributions.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.iter().map(|(_, v)| v).sum()
    }
}

/// Output of a risk prediction.
///
/// Only constructible from [`RiskFactors`], so `risk_score` is always the
/// clamped factor total and `risk_level` always matches the score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "risk_score": 75.0,
    "risk_level": "HIGH",
    "factors": {"age_factor": 20.0, "bmi_factor": 30.0, "smoker_factor": 25.0}
}))]
pub struct RiskAssessment {
    /// Risk score (0-100)
    #[schema(minimum = 0.0, maximum = 100.0)]
    risk_score: f64,
    /// Risk level category
    risk_level: RiskLevel,
    /// Contributing factors to the score
    factors: RiskFactors,
}

impl RiskAssessment {
    #[must_use]
    pub fn from_factors(factors: RiskFactors) -> Self {
        let risk_score = factors.total().clamp(MIN_SCORE, MAX_SCORE);
        Self {
            risk_score,
            risk_level: RiskLevel::from_score(risk_score),
            factors,
        }
    }

    #[must_use]
    pub fn risk_score(&self) -> f64 {
        self.risk_score
    }

    #[must_use]
    pub fn risk_level(&self) -> RiskLevel {
        self.risk_level
    }

    #[must_use]
    pub fn factors(&self) -> &RiskFactors {
        &self.factors
    }
}
