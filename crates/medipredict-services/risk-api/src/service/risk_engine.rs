//! Heuristic disease risk scoring.

use crate::models::{PatientVitals, RiskAssessment, RiskFactors};
use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

/// Simulated model inference latency.
pub const INFERENCE_DELAY: Duration = Duration::from_millis(500);

/// Ages strictly above this add [`AGE_WEIGHT`].
pub const AGE_THRESHOLD: u8 = 50;
pub const AGE_WEIGHT: f64 = 20.0;

/// BMI strictly above this adds [`BMI_WEIGHT`].
pub const BMI_THRESHOLD: f64 = 30.0;
pub const BMI_WEIGHT: f64 = 30.0;

pub const SMOKER_WEIGHT: f64 = 25.0;

/// Produces a risk assessment for validated vitals.
///
/// Handlers depend on this trait rather than on [`RiskEngine`] directly.
#[async_trait]
pub trait RiskPredictor: Send + Sync {
    async fn predict(&self, vitals: &PatientVitals) -> RiskAssessment;
}

/// Rule-based risk engine.
///
/// Stateless: every instance behaves identically and can be copied freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct RiskEngine;

impl RiskEngine {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Scores vitals without the simulated inference delay.
    #[must_use]
    pub fn score(&self, vitals: &PatientVitals) -> RiskAssessment {
        let factors = RiskFactors {
            age_factor: if vitals.age() > AGE_THRESHOLD {
                AGE_WEIGHT
            } else {
                0.0
            },
            bmi_factor: if vitals.bmi() > BMI_THRESHOLD {
                BMI_WEIGHT
            } else {
                0.0
            },
            smoker_factor: if vitals.is_smoker() {
                SMOKER_WEIGHT
            } else {
                0.0
            },
        };

        RiskAssessment::from_factors(factors)
    }
}

#[async_trait]
impl RiskPredictor for RiskEngine {
    async fn predict(&self, vitals: &PatientVitals) -> RiskAssessment {
        info!(
            age = vitals.age(),
            bmi = vitals.bmi(),
            systolic_bp = vitals.systolic_bp(),
            is_smoker = vitals.is_smoker(),
            "Predicting risk"
        );

        // Yields to the runtime so other requests keep being served.
        tokio::time::sleep(INFERENCE_DELAY).await;

        let assessment = self.score(vitals);

        info!(
            risk_score = assessment.risk_score(),
            risk_level = %assessment.risk_level(),
            "Risk prediction complete"
        );

        assessment
    }
}
