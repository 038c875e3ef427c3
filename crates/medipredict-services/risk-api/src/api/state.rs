use crate::config::Config;
use crate::service::{RiskEngine, RiskPredictor};
use std::sync::Arc;

/// Application state shared across handlers.
///
/// Immutable after startup; nothing here needs locking.
#[derive(Clone)]
pub struct AppState {
    /// Scorer invoked for each prediction request.
    pub predictor: Arc<dyn RiskPredictor>,
    /// Settings loaded once at startup.
    pub config: Arc<Config>,
}

impl AppState {
    /// State backed by the rule-based [`RiskEngine`].
    pub fn new(config: Config) -> Self {
        Self::with_predictor(config, Arc::new(RiskEngine::new()))
    }

    pub fn with_predictor(config: Config, predictor: Arc<dyn RiskPredictor>) -> Self {
        Self {
            predictor,
            config: Arc::new(config),
        }
    }
}
