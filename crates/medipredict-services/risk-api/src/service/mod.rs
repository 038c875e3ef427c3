pub mod risk_engine;

pub use risk_engine::{RiskEngine, RiskPredictor, INFERENCE_DELAY};
