pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod service;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::{MpError, Result, RiskErrorExt};
pub use models::{PatientVitals, RiskAssessment, RiskFactors, RiskLevel};
pub use service::{RiskEngine, RiskPredictor};
