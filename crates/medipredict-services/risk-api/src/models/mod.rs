pub use medipredict_risk_models::{
    HealthResponse, PatientVitals, RiskAssessment, RiskFactors, RiskLevel, ServiceInfoResponse,
    MAX_SCORE, MIN_SCORE,
};
