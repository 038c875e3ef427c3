use crate::api::extract::ValidatedVitals;
use crate::api::state::AppState;
use crate::models::RiskAssessment;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;
use tracing::debug;

/// Scores a patient's vitals.
///
/// Validation happens in [`ValidatedVitals`]; an invalid body never reaches
/// the predictor.
#[utoipa::path(
    post,
    path = "/api/v1/predict",
    tag = "prediction",
    request_body = crate::models::PatientVitals,
    responses(
        (status = 200, description = "Risk assessment", body = RiskAssessment),
        (status = 415, description = "Body is not declared as JSON"),
        (status = 422, description = "Missing, mistyped or out-of-range fields")
    )
)]
pub async fn predict_risk(
    State(state): State<Arc<AppState>>,
    ValidatedVitals(vitals): ValidatedVitals,
) -> Json<RiskAssessment> {
    let assessment = state.predictor.predict(&vitals).await;

    debug!(
        risk_score = assessment.risk_score(),
        risk_level = %assessment.risk_level(),
        "Prediction complete"
    );

    Json(assessment)
}
