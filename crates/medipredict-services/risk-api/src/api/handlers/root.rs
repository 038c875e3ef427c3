use crate::api::routes::DOCS_PATH;
use crate::api::state::AppState;
use crate::models::ServiceInfoResponse;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/",
    tag = "system",
    responses(
        (status = 200, description = "Service metadata", body = ServiceInfoResponse)
    )
)]
pub async fn service_info(State(state): State<Arc<AppState>>) -> Json<ServiceInfoResponse> {
    let app = &state.config.app;
    Json(ServiceInfoResponse {
        message: app.name.clone(),
        version: app.version.clone(),
        docs: DOCS_PATH.to_string(),
    })
}
