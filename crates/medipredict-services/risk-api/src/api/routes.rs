use crate::api::handlers::{health_check, predict_risk, service_info};
use crate::api::state::AppState;
use crate::config::{Config, CorsConfig};
use crate::error::Result;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::OpenApi as OpenApiDoc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Swagger UI mount point, advertised by `GET /`.
pub const DOCS_PATH: &str = "/docs";

pub const OPENAPI_PATH: &str = "/openapi.json";

/// Prefix the annotated handler paths are written against.
const DOCUMENTED_PREFIX: &str = "/api/v1";

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::root::service_info,
        crate::api::handlers::health::health_check,
        crate::api::handlers::predict::predict_risk,
    ),
    components(
        schemas(
            crate::models::PatientVitals,
            crate::models::RiskAssessment,
            crate::models::RiskFactors,
            crate::models::RiskLevel,
            crate::models::HealthResponse,
            crate::models::ServiceInfoResponse,
        )
    ),
    tags(
        (name = "prediction", description = "Disease risk scoring"),
        (name = "system", description = "Service metadata and liveness")
    )
)]
pub struct ApiDoc;

/// OpenAPI document with the configured title, version and API prefix.
pub fn openapi_doc(config: &Config) -> OpenApiDoc {
    let mut doc = ApiDoc::openapi();
    doc.info.title = config.app.name.clone();
    doc.info.version = config.app.version.clone();
    doc.info.description = Some(config.app.description.clone());

    let prefix = config.api.v1_prefix.as_str();
    if prefix != DOCUMENTED_PREFIX {
        doc.paths.paths = std::mem::take(&mut doc.paths.paths)
            .into_iter()
            .map(|(path, item)| match path.strip_prefix(DOCUMENTED_PREFIX) {
                Some(rest) => (format!("{prefix}{rest}"), item),
                None => (path, item),
            })
            .collect();
    }

    doc
}

pub fn cors_layer(cors: &CorsConfig) -> Result<CorsLayer> {
    if cors.allows_any_origin() {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(cors.origin_header_values()?))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(cors.allow_credentials))
}

pub fn create_router(state: Arc<AppState>) -> Result<Router> {
    let config = Arc::clone(&state.config);

    let api_routes = Router::new().route("/predict", post(predict_risk));

    let router = Router::new()
        .route("/", get(service_info))
        .route("/health", get(health_check))
        .nest(&config.api.v1_prefix, api_routes)
        .with_state(state)
        .merge(SwaggerUi::new(DOCS_PATH).url(OPENAPI_PATH, openapi_doc(&config)))
        .layer(cors_layer(&config.cors)?)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}
