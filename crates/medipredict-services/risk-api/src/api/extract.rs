//! Request extractors.

use crate::error::{FieldError, MpError, RiskErrorExt};
use crate::models::PatientVitals;
use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use tracing::debug;

/// JSON body parsed and validated into [`PatientVitals`].
///
/// Rejects with `422` and the full list of field errors, so handlers only
/// ever see valid vitals.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedVitals(pub PatientVitals);

#[async_trait]
impl<S> FromRequest<S> for ValidatedVitals
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state)
            .await
            .map_err(json_rejection)?;

        PatientVitals::from_json(&body).map(Self).map_err(|errors| {
            debug!(error_count = errors.len(), %errors, "Rejected vitals payload");
            MpError::Validation(errors).into_response()
        })
    }
}

fn json_rejection(rejection: JsonRejection) -> Response {
    match rejection {
        JsonRejection::MissingJsonContentType(r) => {
            MpError::UnsupportedMediaType(r.body_text()).into_response()
        }
        e @ (JsonRejection::JsonSyntaxError(_) | JsonRejection::JsonDataError(_)) => {
            MpError::from(FieldError::json_invalid(e.body_text())).into_response()
        }
        // Oversized or unreadable bodies keep axum's status (413, 400).
        other => {
            debug!(status = %other.status(), "Rejected request body");
            other.into_response()
        }
    }
}
