//! Error handling for the risk API.
//!
//! Uses `mp_error::MpError` as the unified error type. Payload problems are
//! built with [`RiskErrorExt`] and surface as `422 Unprocessable Entity`.

pub use medipredict_risk_models::{ExpectedType, RiskErrorExt, BODY};
pub use mp_error::{FieldError, MpError, Result, ValidationErrors};
