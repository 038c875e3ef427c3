//! # MediPredict Risk Models
//!
//! Wire types of the risk API: the validated [`PatientVitals`] request, the
//! [`RiskAssessment`] response and the auxiliary endpoint bodies. Shared by
//! the service and its clients so both sides agree on one schema.
//!
//! ```
//! use medipredict_risk_models::PatientVitals;
//! use serde_json::json;
//!
//! let vitals = PatientVitals::from_json(&json!({
//!     "age": "51",
//!     "bmi": 20.0,
//!     "systolic_bp": 120,
//!     "is_smoker": "no"
//! }))
//! .unwrap();
//! assert_eq!(vitals.age(), 51);
//! assert!(!vitals.is_smoker());
//! ```

pub mod assessment;
pub mod dto;
pub mod error;
pub mod vitals;

pub use assessment::{RiskAssessment, RiskFactors, RiskLevel, MAX_SCORE, MIN_SCORE};
pub use dto::{HealthResponse, ServiceInfoResponse};
pub use error::{ExpectedType, RiskErrorExt, BODY};
pub use vitals::PatientVitals;
