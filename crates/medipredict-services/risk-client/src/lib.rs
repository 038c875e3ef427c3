//! # MediPredict Risk Client
//!
//! Typed HTTP client for the risk API. Requests and responses use the
//! shared `medipredict-risk-models` types the service serves.
//!
//! ```no_run
//! use medipredict_risk_client::{ClientConfig, RiskClient};
//! use medipredict_risk_models::PatientVitals;
//!
//! # async fn run() -> mp_error::Result<()> {
//! let client = RiskClient::new(ClientConfig::new("http://localhost:8000"))?;
//! let vitals = PatientVitals::new(51, 20.0, 120, false)?;
//! let assessment = client.predict(&vitals).await?;
//! println!("{} ({})", assessment.risk_score(), assessment.risk_level());
//! # Ok(())
//! # }
//! ```

use medipredict_risk_models::{HealthResponse, PatientVitals, RiskAssessment, ServiceInfoResponse};
use mp_error::{MpError, Result, ValidationErrors};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

pub use mp_error;

/// Configuration for [`RiskClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server root, e.g. `http://localhost:8000`
    pub base_url: String,
    /// Versioned API prefix the server was configured with
    pub api_prefix: String,
    /// Whole-request timeout, including the server's inference delay
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn with_api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            api_prefix: "/api/v1".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Body of a `422` response.
#[derive(Debug, Deserialize)]
struct ValidationBody {
    detail: ValidationErrors,
}

/// Client for the risk API.
#[derive(Debug, Clone)]
pub struct RiskClient {
    config: ClientConfig,
    client: Client,
}

impl RiskClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Requests a risk assessment.
    ///
    /// A `422` from the server becomes [`MpError::Validation`] carrying the
    /// server's field errors.
    #[tracing::instrument(skip(self, vitals), fields(age = vitals.age()), err)]
    pub async fn predict(&self, vitals: &PatientVitals) -> Result<RiskAssessment> {
        let url = format!(
            "{}{}/predict",
            self.config.base_url, self.config.api_prefix
        );

        let response = self.client.post(&url).json(vitals).send().await?;
        let assessment: RiskAssessment = Self::parse(response).await?;

        tracing::debug!(
            risk_score = assessment.risk_score(),
            risk_level = %assessment.risk_level(),
            "Received risk assessment"
        );
        Ok(assessment)
    }

    #[tracing::instrument(skip(self), err)]
    pub async fn health(&self) -> Result<HealthResponse> {
        let url = format!("{}/health", self.config.base_url);
        let response = self.client.get(&url).send().await?;
        Self::parse(response).await
    }

    #[tracing::instrument(skip(self), err)]
    pub async fn service_info(&self) -> Result<ServiceInfoResponse> {
        let url = format!("{}/", self.config.base_url);
        let response = self.client.get(&url).send().await?;
        Self::parse(response).await
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();

        if status == StatusCode::UNPROCESSABLE_ENTITY {
            let body: ValidationBody = response.json().await?;
            return Err(MpError::Validation(body.detail));
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(MpError::network(format!(
                "request failed with status {}: {}",
                status, error_text
            )));
        }

        Ok(response.json().await?)
    }
}
