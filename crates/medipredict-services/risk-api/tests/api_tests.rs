use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use medipredict_risk_api::models::{PatientVitals, RiskAssessment};
use medipredict_risk_api::service::{RiskEngine, RiskPredictor};
use medipredict_risk_api::{create_router, AppState, Config};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

/// Scores without delay and counts how often it was asked to.
#[derive(Default)]
struct CountingPredictor {
    calls: AtomicUsize,
}

#[axum::async_trait]
impl RiskPredictor for CountingPredictor {
    async fn predict(&self, vitals: &PatientVitals) -> RiskAssessment {
        self.calls.fetch_add(1, Ordering::SeqCst);
        RiskEngine::new().score(vitals)
    }
}

struct TestApp {
    predictor: Arc<CountingPredictor>,
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        Self::with_config(Config::default())
    }

    fn with_config(config: Config) -> Self {
        let predictor = Arc::new(CountingPredictor::default());
        let state = Arc::new(AppState::with_predictor(config, predictor.clone()));
        let router = create_router(state).unwrap();
        Self { predictor, router }
    }

    fn calls(&self) -> usize {
        self.predictor.calls.load(Ordering::SeqCst)
    }

    async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }
}

fn vitals(age: Value, bmi: Value, systolic_bp: Value, is_smoker: Value) -> Value {
    json!({
        "age": age,
        "bmi": bmi,
        "systolic_bp": systolic_bp,
        "is_smoker": is_smoker,
    })
}

fn detail_locs(body: &Value) -> Vec<Vec<String>> {
    body["detail"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| serde_json::from_value(e["loc"].clone()).unwrap())
        .collect()
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy"}));
}

#[tokio::test]
async fn test_service_info() {
    let app = TestApp::new();

    let (status, body) = app.get("/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "MediPredict Lite API");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["docs"], "/docs");
}

#[tokio::test]
async fn test_predict_low_risk() {
    let app = TestApp::new();

    let (status, body) = app
        .post_json(
            "/api/v1/predict",
            vitals(json!(51), json!(20.0), json!(120), json!(false)),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "risk_score": 20.0,
            "risk_level": "LOW",
            "factors": {"age_factor": 20.0, "bmi_factor": 0.0, "smoker_factor": 0.0}
        })
    );
    assert_eq!(app.calls(), 1);
}

#[tokio::test]
async fn test_predict_moderate_risk() {
    let app = TestApp::new();

    let (status, body) = app
        .post_json(
            "/api/v1/predict",
            vitals(json!(30), json!(31.0), json!(120), json!(true)),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["risk_score"], 55.0);
    assert_eq!(body["risk_level"], "MODERATE");
    assert_eq!(
        body["factors"],
        json!({"age_factor": 0.0, "bmi_factor": 30.0, "smoker_factor": 25.0})
    );
}

#[tokio::test]
async fn test_predict_high_risk() {
    let app = TestApp::new();

    let (status, body) = app
        .post_json(
            "/api/v1/predict",
            vitals(json!(60), json!(35.0), json!(150), json!(true)),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["risk_score"], 75.0);
    assert_eq!(body["risk_level"], "HIGH");
}

#[tokio::test(start_paused = true)]
async fn test_predict_with_default_engine() {
    let state = Arc::new(AppState::new(Config::default()));
    let router = create_router(state).unwrap();

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    vitals(json!(51), json!(20.0), json!(120), json!(false)).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let assessment: RiskAssessment = serde_json::from_slice(&body).unwrap();
    assert_eq!(assessment.risk_score(), 20.0);
}

#[tokio::test]
async fn test_predict_is_deterministic() {
    let app = TestApp::new();
    let payload = vitals(json!(45), json!(33.3), json!(140), json!(true));

    let (_, first) = app.post_json("/api/v1/predict", payload.clone()).await;
    let (_, second) = app.post_json("/api/v1/predict", payload).await;

    assert_eq!(first, second);
    assert_eq!(app.calls(), 2);
}

#[tokio::test]
async fn test_age_out_of_range_rejected() {
    let app = TestApp::new();

    for (age, kind) in [(0, "greater_than_equal"), (121, "less_than_equal")] {
        let (status, body) = app
            .post_json(
                "/api/v1/predict",
                vitals(json!(age), json!(20.0), json!(120), json!(false)),
            )
            .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "validation_error");
        assert_eq!(detail_locs(&body), vec![vec!["body", "age"]]);
        assert_eq!(body["detail"][0]["type"], kind);
        assert_eq!(body["detail"][0]["input"], age);
    }

    assert_eq!(app.calls(), 0);
}

#[tokio::test]
async fn test_boundary_values_accepted() {
    let app = TestApp::new();

    for payload in [
        vitals(json!(1), json!(10.0), json!(70), json!(false)),
        vitals(json!(120), json!(60.0), json!(200), json!(true)),
    ] {
        let (status, _) = app.post_json("/api/v1/predict", payload).await;
        assert_eq!(status, StatusCode::OK);
    }

    assert_eq!(app.calls(), 2);
}

#[tokio::test]
async fn test_all_field_errors_reported() {
    let app = TestApp::new();

    let (status, body) = app
        .post_json(
            "/api/v1/predict",
            vitals(json!(0), json!(9.9), json!(201), json!(false)),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        detail_locs(&body),
        vec![
            vec!["body", "age"],
            vec!["body", "bmi"],
            vec!["body", "systolic_bp"],
        ]
    );
    assert_eq!(app.calls(), 0);
}

#[tokio::test]
async fn test_missing_fields_rejected() {
    let app = TestApp::new();

    let (status, body) = app
        .post_json("/api/v1/predict", json!({"age": 40, "bmi": 22.0}))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        detail_locs(&body),
        vec![vec!["body", "systolic_bp"], vec!["body", "is_smoker"]]
    );
    for error in body["detail"].as_array().unwrap() {
        assert_eq!(error["type"], "missing");
    }
    assert_eq!(app.calls(), 0);
}

#[tokio::test]
async fn test_wrong_types_rejected() {
    let app = TestApp::new();

    let (status, body) = app
        .post_json(
            "/api/v1/predict",
            vitals(json!("forty"), json!("heavy"), json!(120.5), json!("maybe")),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let kinds: Vec<&str> = body["detail"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["int_type", "float_type", "int_type", "bool_type"]);
    assert_eq!(app.calls(), 0);
}

#[tokio::test]
async fn test_lax_values_are_coerced() {
    let app = TestApp::new();

    let (status, body) = app
        .post_json(
            "/api/v1/predict",
            vitals(json!("51"), json!("20.0"), json!(120.0), json!(0)),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["risk_score"], 20.0);

    let (status, body) = app
        .post_json(
            "/api/v1/predict",
            vitals(json!(30), json!(31), json!("120"), json!("yes")),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["risk_score"], 55.0);
    assert_eq!(app.calls(), 2);
}

#[tokio::test]
async fn test_oversized_body_keeps_payload_too_large() {
    let app = TestApp::new();
    let padding = "a".repeat(3 * 1024 * 1024);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(format!(r#"{{"note": "{padding}"}}"#)))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(app.calls(), 0);
}

#[tokio::test]
async fn test_non_object_body_rejected() {
    let app = TestApp::new();

    let (status, body) = app.post_json("/api/v1/predict", json!([1, 2, 3])).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["type"], "model_type");
    assert_eq!(detail_locs(&body), vec![vec!["body"]]);
}

#[tokio::test]
async fn test_malformed_json_rejected() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/api/v1/predict")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"age\": 40,"))
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"][0]["type"], "json_invalid");
    assert_eq!(app.calls(), 0);
}

#[tokio::test]
async fn test_missing_content_type_rejected() {
    let app = TestApp::new();

    let (status, body) = app
        .send(
            Request::builder()
                .method("POST")
                .uri("/api/v1/predict")
                .body(Body::from(
                    vitals(json!(51), json!(20.0), json!(120), json!(false)).to_string(),
                ))
                .unwrap(),
        )
        .await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["error"], "unsupported_media_type");
    assert_eq!(app.calls(), 0);
}

#[tokio::test]
async fn test_predict_requires_post() {
    let app = TestApp::new();

    let (status, _) = app.get("/api/v1/predict").await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_custom_api_prefix() {
    let mut config = Config::default();
    config.api.v1_prefix = "/v2".to_string();
    let app = TestApp::with_config(config);

    let (status, _) = app
        .post_json(
            "/v2/predict",
            vitals(json!(51), json!(20.0), json!(120), json!(false)),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .post_json(
            "/api/v1/predict",
            vitals(json!(51), json!(20.0), json!(120), json!(false)),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_preflight_allowed_origin() {
    let app = TestApp::new();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/v1/predict")
                .header(header::ORIGIN, "http://localhost:5173")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:5173"
    );
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
}

#[tokio::test]
async fn test_cors_unknown_origin_not_allowed() {
    let app = TestApp::new();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, "http://evil.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_cors_wildcard() {
    let mut config = Config::default();
    config.cors.allowed_origins = vec!["*".to_string()];
    let app = TestApp::with_config(config);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, "http://anywhere.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

#[tokio::test]
async fn test_openapi_document() {
    let app = TestApp::new();

    let (status, body) = app.get("/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "MediPredict Lite API");
    assert!(body["paths"]["/api/v1/predict"]["post"].is_object());
    assert!(body["paths"]["/health"]["get"].is_object());
    assert!(body["components"]["schemas"]["PatientVitals"].is_object());
    assert!(body["components"]["schemas"]["RiskAssessment"].is_object());
}
