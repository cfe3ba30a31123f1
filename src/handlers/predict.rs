//! Prediction handler
//!
//! decode → encode → scale → infer → respond

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Deserialize;
use validator::Validate;

use crate::features::encoder;
use crate::model::PredictionResult;
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct PredictRequest {
    /// Positional raw values, see `features::record`
    #[validate(length(equal = 11, message = "input must contain exactly 11 values"))]
    pub input: Vec<serde_json::Value>,
}

/// Score one patient
#[axum::debug_handler]
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> AppResult<Json<PredictionResult>> {
    let Json(req) = payload?;
    req.validate()?;

    let artifacts = state.artifacts.as_deref().ok_or(AppError::ModelNotLoaded)?;

    let features = encoder::encode_raw(&req.input, artifacts.scaler())?;
    tracing::debug!(features = %features.to_log_entry(), "Encoded input");

    let prediction = artifacts.classifier().predict(features.as_array())?;

    tracing::info!(
        "Prediction success: Result={}, Prob={:.4}",
        prediction.result,
        prediction.probability
    );

    Ok(Json(prediction))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::model::fixtures;
    use crate::{create_router, AppState};

    fn state(loaded: bool) -> AppState {
        AppState {
            config: Config::default(),
            artifacts: loaded.then(|| Arc::new(fixtures::store())),
        }
    }

    async fn post(state: AppState, body: String) -> (StatusCode, Value) {
        let response = create_router(state)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/predict")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn predict(input: Value) -> (StatusCode, Value) {
        post(state(true), json!({ "input": input }).to_string()).await
    }

    #[tokio::test]
    async fn test_reference_patient() {
        let (status, body) = predict(json!([40, 1, 1, 140, 289, 0, 0, 172, 0, 0, 0])).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], 0);
        let probability = body["probability"].as_f64().unwrap();
        assert!((probability - 0.225).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_high_risk_patient() {
        let (status, body) = predict(json!([65, 1, 3, 150, 250, 1, 1, 110, 1, 2.0, 1])).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], 1);
        let probability = body["probability"].as_f64().unwrap();
        assert!((probability - 0.825).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_identical_requests_identical_answers() {
        let input = json!([58, 0, 2, 120, 240, 0, 1, 150, 0, 0.8, 0]);
        let (_, first) = predict(input.clone()).await;
        let (_, second) = predict(input).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_wrong_length_is_500() {
        for input in [json!([40, 1, 1]), json!([40, 1, 1, 140, 289, 0, 0, 172, 0, 0, 0, 1])] {
            let (status, body) = predict(input).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert!(body["error"].as_str().unwrap().contains("11"));
        }
    }

    #[tokio::test]
    async fn test_out_of_range_code_is_500() {
        let (status, body) = predict(json!([40, 1, 1, 140, 289, 0, 0, 172, 0, 0, 3])).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["error"],
            "input[10] (ST_Slope) category code 3 is out of range 0..3"
        );
    }

    #[tokio::test]
    async fn test_non_numeric_value_is_500() {
        let (status, body) = predict(json!([40, "M", 1, 140, 289, 0, 0, 172, 0, 0, 0])).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "input[1] (Sex) must be a number");
    }

    #[tokio::test]
    async fn test_malformed_body_is_500_json() {
        let (status, body) = post(state(true), "{not json".to_string()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());

        let (status, body) = post(state(true), json!({ "values": [] }).to_string()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].is_string());
    }

    fn allow_origin(response: &axum::response::Response) -> Option<&str> {
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok())
    }

    #[tokio::test]
    async fn test_cross_origin_preflight_allowed() {
        let response = create_router(state(true))
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/predict")
                    .header(header::ORIGIN, "http://localhost:8080")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(allow_origin(&response), Some("*"));
        assert!(response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
    }

    #[tokio::test]
    async fn test_cross_origin_post_allowed_on_success_and_error() {
        for (loaded, expected) in [(true, StatusCode::OK), (false, StatusCode::INTERNAL_SERVER_ERROR)] {
            let body = json!({ "input": [40, 1, 1, 140, 289, 0, 0, 172, 0, 0, 0] }).to_string();
            let response = create_router(state(loaded))
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/predict")
                        .header(header::ORIGIN, "http://localhost:8080")
                        .header(header::CONTENT_TYPE, "application/json")
                        .body(Body::from(body))
                        .unwrap(),
                )
                .await
                .unwrap();

            assert_eq!(response.status(), expected);
            assert_eq!(allow_origin(&response), Some("*"));
        }
    }

    #[tokio::test]
    async fn test_unloaded_artifacts_fail_at_call_time() {
        let body = json!({ "input": [40, 1, 1, 140, 289, 0, 0, 172, 0, 0, 0] }).to_string();
        let (status, body) = post(state(false), body).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "model artifacts are not loaded" }));
    }
}
