use axum::extract::State;
use mealsnap_core::domain::food_recognition::{
    entities::RecognitionResult, ports::FoodRecognitionService, value_objects::RecognizeFoodInput,
};
use tracing::info;

use crate::application::http::{
    food_recognition::validators::RecognizeFoodRequest,
    server::{
        api_entities::{
            api_error::{ApiError, ApiErrorResponse, ValidateJson},
            response::Response,
        },
        app_state::AppState,
    },
};

#[utoipa::path(
    post,
    path = "/recognize-food",
    tag = "food-recognition",
    summary = "Recognize food from a photo",
    description = "Sends the image to the vision model and returns the recognized foods with per-field confidence scores.",
    responses(
        (status = 200, body = RecognitionResult),
        (status = 400, description = "Missing or malformed image, or the model declined", body = ApiErrorResponse),
        (status = 500, description = "Vision model not configured", body = ApiErrorResponse),
        (status = 502, description = "Vision model failed or answered unusably", body = ApiErrorResponse)
    ),
    request_body = RecognizeFoodRequest
)]
pub async fn recognize_food(
    State(state): State<AppState>,
    ValidateJson(payload): ValidateJson<RecognizeFoodRequest>,
) -> Result<Response<RecognitionResult>, ApiError> {
    info!(image_length = payload.image.len(), "Recognize food request");

    let result = state
        .service
        .recognize_food(RecognizeFoodInput {
            image: payload.image,
        })
        .await
        .map_err(ApiError::from)?;

    Ok(Response::OK(result))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{Value, json};
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    use crate::application::http::server::http_server::{router, state};
    use crate::args::{Args, LlmArgs, LogArgs, ServerArgs};

    const RICE: &str = r#"{"foods":[{"food_name":"米饭","confidence":85,"estimated_weight_g":{"value":200,"confidence":80},"calories":{"value":260,"confidence":85},"protein_g":{"value":5,"confidence":80},"carbs_g":{"value":56,"confidence":85},"fat_g":{"value":0.5,"confidence":75}}],"total_calories":260}"#;

    fn args(api_url: String, api_key: Option<&str>) -> Args {
        Args {
            server: ServerArgs {
                port: 0,
                host: "127.0.0.1".to_string(),
                root_path: String::new(),
                allowed_origins: Vec::new(),
            },
            llm: LlmArgs {
                api_url,
                api_key: api_key.map(str::to_string),
                model: "glm-4.6v-flash".to_string(),
                temperature: 0.3,
                max_tokens: 4096,
            },
            log: LogArgs {
                filter: "info".to_string(),
                json: false,
            },
        }
    }

    async fn glm_answering(template: ResponseTemplate, calls: u64) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(template)
            .expect(calls)
            .mount(&server)
            .await;
        server
    }

    fn app(glm: &MockServer, api_key: Option<&str>) -> TestServer {
        let args = args(format!("{}/chat/completions", glm.uri()), api_key);
        TestServer::new(router(state(Arc::new(args))).unwrap()).unwrap()
    }

    fn content(content: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        }))
    }

    #[tokio::test]
    async fn test_recognizes_food() {
        let glm = glm_answering(content(&format!("```json\n{}\n```", RICE)), 1).await;
        let server = app(&glm, Some("test-key"));

        let response = server
            .post("/api/recognize-food")
            .json(&json!({"image": "data:image/jpeg;base64,AAAA"}))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["foods"][0]["food_name"], "米饭");
        assert_eq!(body["foods"][0]["calories"]["value"], 260.0);
        assert_eq!(body["foods"][0]["fat_g"]["confidence"], 75.0);
        assert_eq!(body["total_calories"], 260.0);
    }

    #[tokio::test]
    async fn test_missing_image_is_rejected_without_calling_the_model() {
        let glm = glm_answering(content(RICE), 0).await;
        let server = app(&glm, Some("test-key"));

        let response = server.post("/api/recognize-food").json(&json!({})).await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["code"], "E_INVALID_INPUT");
        assert_eq!(body["message"], "请提供图片");
    }

    #[tokio::test]
    async fn test_unsupported_image_reference_is_rejected() {
        let glm = glm_answering(content(RICE), 0).await;
        let server = app(&glm, Some("test-key"));

        let response = server
            .post("/api/recognize-food")
            .json(&json!({"image": "ftp://example.com/lunch.jpg"}))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["message"], "图片格式不正确");
    }

    #[tokio::test]
    async fn test_declined_recognition_returns_suggestion() {
        let glm = glm_answering(
            content(r#"{"error":"无法识别，请重新拍照","suggestion":"建议: 靠近一些，确保光线充足"}"#),
            1,
        )
        .await;
        let server = app(&glm, Some("test-key"));

        let response = server
            .post("/api/recognize-food")
            .json(&json!({"image": "https://example.com/blurry.jpg"}))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["code"], "E_RECOGNITION_DECLINED");
        assert_eq!(body["message"], "无法识别，请重新拍照");
        assert_eq!(body["suggestion"], "建议: 靠近一些，确保光线充足");
    }

    #[tokio::test]
    async fn test_upstream_failure_is_bad_gateway() {
        let glm = glm_answering(
            ResponseTemplate::new(500).set_body_string("server exploded"),
            1,
        )
        .await;
        let server = app(&glm, Some("test-key"));

        let response = server
            .post("/api/recognize-food")
            .json(&json!({"image": "data:image/png;base64,AAAA"}))
            .await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        let body: Value = response.json();
        assert_eq!(body["code"], "E_UPSTREAM_SERVICE");
        assert!(
            body["message"]
                .as_str()
                .unwrap()
                .contains("server exploded")
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_is_a_server_error() {
        let glm = glm_answering(content(RICE), 0).await;
        let server = app(&glm, None);

        let response = server
            .post("/api/recognize-food")
            .json(&json!({"image": "data:image/png;base64,AAAA"}))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["code"], "E_CONFIGURATION");
        assert_eq!(body["message"], "API密钥未配置");
    }

    #[tokio::test]
    async fn test_truncated_answer_is_reported() {
        let truncated = format!("{{\"foods\":[{}", "{\"food_name\":\"饺子\"},".repeat(40));
        let glm = glm_answering(content(&truncated), 1).await;
        let server = app(&glm, Some("test-key"));

        let response = server
            .post("/api/recognize-food")
            .json(&json!({"image": "data:image/png;base64,AAAA"}))
            .await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        let body: Value = response.json();
        assert_eq!(body["code"], "E_TRUNCATED_RESPONSE");
        assert_eq!(body["message"], "AI响应被截断，请减少食物种类后重试");
    }
}
