use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    common::{LLMConfig, entities::app_errors::CoreError},
    food_recognition::{ports::VisionClient, value_objects::ImageReference},
};

const FALLBACK_ERROR_MESSAGE: &str = "AI识别服务暂时不可用";

/// Vision client for OpenAI-compatible chat-completion endpoints (GLM-4.6V by default).
#[derive(Debug, Clone)]
pub struct GlmVisionClient {
    api_url: String,
    api_key: Option<String>,
    model_name: String,
    temperature: f32,
    max_tokens: u32,
    client: Client,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    ImageUrl { image_url: ImageUrl },
    Text { text: String },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<MessageResponse>,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    content: Option<String>,
}

impl GlmVisionClient {
    pub fn new(config: LLMConfig) -> Self {
        Self {
            api_url: config.api_url,
            api_key: config.api_key.filter(|key| !key.trim().is_empty()),
            model_name: config.model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client: Client::new(),
        }
    }

    async fn call_chat_completions(
        &self,
        api_key: &str,
        request: ChatCompletionRequest,
    ) -> Result<String, CoreError> {
        tracing::info!(model = %self.model_name, "Calling vision model");

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Vision API request failed: {}", e);
                CoreError::UpstreamService {
                    status: None,
                    message: format!("{}: {}", FALLBACK_ERROR_MESSAGE, e),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Vision API error: {} - {}", status, error_text);
            return Err(CoreError::UpstreamService {
                status: Some(status.as_u16()),
                message: extract_error_message(&error_text),
            });
        }

        let body = response.text().await.map_err(|e| {
            tracing::error!("Failed to read vision API response: {}", e);
            CoreError::UpstreamService {
                status: Some(status.as_u16()),
                message: format!("{}: {}", FALLBACK_ERROR_MESSAGE, e),
            }
        })?;

        let completion: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse vision API envelope: {}", e);
            CoreError::UpstreamService {
                status: Some(status.as_u16()),
                message: format!("API错误: {}", body),
            }
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .filter(|content| !content.trim().is_empty());

        match (content, completion.error) {
            (Some(content), _) => Ok(content),
            (None, Some(error)) if !error.is_null() => {
                tracing::error!("Vision API returned an error without content: {}", error);
                Err(CoreError::UpstreamService {
                    status: Some(status.as_u16()),
                    message: format!("API错误: {}", message_from_error_value(&error)),
                })
            }
            (None, _) => {
                tracing::error!("Vision API returned empty content");
                Err(CoreError::EmptyResponse)
            }
        }
    }
}

impl VisionClient for GlmVisionClient {
    async fn complete_with_image(
        &self,
        prompt: String,
        image: ImageReference,
    ) -> Result<String, CoreError> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::error!("GLM_API_KEY not configured");
            return Err(CoreError::Configuration(
                "GLM API key is not configured".to_string(),
            ));
        };

        let request = ChatCompletionRequest {
            model: self.model_name.clone(),
            messages: vec![Message {
                role: "user".to_string(),
                content: vec![
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image.as_str().to_string(),
                        },
                    },
                    ContentPart::Text { text: prompt },
                ],
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        self.call_chat_completions(api_key, request).await
    }
}

/// Best-effort message from an error body that may or may not be JSON.
pub fn extract_error_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(object)) => object
            .get("error")
            .map(message_from_error_value)
            .filter(|message| !message.is_empty())
            .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string()),
        Ok(_) | Err(_) if body.trim().is_empty() => FALLBACK_ERROR_MESSAGE.to_string(),
        Ok(_) | Err(_) => format!("API错误: {}", body.trim()),
    }
}

fn message_from_error_value(error: &Value) -> String {
    match error {
        Value::String(message) => message.clone(),
        Value::Object(object) => match object.get("message") {
            Some(Value::String(message)) => message.clone(),
            _ => error.to_string(),
        },
        other => other.to_string(),
    }
}
