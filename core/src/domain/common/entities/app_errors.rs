use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Upstream service error: {message}")]
    UpstreamService {
        status: Option<u16>,
        message: String,
    },

    #[error("Vision model returned empty content")]
    EmptyResponse,

    #[error("Vision model response was truncated")]
    TruncatedResponse,

    #[error("Vision model response is not valid JSON: {0}")]
    MalformedResponse(String),

    #[error("Recognition declined: {message}")]
    RecognitionDeclined {
        message: String,
        suggestion: Option<String>,
    },

    #[error("Cannot scale portion from weight {old_weight} to {new_weight}")]
    ScalingGuard { old_weight: f64, new_weight: f64 },

    #[error("No food entry at index {0}")]
    EntryNotFound(usize),

    #[error("Invalid value for {field}: {value}")]
    InvalidFieldValue { field: String, value: f64 },

    #[error("Repository error: {0}")]
    Repository(String),
}

impl CoreError {
    /// Stable code for logs and API bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::InvalidInput(_) => "E_INVALID_INPUT",
            CoreError::Configuration(_) => "E_CONFIGURATION",
            CoreError::UpstreamService { .. } => "E_UPSTREAM_SERVICE",
            CoreError::EmptyResponse => "E_EMPTY_RESPONSE",
            CoreError::TruncatedResponse => "E_TRUNCATED_RESPONSE",
            CoreError::MalformedResponse(_) => "E_MALFORMED_RESPONSE",
            CoreError::RecognitionDeclined { .. } => "E_RECOGNITION_DECLINED",
            CoreError::ScalingGuard { .. } => "E_SCALING_GUARD",
            CoreError::EntryNotFound(_) => "E_ENTRY_NOT_FOUND",
            CoreError::InvalidFieldValue { .. } => "E_INVALID_FIELD_VALUE",
            CoreError::Repository(_) => "E_REPOSITORY",
        }
    }

    /// Message shown to the user on the recognition error screen.
    pub fn user_message(&self) -> String {
        match self {
            CoreError::InvalidInput(message) => message.clone(),
            CoreError::Configuration(_) => "API密钥未配置".to_string(),
            CoreError::UpstreamService { message, .. } => message.clone(),
            CoreError::EmptyResponse => "AI返回结果为空，请检查API密钥或稍后重试".to_string(),
            CoreError::TruncatedResponse => "AI响应被截断，请减少食物种类后重试".to_string(),
            CoreError::MalformedResponse(_) => "AI返回格式错误，请重试".to_string(),
            CoreError::RecognitionDeclined { message, .. } => message.clone(),
            CoreError::ScalingGuard { old_weight, .. }
                if !(old_weight.is_finite() && *old_weight > 0.0) =>
            {
                "原始重量为零，无法按比例调整".to_string()
            }
            CoreError::ScalingGuard { .. } => "重量必须大于零".to_string(),
            CoreError::EntryNotFound(_) => "食物不存在".to_string(),
            CoreError::InvalidFieldValue { .. } => "数值超出范围".to_string(),
            CoreError::Repository(_) => "保存失败，请重试".to_string(),
        }
    }

    /// Whether the failure originates from the vision model or its transport.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            CoreError::UpstreamService { .. }
                | CoreError::EmptyResponse
                | CoreError::TruncatedResponse
                | CoreError::MalformedResponse(_)
        )
    }
}
