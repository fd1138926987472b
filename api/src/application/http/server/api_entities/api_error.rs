use axum::{
    Json,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mealsnap_core::domain::common::entities::app_errors::CoreError;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::{error, warn};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    pub code: String,
    pub message: String,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Core(e) => core_status(e),
        }
    }

    fn body(&self) -> ApiErrorResponse {
        let status = self.status().as_u16();
        match self {
            ApiError::BadRequest(message) => ApiErrorResponse {
                code: "E_BAD_REQUEST".to_string(),
                message: message.clone(),
                status,
                suggestion: None,
                errors: Vec::new(),
            },
            ApiError::Validation(errors) => ApiErrorResponse {
                code: "E_INVALID_INPUT".to_string(),
                message: errors
                    .first()
                    .map(|e| e.message.clone())
                    .unwrap_or_else(|| self.to_string()),
                status,
                suggestion: None,
                errors: errors.clone(),
            },
            ApiError::Core(e) => ApiErrorResponse {
                code: e.kind().to_string(),
                message: e.user_message(),
                status,
                suggestion: match e {
                    CoreError::RecognitionDeclined { suggestion, .. } => suggestion.clone(),
                    _ => None,
                },
                errors: Vec::new(),
            },
        }
    }
}

fn core_status(error: &CoreError) -> StatusCode {
    match error {
        CoreError::InvalidInput(_)
        | CoreError::RecognitionDeclined { .. }
        | CoreError::ScalingGuard { .. }
        | CoreError::InvalidFieldValue { .. } => StatusCode::BAD_REQUEST,
        CoreError::EntryNotFound(_) => StatusCode::NOT_FOUND,
        CoreError::UpstreamService { .. }
        | CoreError::EmptyResponse
        | CoreError::TruncatedResponse
        | CoreError::MalformedResponse(_) => StatusCode::BAD_GATEWAY,
        CoreError::Configuration(_) | CoreError::Repository(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), "Request failed: {}", self);
        } else {
            warn!(status = status.as_u16(), "Request rejected: {}", self);
        }

        (status, Json(self.body())).into_response()
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string()),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));

        ApiError::Validation(fields)
    }
}

/// JSON body extractor that runs `validator` rules before the handler.
pub struct ValidateJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        value.validate()?;

        Ok(ValidateJson(value))
    }
}
