use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct RecognizeFoodRequest {
    /// `data:image/...;base64,...` or an http(s) URL.
    #[serde(default)]
    #[validate(length(min = 1, message = "请提供图片"))]
    pub image: String,
}
