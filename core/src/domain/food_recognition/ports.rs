use std::future::Future;

use crate::domain::{
    common::entities::app_errors::CoreError,
    food_recognition::{
        entities::RecognitionResult,
        value_objects::{ImageReference, RecognizeFoodInput},
    },
};

/// Client for a multimodal model that answers a text prompt about one image.
#[cfg_attr(test, mockall::automock)]
pub trait VisionClient: Send + Sync {
    /// Returns the raw message content produced by the model.
    ///
    /// Implementations report a missing credential as
    /// [`CoreError::Configuration`] before any network call, non-success
    /// statuses as [`CoreError::UpstreamService`] and a success without
    /// content as [`CoreError::EmptyResponse`].
    fn complete_with_image(
        &self,
        prompt: String,
        image: ImageReference,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;
}

/// Service trait for turning a meal photo into editable food entries
#[cfg_attr(test, mockall::automock)]
pub trait FoodRecognitionService: Send + Sync {
    fn recognize_food(
        &self,
        input: RecognizeFoodInput,
    ) -> impl Future<Output = Result<RecognitionResult, CoreError>> + Send;
}
