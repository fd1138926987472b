use tracing::{debug, error, info, instrument};

use crate::domain::{
    common::{entities::app_errors::CoreError, services::Service},
    food_recognition::{
        entities::RecognitionResult,
        normalizer::normalize_recognition,
        parser::parse_content,
        ports::{FoodRecognitionService, VisionClient},
        schema::RECOGNITION_PROMPT,
        value_objects::{ImageReference, ParsedContent, RecognizeFoodInput},
    },
};

impl<V> FoodRecognitionService for Service<V>
where
    V: VisionClient,
{
    #[instrument(skip(self, input))]
    async fn recognize_food(
        &self,
        input: RecognizeFoodInput,
    ) -> Result<RecognitionResult, CoreError> {
        // 1. Validate the image reference before touching the network
        let image = ImageReference::parse(&input.image)?;
        debug!(image_length = image.len(), "Image received");

        // 2. Ask the vision model
        let content = self
            .vision_client
            .complete_with_image(RECOGNITION_PROMPT.to_string(), image)
            .await
            .inspect_err(|e| error!(kind = e.kind(), "Vision request failed: {}", e))?;
        debug!(content_length = content.len(), "Vision model answered");

        // 3. Parse, then normalize whichever shape came back
        match parse_content(&content)? {
            ParsedContent::Declined {
                message,
                suggestion,
            } => {
                info!(%message, "Vision model declined to recognize the image");
                Err(CoreError::RecognitionDeclined {
                    message,
                    suggestion,
                })
            }
            ParsedContent::Recognition(raw) => {
                let result = normalize_recognition(&raw);
                info!(foods = result.foods.len(), "Food recognized");
                Ok(result)
            }
        }
    }
}
