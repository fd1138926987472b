use crate::{
    domain::common::{MealSnapConfig, services::Service},
    infrastructure::llm::GlmVisionClient,
};

pub type MealSnapService = Service<GlmVisionClient>;

pub fn create_service(config: MealSnapConfig) -> MealSnapService {
    let vision_client = GlmVisionClient::new(config.llm);

    Service::new(vision_client)
}
