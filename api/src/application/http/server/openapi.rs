use crate::application::http::{
    food_recognition::router::FoodRecognitionApiDoc, health::HealthApiDoc,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "MealSnap API"
    ),
    nest(
        (path = "/api", api = FoodRecognitionApiDoc),
        (path = "/health", api = HealthApiDoc),
    )
)]
pub struct ApiDoc;
