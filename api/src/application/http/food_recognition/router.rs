use super::handlers::recognize_food::{__path_recognize_food, recognize_food};
use crate::application::http::server::app_state::AppState;
use axum::{Router, routing::post};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(paths(recognize_food))]
pub struct FoodRecognitionApiDoc;

pub fn food_recognition_routes(state: AppState) -> Router<AppState> {
    Router::new().route(
        &format!("{}/api/recognize-food", state.args.server.root_path),
        post(recognize_food),
    )
}
