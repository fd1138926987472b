use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::food_entry::FoodEntry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecognitionResult {
    pub foods: Vec<FoodEntry>,
    /// Advisory total from the model; displays use [`RecognitionResult::live_total_calories`].
    pub total_calories: f64,
}

impl RecognitionResult {
    /// Nothing detected is a valid result, not an error.
    pub fn is_empty(&self) -> bool {
        self.foods.is_empty()
    }

    pub fn live_total_calories(&self) -> f64 {
        self.foods.iter().map(|food| food.calories.value).sum()
    }
}
