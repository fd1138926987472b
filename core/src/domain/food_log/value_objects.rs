use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::entities::{FoodLogRecord, MealType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReviewInput {
    pub user_id: Uuid,
    pub meal_type: MealType,
    pub entry_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SavedMeal {
    pub records: Vec<FoodLogRecord>,
    pub library_entries_updated: usize,
    pub total_calories: f64,
}
