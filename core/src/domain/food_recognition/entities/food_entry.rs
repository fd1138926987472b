use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::common::generate_uuid_v7;

use super::confidence_value::{ConfidenceLevel, ConfidenceValue, REVIEW_THRESHOLD};

/// One recognized (or user-corrected) food item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FoodEntry {
    pub id: Uuid,
    pub food_name: String,
    pub confidence: f64,
    pub estimated_weight_g: ConfidenceValue,
    pub calories: ConfidenceValue,
    pub protein_g: ConfidenceValue,
    pub carbs_g: ConfidenceValue,
    pub fat_g: ConfidenceValue,
}

#[derive(Debug, Clone)]
pub struct FoodEntryConfig {
    pub food_name: String,
    pub confidence: f64,
    pub estimated_weight_g: ConfidenceValue,
    pub calories: ConfidenceValue,
    pub protein_g: ConfidenceValue,
    pub carbs_g: ConfidenceValue,
    pub fat_g: ConfidenceValue,
}

/// The five numeric fields of a [`FoodEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NutritionField {
    #[serde(rename = "estimated_weight_g")]
    Weight,
    Calories,
    #[serde(rename = "protein_g")]
    Protein,
    #[serde(rename = "carbs_g")]
    Carbs,
    #[serde(rename = "fat_g")]
    Fat,
}

impl NutritionField {
    pub const ALL: [NutritionField; 5] = [
        NutritionField::Weight,
        NutritionField::Calories,
        NutritionField::Protein,
        NutritionField::Carbs,
        NutritionField::Fat,
    ];

    /// Fields that follow the weight when portions are rescaled.
    pub const WEIGHT_DEPENDENT: [NutritionField; 4] = [
        NutritionField::Calories,
        NutritionField::Protein,
        NutritionField::Carbs,
        NutritionField::Fat,
    ];

    /// Key used in model responses and persisted records.
    pub fn key(&self) -> &'static str {
        match self {
            NutritionField::Weight => "estimated_weight_g",
            NutritionField::Calories => "calories",
            NutritionField::Protein => "protein_g",
            NutritionField::Carbs => "carbs_g",
            NutritionField::Fat => "fat_g",
        }
    }

    /// Whole grams and whole kcal; macros keep one decimal.
    pub fn decimals(&self) -> u32 {
        match self {
            NutritionField::Weight | NutritionField::Calories => 0,
            NutritionField::Protein | NutritionField::Carbs | NutritionField::Fat => 1,
        }
    }
}

impl FoodEntry {
    pub fn new(config: FoodEntryConfig) -> Self {
        Self {
            id: generate_uuid_v7(),
            food_name: config.food_name,
            confidence: config.confidence,
            estimated_weight_g: config.estimated_weight_g,
            calories: config.calories,
            protein_g: config.protein_g,
            carbs_g: config.carbs_g,
            fat_g: config.fat_g,
        }
    }

    pub fn field(&self, field: NutritionField) -> &ConfidenceValue {
        match field {
            NutritionField::Weight => &self.estimated_weight_g,
            NutritionField::Calories => &self.calories,
            NutritionField::Protein => &self.protein_g,
            NutritionField::Carbs => &self.carbs_g,
            NutritionField::Fat => &self.fat_g,
        }
    }

    pub fn field_mut(&mut self, field: NutritionField) -> &mut ConfidenceValue {
        match field {
            NutritionField::Weight => &mut self.estimated_weight_g,
            NutritionField::Calories => &mut self.calories,
            NutritionField::Protein => &mut self.protein_g,
            NutritionField::Carbs => &mut self.carbs_g,
            NutritionField::Fat => &mut self.fat_g,
        }
    }

    /// Replaces a field's value; its confidence is left as the model reported it.
    pub fn set_value(&mut self, field: NutritionField, value: f64) {
        let slot = self.field_mut(field);
        *slot = slot.with_value(value);
    }

    pub fn level(&self) -> ConfidenceLevel {
        ConfidenceLevel::from_score(self.confidence)
    }

    pub fn needs_review(&self) -> bool {
        self.confidence < REVIEW_THRESHOLD
    }
}
