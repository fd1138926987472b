use tracing::warn;

use crate::domain::food_recognition::{
    entities::{
        ConfidenceValue, DEFAULT_CONFIDENCE, FoodEntry, FoodEntryConfig, NutritionField,
        RecognitionResult, clamp_confidence,
    },
    value_objects::{RawField, RawFieldEntry, RawFoodItem, RawRecognitionResponse},
};

/// Turns a parsed model response into confidence-annotated entries.
///
/// Never fails: items that are not objects are skipped and missing fields
/// default to zero at the item's overall confidence. When the model omits
/// `total_calories` the sum of the normalized calories is used instead.
pub fn normalize_recognition(raw: &RawRecognitionResponse) -> RecognitionResult {
    let foods: Vec<FoodEntry> = raw
        .foods
        .iter()
        .enumerate()
        .filter_map(|(position, value)| {
            let item = RawFoodItem::from_value(value);
            if item.is_none() {
                warn!(position, "Skipping food item that is not a JSON object");
            }
            item
        })
        .map(|item| normalize_food_item(&item))
        .collect();

    let total_calories = raw
        .total_calories
        .unwrap_or_else(|| foods.iter().map(|food| food.calories.value).sum());

    RecognitionResult {
        foods,
        total_calories,
    }
}

pub fn normalize_food_item(item: &RawFoodItem) -> FoodEntry {
    let overall = clamp_confidence(item.confidence.unwrap_or(DEFAULT_CONFIDENCE));

    let field = |field: NutritionField| -> ConfidenceValue {
        item.fields
            .iter()
            .find(|entry| entry.field == field)
            .map_or(ConfidenceValue::new(0.0, overall), |entry| {
                normalize_field(entry, overall)
            })
    };

    FoodEntry::new(FoodEntryConfig {
        food_name: item.food_name.clone(),
        confidence: overall,
        estimated_weight_g: field(NutritionField::Weight),
        calories: field(NutritionField::Calories),
        protein_g: field(NutritionField::Protein),
        carbs_g: field(NutritionField::Carbs),
        fat_g: field(NutritionField::Fat),
    })
}

fn normalize_field(entry: &RawFieldEntry, overall: f64) -> ConfidenceValue {
    match entry.raw {
        RawField::Scored { value, confidence } => ConfidenceValue::new(
            non_negative(value),
            confidence.or(entry.sibling_confidence).unwrap_or(overall),
        ),
        RawField::Bare(value) => ConfidenceValue::new(
            non_negative(value),
            entry.sibling_confidence.unwrap_or(overall),
        ),
        RawField::Missing => ConfidenceValue::new(0.0, entry.sibling_confidence.unwrap_or(overall)),
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}
