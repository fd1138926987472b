use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    common::{entities::app_errors::CoreError, generate_timestamp},
    food_recognition::entities::FoodEntry,
    portion::scaling::round_to,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    #[default]
    Lunch,
    Dinner,
    Snack,
}

impl MealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MealType::Breakfast => "早餐",
            MealType::Lunch => "午餐",
            MealType::Dinner => "晚餐",
            MealType::Snack => "加餐",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "breakfast" => Ok(MealType::Breakfast),
            "lunch" => Ok(MealType::Lunch),
            "dinner" => Ok(MealType::Dinner),
            "snack" => Ok(MealType::Snack),
            other => Err(CoreError::InvalidInput(format!("unknown meal type: {}", other))),
        }
    }
}

/// One confirmed food as stored in the daily log; plain numbers, no confidences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FoodLogRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub food_name: String,
    pub calories: f64,
    pub protein_g: f64,
    pub carbs_g: f64,
    pub fat_g: f64,
    pub weight_g: f64,
    pub meal_type: MealType,
    pub entry_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl FoodLogRecord {
    pub fn from_entry(
        user_id: Uuid,
        entry: &FoodEntry,
        meal_type: MealType,
        entry_date: NaiveDate,
    ) -> Self {
        let (now, timestamp) = generate_timestamp();

        Self {
            id: Uuid::new_v7(timestamp),
            user_id,
            food_name: entry.food_name.clone(),
            calories: entry.calories.value,
            protein_g: entry.protein_g.value,
            carbs_g: entry.carbs_g.value,
            fat_g: entry.fat_g.value,
            weight_g: entry.estimated_weight_g.value,
            meal_type,
            entry_date,
            created_at: now,
        }
    }
}

/// Per-user food remembered for quick re-entry, normalized to 100 g.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FoodLibraryEntry {
    pub user_id: Uuid,
    pub food_name: String,
    pub calories_per_100g: f64,
    pub protein_per_100g: f64,
    pub carbs_per_100g: f64,
    pub fat_per_100g: f64,
    pub updated_at: DateTime<Utc>,
}

impl FoodLibraryEntry {
    /// `None` when the entry has no usable weight to normalize by.
    pub fn from_entry(user_id: Uuid, entry: &FoodEntry) -> Option<Self> {
        let weight = entry.estimated_weight_g.value;
        if !weight.is_finite() || weight <= 0.0 {
            return None;
        }

        let per_100g = |value: f64| value / weight * 100.0;
        let (now, _) = generate_timestamp();

        Some(Self {
            user_id,
            food_name: entry.food_name.clone(),
            calories_per_100g: per_100g(entry.calories.value).round(),
            protein_per_100g: round_to(per_100g(entry.protein_g.value), 2),
            carbs_per_100g: round_to(per_100g(entry.carbs_g.value), 2),
            fat_per_100g: round_to(per_100g(entry.fat_g.value), 2),
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::food_recognition::entities::{ConfidenceValue, FoodEntryConfig};

    fn rice(weight: f64) -> FoodEntry {
        FoodEntry::new(FoodEntryConfig {
            food_name: "米饭".to_string(),
            confidence: 85.0,
            estimated_weight_g: ConfidenceValue::new(weight, 80.0),
            calories: ConfidenceValue::new(260.0, 85.0),
            protein_g: ConfidenceValue::new(5.0, 80.0),
            carbs_g: ConfidenceValue::new(56.0, 85.0),
            fat_g: ConfidenceValue::new(0.5, 75.0),
        })
    }

    #[test]
    fn test_meal_type_parsing() {
        assert_eq!("Dinner".parse::<MealType>().unwrap(), MealType::Dinner);
        assert_eq!(MealType::default(), MealType::Lunch);
        assert!("brunch".parse::<MealType>().is_err());
        assert_eq!(
            serde_json::to_string(&MealType::Snack).unwrap(),
            "\"snack\""
        );
    }

    #[test]
    fn test_record_uses_plain_values() {
        let user_id = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let record = FoodLogRecord::from_entry(user_id, &rice(200.0), MealType::Dinner, date);

        assert_eq!(record.user_id, user_id);
        assert_eq!(record.calories, 260.0);
        assert_eq!(record.weight_g, 200.0);
        assert_eq!(record.fat_g, 0.5);
        assert_eq!(record.entry_date, date);
    }

    #[test]
    fn test_library_entry_is_per_100g() {
        let entry = FoodLibraryEntry::from_entry(Uuid::new_v4(), &rice(150.0)).unwrap();

        assert_eq!(entry.calories_per_100g, 173.0);
        assert_eq!(entry.protein_per_100g, 3.33);
        assert_eq!(entry.carbs_per_100g, 37.33);
        assert_eq!(entry.fat_per_100g, 0.33);
    }

    #[test]
    fn test_zero_weight_has_no_library_entry() {
        assert!(FoodLibraryEntry::from_entry(Uuid::new_v4(), &rice(0.0)).is_none());
    }
}
